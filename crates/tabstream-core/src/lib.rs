//! tabstream-core: backend-independent data types and algorithms.
//!
//! Holds the page geometry, positioned characters, text-line grouping,
//! table areas, the stream table parser, parsing reports and the SVG
//! debug plot. Nothing here touches PDF bytes; see `tabstream-parse`.

pub mod area;
pub mod error;
pub mod geometry;
pub mod lines;
pub mod report;
pub mod stream;
pub mod svg;
pub mod table;
pub mod text;

pub use area::{ColumnSeparators, TableArea};
pub use error::{ExtractOptions, ExtractWarning, ExtractWarningCode, PdfError};
pub use geometry::{BBox, Ctm, Point};
pub use lines::{LineOptions, TextLine, TextLineExtractor};
pub use report::ParsingReport;
pub use stream::{PageText, StreamParser, StreamSettings, TableRegion};
pub use svg::{DrawStyle, PlotKind, SvgOptions, SvgRenderer, plot_tables};
pub use table::{Cell, Table, TableGrid};
pub use text::Char;
