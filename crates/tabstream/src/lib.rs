//! tabstream: extract whitespace-separated tables from PDF documents.
//!
//! This is the public API facade. It re-exports types from
//! `tabstream-core` and drives `tabstream-parse` to read pages.
//!
//! # Architecture
//!
//! - **tabstream-core**: geometry, characters, text lines, the stream table
//!   parser, parsing reports and SVG plots
//! - **tabstream-parse**: lopdf backend and text-only content stream interpreter
//! - **tabstream** (this crate): [`Pdf`], [`Page`], [`read_pdf`] and [`TableList`]
//!
//! # Example
//!
//! ```ignore
//! use tabstream::{ReadOptions, read_pdf};
//!
//! let options = ReadOptions {
//!     pages: "1-end".to_string(),
//!     table_areas: vec!["20, 720, 577, 124".to_string()],
//!     columns: vec!["25, 250, 260, 360".to_string()],
//!     ..ReadOptions::default()
//! };
//! let tables = read_pdf("db/report.pdf", &options)?;
//! println!("{}", tables.first().map(|t| t.parsing_report).unwrap_or_default());
//! ```

mod page;
mod page_range;
mod pdf;
mod read;
mod tables;

pub use page::Page;
pub use page_range::PageSelection;
pub use pdf::Pdf;
pub use read::{Flavor, ReadOptions, plot, read_pdf};
pub use tables::{ExportFormat, TableList};

pub use tabstream_core::{
    BBox, Cell, Char, ColumnSeparators, ExtractOptions, ExtractWarning, ExtractWarningCode,
    LineOptions, ParsingReport, PdfError, PlotKind, StreamSettings, Table, TableArea, TableGrid,
    TextLine,
};

pub use tabstream_core;
pub use tabstream_parse;
