//! tabstream-parse: PDF parsing backend and text interpreter.
//!
//! Opens documents through a pluggable [`PdfBackend`] (lopdf by default),
//! walks page content streams and reports every shown glyph to a
//! [`ContentHandler`]. Glyphs become positioned [`Char`]s via
//! [`char_from_event`].
//!
//! [`Char`]: tabstream_core::Char

pub mod backend;
pub mod char_extraction;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font;
pub mod handler;
pub mod interpreter;
pub mod lopdf_backend;
pub mod standard_fonts;
pub mod text_renderer;
pub mod text_state;

pub use backend::PdfBackend;
pub use char_extraction::char_from_event;
pub use error::BackendError;
pub use handler::{CharEvent, ContentHandler};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use tabstream_core;
