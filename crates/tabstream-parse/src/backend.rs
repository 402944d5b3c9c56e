//! PDF parsing backend trait.
//!
//! Defines the [`PdfBackend`] trait that abstracts the few document
//! operations table extraction needs, so the facade does not depend on
//! lopdf directly.

use tabstream_core::{BBox, ExtractOptions, PdfError};

use crate::handler::ContentHandler;

/// Trait abstracting PDF parsing operations.
///
/// # Usage
///
/// ```ignore
/// let doc = MyBackend::open(pdf_bytes)?;
/// let page = MyBackend::get_page(&doc, 0)?;
/// let media_box = MyBackend::page_media_box(&doc, &page)?;
/// MyBackend::interpret_page(&doc, &page, &mut handler, &options)?;
/// ```
pub trait PdfBackend {
    /// The parsed PDF document type.
    type Document;

    /// A reference to a single page within a document.
    type Page;

    /// Backend-specific error type, convertible to [`PdfError`].
    type Error: std::error::Error + Into<PdfError>;

    /// Parse PDF bytes into a document.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// Get the MediaBox for a page, as raw `[x0, y0, x1, y1]` PDF user-space
    /// values stored in a [`BBox`].
    fn page_media_box(doc: &Self::Document, page: &Self::Page) -> Result<BBox, Self::Error>;

    /// Get the CropBox for a page, if explicitly set.
    fn page_crop_box(doc: &Self::Document, page: &Self::Page) -> Result<Option<BBox>, Self::Error>;

    /// Get the page rotation angle in degrees (0, 90, 180 or 270).
    fn page_rotate(doc: &Self::Document, page: &Self::Page) -> Result<i32, Self::Error>;

    /// Interpret the page's content stream, calling back into the handler.
    fn interpret_page(
        doc: &Self::Document,
        page: &Self::Page,
        handler: &mut dyn ContentHandler,
        options: &ExtractOptions,
    ) -> Result<(), Self::Error>;
}
