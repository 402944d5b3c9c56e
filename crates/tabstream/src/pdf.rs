//! Top-level PDF document type.

use tabstream_core::{BBox, Char, ExtractOptions, ExtractWarning, PdfError};
use tabstream_parse::{
    CharEvent, ContentHandler, LopdfBackend, LopdfDocument, PdfBackend, char_from_event,
};
use tracing::debug;

use crate::Page;

/// A PDF document opened for table extraction.
///
/// # Example
///
/// ```ignore
/// let pdf = Pdf::open_file("db/report.pdf", None)?;
/// let page = pdf.page(0)?;
/// println!("{} chars", page.chars().len());
/// ```
pub struct Pdf {
    doc: LopdfDocument,
    options: ExtractOptions,
}

/// Collects content stream events for one page.
struct CollectingHandler {
    chars: Vec<CharEvent>,
    warnings: Vec<ExtractWarning>,
    page_number: usize,
}

impl CollectingHandler {
    fn new(page_number: usize) -> Self {
        Self {
            chars: Vec::new(),
            warnings: Vec::new(),
            page_number,
        }
    }
}

impl ContentHandler for CollectingHandler {
    fn on_char(&mut self, event: CharEvent) {
        self.chars.push(event);
    }

    fn on_warning(&mut self, warning: ExtractWarning) {
        let warning = match warning.page {
            Some(_) => warning,
            None => warning.on_page(self.page_number),
        };
        self.warnings.push(warning);
    }
}

impl Pdf {
    /// Open a PDF document from a file path.
    ///
    /// # Errors
    ///
    /// [`PdfError::FileNotFound`] when `path` does not exist, otherwise any
    /// error from [`Pdf::open`].
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PdfError::FileNotFound(path.display().to_string()),
            _ => PdfError::IoError(format!("{}: {e}", path.display())),
        })?;
        Self::open(&bytes, options)
    }

    /// Open a PDF document from bytes.
    ///
    /// # Errors
    ///
    /// [`PdfError::PasswordRequired`] for encrypted documents and
    /// [`PdfError::ParseError`] when the bytes are not a PDF.
    pub fn open(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Self, PdfError> {
        let doc = LopdfBackend::open(bytes).map_err(PdfError::from)?;
        debug!(pages = LopdfBackend::page_count(&doc), "opened PDF");
        Ok(Self {
            doc,
            options: options.unwrap_or_default(),
        })
    }

    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// Interpret the page at the 0-based `index`.
    ///
    /// Page dimensions come from the CropBox, falling back to the MediaBox.
    pub fn page(&self, index: usize) -> Result<Page, PdfError> {
        let lopdf_page = LopdfBackend::get_page(&self.doc, index).map_err(PdfError::from)?;
        let media_box =
            LopdfBackend::page_media_box(&self.doc, &lopdf_page).map_err(PdfError::from)?;
        let crop_box =
            LopdfBackend::page_crop_box(&self.doc, &lopdf_page).map_err(PdfError::from)?;
        let rotation = LopdfBackend::page_rotate(&self.doc, &lopdf_page).map_err(PdfError::from)?;
        let visible = crop_box.unwrap_or(media_box);
        let (width, height) = page_extent(&visible);

        let number = index + 1;
        let mut handler = CollectingHandler::new(number);
        LopdfBackend::interpret_page(&self.doc, &lopdf_page, &mut handler, &self.options)
            .map_err(PdfError::from)?;

        let chars: Vec<Char> = handler
            .chars
            .iter()
            .map(|event| char_from_event(event, height))
            .collect();
        debug!(
            page = number,
            chars = chars.len(),
            warnings = handler.warnings.len(),
            "interpreted page"
        );

        Ok(Page::new(number, width, height, chars)
            .with_rotation(rotation)
            .with_warnings(handler.warnings))
    }

    /// Interpret every page in order.
    pub fn pages(&self) -> impl Iterator<Item = Result<Page, PdfError>> + '_ {
        (0..self.page_count()).map(|i| self.page(i))
    }
}

/// Width and height measured from the user-space origin, so table areas
/// given in PDF coordinates keep lining up with the characters.
fn page_extent(bbox: &BBox) -> (f64, f64) {
    // Boxes from the backend keep raw y values: `top` is the lower edge.
    (bbox.x1, bbox.bottom.max(bbox.top))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_uses_upper_right_corner() {
        assert_eq!(page_extent(&BBox::new(0.0, 0.0, 612.0, 792.0)), (612.0, 792.0));
        assert_eq!(
            page_extent(&BBox::new(10.0, 20.0, 600.0, 700.0)),
            (600.0, 700.0)
        );
    }

    #[test]
    fn open_rejects_garbage() {
        let err = Pdf::open(b"not a pdf", None).err().unwrap();
        assert!(matches!(err, PdfError::ParseError(_)));
    }

    #[test]
    fn open_file_missing_path() {
        let err = Pdf::open_file("/nonexistent/db/report.pdf", None)
            .err()
            .unwrap();
        assert_eq!(
            err,
            PdfError::FileNotFound("/nonexistent/db/report.pdf".to_string())
        );
    }

    #[test]
    fn handler_tags_warnings_with_page() {
        let mut handler = CollectingHandler::new(4);
        handler.on_warning(ExtractWarning::with_code(
            tabstream_core::ExtractWarningCode::MissingFont,
            "missing",
        ));
        assert_eq!(handler.warnings[0].page, Some(4));
    }
}
