//! Errors, warnings and interpreter limits.
//!
//! A [`PdfError`] ends a read. An [`ExtractWarning`] is recorded on the
//! page and extraction carries on.

use std::fmt;

/// Why a document, page or option could not be read.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Broken file structure or object syntax.
    ParseError(String),
    /// Reading or writing a file failed.
    IoError(String),
    /// The input file does not exist.
    FileNotFound(String),
    /// A font dictionary could not be used.
    FontError(String),
    /// A content stream could not be interpreted.
    InterpreterError(String),
    /// A table area or column list could not be parsed.
    InvalidArea(String),
    /// A page selection string could not be parsed.
    InvalidPageRange(String),
    /// A page index past the end of the document.
    PageOutOfRange {
        /// Requested 0-based index.
        index: usize,
        /// Number of pages in the document.
        count: usize,
    },
    /// Encrypted documents are not supported.
    PasswordRequired,
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::FileNotFound(path) => write!(f, "file not found: {path}"),
            PdfError::FontError(msg) => write!(f, "font error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::InvalidArea(msg) => write!(f, "invalid table area: {msg}"),
            PdfError::InvalidPageRange(msg) => write!(f, "invalid page range: {msg}"),
            PdfError::PageOutOfRange { index, count } => write!(
                f,
                "page index {index} out of range (document has {count} pages)"
            ),
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
            PdfError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Warning category, stable across releases.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// `Tf` named a font missing from the resources.
    MissingFont,
    /// An object had the wrong type or shape.
    MalformedObject,
    /// A character code had no Unicode mapping.
    EncodingFallback,
    /// Text fell outside every column of a table.
    TextOutsideColumns,
    Other(String),
}

impl ExtractWarningCode {
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::MissingFont => "MISSING_FONT",
            ExtractWarningCode::MalformedObject => "MALFORMED_OBJECT",
            ExtractWarningCode::EncodingFallback => "ENCODING_FALLBACK",
            ExtractWarningCode::TextOutsideColumns => "TEXT_OUTSIDE_COLUMNS",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something odd that did not stop extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    pub code: ExtractWarningCode,
    pub description: String,
    /// 1-based page number, set by the page reader.
    pub page: Option<usize>,
    /// Resource name of the font involved.
    pub font_name: Option<String>,
}

impl ExtractWarning {
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            font_name: None,
        }
    }

    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }

    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        Ok(())
    }
}

/// Limits for the content stream interpreter.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Deepest Form XObject nesting followed (default 10).
    pub max_recursion_depth: usize,
    /// Content streams larger than this are refused (default 100 MiB).
    pub max_stream_bytes: usize,
    /// Report warnings to the handler (default true).
    pub collect_warnings: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 10,
            max_stream_bytes: 100 * 1024 * 1024,
            collect_warnings: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_error_display() {
        assert_eq!(
            PdfError::ParseError("invalid xref".to_string()).to_string(),
            "parse error: invalid xref"
        );
        assert_eq!(
            PdfError::FileNotFound("db/report.pdf".to_string()).to_string(),
            "file not found: db/report.pdf"
        );
        assert_eq!(
            PdfError::PageOutOfRange { index: 4, count: 2 }.to_string(),
            "page index 4 out of range (document has 2 pages)"
        );
        assert_eq!(
            PdfError::InvalidArea("expected 4 values".to_string()).to_string(),
            "invalid table area: expected 4 values"
        );
    }

    #[test]
    fn pdf_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PdfError = io.into();
        assert!(matches!(err, PdfError::IoError(ref m) if m.contains("denied")));
    }

    #[test]
    fn warning_display_includes_context() {
        let w = ExtractWarning::with_code(ExtractWarningCode::MissingFont, "font /F9 not found")
            .with_font("F9")
            .on_page(0);
        assert_eq!(
            w.to_string(),
            "[MISSING_FONT] font /F9 not found (page 0) [font F9]"
        );
    }

    #[test]
    fn extract_options_defaults() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.max_recursion_depth, 10);
        assert_eq!(opts.max_stream_bytes, 100 * 1024 * 1024);
        assert!(opts.collect_warnings);
    }
}
