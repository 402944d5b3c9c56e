//! Error types for the parsing and interpreter layers.
//!
//! Uses [`thiserror`] for error derivation. [`BackendError`] wraps
//! backend-specific failures and converts into [`PdfError`].

use tabstream_core::PdfError;
use thiserror::Error;

/// Error type for PDF parsing backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Io(e) => PdfError::IoError(e.to_string()),
            BackendError::Font(msg) => PdfError::FontError(msg),
            BackendError::Interpreter(msg) => PdfError::InterpreterError(msg),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display() {
        assert_eq!(
            BackendError::Parse("invalid xref table".to_string()).to_string(),
            "PDF parse error: invalid xref table"
        );
        assert_eq!(
            BackendError::Font("bad widths".to_string()).to_string(),
            "font error: bad widths"
        );
    }

    #[test]
    fn backend_error_io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BackendError = io_err.into();
        assert!(matches!(err, BackendError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn core_error_is_transparent() {
        let err = BackendError::Core(PdfError::PasswordRequired);
        assert_eq!(err.to_string(), "PDF is encrypted and requires a password");
        assert_eq!(PdfError::from(err), PdfError::PasswordRequired);
    }

    #[test]
    fn converts_to_pdf_error() {
        let cases = [
            (BackendError::Parse("p".into()), PdfError::ParseError("p".into())),
            (BackendError::Font("f".into()), PdfError::FontError("f".into())),
            (
                BackendError::Interpreter("i".into()),
                PdfError::InterpreterError("i".into()),
            ),
        ];
        for (backend, expected) in cases {
            assert_eq!(PdfError::from(backend), expected);
        }
    }
}
