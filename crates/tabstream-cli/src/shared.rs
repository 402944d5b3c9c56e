use std::fmt::Display;
use std::path::Path;

/// Fail with exit status 1 unless `file` exists.
///
/// Runs before anything is written to stdout.
pub fn require_file(file: &Path) -> Result<(), i32> {
    if file.is_file() {
        Ok(())
    } else {
        eprintln!("Error: file not found: {}", file.display());
        Err(1)
    }
}

/// Print `Error: <context>: <err>` to stderr and return exit status 1.
pub fn fail(context: &str, err: impl Display) -> i32 {
    eprintln!("Error: {context}: {err}");
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_exit_code_one() {
        assert_eq!(
            require_file(Path::new("/nonexistent/db/report.pdf")),
            Err(1)
        );
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(require_file(dir.path()), Err(1));
    }

    #[test]
    fn existing_file_passes() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(require_file(file.path()), Ok(()));
    }

    #[test]
    fn fail_returns_one() {
        assert_eq!(fail("reading tables", "boom"), 1);
    }
}
