//! The result of [`read_pdf`](crate::read_pdf): tables plus the pages they came from.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tabstream_core::{ExtractWarning, PdfError, Table};
use tracing::debug;

use crate::Page;

/// File format for [`TableList::export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Every field quoted, one record per row.
    Csv,
    /// An array of row arrays.
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Render one table in this format.
    pub fn render(&self, table: &Table) -> Result<String, PdfError> {
        match self {
            ExportFormat::Csv => Ok(table.to_csv()),
            ExportFormat::Json => serde_json::to_string_pretty(&table.data())
                .map_err(|e| PdfError::Other(format!("failed to serialize table: {e}"))),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(PdfError::Other(format!("unknown export format '{other}'"))),
        }
    }
}

/// Tables extracted from a document, in page then area order.
#[derive(Debug, Clone, Default)]
pub struct TableList {
    tables: Vec<Table>,
    pages: Vec<Page>,
}

impl TableList {
    pub fn new(tables: Vec<Table>, pages: Vec<Page>) -> Self {
        Self { tables, pages }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Table> {
        self.tables.get(index)
    }

    pub fn first(&self) -> Option<&Table> {
        self.tables.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// The interpreted page a table was read from.
    pub fn page_of(&self, table: &Table) -> Option<&Page> {
        self.pages.iter().find(|p| p.number() == table.page)
    }

    /// Warnings raised while interpreting the pages, in page order.
    pub fn warnings(&self) -> impl Iterator<Item = &ExtractWarning> {
        self.pages.iter().flat_map(Page::warnings)
    }

    /// Write one file per table next to `path`.
    ///
    /// For `out/report.csv` the files are named
    /// `out/report-page-<p>-table-<o>.csv`. Returns the written paths.
    pub fn export(
        &self,
        path: impl AsRef<Path>,
        format: ExportFormat,
    ) -> Result<Vec<PathBuf>, PdfError> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PdfError::Other(format!("no file name in {}", path.display())))?;
        let dir = path.parent().unwrap_or_else(|| Path::new(""));

        let mut written = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            let file = dir.join(format!(
                "{stem}-page-{}-table-{}.{}",
                table.page,
                table.order,
                format.extension()
            ));
            std::fs::write(&file, format.render(table)?)
                .map_err(|e| PdfError::IoError(format!("{}: {e}", file.display())))?;
            debug!(file = %file.display(), "exported table");
            written.push(file);
        }
        Ok(written)
    }
}

impl fmt::Display for TableList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<TableList n={}>", self.tables.len())
    }
}

impl<'a> IntoIterator for &'a TableList {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
