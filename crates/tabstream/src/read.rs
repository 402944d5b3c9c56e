//! `read_pdf`: pages in, tables out.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tabstream_core::{
    ColumnSeparators, PdfError, PlotKind, StreamParser, StreamSettings, Table, TableArea,
    TableRegion, plot_tables,
};
use tracing::{debug, warn};

use crate::{Page, PageSelection, Pdf, TableList};

/// How table structure is detected.
///
/// Only whitespace-based detection is available; ruling-line detection is
/// recognised by name and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Flavor {
    /// Rows and columns from gaps between text.
    #[default]
    Stream,
}

impl FromStr for Flavor {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stream" => Ok(Flavor::Stream),
            "lattice" => Err(PdfError::Other(
                "flavor 'lattice' is not supported, use 'stream'".to_string(),
            )),
            other => Err(PdfError::Other(format!("unknown flavor '{other}'"))),
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Stream => f.write_str("stream"),
        }
    }
}

/// Options for [`read_pdf`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadOptions {
    /// Page selection, see [`PageSelection::parse`] (default: `"1"`).
    pub pages: String,
    pub flavor: Flavor,
    /// Table areas as `"x1, y1, x2, y2"` in PDF coordinates; empty means the
    /// whole page.
    pub table_areas: Vec<String>,
    /// Column separators as `"x1, x2, ..."`. List `i` applies to area `i`;
    /// a single list applies to every area.
    pub columns: Vec<String>,
    /// Characters stripped from both ends of every cell.
    pub strip_text: String,
    pub row_tol: f64,
    pub column_tol: f64,
    pub split_text: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        let settings = StreamSettings::default();
        Self {
            pages: "1".to_string(),
            flavor: Flavor::Stream,
            table_areas: Vec::new(),
            columns: Vec::new(),
            strip_text: settings.strip_text,
            row_tol: settings.row_tol,
            column_tol: settings.column_tol,
            split_text: settings.split_text,
        }
    }
}

impl ReadOptions {
    fn stream_settings(&self) -> StreamSettings {
        StreamSettings {
            row_tol: self.row_tol,
            column_tol: self.column_tol,
            split_text: self.split_text,
            strip_text: self.strip_text.clone(),
            ..StreamSettings::default()
        }
    }
}

/// Extract tables from the selected pages of the PDF at `path`.
///
/// Pages are read in ascending order and, within a page, one table is
/// produced per table area in the order given.
///
/// # Errors
///
/// [`PdfError::FileNotFound`] for a missing file, [`PdfError::InvalidArea`]
/// or [`PdfError::InvalidPageRange`] for malformed options, and any error
/// raised while reading the document.
pub fn read_pdf(path: impl AsRef<Path>, options: &ReadOptions) -> Result<TableList, PdfError> {
    let path = path.as_ref();
    // Validate options before touching the file.
    let areas = parse_areas(&options.table_areas)?;
    let columns = parse_columns(&options.columns, areas.len())?;

    let pdf = Pdf::open_file(path, None)?;
    let selection = PageSelection::parse(&options.pages, pdf.page_count())?;
    debug!(
        path = %path.display(),
        flavor = %options.flavor,
        pages = selection.len(),
        "reading tables"
    );

    let parser = StreamParser::new(options.stream_settings());
    let mut tables = Vec::new();
    let mut pages = Vec::with_capacity(selection.len());
    for index in selection {
        let page = pdf.page(index)?;
        let regions = regions_for_page(&page, &areas, &columns);
        for w in page.warnings() {
            warn!(page = page.number(), code = %w.code, "{}", w.description);
        }
        let found = parser.extract(page.as_text(), &regions);
        debug!(page = page.number(), tables = found.len(), "parsed page");
        tables.extend(found);
        pages.push(page);
    }

    Ok(TableList::new(tables, pages))
}

/// Render a debug plot of `table` over `page` as an SVG document.
pub fn plot(table: &Table, page: &Page, kind: PlotKind) -> String {
    plot_tables(page.width(), page.height(), page.chars(), &[table], kind)
}

fn parse_areas(areas: &[String]) -> Result<Vec<TableArea>, PdfError> {
    areas.iter().map(|a| a.parse::<TableArea>()).collect()
}

/// One separator list per area, or a single list shared by all of them.
fn parse_columns(columns: &[String], area_count: usize) -> Result<Vec<ColumnSeparators>, PdfError> {
    let parsed: Vec<ColumnSeparators> = columns
        .iter()
        .map(|c| c.parse::<ColumnSeparators>())
        .collect::<Result<_, _>>()?;
    match (parsed.len(), area_count) {
        (0, _) | (1, _) => Ok(parsed),
        (n, m) if n == m => Ok(parsed),
        (n, m) => Err(PdfError::InvalidArea(format!(
            "{n} column lists given for {m} table areas"
        ))),
    }
}

fn regions_for_page(
    page: &Page,
    areas: &[TableArea],
    columns: &[ColumnSeparators],
) -> Vec<TableRegion> {
    let columns_for = |i: usize| match columns {
        [] => ColumnSeparators::default(),
        [only] => only.clone(),
        many => many.get(i).cloned().unwrap_or_default(),
    };
    if areas.is_empty() {
        // Columns without an area apply to the whole page.
        return match columns {
            [] => Vec::new(),
            _ => vec![TableRegion {
                area: TableArea::full_page(page.width(), page.height()),
                columns: columns_for(0),
            }],
        };
    }
    areas
        .iter()
        .enumerate()
        .map(|(i, area)| TableRegion {
            area: *area,
            columns: columns_for(i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flavor_parsing() {
        assert_eq!("stream".parse::<Flavor>().unwrap(), Flavor::Stream);
        assert_eq!(" Stream ".parse::<Flavor>().unwrap(), Flavor::Stream);
        let err = "lattice".parse::<Flavor>().unwrap_err();
        assert!(err.to_string().contains("not supported"));
        assert!("grid".parse::<Flavor>().is_err());
        assert_eq!(Flavor::Stream.to_string(), "stream");
    }

    #[test]
    fn default_options() {
        let options = ReadOptions::default();
        assert_eq!(options.pages, "1");
        assert_eq!(options.flavor, Flavor::Stream);
        assert_eq!(options.row_tol, 2.0);
        assert!(options.table_areas.is_empty());
        assert_eq!(options.stream_settings(), StreamSettings::default());
    }

    #[test]
    fn column_lists_must_match_areas() {
        assert_eq!(parse_columns(&[], 2).unwrap().len(), 0);
        assert_eq!(parse_columns(&strings(&["10, 20"]), 3).unwrap().len(), 1);
        assert_eq!(
            parse_columns(&strings(&["10", "20"]), 2).unwrap().len(),
            2
        );
        assert!(matches!(
            parse_columns(&strings(&["10", "20"]), 3),
            Err(PdfError::InvalidArea(_))
        ));
        assert!(parse_columns(&strings(&["10, x"]), 1).is_err());
    }

    #[test]
    fn single_column_list_applies_to_every_area() {
        let page = Page::new(1, 612.0, 792.0, Vec::new());
        let areas = parse_areas(&strings(&["0, 700, 300, 400", "300, 700, 600, 400"])).unwrap();
        let columns = parse_columns(&strings(&["100, 200"]), areas.len()).unwrap();
        let regions = regions_for_page(&page, &areas, &columns);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].columns.as_slice(), &[100.0, 200.0]);
    }

    #[test]
    fn columns_without_area_cover_the_page() {
        let page = Page::new(1, 612.0, 792.0, Vec::new());
        let columns = parse_columns(&strings(&["100"]), 0).unwrap();
        let regions = regions_for_page(&page, &[], &columns);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, TableArea::full_page(612.0, 792.0));
        assert!(regions_for_page(&page, &[], &[]).is_empty());
    }

    #[test]
    fn invalid_area_is_reported_before_opening() {
        let options = ReadOptions {
            table_areas: strings(&["1, 2, 3"]),
            ..ReadOptions::default()
        };
        let err = read_pdf("/nonexistent.pdf", &options).unwrap_err();
        assert!(matches!(err, PdfError::InvalidArea(_)));
    }

    #[test]
    fn missing_file() {
        let err = read_pdf("/nonexistent/db/report.pdf", &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, PdfError::FileNotFound(_)));
    }
}
