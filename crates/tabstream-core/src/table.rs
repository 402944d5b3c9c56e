//! Extracted tables and their text renderings.

use std::fmt;

use crate::geometry::BBox;
use crate::report::ParsingReport;

/// A single cell of a table grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Cell bounds in top-left page coordinates.
    pub bbox: BBox,
    /// Stripped cell text; empty when nothing was placed here.
    pub text: String,
}

/// A table extracted from one table area of one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    /// 1-based page number.
    pub page: usize,
    /// 1-based index of the table on its page.
    pub order: usize,
    /// The table area this table was read from, top-left coordinates.
    pub bbox: BBox,
    /// Column bounds `(x_left, x_right)`, left to right.
    pub cols: Vec<(f64, f64)>,
    /// Row bounds `(top, bottom)`, top to bottom.
    pub rows: Vec<(f64, f64)>,
    /// Cells in row-major order, `rows.len()` by `cols.len()`.
    pub cells: Vec<Vec<Cell>>,
    /// Parsing quality report.
    pub parsing_report: ParsingReport,
}

impl Table {
    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell texts as a row-major grid of strings.
    pub fn data(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.text.clone()).collect())
            .collect()
    }

    /// Printable grid view of the table.
    pub fn grid(&self) -> TableGrid {
        TableGrid::new(self.data(), self.cols.len())
    }

    /// CSV with every field quoted, one record per row, no header.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in &self.cells {
            let fields: Vec<String> = row
                .iter()
                .map(|c| format!("\"{}\"", c.text.replace('"', "\"\"")))
                .collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.shape();
        write!(f, "<Table shape=({rows}, {cols})>")
    }
}

/// Column-aligned text rendering of a grid of strings.
///
/// A header line holds the column indices; each row is prefixed with its
/// index. Cells are right-aligned and separated by two spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGrid {
    data: Vec<Vec<String>>,
    ncols: usize,
}

impl TableGrid {
    pub fn new(data: Vec<Vec<String>>, ncols: usize) -> Self {
        Self { data, ncols }
    }

    /// An empty grid without columns.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }
}

impl fmt::Display for TableGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            let cols: Vec<String> = (0..self.ncols).map(|c| c.to_string()).collect();
            return write!(f, "Empty grid\nColumns: [{}]\nIndex: []", cols.join(", "));
        }

        let index_width = (self.data.len() - 1).to_string().chars().count();
        let widths: Vec<usize> = (0..self.ncols)
            .map(|c| {
                self.data
                    .iter()
                    .filter_map(|row| row.get(c))
                    .map(|s| display_width(s))
                    .max()
                    .unwrap_or(0)
                    .max(c.to_string().len())
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (c, w) in widths.iter().enumerate() {
            write!(f, "  {:>w$}", c)?;
        }
        for (r, row) in self.data.iter().enumerate() {
            write!(f, "\n{r:<index_width$}")?;
            for (c, w) in widths.iter().enumerate() {
                let cell = row.get(c).map(|s| flatten(s)).unwrap_or_default();
                let pad = w.saturating_sub(display_width(&cell));
                write!(f, "  {:pad$}{cell}", "")?;
            }
        }
        Ok(())
    }
}

/// Embedded newlines would break the alignment; show them escaped.
fn flatten(s: &str) -> String {
    s.replace('\n', "\\n")
}

fn display_width(s: &str) -> usize {
    flatten(s).chars().count()
}
