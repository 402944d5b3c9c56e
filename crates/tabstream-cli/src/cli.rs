use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tabstream::PlotKind;

pub const DEFAULT_DIR: &str = "db";
pub const DEFAULT_NAME: &str = "report";
pub const DEFAULT_PAGES: &str = "1-end";
pub const DEFAULT_FLAVOR: &str = "stream";
pub const DEFAULT_AREA: &str = "20, 720, 577, 124 ";
pub const DEFAULT_COLUMNS: &str = "25, 250, 260, 360,370, 480, 500, 570";
pub const DEFAULT_STRIP: &str = " .\n";

/// Extract the report table from every page of a PDF.
///
/// Prints the parsing report of the first table, then its grid, then
/// `pause`.
#[derive(Debug, Parser)]
#[command(name = "tabstream", about, version)]
pub struct Cli {
    /// Path to the PDF file. Overrides --dir and --name
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Directory holding the report
    #[arg(long, default_value = DEFAULT_DIR)]
    pub dir: PathBuf,

    /// Report name, without the .pdf extension
    #[arg(long, default_value = DEFAULT_NAME)]
    pub name: String,

    /// Page selection (e.g. '1', '1,3-5', '1-end', 'all')
    #[arg(long, default_value = DEFAULT_PAGES)]
    pub pages: String,

    /// Table detection flavor (only 'stream' is supported)
    #[arg(long, default_value = DEFAULT_FLAVOR)]
    pub flavor: String,

    /// Table area 'x1, y1, x2, y2' in PDF coordinates (repeatable)
    #[arg(long = "area", value_name = "X1,Y1,X2,Y2", default_value = DEFAULT_AREA)]
    pub areas: Vec<String>,

    /// Column separators 'x1, x2, ...' (repeatable, one per area)
    #[arg(long, value_name = "X,...", default_value = DEFAULT_COLUMNS)]
    pub columns: Vec<String>,

    /// Characters stripped from both ends of every cell
    #[arg(long, default_value = DEFAULT_STRIP, hide_default_value = true)]
    pub strip: String,

    /// Lines whose bottoms are this close share a row
    #[arg(long, default_value_t = 2.0)]
    pub row_tol: f64,

    /// Write the debug plot of the first table to this SVG file
    #[arg(long, value_name = "FILE")]
    pub plot: Option<PathBuf>,

    /// What the debug plot shows
    #[arg(long, value_enum, default_value_t = PlotKindArg::Contour)]
    pub plot_kind: PlotKindArg,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print every table instead of only the first
    #[arg(long)]
    pub all_tables: bool,
}

impl Cli {
    /// `FILE` when given, otherwise `<dir>/<name>.pdf`.
    pub fn input_path(&self) -> PathBuf {
        match &self.file {
            Some(file) => file.clone(),
            None => self.dir.join(format!("{}.pdf", self.name)),
        }
    }
}

/// Output format for extracted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Report line, grid, then `pause`
    Text,
    /// JSON object with reports and cell data
    Json,
    /// Report header and values, then the cells as CSV
    Csv,
}

/// Debug plot kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotKindArg {
    /// Table bounding box
    Contour,
    /// Character boxes
    Text,
    /// Row and column boundaries
    Grid,
}

impl From<PlotKindArg> for PlotKind {
    fn from(kind: PlotKindArg) -> Self {
        match kind {
            PlotKindArg::Contour => PlotKind::Contour,
            PlotKindArg::Text => PlotKind::Text,
            PlotKindArg::Grid => PlotKind::Grid,
        }
    }
}
