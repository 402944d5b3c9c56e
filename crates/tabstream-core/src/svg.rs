//! SVG rendering for visual debugging of table extraction.
//!
//! Produces standalone SVG documents in the top-left page coordinate
//! system. The page itself is not rasterised; characters are drawn as
//! outlined boxes so the plot shows where text sits relative to the
//! detected table, its rows and its columns.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::error::PdfError;
use crate::geometry::BBox;
use crate::table::Table;
use crate::text::Char;

/// What a debug plot shows on top of the page outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotKind {
    /// Table boundary rectangles.
    #[default]
    Contour,
    /// Character boxes.
    Text,
    /// Cell grid built from row and column bounds.
    Grid,
}

impl FromStr for PlotKind {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contour" => Ok(PlotKind::Contour),
            "text" => Ok(PlotKind::Text),
            "grid" => Ok(PlotKind::Grid),
            other => Err(PdfError::Other(format!(
                "unknown plot kind '{other}' (expected contour, text or grid)"
            ))),
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlotKind::Contour => "contour",
            PlotKind::Text => "text",
            PlotKind::Grid => "grid",
        })
    }
}

/// Options for SVG generation.
#[derive(Debug, Clone)]
pub struct SvgOptions {
    /// Optional fixed width for the SVG output. If `None`, uses the page width.
    pub width: Option<f64>,
    /// Optional fixed height for the SVG output. If `None`, uses the page height.
    pub height: Option<f64>,
    /// Scale factor for the SVG output. Default is `1.0`.
    pub scale: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale: 1.0,
        }
    }
}

/// Stroke and fill used for one layer of drawn shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub fill: Option<String>,
}

impl DrawStyle {
    pub fn chars_default() -> Self {
        Self {
            stroke: "blue".to_string(),
            stroke_width: 0.3,
            fill: None,
        }
    }

    pub fn contour_default() -> Self {
        Self {
            stroke: "red".to_string(),
            stroke_width: 1.0,
            fill: None,
        }
    }

    pub fn grid_default() -> Self {
        Self {
            stroke: "green".to_string(),
            stroke_width: 0.5,
            fill: None,
        }
    }
}

/// Renders a page outline plus debug shapes as SVG markup.
pub struct SvgRenderer {
    page_width: f64,
    page_height: f64,
    shapes: String,
}

impl SvgRenderer {
    /// Create a new `SvgRenderer` for a page with the given dimensions.
    pub fn new(page_width: f64, page_height: f64) -> Self {
        Self {
            page_width,
            page_height,
            shapes: String::new(),
        }
    }

    pub fn draw_rect(&mut self, bbox: &BBox, style: &DrawStyle) {
        let fill = style.fill.as_deref().unwrap_or("none");
        // Writing into a String cannot fail.
        let _ = writeln!(
            self.shapes,
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" \
             fill=\"{fill}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            bbox.x0,
            bbox.top,
            bbox.width(),
            bbox.height(),
            style.stroke,
            style.stroke_width,
        );
    }

    pub fn draw_chars(&mut self, chars: &[Char], style: &DrawStyle) {
        for ch in chars.iter().filter(|c| !c.is_blank()) {
            self.draw_rect(&ch.bbox, style);
        }
    }

    /// Draw each table's boundary.
    pub fn draw_contours(&mut self, tables: &[&Table], style: &DrawStyle) {
        for table in tables {
            self.draw_rect(&table.bbox, style);
        }
    }

    /// Draw each table's cells.
    pub fn draw_grids(&mut self, tables: &[&Table], style: &DrawStyle) {
        for cell in tables.iter().flat_map(|t| t.cells.iter().flatten()) {
            self.draw_rect(&cell.bbox, style);
        }
    }

    /// Generate SVG markup for the page and everything drawn so far.
    ///
    /// The output is a complete SVG 1.1 document whose `viewBox` matches the
    /// page dimensions.
    pub fn to_svg(&self, options: &SvgOptions) -> String {
        let view_width = self.page_width;
        let view_height = self.page_height;

        let svg_width = options.width.unwrap_or(self.page_width * options.scale);
        let svg_height = options.height.unwrap_or(self.page_height * options.scale);

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
             width=\"{svg_width}\" height=\"{svg_height}\" \
             viewBox=\"0 0 {view_width} {view_height}\">\n"
        ));
        svg.push_str(&format!(
            "  <rect x=\"0\" y=\"0\" width=\"{view_width}\" height=\"{view_height}\" \
             fill=\"white\" stroke=\"black\" stroke-width=\"0.5\"/>\n"
        ));
        svg.push_str(&self.shapes);
        svg.push_str("</svg>\n");
        svg
    }
}

/// Build the debug plot of `kind` for tables that all sit on one page.
pub fn plot_tables(
    page_width: f64,
    page_height: f64,
    chars: &[Char],
    tables: &[&Table],
    kind: PlotKind,
) -> String {
    let mut renderer = SvgRenderer::new(page_width, page_height);
    match kind {
        PlotKind::Contour => renderer.draw_contours(tables, &DrawStyle::contour_default()),
        PlotKind::Text => renderer.draw_chars(chars, &DrawStyle::chars_default()),
        PlotKind::Grid => renderer.draw_grids(tables, &DrawStyle::grid_default()),
    }
    renderer.to_svg(&SvgOptions::default())
}
