//! Table areas and column separators.
//!
//! Both are given in PDF user space (origin at the bottom-left corner of
//! the page), the way they are read off a PDF viewer. [`TableArea::to_bbox`]
//! converts into the top-left [`BBox`] used by the rest of the crate.

use std::fmt;
use std::str::FromStr;

use crate::error::PdfError;
use crate::geometry::BBox;

/// A rectangular region expected to hold one table.
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right corner,
/// in PDF coordinates, so `y1 > y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableArea {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl TableArea {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, PdfError> {
        if x1 >= x2 {
            return Err(PdfError::InvalidArea(format!(
                "left edge {x1} must be less than right edge {x2}"
            )));
        }
        if y1 <= y2 {
            return Err(PdfError::InvalidArea(format!(
                "top edge {y1} must be greater than bottom edge {y2}"
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// The whole page as a single area.
    pub fn full_page(width: f64, height: f64) -> Self {
        Self {
            x1: 0.0,
            y1: height,
            x2: width,
            y2: 0.0,
        }
    }

    /// Convert to a top-left origin bounding box on a page of `page_height`.
    pub fn to_bbox(&self, page_height: f64) -> BBox {
        BBox::new(self.x1, page_height - self.y1, self.x2, page_height - self.y2)
    }
}

impl FromStr for TableArea {
    type Err = PdfError;

    /// Parse `"x1, y1, x2, y2"`; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = parse_numbers(s)?;
        let [x1, y1, x2, y2] = values[..] else {
            return Err(PdfError::InvalidArea(format!(
                "expected 4 comma-separated values, got {} in '{}'",
                values.len(),
                s.trim()
            )));
        };
        Self::new(x1, y1, x2, y2)
    }
}

impl fmt::Display for TableArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Explicit x coordinates separating table columns.
///
/// An empty list asks the stream parser to infer columns from text gaps.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSeparators(Vec<f64>);

impl ColumnSeparators {
    /// Build from raw coordinates; they are sorted ascending.
    pub fn new(mut xs: Vec<f64>) -> Self {
        xs.sort_by(f64::total_cmp);
        xs.dedup();
        Self(xs)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for ColumnSeparators {
    type Err = PdfError;

    /// Parse `"25, 250, 260"`; an empty or blank string yields no separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(Self::new(parse_numbers(s)?))
    }
}

fn parse_numbers(s: &str) -> Result<Vec<f64>, PdfError> {
    s.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PdfError::InvalidArea(format!("'{part}' is not a number")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_area_with_irregular_spacing() {
        let area: TableArea = "20, 720, 577, 124 ".parse().unwrap();
        assert_eq!(area, TableArea::new(20.0, 720.0, 577.0, 124.0).unwrap());
    }

    #[test]
    fn area_to_top_left_bbox() {
        let area: TableArea = "20,720,577,124".parse().unwrap();
        let bbox = area.to_bbox(792.0);
        assert_eq!(bbox, BBox::new(20.0, 72.0, 577.0, 668.0));
    }

    #[test]
    fn area_wrong_arity() {
        let err = "1, 2, 3".parse::<TableArea>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid table area: expected 4 comma-separated values, got 3 in '1, 2, 3'"
        );
    }

    #[test]
    fn area_not_a_number() {
        let err = "a, 2, 3, 4".parse::<TableArea>().unwrap_err();
        assert_eq!(err.to_string(), "invalid table area: 'a' is not a number");
    }

    #[test]
    fn area_inverted_edges() {
        assert!("100, 700, 50, 100".parse::<TableArea>().is_err());
        assert!("10, 100, 50, 700".parse::<TableArea>().is_err());
    }

    #[test]
    fn full_page_area() {
        let bbox = TableArea::full_page(612.0, 792.0).to_bbox(792.0);
        assert_eq!(bbox, BBox::new(0.0, 0.0, 612.0, 792.0));
    }

    #[test]
    fn parse_columns() {
        let cols: ColumnSeparators = "25, 250, 260, 360,370, 480, 500, 570".parse().unwrap();
        assert_eq!(
            cols.as_slice(),
            &[25.0, 250.0, 260.0, 360.0, 370.0, 480.0, 500.0, 570.0]
        );
    }

    #[test]
    fn columns_are_sorted_and_deduplicated() {
        let cols: ColumnSeparators = "300, 100, 200, 100".parse().unwrap();
        assert_eq!(cols.as_slice(), &[100.0, 200.0, 300.0]);
    }

    #[test]
    fn blank_columns_mean_inference() {
        let cols: ColumnSeparators = "  ".parse().unwrap();
        assert!(cols.is_empty());
    }

    #[test]
    fn columns_reject_garbage() {
        assert!("10, x".parse::<ColumnSeparators>().is_err());
        assert!("10,,20".parse::<ColumnSeparators>().is_err());
    }

    #[test]
    fn area_display() {
        let area = TableArea::new(20.0, 720.0, 577.0, 124.5).unwrap();
        assert_eq!(area.to_string(), "20,720,577,124.5");
    }
}
