use crate::geometry::BBox;

/// A single character extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// The text content of this character.
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
    /// Font name.
    pub fontname: String,
    /// Font size in points.
    pub size: f64,
    /// Whether the character is upright (not rotated).
    pub upright: bool,
    /// Raw character code from the PDF content stream.
    pub char_code: u32,
}

impl Char {
    /// Whether the character renders as whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

#[cfg(test)]
pub(crate) fn test_char(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Char {
    Char {
        text: text.to_string(),
        bbox: BBox::new(x0, top, x1, bottom),
        fontname: "Helvetica".to_string(),
        size: bottom - top,
        upright: true,
        char_code: text.chars().next().map_or(0, u32::from),
    }
}
