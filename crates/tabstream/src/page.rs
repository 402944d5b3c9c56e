//! A single interpreted page.

use tabstream_core::{Char, ExtractWarning, LineOptions, PageText, TextLine, TextLineExtractor};

/// One page of a PDF document with its positioned characters.
///
/// Coordinates are top-left based: `top = height - y`.
#[derive(Debug, Clone)]
pub struct Page {
    number: usize,
    width: f64,
    height: f64,
    rotation: i32,
    chars: Vec<Char>,
    warnings: Vec<ExtractWarning>,
}

impl Page {
    pub fn new(number: usize, width: f64, height: f64, chars: Vec<Char>) -> Self {
        Self {
            number,
            width,
            height,
            rotation: 0,
            chars,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_rotation(mut self, rotation: i32) -> Self {
        self.rotation = rotation;
        self
    }

    pub(crate) fn with_warnings(mut self, warnings: Vec<ExtractWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// 1-based page number.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// /Rotate value normalised to 0, 90, 180 or 270.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    /// Non-fatal problems met while interpreting the page.
    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    /// Group the page's characters into horizontal text lines.
    pub fn text_lines(&self, options: &LineOptions) -> Vec<TextLine> {
        TextLineExtractor::extract(&self.chars, options)
    }

    /// Borrowed view handed to the stream parser.
    pub fn as_text(&self) -> PageText<'_> {
        PageText {
            number: self.number,
            width: self.width,
            height: self.height,
            chars: &self.chars,
        }
    }
}
