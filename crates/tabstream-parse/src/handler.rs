//! Content handler callback trait for content stream interpretation.
//!
//! The interpreter calls [`ContentHandler`] methods as it processes text
//! showing operators; the facade collects the events into characters.

use tabstream_core::ExtractWarning;

/// Information about a rendered character glyph.
///
/// Produced for every glyph shown by `Tj`, `TJ`, `'` and `"`. Carries the
/// positioning and font context needed to compute the glyph's bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct CharEvent {
    /// The character code from the PDF content stream.
    pub char_code: u32,
    /// Unicode text, if the font's encoding or ToUnicode map resolved it.
    pub unicode: Option<String>,
    /// Font base name (e.g., "Helvetica", "BCDFEE+ArialMT").
    pub font_name: String,
    /// Font size in text space units.
    pub font_size: f64,
    /// The text matrix at the time of rendering.
    pub text_matrix: [f64; 6],
    /// The current transformation matrix at the time of rendering.
    pub ctm: [f64; 6],
    /// Glyph width in glyph space units (1/1000 of text space).
    pub displacement: f64,
    /// Horizontal scaling factor (Tz operator, as a fraction: 100% = 1.0).
    pub h_scaling: f64,
    /// Text rise value (Ts operator).
    pub rise: f64,
    /// Font ascent in glyph space units.
    pub ascent: f64,
    /// Font descent in glyph space units (negative below the baseline).
    pub descent: f64,
}

/// Callback handler for content stream interpretation.
///
/// Both methods have default no-op implementations.
pub trait ContentHandler {
    /// Called for each rendered character glyph.
    fn on_char(&mut self, _event: CharEvent) {}

    /// Called for non-fatal problems met while interpreting.
    fn on_warning(&mut self, _warning: ExtractWarning) {}
}
