//! Text showing operators (Tj, TJ, ', ").
//!
//! Splits strings into character codes, records the text matrix at each
//! glyph and advances the text position within the [`TextState`].

use crate::text_state::TextState;

/// A glyph shown by a text operator, before font and CTM resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChar {
    pub char_code: u32,
    /// Glyph width in glyph space (1/1000 text space units).
    pub width: f64,
    /// Text matrix at the moment the glyph was shown.
    pub text_matrix: [f64; 6],
}

/// An element of a TJ array operand.
#[derive(Debug, Clone, PartialEq)]
pub enum TjElement {
    /// A string of bytes to show.
    String(Vec<u8>),
    /// Adjustment in thousandths of text space; positive moves left.
    Adjustment(f64),
}

/// `Tj`: show a string whose codes are `code_len` bytes wide (1 or 2).
///
/// A trailing partial code is read as a single byte.
pub fn show_string(
    text_state: &mut TextState,
    bytes: &[u8],
    code_len: usize,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    let step = code_len.max(1);
    let mut chars = Vec::with_capacity(bytes.len() / step);

    for chunk in bytes.chunks(step) {
        let char_code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
        let text_matrix = text_state.text_matrix().to_array();

        let w0 = get_width(char_code);
        // Word spacing applies to the single-byte code 32 only.
        let word_spacing = if chunk == [32] {
            text_state.word_spacing
        } else {
            0.0
        };
        let tx = ((w0 / 1000.0) * text_state.font_size + text_state.char_spacing + word_spacing)
            * text_state.h_scaling_normalized();

        chars.push(RawChar {
            char_code,
            width: w0,
            text_matrix,
        });
        text_state.advance_text_position(tx);
    }

    chars
}

/// `TJ`: show strings interleaved with positioning adjustments.
pub fn show_string_with_positioning(
    text_state: &mut TextState,
    elements: &[TjElement],
    code_len: usize,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    let mut chars = Vec::new();
    for element in elements {
        match element {
            TjElement::String(bytes) => {
                chars.extend(show_string(text_state, bytes, code_len, get_width));
            }
            TjElement::Adjustment(adj) => {
                let tx = -(adj / 1000.0) * text_state.font_size * text_state.h_scaling_normalized();
                text_state.advance_text_position(tx);
            }
        }
    }
    chars
}

/// `'`: `T*` then `Tj`.
pub fn quote_show_string(
    text_state: &mut TextState,
    bytes: &[u8],
    code_len: usize,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    text_state.move_to_next_line();
    show_string(text_state, bytes, code_len, get_width)
}

/// `"`: `aw Tw`, `ac Tc`, then `'`.
pub fn double_quote_show_string(
    text_state: &mut TextState,
    word_spacing: f64,
    char_spacing: f64,
    bytes: &[u8],
    code_len: usize,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    text_state.word_spacing = word_spacing;
    text_state.char_spacing = char_spacing;
    quote_show_string(text_state, bytes, code_len, get_width)
}
