//! Text state machine for the content stream interpreter.
//!
//! Tracks text objects (BT/ET), font selection (Tf), spacing parameters
//! and the text and line matrices moved by Tm, Td, TD and T*.

use tabstream_core::Ctm;

/// Text state parameters saved and restored by `q`/`Q`.
///
/// The text and line matrices are not part of the graphics state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStateSnapshot {
    pub char_spacing: f64,
    pub word_spacing: f64,
    pub h_scaling: f64,
    pub leading: f64,
    pub font_name: String,
    pub font_size: f64,
    pub rise: f64,
}

/// Text state tracked during content stream interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// Character spacing (Tc), added after every glyph.
    pub char_spacing: f64,
    /// Word spacing (Tw), added after single-byte code 32.
    pub word_spacing: f64,
    /// Horizontal scaling (Tz) as a percentage, 100 = normal.
    pub h_scaling: f64,
    /// Text leading (TL) used by T*, ' and ".
    pub leading: f64,
    /// Resource name of the current font, as given to Tf.
    pub font_name: String,
    pub font_size: f64,
    /// Text rise (Ts).
    pub rise: f64,
    in_text_object: bool,
    text_matrix: Ctm,
    line_matrix: Ctm,
}

impl Default for TextState {
    fn default() -> Self {
        Self::new()
    }
}

impl TextState {
    pub fn new() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 100.0,
            leading: 0.0,
            font_name: String::new(),
            font_size: 0.0,
            rise: 0.0,
            in_text_object: false,
            text_matrix: Ctm::identity(),
            line_matrix: Ctm::identity(),
        }
    }

    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    pub fn text_matrix(&self) -> &Ctm {
        &self.text_matrix
    }

    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn h_scaling_normalized(&self) -> f64 {
        self.h_scaling / 100.0
    }

    /// `BT`: reset both matrices to identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Ctm::identity();
        self.line_matrix = Ctm::identity();
        self.in_text_object = true;
    }

    /// `ET`.
    pub fn end_text(&mut self) {
        self.in_text_object = false;
    }

    /// `Tf`.
    pub fn set_font(&mut self, font_name: String, font_size: f64) {
        self.font_name = font_name;
        self.font_size = font_size;
    }

    /// `Tm`: replace both matrices.
    pub fn set_text_matrix(&mut self, m: Ctm) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: offset from the start of the current line.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        let translation = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, ty);
        self.line_matrix = translation.concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `TD`: `-ty TL` then `tx ty Td`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `T*`: `0 -TL Td`.
    pub fn move_to_next_line(&mut self) {
        let leading = self.leading;
        self.move_text_position(0.0, -leading);
    }

    /// Advance the text matrix by `tx` text space units after a glyph.
    pub fn advance_text_position(&mut self, tx: f64) {
        let translation = Ctm::new(1.0, 0.0, 0.0, 1.0, tx, 0.0);
        self.text_matrix = translation.concat(&self.text_matrix);
    }

    /// `q`: snapshot the graphics-state part of the text state.
    pub fn save_snapshot(&self) -> TextStateSnapshot {
        TextStateSnapshot {
            char_spacing: self.char_spacing,
            word_spacing: self.word_spacing,
            h_scaling: self.h_scaling,
            leading: self.leading,
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            rise: self.rise,
        }
    }

    /// `Q`.
    pub fn restore_snapshot(&mut self, snapshot: TextStateSnapshot) {
        self.char_spacing = snapshot.char_spacing;
        self.word_spacing = snapshot.word_spacing;
        self.h_scaling = snapshot.h_scaling;
        self.leading = snapshot.leading;
        self.font_name = snapshot.font_name;
        self.font_size = snapshot.font_size;
        self.rise = snapshot.rise;
    }
}
