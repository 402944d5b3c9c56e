//! Character bounding boxes from interpreter events.
//!
//! Combines font metrics, text state and the CTM into a page-space box in
//! top-left origin coordinates.

use tabstream_core::{BBox, Char, Ctm, Point};

use crate::handler::CharEvent;

/// Convert a [`CharEvent`] into a positioned [`Char`].
///
/// `page_height` is the height of the page box used to flip from the PDF
/// bottom-left origin: `top = page_height - max_y`.
pub fn char_from_event(event: &CharEvent, page_height: f64) -> Char {
    let font_size = event.font_size;

    // Trm = [Tfs*Th, 0, 0, Tfs, 0, Trise] x Tm x CTM
    let font_matrix = Ctm::new(
        font_size * event.h_scaling,
        0.0,
        0.0,
        font_size,
        0.0,
        event.rise,
    );
    let trm = font_matrix
        .concat(&Ctm::from_array(event.text_matrix))
        .concat(&Ctm::from_array(event.ctm));

    // The box covers the glyph width only, not char or word spacing.
    let w = event.displacement / 1000.0;
    let ascent = event.ascent / 1000.0;
    let descent = event.descent / 1000.0;

    let corners = [
        trm.transform_point(Point::new(0.0, descent)),
        trm.transform_point(Point::new(w, descent)),
        trm.transform_point(Point::new(w, ascent)),
        trm.transform_point(Point::new(0.0, ascent)),
    ];

    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let bbox = BBox::new(min_x, page_height - max_y, max_x, page_height - min_y);
    let upright = trm.b.abs() < 1e-6 && trm.c.abs() < 1e-6;

    let text = event.unicode.clone().unwrap_or_else(|| {
        char::from_u32(event.char_code)
            .filter(|c| !c.is_control() || c.is_whitespace())
            .map(|c| c.to_string())
            .unwrap_or_else(|| "\u{FFFD}".to_string())
    });

    Char {
        text,
        bbox,
        fontname: event.font_name.clone(),
        size: font_size,
        upright,
        char_code: event.char_code,
    }
}
