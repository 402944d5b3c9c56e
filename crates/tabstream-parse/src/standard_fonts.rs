//! Built-in metrics for the base fonts most often left unembedded.
//!
//! Report generators commonly reference Helvetica or Courier without a
//! /Widths array. Widths are in 1/1000 em units indexed by WinAnsi code.

/// Widths and vertical metrics of a standard Type1 font.
#[derive(Debug)]
pub struct StandardFont {
    pub widths: [u16; 256],
    /// AFM Ascender.
    pub ascent: f64,
    /// AFM Descender (negative).
    pub descent: f64,
}

impl StandardFont {
    pub fn width(&self, code: u32) -> Option<f64> {
        self.widths
            .get(code as usize)
            .copied()
            .filter(|w| *w > 0)
            .map(f64::from)
    }
}

/// Look up a standard font by base name, ignoring a subset tag.
pub fn lookup(base_font: &str) -> Option<&'static StandardFont> {
    let name = strip_subset_tag(base_font);
    match name {
        "Courier" | "Courier-Bold" | "Courier-Oblique" | "Courier-BoldOblique" => Some(&COURIER),
        "Helvetica" | "Helvetica-Oblique" | "Arial" | "ArialMT" => Some(&HELVETICA),
        "Helvetica-Bold" | "Helvetica-BoldOblique" | "Arial-BoldMT" | "Arial,Bold" => {
            Some(&HELVETICA_BOLD)
        }
        _ => None,
    }
}

/// `ABCDEF+Name` -> `Name`.
pub fn strip_subset_tag(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => {
            rest
        }
        _ => name,
    }
}

static COURIER: StandardFont = StandardFont {
    widths: [600; 256],
    ascent: 629.0,
    descent: -157.0,
};

#[rustfmt::skip]
static HELVETICA: StandardFont = StandardFont {
    widths: [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
        556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
        0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
        278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
    ],
    ascent: 718.0,
    descent: -207.0,
};

#[rustfmt::skip]
static HELVETICA_BOLD: StandardFont = StandardFont {
    widths: [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
        556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
        0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
        278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
        611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
    ],
    ascent: 718.0,
    descent: -207.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_widths() {
        let font = lookup("Helvetica").unwrap();
        assert_eq!(font.width(u32::from(b'A')), Some(667.0));
        assert_eq!(font.width(u32::from(b' ')), Some(278.0));
        assert_eq!(font.width(0), None);
    }

    #[test]
    fn subset_tag_is_ignored() {
        assert_eq!(strip_subset_tag("BCDFEE+ArialMT"), "ArialMT");
        assert_eq!(strip_subset_tag("Not+Tagged"), "Not+Tagged");
        assert!(lookup("BCDFEE+Helvetica-Bold").is_some());
    }

    #[test]
    fn courier_is_monospaced() {
        let font = lookup("Courier-Oblique").unwrap();
        assert_eq!(font.width(u32::from(b'i')), Some(600.0));
        assert_eq!(font.width(u32::from(b'W')), Some(600.0));
    }

    #[test]
    fn unknown_font() {
        assert!(lookup("Calibri").is_none());
    }
}
