//! Simple-font encodings: WinAnsi, MacRoman, Standard and /Differences.
//!
//! The single-byte code pages come from `encoding_rs`; /Differences glyph
//! names are resolved through a small Adobe glyph list subset plus the
//! `uniXXXX` and `uXXXX[XX]` conventions.

use std::borrow::Cow;

use encoding_rs::{Encoding, MACINTOSH, WINDOWS_1252};

/// Base encodings a simple font may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardEncoding {
    WinAnsi,
    MacRoman,
    Standard,
}

impl StandardEncoding {
    /// Parse an /Encoding or /BaseEncoding name.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"WinAnsiEncoding" => Some(StandardEncoding::WinAnsi),
            b"MacRomanEncoding" => Some(StandardEncoding::MacRoman),
            b"StandardEncoding" => Some(StandardEncoding::Standard),
            _ => None,
        }
    }
}

/// A 256-entry code to Unicode table.
#[derive(Debug, Clone, PartialEq)]
pub struct FontEncoding {
    table: Vec<Option<char>>,
}

impl FontEncoding {
    pub fn from_standard(encoding: StandardEncoding) -> Self {
        let table = match encoding {
            StandardEncoding::WinAnsi => code_page_table(WINDOWS_1252),
            StandardEncoding::MacRoman => code_page_table(MACINTOSH),
            StandardEncoding::Standard => standard_table(),
        };
        Self { table }
    }

    /// Override entries from a parsed /Differences array.
    pub fn apply_differences(&mut self, differences: &[(u8, char)]) {
        for &(code, ch) in differences {
            self.table[usize::from(code)] = Some(ch);
        }
    }

    pub fn decode(&self, code: u8) -> Option<char> {
        self.table[usize::from(code)]
    }
}

fn code_page_table(encoding: &'static Encoding) -> Vec<Option<char>> {
    (0u8..=255)
        .map(|b| {
            let bytes = [b];
            let (decoded, _had_errors): (Cow<'_, str>, bool) =
                encoding.decode_without_bom_handling(&bytes);
            decoded
                .chars()
                .next()
                .filter(|c| !c.is_control() && *c != '\u{FFFD}')
        })
        .collect()
}

/// Adobe StandardEncoding: ASCII with curly quotes, plus a handful of
/// upper-half glyphs that show up in reports.
fn standard_table() -> Vec<Option<char>> {
    let mut table: Vec<Option<char>> = (0u8..=255)
        .map(|b| (0x20..0x7f).contains(&b).then_some(char::from(b)))
        .collect();
    table[0x27] = Some('\u{2019}');
    table[0x60] = Some('\u{2018}');
    for (code, ch) in [
        (0xa1, '¡'),
        (0xa2, '¢'),
        (0xa3, '£'),
        (0xa5, '¥'),
        (0xa7, '§'),
        (0xab, '«'),
        (0xb1, '\u{2013}'),
        (0xb2, '\u{2020}'),
        (0xb7, '\u{2022}'),
        (0xbb, '»'),
        (0xbc, '\u{2026}'),
        (0xd0, '\u{2014}'),
        (0xe1, 'Æ'),
        (0xe9, 'Ø'),
        (0xf1, 'æ'),
        (0xf5, 'ı'),
        (0xf9, 'ø'),
        (0xfb, 'ß'),
    ] {
        table[code as usize] = Some(ch);
    }
    table
}

/// Resolve a glyph name from a /Differences array.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    if let Some(ch) = GLYPH_NAMES
        .iter()
        .find(|(glyph, _)| *glyph == name)
        .map(|(_, ch)| *ch)
    {
        return Some(ch);
    }
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_alphabetic() {
            return Some(ch);
        }
    }
    let hex = name
        .strip_prefix("uni")
        .filter(|h| h.len() == 4)
        .or_else(|| name.strip_prefix('u').filter(|h| (4..=6).contains(&h.len())))?;
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

const GLYPH_NAMES: &[(&str, char)] = &[
    ("space", ' '),
    ("exclam", '!'),
    ("quotedbl", '"'),
    ("numbersign", '#'),
    ("dollar", '$'),
    ("percent", '%'),
    ("ampersand", '&'),
    ("quotesingle", '\''),
    ("quoteright", '\u{2019}'),
    ("quoteleft", '\u{2018}'),
    ("parenleft", '('),
    ("parenright", ')'),
    ("asterisk", '*'),
    ("plus", '+'),
    ("comma", ','),
    ("hyphen", '-'),
    ("minus", '\u{2212}'),
    ("period", '.'),
    ("slash", '/'),
    ("zero", '0'),
    ("one", '1'),
    ("two", '2'),
    ("three", '3'),
    ("four", '4'),
    ("five", '5'),
    ("six", '6'),
    ("seven", '7'),
    ("eight", '8'),
    ("nine", '9'),
    ("colon", ':'),
    ("semicolon", ';'),
    ("less", '<'),
    ("equal", '='),
    ("greater", '>'),
    ("question", '?'),
    ("at", '@'),
    ("bracketleft", '['),
    ("backslash", '\\'),
    ("bracketright", ']'),
    ("underscore", '_'),
    ("braceleft", '{'),
    ("bar", '|'),
    ("braceright", '}'),
    ("asciitilde", '~'),
    ("bullet", '\u{2022}'),
    ("endash", '\u{2013}'),
    ("emdash", '\u{2014}'),
    ("ellipsis", '\u{2026}'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("degree", '°'),
    ("section", '§'),
    ("Euro", '€'),
    ("sterling", '£'),
    ("nbspace", '\u{00A0}'),
    ("adieresis", 'ä'),
    ("odieresis", 'ö'),
    ("udieresis", 'ü'),
    ("Adieresis", 'Ä'),
    ("Odieresis", 'Ö'),
    ("Udieresis", 'Ü'),
    ("germandbls", 'ß'),
    ("eacute", 'é'),
    ("egrave", 'è'),
    ("agrave", 'à'),
    ("ccedilla", 'ç'),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_decodes_ascii_and_extended() {
        let enc = FontEncoding::from_standard(StandardEncoding::WinAnsi);
        assert_eq!(enc.decode(b'A'), Some('A'));
        assert_eq!(enc.decode(0x80), Some('€'));
        assert_eq!(enc.decode(0xe9), Some('é'));
        assert_eq!(enc.decode(0x07), None);
    }

    #[test]
    fn mac_roman_upper_half() {
        let enc = FontEncoding::from_standard(StandardEncoding::MacRoman);
        assert_eq!(enc.decode(0x8e), Some('é'));
        assert_eq!(enc.decode(b'z'), Some('z'));
    }

    #[test]
    fn standard_uses_curly_quotes() {
        let enc = FontEncoding::from_standard(StandardEncoding::Standard);
        assert_eq!(enc.decode(0x27), Some('\u{2019}'));
        assert_eq!(enc.decode(0x80), None);
    }

    #[test]
    fn differences_override_base() {
        let mut enc = FontEncoding::from_standard(StandardEncoding::WinAnsi);
        enc.apply_differences(&[(b'A', 'Ω')]);
        assert_eq!(enc.decode(b'A'), Some('Ω'));
        assert_eq!(enc.decode(b'B'), Some('B'));
    }

    #[test]
    fn glyph_names() {
        assert_eq!(glyph_name_to_char("period"), Some('.'));
        assert_eq!(glyph_name_to_char("Q"), Some('Q'));
        assert_eq!(glyph_name_to_char("uni20AC"), Some('€'));
        assert_eq!(glyph_name_to_char("u1F600"), Some('😀'));
        assert_eq!(glyph_name_to_char("g123"), None);
    }

    #[test]
    fn encoding_names() {
        assert_eq!(
            StandardEncoding::from_name(b"WinAnsiEncoding"),
            Some(StandardEncoding::WinAnsi)
        );
        assert_eq!(StandardEncoding::from_name(b"Identity-H"), None);
    }
}
