//! Font loading: widths, vertical metrics and code to Unicode mapping.
//!
//! Handles simple fonts (/Widths, /Encoding, standard font fallback) and
//! Type0 fonts with two-byte codes and a descendant /W array. A /ToUnicode
//! CMap always takes priority over the encoding.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};

use crate::cmap::ToUnicodeCMap;
use crate::encoding::{FontEncoding, StandardEncoding, glyph_name_to_char};
use crate::error::BackendError;
use crate::lopdf_backend::{object_to_f64, resolve, stream_bytes};
use crate::standard_fonts::{self, strip_subset_tag};

const DEFAULT_ASCENT: f64 = 750.0;
const DEFAULT_DESCENT: f64 = -250.0;
const DEFAULT_WIDTH: f64 = 600.0;
const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// Glyph widths and vertical metrics, in glyph space units.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    widths: Vec<f64>,
    first_char: u32,
    missing_width: f64,
    ascent: f64,
    descent: f64,
}

impl FontMetrics {
    pub fn new(
        widths: Vec<f64>,
        first_char: u32,
        missing_width: f64,
        ascent: f64,
        descent: f64,
    ) -> Self {
        Self {
            widths,
            first_char,
            missing_width,
            ascent,
            descent,
        }
    }

    /// Metrics used when a font cannot be resolved.
    pub fn default_metrics() -> Self {
        Self::new(Vec::new(), 0, DEFAULT_WIDTH, DEFAULT_ASCENT, DEFAULT_DESCENT)
    }

    pub fn get_width(&self, char_code: u32) -> f64 {
        char_code
            .checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .unwrap_or(self.missing_width)
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }
}

/// A font resolved from a page's /Resources, ready for text showing.
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// /BaseFont without its subset tag, or the resource name.
    pub base_name: String,
    pub metrics: FontMetrics,
    /// Per-CID widths from a descendant font's /W array.
    cid_widths: Option<HashMap<u32, f64>>,
    two_byte: bool,
    encoding: Option<FontEncoding>,
    to_unicode: Option<ToUnicodeCMap>,
}

impl LoadedFont {
    /// Placeholder for a font missing from the resources.
    pub fn fallback(resource_name: &str) -> Self {
        Self {
            base_name: resource_name.to_string(),
            metrics: FontMetrics::default_metrics(),
            cid_widths: None,
            two_byte: false,
            encoding: None,
            to_unicode: None,
        }
    }

    pub fn load(
        doc: &Document,
        font_dict: &Dictionary,
        resource_name: &str,
    ) -> Result<Self, BackendError> {
        let base_name = font_dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| strip_subset_tag(&String::from_utf8_lossy(n)).to_string())
            .unwrap_or_else(|| resource_name.to_string());

        let to_unicode = match font_dict.get(b"ToUnicode").map(|o| resolve(doc, o)) {
            Ok(Object::Stream(stream)) => Some(ToUnicodeCMap::parse(&stream_bytes(stream)?)?),
            _ => None,
        };

        let is_type0 = font_dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            == Some(b"Type0".as_slice());

        if is_type0 {
            let descendant = descendant_font(doc, font_dict);
            let (ascent, descent) = descendant
                .map(|d| descriptor_metrics(doc, d))
                .unwrap_or((DEFAULT_ASCENT, DEFAULT_DESCENT));
            let default_width = descendant
                .and_then(|d| d.get(b"DW").ok())
                .and_then(object_to_f64)
                .unwrap_or(DEFAULT_CID_WIDTH);
            let cid_widths = descendant
                .and_then(|d| d.get(b"W").ok())
                .and_then(|w| resolve(doc, w).as_array().ok())
                .map(|arr| parse_cid_widths(doc, arr))
                .unwrap_or_default();

            return Ok(Self {
                base_name,
                metrics: FontMetrics::new(Vec::new(), 0, default_width, ascent, descent),
                cid_widths: Some(cid_widths),
                two_byte: true,
                encoding: None,
                to_unicode,
            });
        }

        let standard = standard_fonts::lookup(&base_name);
        let widths: Vec<f64> = font_dict
            .get(b"Widths")
            .ok()
            .and_then(|o| resolve(doc, o).as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|o| object_to_f64(resolve(doc, o)).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();
        let first_char = font_dict
            .get(b"FirstChar")
            .ok()
            .and_then(object_to_f64)
            .map_or(0, |v| v as u32);

        let has_descriptor = font_dict.get(b"FontDescriptor").is_ok();
        let (ascent, descent) = match standard {
            Some(font) if !has_descriptor => (font.ascent, font.descent),
            _ => descriptor_metrics(doc, font_dict),
        };
        let missing_width = font_dict
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve(doc, o).as_dict().ok())
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(object_to_f64);

        let metrics = if widths.is_empty() {
            match standard {
                Some(font) => FontMetrics::new(
                    font.widths.iter().map(|w| f64::from(*w)).collect(),
                    0,
                    missing_width.unwrap_or(DEFAULT_WIDTH),
                    ascent,
                    descent,
                ),
                None => FontMetrics::new(
                    Vec::new(),
                    0,
                    missing_width.unwrap_or(DEFAULT_WIDTH),
                    ascent,
                    descent,
                ),
            }
        } else {
            FontMetrics::new(
                widths,
                first_char,
                missing_width.unwrap_or(0.0),
                ascent,
                descent,
            )
        };

        Ok(Self {
            base_name,
            metrics,
            cid_widths: None,
            two_byte: false,
            encoding: font_encoding(doc, font_dict),
            to_unicode,
        })
    }

    /// Bytes per character code in shown strings.
    pub fn code_len(&self) -> usize {
        if self.two_byte { 2 } else { 1 }
    }

    pub fn width(&self, code: u32) -> f64 {
        match &self.cid_widths {
            Some(widths) => widths
                .get(&code)
                .copied()
                .unwrap_or(self.metrics.missing_width),
            None => self.metrics.get_width(code),
        }
    }

    /// Unicode text for a code: ToUnicode first, then the simple encoding.
    pub fn unicode(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.as_ref().and_then(|c| c.lookup(code)) {
            return Some(text.to_string());
        }
        let byte = u8::try_from(code).ok()?;
        self.encoding
            .as_ref()
            .and_then(|enc| enc.decode(byte))
            .map(String::from)
    }

    /// Whether codes can be mapped to text other than by their raw value.
    pub fn has_text_mapping(&self) -> bool {
        self.to_unicode.is_some() || self.encoding.is_some()
    }

    /// Ascent and descent used for glyph boxes.
    ///
    /// The box is one em tall, anchored at the font's descent. A font that
    /// reports both values as zero gets a box from the baseline up.
    pub fn vertical_metrics(&self) -> (f64, f64) {
        let (ascent, descent) = (self.metrics.ascent(), self.metrics.descent());
        if ascent == 0.0 && descent == 0.0 {
            (1000.0, 0.0)
        } else {
            (1000.0 + descent, descent)
        }
    }
}

fn descendant_font<'a>(doc: &'a Document, type0: &'a Dictionary) -> Option<&'a Dictionary> {
    let arr = resolve(doc, type0.get(b"DescendantFonts").ok()?)
        .as_array()
        .ok()?;
    resolve(doc, arr.first()?).as_dict().ok()
}

/// /Ascent and /Descent from a font's /FontDescriptor.
fn descriptor_metrics(doc: &Document, font_dict: &Dictionary) -> (f64, f64) {
    let Some(desc) = font_dict
        .get(b"FontDescriptor")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
    else {
        return (DEFAULT_ASCENT, DEFAULT_DESCENT);
    };
    let read = |key: &[u8]| desc.get(key).ok().map(|o| resolve(doc, o)).and_then(object_to_f64);
    (
        read(&b"Ascent"[..]).unwrap_or(DEFAULT_ASCENT),
        read(&b"Descent"[..]).unwrap_or(DEFAULT_DESCENT),
    )
}

/// Parse a /W array: `c [w1 w2 ...]` or `c_first c_last w`.
fn parse_cid_widths(doc: &Document, arr: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < arr.len() {
        let Some(start) = object_to_f64(resolve(doc, &arr[i])).map(|v| v as u32) else {
            i += 1;
            continue;
        };
        match arr.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    if let Some(w) = object_to_f64(resolve(doc, w)) {
                        widths.insert(start + offset as u32, w);
                    }
                }
                i += 2;
            }
            Some(end) => {
                let end = object_to_f64(end).map_or(start, |v| v as u32);
                if let Some(w) = arr.get(i + 2).and_then(|o| object_to_f64(resolve(doc, o))) {
                    for cid in start..=end.min(start.saturating_add(0xFFFF)) {
                        widths.insert(cid, w);
                    }
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}

fn font_encoding(doc: &Document, font_dict: &Dictionary) -> Option<FontEncoding> {
    let obj = resolve(doc, font_dict.get(b"Encoding").ok()?);
    if let Ok(name) = obj.as_name() {
        return StandardEncoding::from_name(name).map(FontEncoding::from_standard);
    }
    let dict = obj.as_dict().ok()?;
    let base = dict
        .get(b"BaseEncoding")
        .ok()
        .and_then(|o| o.as_name().ok())
        .and_then(StandardEncoding::from_name)
        .unwrap_or(StandardEncoding::Standard);
    let mut encoding = FontEncoding::from_standard(base);
    if let Ok(differences) = dict
        .get(b"Differences")
        .and_then(|o| resolve(doc, o).as_array())
    {
        encoding.apply_differences(&parse_differences(differences));
    }
    Some(encoding)
}

/// `[code /name /name ... code /name ...]` to `(code, char)` pairs.
fn parse_differences(arr: &[Object]) -> Vec<(u8, char)> {
    let mut out = Vec::new();
    let mut code: Option<u8> = None;
    for obj in arr {
        match obj {
            Object::Integer(i) => code = u8::try_from(*i).ok(),
            Object::Name(name) => {
                if let Some(c) = code {
                    if let Some(ch) = glyph_name_to_char(&String::from_utf8_lossy(name)) {
                        out.push((c, ch));
                    }
                    code = c.checked_add(1);
                }
            }
            _ => {}
        }
    }
    out
}
