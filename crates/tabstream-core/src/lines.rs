use crate::geometry::BBox;
use crate::text::Char;

/// Options for grouping characters into horizontal text lines.
///
/// Defaults match the usual layout-analysis parameters for table work.
#[derive(Debug, Clone, PartialEq)]
pub struct LineOptions {
    /// Two characters belong to the same line when the horizontal gap between
    /// them is below `char_margin * max(width)` of the pair.
    pub char_margin: f64,
    /// A space is inserted when the gap exceeds `word_margin * max(width, height)`.
    pub word_margin: f64,
    /// Minimum vertical overlap, relative to the smaller height, for two
    /// characters to share a baseline.
    pub line_overlap: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            char_margin: 1.0,
            word_margin: 0.1,
            line_overlap: 0.5,
        }
    }
}

/// A run of characters sharing a baseline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLine {
    /// Line text, with spaces inserted at word gaps.
    pub text: String,
    /// Bounding box of the non-blank characters.
    pub bbox: BBox,
    /// The characters of the line, in reading order.
    pub chars: Vec<Char>,
}

impl TextLine {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Groups characters into [`TextLine`]s.
pub struct TextLineExtractor;

impl TextLineExtractor {
    /// Extract horizontal text lines from the given characters.
    ///
    /// Non-upright characters are skipped. Lines are returned top to bottom,
    /// left to right.
    pub fn extract(chars: &[Char], options: &LineOptions) -> Vec<TextLine> {
        let mut sorted: Vec<&Char> = chars.iter().filter(|c| c.upright).collect();
        sorted.sort_by(|a, b| {
            a.bbox
                .top
                .total_cmp(&b.bbox.top)
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });

        let mut lines = Vec::new();
        for band in Self::bands(&sorted, options) {
            lines.extend(Self::split_band(band, options));
        }
        lines.sort_by(|a, b| {
            a.bbox
                .top
                .total_cmp(&b.bbox.top)
                .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        });
        lines
    }

    /// Partition top-sorted chars into groups that overlap vertically.
    fn bands<'a>(sorted: &[&'a Char], options: &LineOptions) -> Vec<Vec<&'a Char>> {
        let mut bands: Vec<(BBox, Vec<&'a Char>)> = Vec::new();
        for &ch in sorted {
            match bands.last_mut() {
                Some((bbox, members)) if Self::shares_baseline(bbox, &ch.bbox, options) => {
                    *bbox = bbox.union(&ch.bbox);
                    members.push(ch);
                }
                _ => bands.push((ch.bbox, vec![ch])),
            }
        }
        bands.into_iter().map(|(_, members)| members).collect()
    }

    fn shares_baseline(band: &BBox, ch: &BBox, options: &LineOptions) -> bool {
        let overlap = band.bottom.min(ch.bottom) - band.top.max(ch.top);
        let min_height = band.height().min(ch.height());
        if min_height <= 0.0 {
            return overlap >= 0.0;
        }
        overlap > min_height * options.line_overlap
    }

    fn split_band(mut band: Vec<&Char>, options: &LineOptions) -> Vec<TextLine> {
        band.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let mut lines = Vec::new();
        let mut current: Vec<&Char> = Vec::new();
        for ch in band {
            if let Some(last) = current.last() {
                let gap = ch.bbox.x0 - last.bbox.x1;
                let margin = last.bbox.width().max(ch.bbox.width()) * options.char_margin;
                if gap > margin {
                    lines.extend(Self::make_line(&current, options));
                    current.clear();
                }
            }
            current.push(ch);
        }
        lines.extend(Self::make_line(&current, options));
        lines
    }

    pub(crate) fn make_line(chars: &[&Char], options: &LineOptions) -> Option<TextLine> {
        let start = chars.iter().position(|c| !c.is_blank())?;
        let end = chars.iter().rposition(|c| !c.is_blank())?;
        let chars = &chars[start..=end];

        let mut text = String::new();
        let mut prev: Option<&Char> = None;
        for &ch in chars {
            if let Some(p) = prev {
                let margin = options.word_margin * ch.bbox.width().max(ch.bbox.height());
                if ch.bbox.x0 - p.bbox.x1 > margin && !p.is_blank() && !ch.is_blank() {
                    text.push(' ');
                }
            }
            text.push_str(&ch.text);
            prev = Some(ch);
        }

        let bbox = BBox::union_all(chars.iter().filter(|c| !c.is_blank()).map(|c| &c.bbox))?;
        Some(TextLine {
            text,
            bbox,
            chars: chars.iter().map(|&c| c.clone()).collect(),
        })
    }
}
