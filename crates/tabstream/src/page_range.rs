//! Page selection strings such as `"1"`, `"1,3-5"` or `"1-end"`.

use tabstream_core::PdfError;

/// 0-based page indices chosen by a selection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    indices: Vec<usize>,
}

impl PageSelection {
    /// Parse a comma-separated list of 1-based pages and ranges.
    ///
    /// `end` names the last page and `all` selects every page. The result
    /// is sorted and deduplicated. A document without pages selects nothing
    /// for `all` and for ranges ending at `end`.
    pub fn parse(input: &str, page_count: usize) -> Result<Self, PdfError> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("all") {
            return Ok(Self::all(page_count));
        }

        let mut indices = Vec::new();
        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (start, end) = part.split_once('-').unwrap_or((part, part));
            // `end` of an empty document selects nothing.
            let Some(end) = page_number(end, page_count)? else {
                continue;
            };
            let Some(start) = page_number(start, page_count)? else {
                continue;
            };
            if start > end {
                return Err(PdfError::InvalidPageRange(format!(
                    "range '{part}' runs backwards"
                )));
            }
            indices.extend((start..=end).map(|p| p - 1));
        }

        indices.sort_unstable();
        indices.dedup();
        Ok(Self { indices })
    }

    /// Every page of a document.
    pub fn all(page_count: usize) -> Self {
        Self {
            indices: (0..page_count).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

impl IntoIterator for PageSelection {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.into_iter()
    }
}

/// Resolve one 1-based page token; `None` is `end` on an empty document.
fn page_number(token: &str, page_count: usize) -> Result<Option<usize>, PdfError> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("end") {
        return Ok((page_count > 0).then_some(page_count));
    }
    let page: usize = token
        .parse()
        .map_err(|_| PdfError::InvalidPageRange(format!("invalid page number: '{token}'")))?;
    if page == 0 {
        return Err(PdfError::InvalidPageRange(
            "page 0 is invalid (pages start at 1)".to_string(),
        ));
    }
    if page > page_count {
        return Err(PdfError::InvalidPageRange(format!(
            "page {page} exceeds document page count ({page_count})"
        )));
    }
    Ok(Some(page))
}
