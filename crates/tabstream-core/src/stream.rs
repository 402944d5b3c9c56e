//! Stream table parser.
//!
//! Builds tables from the whitespace between text instead of ruling lines:
//! text lines inside a table area are grouped into rows by their baseline,
//! columns come from explicit separators or from the horizontal extents of
//! the text, and every line is then dropped into the cell it overlaps most.

use tracing::{debug, warn};

use crate::area::{ColumnSeparators, TableArea};
use crate::geometry::BBox;
use crate::lines::{LineOptions, TextLine, TextLineExtractor};
use crate::report::ParsingReport;
use crate::table::{Cell, Table};
use crate::text::Char;

/// Text lines whose centre lies this far outside an area still belong to it.
const AREA_TOLERANCE: f64 = 2.0;

/// Settings for the stream parser.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSettings {
    /// Lines whose bottoms are within this distance share a row (default: 2.0).
    pub row_tol: f64,
    /// Inferred column ranges closer than this are merged (default: 0.0).
    pub column_tol: f64,
    /// Split lines that span several columns by character position (default: false).
    pub split_text: bool,
    /// Characters removed from both ends of every cell text (default: none).
    pub strip_text: String,
    /// How characters are grouped into text lines.
    pub line: LineOptions,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            row_tol: 2.0,
            column_tol: 0.0,
            split_text: false,
            strip_text: String::new(),
            line: LineOptions::default(),
        }
    }
}

/// One table area together with the columns that apply to it.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRegion {
    pub area: TableArea,
    pub columns: ColumnSeparators,
}

/// A page's characters and dimensions, as seen by the parser.
#[derive(Debug, Clone, Copy)]
pub struct PageText<'a> {
    /// 1-based page number.
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub chars: &'a [Char],
}

/// Extracts tables from text using whitespace alignment.
#[derive(Debug, Clone, Default)]
pub struct StreamParser {
    settings: StreamSettings,
}

impl StreamParser {
    pub fn new(settings: StreamSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    /// Extract one table per region; with no regions the whole page is used.
    pub fn extract(&self, page: PageText<'_>, regions: &[TableRegion]) -> Vec<Table> {
        let lines = TextLineExtractor::extract(page.chars, &self.settings.line);
        let full_page;
        let regions = if regions.is_empty() {
            full_page = [TableRegion {
                area: TableArea::full_page(page.width, page.height),
                columns: ColumnSeparators::default(),
            }];
            &full_page[..]
        } else {
            regions
        };

        regions
            .iter()
            .enumerate()
            .map(|(i, region)| self.extract_region(&page, &lines, region, i + 1))
            .collect()
    }

    fn extract_region(
        &self,
        page: &PageText<'_>,
        lines: &[TextLine],
        region: &TableRegion,
        order: usize,
    ) -> Table {
        let area = region.area.to_bbox(page.height);
        let selected: Vec<&TextLine> = lines
            .iter()
            .filter(|l| !l.is_blank())
            .filter(|l| {
                area.contains_point(l.bbox.center_x(), l.bbox.center_y(), AREA_TOLERANCE)
            })
            .collect();
        debug!(
            page = page.number,
            order,
            area = %region.area,
            lines = selected.len(),
            "parsing table area"
        );

        let Some(text_bbox) = BBox::union_all(selected.iter().map(|l| &l.bbox)) else {
            warn!(page = page.number, area = %region.area, "no text found in table area");
            return self.empty_table(page, area, region, order);
        };

        let grouped = group_rows(&selected, self.settings.row_tol);
        let rows = row_bounds(&grouped, &text_bbox);
        let cols = if region.columns.is_empty() {
            infer_columns(&grouped, &selected, &text_bbox, self.settings.column_tol)
        } else {
            explicit_columns(region.columns.as_slice(), &text_bbox)
        };

        let mut texts = vec![vec![String::new(); cols.len()]; rows.len()];
        let mut errors = Vec::with_capacity(selected.len());
        for line in grouped.iter().flatten() {
            let Some(r) = find_row(&rows, line.bbox.center_y()) else {
                continue;
            };
            let placements = self.place(line, &cols, page.number);
            let first = placements.first().map_or(0, |p| p.0);
            let last = placements.last().map_or(0, |p| p.0);
            errors.push(placement_error(
                &line.bbox,
                rows[r],
                (cols[first].0, cols[last].1),
            ));
            for (c, text) in placements {
                let text = strip(&text, &self.settings.strip_text);
                if text.is_empty() {
                    continue;
                }
                let cell = &mut texts[r][c];
                if !cell.is_empty() {
                    cell.push(' ');
                }
                cell.push_str(text);
            }
        }

        let parsing_report = ParsingReport::compute(&errors, &texts, order, page.number);
        let cells = build_cells(&rows, &cols, texts);
        Table {
            page: page.number,
            order,
            bbox: area,
            cols,
            rows,
            cells,
            parsing_report,
        }
    }

    fn empty_table(
        &self,
        page: &PageText<'_>,
        area: BBox,
        region: &TableRegion,
        order: usize,
    ) -> Table {
        let cols = if region.columns.is_empty() {
            Vec::new()
        } else {
            explicit_columns(region.columns.as_slice(), &area)
        };
        Table {
            page: page.number,
            order,
            bbox: area,
            cols,
            rows: Vec::new(),
            cells: Vec::new(),
            parsing_report: ParsingReport::compute(&[], &[], order, page.number),
        }
    }

    /// Column index and text for each piece of the line.
    fn place(&self, line: &TextLine, cols: &[(f64, f64)], page: usize) -> Vec<(usize, String)> {
        let overlaps: Vec<f64> = cols
            .iter()
            .map(|&col| overlap_fraction(line.bbox.x0, line.bbox.x1, col))
            .collect();
        let hits = overlaps.iter().filter(|&&o| o > 0.0).count();

        if hits == 0 {
            warn!(
                page,
                text = %line.text,
                x0 = line.bbox.x0,
                x1 = line.bbox.x1,
                "text does not lie in column range"
            );
            return vec![(nearest_column(cols, line.bbox.center_x()), line.text.clone())];
        }

        if self.settings.split_text && hits > 1 {
            return self.split_line(line, cols);
        }

        // The first column with the largest overlap wins ties.
        let best = overlaps
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |acc, (i, &o)| {
                if o > acc.1 { (i, o) } else { acc }
            })
            .0;
        vec![(best, line.text.clone())]
    }

    fn split_line(&self, line: &TextLine, cols: &[(f64, f64)]) -> Vec<(usize, String)> {
        let mut groups: Vec<(usize, Vec<&Char>)> = Vec::new();
        for ch in &line.chars {
            let c = column_of(cols, ch.bbox.center_x());
            match groups.last_mut() {
                Some((idx, members)) if *idx == c => members.push(ch),
                _ => groups.push((c, vec![ch])),
            }
        }
        groups
            .into_iter()
            .filter_map(|(c, members)| {
                TextLineExtractor::make_line(&members, &self.settings.line).map(|l| (c, l.text))
            })
            .collect()
    }
}

/// Group lines into rows, top to bottom, each row ordered left to right.
fn group_rows<'a>(lines: &[&'a TextLine], row_tol: f64) -> Vec<Vec<&'a TextLine>> {
    let mut sorted = lines.to_vec();
    sorted.sort_by(|a, b| {
        a.bbox
            .bottom
            .total_cmp(&b.bbox.bottom)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut rows: Vec<Vec<&TextLine>> = Vec::new();
    let mut anchor = f64::NEG_INFINITY;
    for line in sorted {
        match rows.last_mut() {
            Some(row) if (line.bbox.bottom - anchor).abs() <= row_tol => row.push(line),
            _ => {
                anchor = line.bbox.bottom;
                rows.push(vec![line]);
            }
        }
    }
    for row in &mut rows {
        row.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }
    rows
}

/// Row `(top, bottom)` bounds: midpoints between the mean centres of
/// neighbouring rows, closed by the text bounding box.
fn row_bounds(rows: &[Vec<&TextLine>], text_bbox: &BBox) -> Vec<(f64, f64)> {
    let mids: Vec<f64> = rows
        .iter()
        .map(|r| r.iter().map(|l| l.bbox.center_y()).sum::<f64>() / r.len() as f64)
        .collect();
    let mut edges = Vec::with_capacity(mids.len() + 1);
    edges.push(text_bbox.top);
    edges.extend(mids.windows(2).map(|w| (w[0] + w[1]) / 2.0));
    edges.push(text_bbox.bottom);
    edges.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Columns from explicit separators, closed by the text extent.
///
/// The outer edges never cut inside the outermost separators, so a table
/// always has `separators + 1` columns.
fn explicit_columns(separators: &[f64], text_bbox: &BBox) -> Vec<(f64, f64)> {
    let (Some(&first), Some(&last)) = (separators.first(), separators.last()) else {
        return vec![(text_bbox.x0, text_bbox.x1)];
    };
    let mut edges = Vec::with_capacity(separators.len() + 2);
    edges.push(text_bbox.x0.min(first));
    edges.extend_from_slice(separators);
    edges.push(text_bbox.x1.max(last));
    edges.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Infer columns from the horizontal extents of the text.
///
/// The column count is the most common number of lines per row; the
/// extents of lines in such rows are merged into column ranges, and lines
/// falling between or outside those ranges add ranges of their own.
fn infer_columns(
    rows: &[Vec<&TextLine>],
    lines: &[&TextLine],
    text_bbox: &BBox,
    column_tol: f64,
) -> Vec<(f64, f64)> {
    let ncols = mode(rows.iter().map(Vec::len));
    if ncols <= 1 {
        debug!("single text column in table area");
    }

    let ranges: Vec<(f64, f64)> = rows
        .iter()
        .filter(|r| r.len() == ncols)
        .flatten()
        .map(|l| (l.bbox.x0, l.bbox.x1))
        .collect();
    let mut merged = merge_ranges(ranges, column_tol);

    let uncovered: Vec<(f64, f64)> = lines
        .iter()
        .map(|l| (l.bbox.x0, l.bbox.x1))
        .filter(|&(x0, x1)| !merged.iter().any(|&(a, b)| a <= x1 && b >= x0))
        .collect();
    if !uncovered.is_empty() {
        merged.extend(uncovered);
        merged = merge_ranges(merged, column_tol);
    }

    let mut edges = Vec::with_capacity(merged.len() + 1);
    edges.push(text_bbox.x0);
    edges.extend(merged.windows(2).map(|w| (w[0].1 + w[1].0) / 2.0));
    edges.push(text_bbox.x1);
    edges.windows(2).map(|w| (w[0], w[1])).collect()
}

fn merge_ranges(mut ranges: Vec<(f64, f64)>, tolerance: f64) -> Vec<(f64, f64)> {
    ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(ranges.len());
    for (x0, x1) in ranges {
        match merged.last_mut() {
            Some(last) if x0 <= last.1 + tolerance => last.1 = last.1.max(x1),
            _ => merged.push((x0, x1)),
        }
    }
    merged
}

/// Most common value; ties resolve to the larger value.
fn mode(values: impl Iterator<Item = usize>) -> usize {
    let mut counts = std::collections::BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0usize) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
        .map_or(0, |(v, _)| v)
}

fn find_row(rows: &[(f64, f64)], y: f64) -> Option<usize> {
    rows.iter().position(|&(top, bottom)| y >= top && y <= bottom)
}

fn overlap_fraction(x0: f64, x1: f64, (left, right): (f64, f64)) -> f64 {
    let width = right - left;
    if width <= 0.0 || left > x1 || right < x0 {
        return 0.0;
    }
    (x1.min(right) - x0.max(left)) / width
}

fn column_of(cols: &[(f64, f64)], x: f64) -> usize {
    cols.iter()
        .position(|&(left, right)| x >= left && x <= right)
        .unwrap_or_else(|| nearest_column(cols, x))
}

fn nearest_column(cols: &[(f64, f64)], x: f64) -> usize {
    let distance = |&(left, right): &(f64, f64)| {
        if x < left {
            left - x
        } else if x > right {
            x - right
        } else {
            0.0
        }
    };
    cols.iter()
        .enumerate()
        .min_by(|a, b| distance(a.1).total_cmp(&distance(b.1)))
        .map_or(0, |(i, _)| i)
}

/// Area of the line outside its cell, relative to the line's own area.
fn placement_error(line: &BBox, (row_top, row_bottom): (f64, f64), (left, right): (f64, f64)) -> f64 {
    let width = if line.width() == 0.0 { 1.0 } else { line.width() };
    let height = if line.height() == 0.0 { 1.0 } else { line.height() };

    let top_offset = (row_top - line.top).max(0.0);
    let bottom_offset = (line.bottom - row_bottom).max(0.0);
    let left_offset = (left - line.x0).max(0.0);
    let right_offset = (line.x1 - right).max(0.0);

    (width * (top_offset + bottom_offset) + height * (left_offset + right_offset))
        / (width * height)
}

/// Remove any of `chars` from both ends of `text`.
pub fn strip<'a>(text: &'a str, chars: &str) -> &'a str {
    if chars.is_empty() {
        return text;
    }
    text.trim_matches(|c| chars.contains(c))
}

fn build_cells(rows: &[(f64, f64)], cols: &[(f64, f64)], texts: Vec<Vec<String>>) -> Vec<Vec<Cell>> {
    rows.iter()
        .zip(texts)
        .map(|(&(top, bottom), row_texts)| {
            cols.iter()
                .zip(row_texts)
                .map(|(&(x0, x1), text)| Cell {
                    bbox: BBox::new(x0, top, x1, bottom),
                    text,
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::test_char;

    const PAGE_HEIGHT: f64 = 792.0;

    /// Lay out `text` as 5pt-wide, 10pt-tall chars with the top edge at
    /// `y_pdf` in PDF coordinates.
    fn put(chars: &mut Vec<Char>, text: &str, x0: f64, y_pdf: f64) {
        let top = PAGE_HEIGHT - y_pdf;
        for (i, c) in text.chars().enumerate() {
            let x = x0 + i as f64 * 5.0;
            chars.push(test_char(&c.to_string(), x, top, x + 5.0, top + 10.0));
        }
    }

    fn page(chars: &[Char]) -> PageText<'_> {
        PageText {
            number: 1,
            width: 612.0,
            height: PAGE_HEIGHT,
            chars,
        }
    }

    fn region(area: &str, columns: &str) -> TableRegion {
        TableRegion {
            area: area.parse().unwrap(),
            columns: columns.parse().unwrap(),
        }
    }

    fn report_chars() -> Vec<Char> {
        let mut chars = Vec::new();
        put(&mut chars, "Code", 30.0, 700.0);
        put(&mut chars, "Item", 110.0, 700.0);
        put(&mut chars, "Total", 210.0, 700.0);
        put(&mut chars, "A1", 30.0, 680.0);
        put(&mut chars, "Bolts.", 110.0, 680.0);
        put(&mut chars, "12.50.", 210.0, 680.0);
        put(&mut chars, "A2", 30.0, 660.0);
        put(&mut chars, "Nuts", 110.0, 660.0);
        chars
    }

    #[test]
    fn explicit_columns_build_grid() {
        let chars = report_chars();
        let parser = StreamParser::new(StreamSettings {
            strip_text: " .\n".to_string(),
            ..StreamSettings::default()
        });
        let tables = parser.extract(page(&chars), &[region("20, 720, 300, 600", "100, 200")]);
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.shape(), (3, 3));
        assert_eq!(
            t.data(),
            vec![
                vec!["Code", "Item", "Total"],
                vec!["A1", "Bolts", "12.50"],
                vec!["A2", "Nuts", ""],
            ]
        );
        assert_eq!(t.parsing_report.accuracy, 100.0);
        assert_eq!(t.parsing_report.whitespace, 11.11);
        assert_eq!(t.parsing_report.order, 1);
        assert_eq!(t.parsing_report.page, 1);
    }

    #[test]
    fn inferred_columns_match_explicit_ones() {
        let chars = report_chars();
        let parser = StreamParser::default();
        let tables = parser.extract(page(&chars), &[region("20, 720, 300, 600", "")]);
        let t = &tables[0];
        assert_eq!(t.shape(), (3, 3));
        assert_eq!(t.data()[1], vec!["A1", "Bolts.", "12.50."]);
    }

    #[test]
    fn text_outside_area_is_ignored() {
        let mut chars = report_chars();
        put(&mut chars, "Footer", 30.0, 100.0);
        let parser = StreamParser::default();
        let tables = parser.extract(page(&chars), &[region("20, 720, 300, 600", "100, 200")]);
        assert_eq!(tables[0].shape().0, 3);
        assert!(!tables[0].data().concat().contains(&"Footer".to_string()));
    }

    #[test]
    fn empty_area_yields_zero_row_table() {
        let chars = report_chars();
        let parser = StreamParser::default();
        let tables = parser.extract(page(&chars), &[region("20, 400, 300, 300", "100, 200")]);
        let t = &tables[0];
        assert!(t.is_empty());
        assert_eq!(t.shape(), (0, 3));
        assert_eq!(t.parsing_report.accuracy, 0.0);
        assert_eq!(t.parsing_report.whitespace, 0.0);
    }

    #[test]
    fn no_regions_uses_full_page() {
        let chars = report_chars();
        let tables = StreamParser::default().extract(page(&chars), &[]);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].bbox, BBox::new(0.0, 0.0, 612.0, PAGE_HEIGHT));
        assert_eq!(tables[0].shape().0, 3);
    }

    #[test]
    fn regions_are_ordered() {
        let chars = report_chars();
        let tables = StreamParser::default().extract(
            page(&chars),
            &[
                region("20, 720, 300, 670", "100"),
                region("20, 670, 300, 600", "100"),
            ],
        );
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].parsing_report.order, 1);
        assert_eq!(tables[1].parsing_report.order, 2);
        assert_eq!(tables[0].data()[0][0], "Code");
        assert_eq!(tables[1].data()[0][0], "A2");
    }

    #[test]
    fn lines_in_one_cell_are_joined() {
        let mut chars = Vec::new();
        put(&mut chars, "left", 30.0, 700.0);
        put(&mut chars, "right", 80.0, 700.0);
        let tables = StreamParser::default()
            .extract(page(&chars), &[region("20, 720, 300, 600", "200")]);
        assert_eq!(tables[0].data(), vec![vec!["left right", ""]]);
    }

    #[test]
    fn split_text_divides_spanning_line() {
        let mut chars = Vec::new();
        put(&mut chars, "abcdef", 30.0, 700.0);
        let settings = StreamSettings {
            split_text: true,
            ..StreamSettings::default()
        };
        let tables =
            StreamParser::new(settings).extract(page(&chars), &[region("20, 720, 300, 600", "45")]);
        assert_eq!(tables[0].data(), vec![vec!["abc", "def"]]);
    }

    #[test]
    fn spanning_line_without_split_goes_to_largest_overlap() {
        let mut chars = Vec::new();
        put(&mut chars, "abcdef", 30.0, 700.0);
        put(&mut chars, "z", 100.0, 680.0);
        let tables = StreamParser::default()
            .extract(page(&chars), &[region("20, 720, 300, 600", "33")]);
        assert_eq!(
            tables[0].data(),
            vec![vec!["abcdef", ""], vec!["", "z"]]
        );
        assert_eq!(tables[0].parsing_report.accuracy, 55.0);
    }

    #[test]
    fn strip_trims_only_the_ends() {
        assert_eq!(strip(" 1.234,50.\n", " .\n"), "1.234,50");
        assert_eq!(strip("...", " .\n"), "");
        assert_eq!(strip(" keep ", ""), " keep ");
    }

    #[test]
    fn row_grouping_respects_tolerance() {
        let mut chars = Vec::new();
        put(&mut chars, "a", 30.0, 700.0);
        put(&mut chars, "b", 130.0, 701.5);
        put(&mut chars, "c", 30.0, 690.0);
        let tables = StreamParser::default()
            .extract(page(&chars), &[region("20, 720, 300, 600", "100")]);
        assert_eq!(tables[0].data(), vec![vec!["a", "b"], vec!["c", ""]]);
    }

    #[test]
    fn cells_either_side_of_a_narrow_separator_gap_stay_apart() {
        let mut chars = Vec::new();
        put(&mut chars, "Total", 223.0, 700.0);
        put(&mut chars, "12", 256.0, 700.0);
        let tables = StreamParser::default()
            .extract(page(&chars), &[region("20, 720, 577, 124", "25, 250, 260, 360")]);
        assert_eq!(tables[0].data(), vec![vec!["", "Total", "", "12", ""]]);
        assert_eq!(tables[0].parsing_report.accuracy, 80.0);
    }

    #[test]
    fn mixed_sizes_on_one_baseline_share_a_row() {
        // Tops differ by 6pt, bottoms line up.
        let chars = vec![
            test_char("B", 30.0, 80.0, 40.0, 94.0),
            test_char("s", 130.0, 86.0, 135.0, 94.0),
            test_char("c", 30.0, 110.0, 35.0, 120.0),
        ];
        let tables = StreamParser::default()
            .extract(page(&chars), &[region("20, 720, 300, 600", "100")]);
        assert_eq!(tables[0].data(), vec![vec!["B", "s"], vec!["c", ""]]);
    }

    #[test]
    fn placement_error_measures_overflow() {
        let line = BBox::new(10.0, 0.0, 30.0, 10.0);
        assert_eq!(placement_error(&line, (0.0, 10.0), (0.0, 40.0)), 0.0);
        // 5pt sticks out on the right: 10 * 5 / (20 * 10)
        assert_eq!(placement_error(&line, (0.0, 10.0), (0.0, 25.0)), 0.25);
    }

    #[test]
    fn mode_prefers_larger_on_tie() {
        assert_eq!(mode([1, 3, 3, 1, 2].into_iter()), 3);
        assert_eq!(mode(std::iter::empty()), 0);
    }

    #[test]
    fn merge_ranges_unions_overlaps() {
        let merged = merge_ranges(vec![(10.0, 20.0), (15.0, 25.0), (40.0, 50.0)], 0.0);
        assert_eq!(merged, vec![(10.0, 25.0), (40.0, 50.0)]);
    }

    #[test]
    fn explicit_columns_extend_past_text() {
        let cols = explicit_columns(&[25.0, 250.0], &BBox::new(30.0, 0.0, 200.0, 10.0));
        assert_eq!(cols, vec![(25.0, 25.0), (25.0, 250.0), (250.0, 250.0)]);
    }
}
