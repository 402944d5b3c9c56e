//! Parsing quality report attached to every extracted table.

use std::fmt;

/// Diagnostic summary of how well text fitted a table's grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsingReport {
    /// 100 minus the mean normalised placement error of the text lines.
    pub accuracy: f64,
    /// Percentage of empty cells.
    pub whitespace: f64,
    /// 1-based index of the table on its page (0 when no table was found).
    pub order: usize,
    /// 1-based page number (0 when no table was found).
    pub page: usize,
}

impl ParsingReport {
    /// Build a report from per-line placement errors and the final cell texts.
    pub fn compute(errors: &[f64], data: &[Vec<String>], order: usize, page: usize) -> Self {
        Self {
            accuracy: round2(accuracy(errors)),
            whitespace: round2(whitespace(data)),
            order,
            page,
        }
    }
}

impl fmt::Display for ParsingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'accuracy': {}, 'whitespace': {}, 'order': {}, 'page': {}}}",
            format_float(self.accuracy),
            format_float(self.whitespace),
            self.order,
            self.page
        )
    }
}

/// `100 * mean(1 - error)`, 0 when no text was placed.
fn accuracy(errors: &[f64]) -> f64 {
    if errors.is_empty() {
        return 0.0;
    }
    let weight = 100.0 / errors.len() as f64;
    errors.iter().map(|e| weight * (1.0 - e)).sum()
}

fn whitespace(data: &[Vec<String>]) -> f64 {
    let total: usize = data.iter().map(Vec::len).sum();
    if total == 0 {
        return 0.0;
    }
    let empty = data
        .iter()
        .flatten()
        .filter(|cell| cell.trim().is_empty())
        .count();
    100.0 * empty as f64 / total as f64
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Always show a fractional part, so `100` prints as `100.0`.
fn format_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn perfect_placement() {
        let data = grid(&[&["a", "b"], &["c", "d"]]);
        let report = ParsingReport::compute(&[0.0, 0.0, 0.0, 0.0], &data, 1, 1);
        assert_eq!(report.accuracy, 100.0);
        assert_eq!(report.whitespace, 0.0);
        assert_eq!(
            report.to_string(),
            "{'accuracy': 100.0, 'whitespace': 0.0, 'order': 1, 'page': 1}"
        );
    }

    #[test]
    fn whitespace_counts_blank_cells() {
        let data = grid(&[&["a", "", " "], &["b", "c", "d"], &["", "", ""]]);
        let report = ParsingReport::compute(&[0.0], &data, 1, 2);
        assert_eq!(report.whitespace, 55.56);
        assert_eq!(report.page, 2);
    }

    #[test]
    fn accuracy_is_mean_of_errors() {
        let report = ParsingReport::compute(&[0.1, 0.0, 0.05], &grid(&[&["x"]]), 1, 1);
        assert_eq!(report.accuracy, 95.0);
    }

    #[test]
    fn empty_table_reports_zero_coverage() {
        let report = ParsingReport::compute(&[], &[], 1, 1);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.whitespace, 0.0);
    }

    #[test]
    fn default_report_is_all_zero() {
        assert_eq!(
            ParsingReport::default().to_string(),
            "{'accuracy': 0.0, 'whitespace': 0.0, 'order': 0, 'page': 0}"
        );
    }

    #[test]
    fn fractional_values_are_rounded() {
        let report = ParsingReport {
            accuracy: round2(99.01923),
            whitespace: round2(12.244),
            order: 1,
            page: 1,
        };
        assert_eq!(
            report.to_string(),
            "{'accuracy': 99.02, 'whitespace': 12.24, 'order': 1, 'page': 1}"
        );
    }
}
