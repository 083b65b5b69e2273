//! Well-formedness checks and statistics for layouts.
//!
//! The built-in table is expected to pass `validate_table()` with no errors;
//! `--check-layouts` prints the full report.

use std::collections::HashSet;

use icu_normalizer::ComposingNormalizerBorrowed;
use icu_segmenter::GraphemeClusterSegmenter;
use serde::Serialize;

use crate::keyboard::layout::{Layout, LayoutTable, Mode};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LayoutReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LayoutReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn merge(&mut self, prefix: &str, other: LayoutReport) {
        self.errors
            .extend(other.errors.into_iter().map(|e| format!("{prefix}: {e}")));
        self.warnings
            .extend(other.warnings.into_iter().map(|w| format!("{prefix}: {w}")));
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutStats {
    pub rows: usize,
    /// Width of the first row.
    pub columns: usize,
    pub total_characters: usize,
    pub unique_characters: usize,
    pub average_per_row: f64,
}

fn grapheme_count(cell: &str) -> usize {
    // Breakpoints include both ends of the string.
    GraphemeClusterSegmenter::new()
        .segment_str(cell)
        .count()
        .saturating_sub(1)
}

pub fn validate(layout: Layout) -> LayoutReport {
    let mut report = LayoutReport::default();
    let nfc = ComposingNormalizerBorrowed::new_nfc();

    if layout.row_count() == 0 {
        report.errors.push("layout has no rows".to_string());
        return report;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (row_idx, row) in layout.rows().iter().enumerate() {
        if row.is_empty() {
            report.warnings.push(format!("row {row_idx} is empty"));
        }
        for (col_idx, &cell) in row.iter().enumerate() {
            if cell.is_empty() {
                report
                    .errors
                    .push(format!("empty cell at [{row_idx}, {col_idx}]"));
                continue;
            }
            if cell.chars().any(|c| c.is_control() || c.is_whitespace()) {
                report.errors.push(format!(
                    "non-printing character in cell {cell:?} at [{row_idx}, {col_idx}]"
                ));
            }
            if !nfc.is_normalized(cell) {
                report.errors.push(format!(
                    "cell {cell:?} at [{row_idx}, {col_idx}] is not NFC-normalized"
                ));
            }
            if !seen.insert(cell) {
                report.errors.push(format!(
                    "duplicate cell {cell:?} at [{row_idx}, {col_idx}]"
                ));
            }
            let clusters = grapheme_count(cell);
            if clusters > 1 {
                report.warnings.push(format!(
                    "cell {cell:?} at [{row_idx}, {col_idx}] spans {clusters} grapheme clusters"
                ));
            }
        }
    }

    report
}

/// Validate every table entry and the case-shape invariant.
pub fn validate_table() -> LayoutReport {
    let mut report = LayoutReport::default();

    for &language in LayoutTable::languages() {
        for &mode in LayoutTable::modes().iter().filter(|m| m.is_letter_case()) {
            let layout = LayoutTable::layout(language, mode);
            report.merge(&format!("{language}/{mode}"), validate(layout));
        }

        let lower = LayoutTable::layout(language, Mode::Lowercase).shape();
        let upper = LayoutTable::layout(language, Mode::Uppercase).shape();
        if lower != upper {
            report.errors.push(format!(
                "{language}: lowercase shape {lower:?} differs from uppercase shape {upper:?}"
            ));
        }
    }

    let symbols = LayoutTable::layout(LayoutTable::DEFAULT_LANGUAGE, Mode::Symbols);
    report.merge("symbols", validate(symbols));

    report
}

pub fn stats(layout: Layout) -> LayoutStats {
    let rows = layout.row_count();
    let total_characters = layout.len();
    let unique_characters = layout.cells().collect::<HashSet<_>>().len();
    let average_per_row = if rows == 0 {
        0.0
    } else {
        total_characters as f64 / rows as f64
    };

    LayoutStats {
        rows,
        columns: layout.rows().first().map_or(0, |row| row.len()),
        total_characters,
        unique_characters,
        average_per_row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::layout::Language;

    #[test]
    fn test_builtin_table_is_valid() {
        let report = validate_table();
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn test_lam_alef_reported_as_multi_grapheme_warning() {
        let report = validate(LayoutTable::layout(Language::Urdu, Mode::Lowercase));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("[2, 4]"));
    }

    #[test]
    fn test_duplicates_and_empty_cells_are_errors() {
        const ROWS: &[&[&str]] = &[&["a", "b", "a"], &[], &["", "c d"]];
        let report = validate(Layout::new(ROWS));
        assert!(!report.is_valid());
        assert!(report.errors.iter().any(|e| e.contains("duplicate")));
        assert!(report.errors.iter().any(|e| e.contains("empty cell at [2, 0]")));
        assert!(report.errors.iter().any(|e| e.contains("non-printing")));
        assert!(report.warnings.iter().any(|w| w == "row 1 is empty"));
    }

    #[test]
    fn test_decomposed_cell_is_not_nfc() {
        const ROWS: &[&[&str]] = &[&["e\u{301}"]];
        let report = validate(Layout::new(ROWS));
        assert!(report.errors.iter().any(|e| e.contains("NFC")));
        // One base letter plus a combining mark is still a single cluster.
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_layout_without_rows_is_invalid() {
        const ROWS: &[&[&str]] = &[];
        assert!(!validate(Layout::new(ROWS)).is_valid());
    }

    #[test]
    fn test_stats_for_english() {
        let s = stats(LayoutTable::layout(Language::English, Mode::Lowercase));
        assert_eq!(s.rows, 3);
        assert_eq!(s.columns, 10);
        assert_eq!(s.total_characters, 26);
        assert_eq!(s.unique_characters, 26);
        assert!((s.average_per_row - 26.0 / 3.0).abs() < f64::EPSILON);
    }
}
