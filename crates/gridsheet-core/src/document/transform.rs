//! Bulk edits over a rectangle: find & replace, remove duplicates.

use gridsheet_engine::engine::{CellRange, CellRef, CellValue, evaluate_formula};
use log::{debug, warn};
use regex::Regex;
use std::collections::HashSet;

use super::Document;
use super::ops::store_evaluation;
use crate::error::{DocumentError, Result};

impl Document {
    /// Replace every match of the regular expression `find` in text values
    /// and formulas within `range` (or the whole sheet). Changed formulas are
    /// re-evaluated in row-major order against the sheet as edited so far.
    ///
    /// Returns the number of cells changed.
    pub fn find_and_replace(
        &mut self,
        find: &str,
        replace: &str,
        range: Option<CellRange>,
    ) -> Result<usize> {
        let re = Regex::new(find).map_err(|source| DocumentError::InvalidPattern {
            pattern: find.to_string(),
            source,
        })?;

        let changed = self.record("find and replace", |sheet| {
            let targets: Vec<CellRef> = sheet
                .cells
                .keys()
                .copied()
                .filter(|cell| range.is_none_or(|r| r.contains(cell)))
                .collect();

            let mut changed = 0;
            for cell_ref in targets {
                // Evaluate before borrowing the cell mutably.
                let (value_edit, formula_edit) = {
                    let Some(cell) = sheet.get(&cell_ref) else {
                        continue;
                    };
                    let value_edit = match &cell.value {
                        CellValue::Text(text) => {
                            let replaced = re.replace_all(text, replace);
                            (replaced != text.as_str()).then(|| replaced.into_owned())
                        }
                        _ => None,
                    };
                    let formula_edit = if cell.formula.is_empty() {
                        None
                    } else {
                        let replaced = re.replace_all(&cell.formula, replace);
                        (replaced != cell.formula.as_str()).then(|| replaced.into_owned())
                    };
                    (value_edit, formula_edit)
                };
                if value_edit.is_none() && formula_edit.is_none() {
                    continue;
                }

                let evaluated = formula_edit
                    .as_deref()
                    .and_then(|formula| formula.strip_prefix('='))
                    .map(|source| evaluate_formula(source, sheet));

                let cell = sheet.entry(cell_ref);
                if let Some(text) = value_edit {
                    cell.display = text.clone();
                    cell.value = CellValue::Text(text);
                }
                if let Some(formula) = formula_edit {
                    cell.formula = formula;
                }
                if let Some(result) = evaluated {
                    store_evaluation(cell, result);
                }
                changed += 1;
            }
            changed
        });
        debug!("find {:?} replace {:?}: {} cells changed", find, replace, changed);
        Ok(changed)
    }

    /// Keep the first occurrence of each distinct row (compared by display
    /// text) in `range`, packed from the top. Returns how many rows were
    /// removed.
    pub fn remove_duplicates(&mut self, range: CellRange) -> usize {
        let Some(range) = self.sheet.dimensions.clip(range) else {
            warn!("ignoring remove duplicates outside the sheet: {}", range);
            return 0;
        };

        let removed = self.record("remove duplicates", |sheet| {
            let rows: Vec<Vec<String>> = (range.min_row..=range.max_row)
                .map(|row| {
                    (range.min_col..=range.max_col)
                        .map(|col| sheet.display(&CellRef::new(row, col)).to_string())
                        .collect()
                })
                .collect();

            let mut seen = HashSet::new();
            let unique: Vec<Vec<String>> = rows
                .iter()
                .filter(|row| seen.insert(*row))
                .cloned()
                .collect();

            for cell_ref in range.cells() {
                if let Some(cell) = sheet.get_mut(&cell_ref) {
                    cell.clear_contents();
                }
            }

            for (offset, row) in unique.iter().enumerate() {
                for (col_offset, display) in row.iter().enumerate() {
                    if display.is_empty() {
                        continue;
                    }
                    let cell_ref = CellRef::new(range.min_row + offset, range.min_col + col_offset);
                    let cell = sheet.entry(cell_ref);
                    cell.value = CellValue::Text(display.clone());
                    cell.display = display.clone();
                }
            }
            rows.len() - unique.len()
        });
        debug!("remove duplicates in {}: {} rows removed", range, removed);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsheet_engine::engine::{ERROR_DISPLAY, StylePatch, parse_range};
    use pretty_assertions::assert_eq;

    fn at(label: &str) -> CellRef {
        CellRef::from_label(label).unwrap()
    }

    fn range(text: &str) -> CellRange {
        parse_range(text).unwrap()
    }

    fn column(doc: &Document, labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| doc.display(&at(l)).to_string()).collect()
    }

    #[test]
    fn test_replace_whole_sheet() {
        let mut doc = Document::new(5, 5);
        doc.set_cell_input(at("A1"), "cat");
        doc.set_cell_input(at("B2"), "concat cat");
        doc.set_cell_input(at("C3"), "dog");

        let changed = doc.find_and_replace("cat", "bird", None).unwrap();
        assert_eq!(changed, 2);
        assert_eq!(doc.display(&at("A1")), "bird");
        assert_eq!(
            doc.cell(&at("B2")).unwrap().value,
            CellValue::Text("conbird bird".into())
        );
        assert_eq!(doc.display(&at("C3")), "dog");
    }

    #[test]
    fn test_replace_respects_scope() {
        let mut doc = Document::new(5, 5);
        doc.set_cell_input(at("A1"), "x");
        doc.set_cell_input(at("B2"), "x");
        doc.set_cell_input(at("D4"), "x");

        let changed = doc.find_and_replace("x", "y", Some(range("A1:B2"))).unwrap();
        assert_eq!(changed, 2);
        assert_eq!(column(&doc, &["A1", "B2", "D4"]), vec!["y", "y", "x"]);
    }

    #[test]
    fn test_replace_supports_groups() {
        let mut doc = Document::new(2, 2);
        doc.set_cell_input(at("A1"), "2024-01");
        doc.find_and_replace(r"(\d+)-(\d+)", "${2}/${1}", None).unwrap();
        assert_eq!(doc.display(&at("A1")), "01/2024");
    }

    #[test]
    fn test_replace_reevaluates_formulas() {
        let mut doc = Document::new(5, 5);
        doc.set_cell_input(at("A1"), "2");
        doc.set_cell_input(at("B1"), "5");
        doc.set_cell_input(at("C1"), "=A1*3");

        assert_eq!(doc.find_and_replace("A1", "B1", None).unwrap(), 1);
        let cell = doc.cell(&at("C1")).unwrap();
        assert_eq!(cell.formula, "=B1*3");
        assert_eq!(cell.display, "15");
    }

    #[test]
    fn test_replace_bad_formula_is_local() {
        let mut doc = Document::new(5, 5);
        doc.set_cell_input(at("A1"), "=SUM(B1:B2)");
        doc.set_cell_input(at("A2"), "SUM text");

        let changed = doc.find_and_replace("SUM", "NOPE", None).unwrap();
        assert_eq!(changed, 2);
        assert_eq!(doc.display(&at("A1")), ERROR_DISPLAY);
        assert_eq!(doc.display(&at("A2")), "NOPE text");
    }

    #[test]
    fn test_replace_invalid_pattern_changes_nothing() {
        let mut doc = Document::new(2, 2);
        doc.set_cell_input(at("A1"), "abc");
        let before = doc.sheet().clone();
        let history = doc.history_len();

        let err = doc.find_and_replace("(", "x", None).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidPattern { .. }));
        assert_eq!(doc.sheet(), &before);
        assert_eq!(doc.history_len(), history);
    }

    #[test]
    fn test_replace_is_one_undo_step() {
        let mut doc = Document::new(3, 3);
        doc.set_cell_input(at("A1"), "a");
        doc.set_cell_input(at("A2"), "a");
        doc.find_and_replace("a", "b", None).unwrap();
        assert!(doc.undo());
        assert_eq!(column(&doc, &["A1", "A2"]), vec!["a", "a"]);
    }

    #[test]
    fn test_remove_duplicates_packs_unique_rows() {
        let mut doc = Document::new(5, 5);
        for (label, text) in [
            ("A1", "a"),
            ("B1", "a"),
            ("A2", "b"),
            ("B2", "b"),
            ("A3", "a"),
            ("B3", "a"),
        ] {
            doc.set_cell_input(at(label), text);
        }

        assert_eq!(doc.remove_duplicates(range("A1:B3")), 1);
        assert_eq!(
            column(&doc, &["A1", "B1", "A2", "B2", "A3", "B3"]),
            vec!["a", "a", "b", "b", "", ""]
        );
    }

    #[test]
    fn test_remove_duplicates_keeps_order_and_styles() {
        let mut doc = Document::new(6, 2);
        for (label, text) in [("A1", "z"), ("A2", "y"), ("A3", "z"), ("A4", "x"), ("A5", "y")] {
            doc.set_cell_input(at(label), text);
        }
        doc.set_cell_style(
            at("A5"),
            &StylePatch {
                bold: Some(true),
                ..StylePatch::default()
            },
        );

        assert_eq!(doc.remove_duplicates(range("A1:A5")), 2);
        assert_eq!(
            column(&doc, &["A1", "A2", "A3", "A4", "A5"]),
            vec!["z", "y", "x", "", ""]
        );
        let cleared = doc.cell(&at("A5")).unwrap();
        assert_eq!(cleared.value, CellValue::Empty);
        assert!(cleared.style.bold);
    }

    #[test]
    fn test_remove_duplicates_writes_displays_as_text() {
        let mut doc = Document::new(3, 1);
        doc.set_cell_input(at("A1"), "=1+1");
        doc.set_cell_input(at("A2"), "2");

        assert_eq!(doc.remove_duplicates(range("A1:A2")), 1);
        let cell = doc.cell(&at("A1")).unwrap();
        assert_eq!(cell.value, CellValue::Text("2".into()));
        assert_eq!(cell.formula, "");
    }

    #[test]
    fn test_remove_duplicates_outside_sheet_is_noop() {
        let mut doc = Document::new(2, 2);
        assert_eq!(doc.remove_duplicates(range("E5:F6")), 0);
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_remove_duplicates_unique_rows_unchanged() {
        let mut doc = Document::new(3, 2);
        doc.set_cell_input(at("A1"), "1");
        doc.set_cell_input(at("B2"), "2");
        let displays = column(&doc, &["A1", "B1", "A2", "B2"]);

        assert_eq!(doc.remove_duplicates(range("A1:B3")), 0);
        assert_eq!(column(&doc, &["A1", "B1", "A2", "B2"]), displays);
    }
}
