use gridsheet_engine::FormulaError;
use gridsheet_engine::engine::{
    Cell, CellRef, CellValue, ERROR_DISPLAY, Sheet, StylePatch, evaluate_formula,
};
use log::{debug, warn};
use std::collections::BTreeMap;

use super::Document;

/// Dimension for row/column operations
#[derive(Copy, Clone, Debug)]
enum Dimension {
    Row,
    Column,
}

impl Dimension {
    /// Get the coordinate value from a CellRef for this dimension
    fn get_coord(&self, cell_ref: &CellRef) -> usize {
        match self {
            Dimension::Row => cell_ref.row,
            Dimension::Column => cell_ref.col,
        }
    }

    /// Create a new CellRef with modified coordinate in this dimension
    fn new_cell_ref(&self, cell_ref: &CellRef, new_coord: usize) -> CellRef {
        match self {
            Dimension::Row => CellRef::new(new_coord, cell_ref.col),
            Dimension::Column => CellRef::new(cell_ref.row, new_coord),
        }
    }

    fn size(&self, sheet: &Sheet) -> usize {
        match self {
            Dimension::Row => sheet.dimensions.rows,
            Dimension::Column => sheet.dimensions.cols,
        }
    }

    fn size_mut<'a>(&self, sheet: &'a mut Sheet) -> &'a mut usize {
        match self {
            Dimension::Row => &mut sheet.dimensions.rows,
            Dimension::Column => &mut sheet.dimensions.cols,
        }
    }
}

/// Store an evaluation outcome. On failure only the display changes.
pub(crate) fn store_evaluation(cell: &mut Cell, result: Result<CellValue, FormulaError>) {
    match result {
        Ok(value) => {
            cell.display = value.to_display();
            cell.value = value;
        }
        Err(err) => {
            debug!("formula {:?} in {} failed: {}", cell.formula, cell.id, err);
            cell.display = ERROR_DISPLAY.to_string();
        }
    }
}

/// Write a value/formula into `sheet`, evaluating against the pre-edit sheet.
fn write_cell(sheet: &mut Sheet, cell_ref: CellRef, value: CellValue, formula: &str) {
    let evaluated = formula
        .strip_prefix('=')
        .map(|source| evaluate_formula(source, sheet));

    let cell = sheet.entry(cell_ref);
    cell.formula = formula.to_string();
    match evaluated {
        Some(result) => store_evaluation(cell, result),
        None => {
            cell.display = value.to_display();
            cell.value = value;
        }
    }
}

impl Document {
    /// Set a cell's value and raw formula text.
    ///
    /// A formula starting with `=` is evaluated once against the sheet as it
    /// was before this edit; otherwise `value` is stored and displayed as is.
    pub fn set_cell_value(&mut self, cell_ref: CellRef, value: CellValue, formula: &str) {
        if !self.sheet.dimensions.contains(&cell_ref) {
            warn!("ignoring edit outside the sheet: {}", cell_ref);
            return;
        }
        self.record("set cell", |sheet| write_cell(sheet, cell_ref, value, formula));

        if self.active_cell == Some(cell_ref) {
            self.refresh_formula_bar();
        }
    }

    /// Set a cell from user input: text beginning with `=` is a formula,
    /// anything else is stored as literal text.
    pub fn set_cell_input(&mut self, cell_ref: CellRef, input: &str) {
        if input.starts_with('=') {
            self.set_cell_value(cell_ref, CellValue::Empty, input);
        } else {
            self.set_cell_value(cell_ref, CellValue::Text(input.to_string()), "");
        }
    }

    /// Merge `patch` into an existing cell's style. Not recorded in history.
    pub fn set_cell_style(&mut self, cell_ref: CellRef, patch: &StylePatch) {
        match self.sheet.get_mut(&cell_ref) {
            Some(cell) => cell.style.merge(patch),
            None => debug!("style edit on empty cell {} ignored", cell_ref),
        }
    }

    /// Generic insert operation for row or column
    fn insert_dimension(&mut self, dim: Dimension, at: usize) {
        let at = at.min(dim.size(&self.sheet));
        self.record("insert", |sheet| {
            let old = std::mem::take(&mut sheet.cells);
            sheet.cells = old
                .into_iter()
                .map(|(cell_ref, cell)| {
                    let coord = dim.get_coord(&cell_ref);
                    if coord >= at {
                        let new_ref = dim.new_cell_ref(&cell_ref, coord + 1);
                        (new_ref, cell.moved_to(new_ref))
                    } else {
                        (cell_ref, cell)
                    }
                })
                .collect();
            *dim.size_mut(sheet) += 1;
        });
        debug!("inserted {:?} at {}", dim, at);
    }

    /// Generic delete operation for row or column
    fn delete_dimension(&mut self, dim: Dimension, at: usize) {
        if at >= dim.size(&self.sheet) {
            warn!("ignoring delete of {:?} {} outside the sheet", dim, at);
            return;
        }
        self.record("delete", |sheet| {
            let old = std::mem::take(&mut sheet.cells);
            let mut cells = BTreeMap::new();
            for (cell_ref, cell) in old {
                let coord = dim.get_coord(&cell_ref);
                if coord == at {
                    continue;
                }
                if coord > at {
                    let new_ref = dim.new_cell_ref(&cell_ref, coord - 1);
                    cells.insert(new_ref, cell.moved_to(new_ref));
                } else {
                    cells.insert(cell_ref, cell);
                }
            }
            sheet.cells = cells;
            *dim.size_mut(sheet) -= 1;
        });
        debug!("deleted {:?} {}", dim, at);
    }

    /// Insert an empty row so that it lands at index `at`
    pub fn insert_row(&mut self, at: usize) {
        self.insert_dimension(Dimension::Row, at);
    }

    /// Insert an empty row below `row`
    pub fn insert_row_after(&mut self, row: usize) {
        self.insert_row(row.saturating_add(1));
    }

    /// Delete the specified row
    pub fn delete_row(&mut self, row: usize) {
        self.delete_dimension(Dimension::Row, row);
    }

    /// Insert an empty column so that it lands at index `at`
    pub fn insert_column(&mut self, at: usize) {
        self.insert_dimension(Dimension::Column, at);
    }

    /// Insert an empty column right of `col`
    pub fn insert_column_after(&mut self, col: usize) {
        self.insert_column(col.saturating_add(1));
    }

    /// Delete the specified column
    pub fn delete_column(&mut self, col: usize) {
        self.delete_dimension(Dimension::Column, col);
    }

    /// Undo the last recorded action. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.sheet = snapshot.clone();
        self.refresh_formula_bar();
        debug!("undo: history {}/{}", self.history.index() + 1, self.history.len());
        true
    }

    /// Redo the last undone action. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.sheet = snapshot.clone();
        self.refresh_formula_bar();
        debug!("redo: history {}/{}", self.history.index() + 1, self.history.len());
        true
    }
}
