use gridsheet_engine::engine::{Cell, CellRange, CellRef, StylePatch};
use log::debug;

use super::{Document, Selection};

impl Document {
    /// Replace the selection. A new selection also moves the active cell.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
        if let Some(selection) = selection {
            self.set_active_cell(Some(selection.active));
        }
    }

    pub fn set_active_cell(&mut self, cell: Option<CellRef>) {
        self.active_cell = cell;
        self.refresh_formula_bar();
        self.refresh_toolbar();
    }

    pub fn set_editing_cell(&mut self, cell: Option<CellRef>) {
        self.editing_cell = cell;
    }

    /// Store formula bar text and commit it to the active cell, if any.
    pub fn set_formula_bar_value(&mut self, text: &str) {
        self.formula_bar = text.to_string();
        if let Some(active) = self.active_cell {
            self.set_cell_input(active, text);
        }
    }

    pub fn update_toolbar(&mut self, patch: &StylePatch) {
        self.toolbar.merge(patch);
    }

    /// Write the toolbar style into every cell of the selection (or the
    /// active cell). Not recorded in history.
    pub fn apply_toolbar_to_selection(&mut self) -> usize {
        let target = match (self.selection, self.active_cell) {
            (Some(selection), _) => selection.range(),
            (None, Some(active)) => CellRange::from_corners(active, active),
            (None, None) => return 0,
        };
        let Some(target) = self.sheet.dimensions.clip(target) else {
            debug!("toolbar target {} is outside the sheet", target);
            return 0;
        };

        let mut styled = 0;
        for cell_ref in target.cells() {
            self.sheet.entry(cell_ref).style = self.toolbar.clone();
            styled += 1;
        }
        debug!("applied toolbar style to {} cells", styled);
        styled
    }

    /// Formula bar mirrors the active cell: formula, else value, else empty.
    pub(crate) fn refresh_formula_bar(&mut self) {
        self.formula_bar = self
            .active_cell
            .and_then(|cell| self.sheet.get(&cell))
            .map(Cell::to_input_string)
            .unwrap_or_default();
    }

    fn refresh_toolbar(&mut self) {
        self.toolbar = self
            .active_cell
            .and_then(|cell| self.sheet.get(&cell))
            .map(|cell| cell.style.clone())
            .unwrap_or_default();
    }
}
