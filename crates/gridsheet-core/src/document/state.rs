use gridsheet_engine::engine::{Cell, CellRange, CellRef, CellStyle, Dimensions, Sheet};
use log::debug;
use serde::{Deserialize, Serialize};

use super::history::{DEFAULT_HISTORY_LIMIT, History};
use crate::error::Result;

pub const DEFAULT_ROWS: usize = 100;
pub const DEFAULT_COLS: usize = 26;

/// Settings used to create a [`Document`].
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentConfig {
    pub rows: usize,
    pub cols: usize,
    /// Maximum number of sheet snapshots kept for undo/redo.
    pub history_limit: usize,
    /// Initial toolbar defaults.
    pub toolbar: CellStyle,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            toolbar: CellStyle::default(),
        }
    }
}

/// A rectangular selection. `start` and `end` are unordered corners;
/// `active` drives the formula bar and toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: CellRef,
    pub end: CellRef,
    pub active: CellRef,
}

impl Selection {
    /// Selection from `start` to `end` with `start` active.
    pub fn new(start: CellRef, end: CellRef) -> Self {
        Selection {
            start,
            end,
            active: start,
        }
    }

    pub fn with_active(mut self, active: CellRef) -> Self {
        self.active = active;
        self
    }

    /// The normalized rectangle covered by this selection.
    pub fn range(&self) -> CellRange {
        CellRange::from_corners(self.start, self.end)
    }
}

/// UI-agnostic document state for one sheet.
///
/// The document is the only mutator of its sheet and history. Every method
/// runs to completion synchronously; share it across threads only behind a
/// single lock around the whole value.
pub struct Document {
    /// Live sheet state
    pub(crate) sheet: Sheet,
    /// Undo/redo snapshots
    pub(crate) history: History,
    pub(crate) selection: Option<Selection>,
    pub(crate) active_cell: Option<CellRef>,
    pub(crate) editing_cell: Option<CellRef>,
    /// Text mirrored in the formula bar
    pub(crate) formula_bar: String,
    /// Style applied by the next apply-toolbar command
    pub(crate) toolbar: CellStyle,
}

impl Document {
    /// Create an empty document with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_config(&DocumentConfig {
            rows,
            cols,
            ..DocumentConfig::default()
        })
    }

    pub fn with_config(config: &DocumentConfig) -> Self {
        let sheet = Sheet::new(config.rows, config.cols);
        debug!(
            "new document {}x{} (history limit {})",
            config.rows, config.cols, config.history_limit
        );
        Document {
            history: History::new(sheet.clone(), config.history_limit),
            sheet,
            selection: None,
            active_cell: None,
            editing_cell: None,
            formula_bar: String::new(),
            toolbar: config.toolbar.clone(),
        }
    }

    /// Run one recorded action: snapshot the pre-edit sheet, apply `change`,
    /// then snapshot the result.
    pub(crate) fn record<R>(&mut self, action: &str, change: impl FnOnce(&mut Sheet) -> R) -> R {
        self.history.checkpoint(&self.sheet);
        let out = change(&mut self.sheet);
        self.history.commit(&self.sheet);
        debug!(
            "{}: history {}/{}",
            action,
            self.history.index() + 1,
            self.history.len()
        );
        out
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn cell(&self, cell: &CellRef) -> Option<&Cell> {
        self.sheet.get(cell)
    }

    /// Look up a cell by its internal identifier (`"row:col"`).
    pub fn cell_by_id(&self, id: &str) -> Result<Option<&Cell>> {
        let cell = CellRef::from_identifier(id)?;
        Ok(self.sheet.get(&cell))
    }

    /// Display string at `cell` (empty if not materialized).
    pub fn display(&self, cell: &CellRef) -> &str {
        self.sheet.display(cell)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.sheet.dimensions
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn active_cell(&self) -> Option<CellRef> {
        self.active_cell
    }

    pub fn editing_cell(&self) -> Option<CellRef> {
        self.editing_cell
    }

    pub fn formula_bar_value(&self) -> &str {
        &self.formula_bar
    }

    pub fn toolbar(&self) -> &CellStyle {
        &self.toolbar
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::with_config(&DocumentConfig::default())
    }
}
