//! Cell data structures for the spreadsheet grid.
//!
//! - [`CellValue`] - The computed scalar held by a cell
//! - [`CellStyle`] / [`StylePatch`] - Stored style attributes and partial updates
//! - [`Cell`] - A cell with value, raw formula, display string and style
//! - [`Sheet`] - Sparse cell storage plus the grid dimensions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cell_ref::{CellRange, CellRef};
use super::format::format_number;

/// Display marker for a cell whose formula failed to evaluate.
pub const ERROR_DISPLAY: &str = "#ERROR";

/// The computed value stored in a cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// True for `Empty` and for the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Text shown in the grid for this value.
    pub fn to_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl std::str::FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(TextAlign::Left),
            "center" => Ok(TextAlign::Center),
            "right" => Ok(TextAlign::Right),
            _ => Err(format!("Invalid text alignment: {}", s)),
        }
    }
}

/// Style attributes stored per cell. Also used for the toolbar defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub font_size: u32,
    pub color: String,
    pub background_color: String,
    pub text_align: TextAlign,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            bold: false,
            italic: false,
            font_size: 12,
            color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            text_align: TextAlign::Left,
        }
    }
}

impl CellStyle {
    /// Overwrite every attribute set in `patch`.
    pub fn merge(&mut self, patch: &StylePatch) {
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(background_color) = &patch.background_color {
            self.background_color = background_color.clone();
        }
        if let Some(text_align) = patch.text_align {
            self.text_align = text_align;
        }
    }
}

/// A partial style update; `None` leaves the attribute unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePatch {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub font_size: Option<u32>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub text_align: Option<TextAlign>,
}

impl StylePatch {
    pub fn is_empty(&self) -> bool {
        *self == StylePatch::default()
    }
}

impl From<&CellStyle> for StylePatch {
    fn from(style: &CellStyle) -> Self {
        StylePatch {
            bold: Some(style.bold),
            italic: Some(style.italic),
            font_size: Some(style.font_size),
            color: Some(style.color.clone()),
            background_color: Some(style.background_color.clone()),
            text_align: Some(style.text_align),
        }
    }
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Coordinate this cell lives at. Always equal to its key in the [`Sheet`].
    pub id: CellRef,
    /// Computed value (the literal for non-formula cells).
    pub value: CellValue,
    /// Raw formula text including the leading `=`, or empty.
    pub formula: String,
    pub display: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn new_empty(id: CellRef) -> Cell {
        Cell {
            id,
            value: CellValue::Empty,
            formula: String::new(),
            display: String::new(),
            style: CellStyle::default(),
        }
    }

    /// A literal (non-formula) cell whose display mirrors its value.
    pub fn new_value(id: CellRef, value: CellValue) -> Cell {
        Cell {
            id,
            display: value.to_display(),
            value,
            formula: String::new(),
            style: CellStyle::default(),
        }
    }

    pub fn has_formula(&self) -> bool {
        self.formula.starts_with('=')
    }

    /// Text for the formula bar: the formula if present, else the value.
    pub fn to_input_string(&self) -> String {
        if self.formula.is_empty() {
            self.value.to_display()
        } else {
            self.formula.clone()
        }
    }

    /// Drop value, formula and display; keep the style.
    pub fn clear_contents(&mut self) {
        self.value = CellValue::Empty;
        self.formula.clear();
        self.display.clear();
    }

    /// Copy of this cell relocated to `id`.
    pub fn moved_to(&self, id: CellRef) -> Cell {
        Cell { id, ..self.clone() }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub fn contains(&self, cell: &CellRef) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// The part of `range` inside the grid, `None` if they do not overlap.
    pub fn clip(&self, range: CellRange) -> Option<CellRange> {
        if self.rows == 0
            || self.cols == 0
            || range.min_row >= self.rows
            || range.min_col >= self.cols
        {
            return None;
        }
        Some(CellRange {
            max_row: range.max_row.min(self.rows - 1),
            max_col: range.max_col.min(self.cols - 1),
            ..range
        })
    }
}

/// Sparse grid storage. Absent coordinates are implicitly empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub cells: BTreeMap<CellRef, Cell>,
    pub dimensions: Dimensions,
}

impl Sheet {
    pub fn new(rows: usize, cols: usize) -> Sheet {
        Sheet {
            cells: BTreeMap::new(),
            dimensions: Dimensions { rows, cols },
        }
    }

    pub fn get(&self, cell: &CellRef) -> Option<&Cell> {
        self.cells.get(cell)
    }

    pub fn get_mut(&mut self, cell: &CellRef) -> Option<&mut Cell> {
        self.cells.get_mut(cell)
    }

    /// Value at `cell`, `Empty` when the cell is not materialized.
    pub fn value(&self, cell: &CellRef) -> CellValue {
        self.cells
            .get(cell)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Display string at `cell`, empty when the cell is not materialized.
    pub fn display(&self, cell: &CellRef) -> &str {
        self.cells.get(cell).map(|c| c.display.as_str()).unwrap_or("")
    }

    /// Mutable access to `cell`, materializing an empty default cell first.
    pub fn entry(&mut self, cell: CellRef) -> &mut Cell {
        self.cells
            .entry(cell)
            .or_insert_with(|| Cell::new_empty(cell))
    }

    pub fn insert(&mut self, cell: Cell) {
        self.cells.insert(cell.id, cell);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &Cell)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
