//! Spreadsheet engine API.
//!
//! - [`Cell`], [`CellValue`], [`CellStyle`], [`Sheet`] - Data structures for cell storage
//! - [`CellRef`], [`CellRange`] - Addressing (identifiers and A1 labels ↔ row/col indices)
//! - [`evaluate_formula`] - Evaluate a formula against a read-only sheet
//! - [`format_number`] - Format numbers for display

pub(crate) mod args;
mod cell;
mod cell_ref;
mod eval;
mod expr;
mod format;

pub use args::{split_args, split_call};
pub use cell::{
    Cell, CellStyle, CellValue, Dimensions, ERROR_DISPLAY, Sheet, StylePatch, TextAlign,
};
pub use cell_ref::{
    CellRange, CellRef, cell_label, column_label, identifier, is_label, parse_column_label,
    parse_label, parse_range, position, row_label,
};
pub use eval::{evaluate_formula, resolve_range, resolve_reference};
pub use expr::eval_arithmetic;
pub use format::format_number;
