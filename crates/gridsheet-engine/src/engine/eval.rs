//! Formula evaluation.
//!
//! A formula (stored without its leading `=`) is tried, in order, as:
//!
//! 1. a call to a built-in: `SUM(A1:B3, C4)`
//! 2. a bare cell reference: `B7`
//! 3. an arithmetic expression in which every reference is replaced by its
//!    numeric value before [`eval_arithmetic`] runs
//!
//! Evaluation only reads the [`Sheet`] it is given and never holds on to it.

use log::trace;
use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::args::{split_args, split_call};
use super::cell::{CellValue, Sheet};
use super::cell_ref::{CellRef, is_label, parse_range};
use super::expr::eval_arithmetic;
use super::format::format_number;
use crate::builtins::{call_builtin, to_number};
use crate::error::{FormulaError, Result};

fn embedded_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Z]+[0-9]+").expect("embedded reference regex must compile"))
}

fn checked_ref(label: &str, sheet: &Sheet) -> Result<CellRef> {
    let cell = CellRef::from_label(label)?;
    if !sheet.dimensions.contains(&cell) {
        return Err(FormulaError::InvalidReference(label.to_string()));
    }
    Ok(cell)
}

/// Value of the cell named by `label`; `Empty` if it is not materialized.
pub fn resolve_reference(label: &str, sheet: &Sheet) -> Result<CellValue> {
    let cell = checked_ref(label, sheet)?;
    Ok(sheet.value(&cell))
}

/// Values of every cell in an `A1:B3` range, row-major.
pub fn resolve_range(text: &str, sheet: &Sheet) -> Result<Vec<CellValue>> {
    let range = parse_range(text)?;
    let dims = sheet.dimensions;
    if range.max_row >= dims.rows || range.max_col >= dims.cols {
        return Err(FormulaError::InvalidReference(text.to_string()));
    }
    Ok(range.cells().map(|cell| sheet.value(&cell)).collect())
}

/// Evaluate `formula` (without the leading `=`) against `sheet`.
pub fn evaluate_formula(formula: &str, sheet: &Sheet) -> Result<CellValue> {
    let formula = formula.trim();
    trace!("evaluating formula {:?}", formula);

    if let Some((name, args)) = split_call(formula) {
        let args = split_args(args);
        return call_builtin(name, &args, sheet);
    }

    if is_label(formula) {
        return resolve_reference(formula, sheet);
    }

    let mut failure: Option<FormulaError> = None;
    let substituted = embedded_ref_re().replace_all(formula, |caps: &Captures| {
        let label = &caps[0];
        match resolve_reference(label, sheet) {
            Ok(value) => format_number(to_number(&value)),
            Err(err) => {
                failure.get_or_insert(err);
                "0".to_string()
            }
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }

    trace!("arithmetic after substitution: {:?}", substituted);
    let n = eval_arithmetic(&substituted)
        .map_err(|_| FormulaError::InvalidFormula(formula.to_string()))?;
    Ok(CellValue::Number(n))
}
