//! Error types for addressing and formula evaluation.

use thiserror::Error;

/// Errors produced by the cell addressing functions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid cell identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid cell label: {0}")]
    InvalidLabel(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

/// Errors produced while evaluating a formula.
///
/// None of these escape a cell edit: the document renders them as `#ERROR`
/// on the offending cell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("{function} requires exactly {expected} argument(s), got {actual}")]
    FunctionArity {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid formula: {0}")]
    InvalidFormula(String),
}

impl From<AddressError> for FormulaError {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::InvalidIdentifier(s)
            | AddressError::InvalidLabel(s)
            | AddressError::InvalidRange(s) => FormulaError::InvalidReference(s),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormulaError>;
