//! gridsheet_engine - Cell addressing and formula evaluation.

pub mod builtins;
pub mod engine;
pub mod error;

pub use error::{AddressError, FormulaError};
