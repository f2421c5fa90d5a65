//! gridsheet-core - UI-agnostic document model: sheet, selection, toolbar
//! and undo/redo history.

pub mod document;
pub mod error;

pub use document::{Document, DocumentConfig, History, Selection};
pub use error::{DocumentError, Result};

pub use gridsheet_engine::engine::{CellRange, CellRef};
