//! Document state and logic (UI-agnostic).

mod history;
mod ops;
mod selection;
mod state;
mod transform;

pub use history::{DEFAULT_HISTORY_LIMIT, History};
pub use state::{DEFAULT_COLS, DEFAULT_ROWS, Document, DocumentConfig, Selection};
