//! Error types for Gridsheet core.

use gridsheet_engine::AddressError;
use thiserror::Error;

/// Errors that can occur in document operations.
///
/// Formula failures are not here: they are captured per cell as `#ERROR`.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("Invalid search pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, DocumentError>;
