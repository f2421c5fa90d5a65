//! Error types for the Gridsheet command dispatcher

use gridsheet_core::DocumentError;
use gridsheet_engine::AddressError;
use thiserror::Error;

/// Errors reported for a single command line
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("Invalid style setting: {0}")]
    InvalidStyle(String),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

pub type Result<T> = std::result::Result<T, CommandError>;
