//! Error types for the calculator history and CLI.
//!
//! The engine itself never fails; these only cover persistence and I/O.

use thiserror::Error;

/// Result type alias for history and CLI operations
pub type Result<T> = std::result::Result<T, CalcError>;

/// Errors that can occur outside the engine's transition function.
#[derive(Error, Debug)]
pub enum CalcError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error in the history file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// History file exists but its header does not match the expected layout
    #[error("History file {path} has unexpected header: {found}")]
    BadHistoryHeader { path: String, found: String },

    /// A history command was combined with `--no-history`
    #[error("History is disabled by --no-history; nothing to list or clear")]
    HistoryDisabled,
}
