//! Error types for vanstat

use thiserror::Error;

/// vanstat error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// One or more required columns are absent from an input table.
    #[error("{input}: missing required column(s): {}", .columns.join(", "))]
    MissingColumns {
        /// Human-readable name of the input (usually its path).
        input: String,
        /// Every column that was required but not found.
        columns: Vec<String>,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
