pub mod reporting;
pub mod scenarios;
pub mod suppliers;

use thiserror::Error;

/// Errors from the file and data glue around the engine.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    #[error("invalid distribution: {0}")]
    Distribution(String),
}
