//! Error types for journal persistence, collaborators, and input validation.

use thiserror::Error;

/// Result type for fallible journal operations.
pub type JournalResult<T> = Result<T, JournalError>;

/// Errors that can occur outside the pure analysis core.
#[derive(Debug, Error)]
pub enum JournalError {
    /// SQLite failure while reading or writing journal data.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem failure (config, exports, sketch files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sketch or config (de)serialization failure.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Transport failure talking to the reflection service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Drawing data that the analysis core does not accept.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A date key that is not `YYYY-MM-DD`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
