//! Error types for the pricewatch system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pricewatch system.
#[derive(Error, Debug)]
pub enum Error {
    /// Input violated a record contract (negative price, missing column, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data error (invalid or missing data).
    #[error("Data error: {0}")]
    Data(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Error::Database(msg.into())
    }

    /// Create a CSV error.
    pub fn csv(msg: impl Into<String>) -> Self {
        Error::Csv(msg.into())
    }

    /// Whether this error is a contract violation the user can fix.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
