//! Common error types for the wardrobe crates

use thiserror::Error;

/// Common result type for wardrobe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the wardrobe crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// User input rejected before reaching the database.
    ///
    /// The message is meant to be shown to the user as-is.
    #[error("{0}")]
    Validation(String),

    /// Remote API unreachable or returned an unusable response
    #[error("Network error: {0}")]
    Network(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors caused by user input rather than the system
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
