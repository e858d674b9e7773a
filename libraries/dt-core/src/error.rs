/// Core error types for the flashcard domain
use thiserror::Error;

use crate::types::FlashcardId;

/// Result type alias using `DtError`
pub type Result<T> = std::result::Result<T, DtError>;

/// Core error type shared by the store and the importers
#[derive(Error, Debug)]
pub enum DtError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Flashcard not found
    #[error("Flashcard not found: {0}")]
    FlashcardNotFound(FlashcardId),

    /// Record breaks a schema invariant (empty expressions, empty languages, bad id)
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Duplicate entry
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl DtError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid record error
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for DtError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
