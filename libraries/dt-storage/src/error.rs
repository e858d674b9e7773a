/// Storage-specific errors
use thiserror::Error;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// A row could not be turned back into a record
    #[error("Corrupt flashcard row {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a corrupt record error
    pub fn corrupt(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<StorageError> for dt_core::DtError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(e) => dt_core::DtError::Database(e.to_string()),
            other => dt_core::DtError::storage(other.to_string()),
        }
    }
}
