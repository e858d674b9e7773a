//! Storage trait for flashcard records

use crate::error::{DtError, Result};
use crate::types::{available_languages, Flashcard, FlashcardId};
use async_trait::async_trait;

/// Keyed flashcard table
///
/// Importers only ever add whole records; there is no update. Implementations must be able
/// to read both schema tags.
#[async_trait]
pub trait FlashcardStore: Send + Sync {
    /// Persist a new record
    async fn add(&self, card: &Flashcard) -> Result<()>;

    /// Get a record by ID
    async fn get(&self, id: &FlashcardId) -> Result<Option<Flashcard>>;

    /// Delete a record by ID
    async fn delete(&self, id: &FlashcardId) -> Result<()>;

    /// Get all records
    async fn all(&self) -> Result<Vec<Flashcard>>;

    /// Get a record by ID, failing when it does not exist
    async fn require(&self, id: &FlashcardId) -> Result<Flashcard> {
        self.get(id)
            .await?
            .ok_or_else(|| DtError::FlashcardNotFound(id.clone()))
    }

    /// Sorted, deduplicated union of every v1 `language` and v2 `languages` key
    async fn available_languages(&self) -> Result<Vec<String>> {
        let cards = self.all().await?;
        Ok(available_languages(&cards))
    }
}
