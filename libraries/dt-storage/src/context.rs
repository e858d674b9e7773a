use crate::flashcards;
use async_trait::async_trait;
use dt_core::{
    error::Result,
    storage::FlashcardStore,
    types::{Flashcard, FlashcardId, SchemaVersion},
};
use sqlx::SqlitePool;

/// Flashcard store backed by `SQLite`
#[derive(Clone)]
pub struct SqliteFlashcardStore {
    pool: SqlitePool,
}

impl SqliteFlashcardStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Count all stored records
    pub async fn count(&self) -> Result<i64> {
        flashcards::count(&self.pool).await
    }

    /// Count stored records of one schema generation
    pub async fn count_by_schema(&self, schema: SchemaVersion) -> Result<i64> {
        flashcards::count_by_schema(&self.pool, schema).await
    }

    /// Get every v1 record imported from a collection
    pub async fn by_collection(&self, collection: &str) -> Result<Vec<Flashcard>> {
        flashcards::get_by_collection(&self.pool, collection).await
    }

    /// Rewrite all v1 records into v2; see [`flashcards::migrate_legacy_to_v2`]
    pub async fn migrate_legacy_to_v2(&self) -> Result<usize> {
        flashcards::migrate_legacy_to_v2(&self.pool).await
    }
}

#[async_trait]
impl FlashcardStore for SqliteFlashcardStore {
    async fn add(&self, card: &Flashcard) -> Result<()> {
        flashcards::create(&self.pool, card).await
    }

    async fn get(&self, id: &FlashcardId) -> Result<Option<Flashcard>> {
        flashcards::get_by_id(&self.pool, id).await
    }

    async fn delete(&self, id: &FlashcardId) -> Result<()> {
        flashcards::delete(&self.pool, id).await
    }

    async fn all(&self) -> Result<Vec<Flashcard>> {
        flashcards::get_all(&self.pool).await
    }

    async fn available_languages(&self) -> Result<Vec<String>> {
        flashcards::available_languages(&self.pool).await
    }
}
