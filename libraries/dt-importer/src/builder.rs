//! Canonical record creation
//!
//! The only path by which importers create records: the draft is validated, given a fresh
//! `flashcard:<uuid>` id, and handed to the store.

use dt_core::storage::FlashcardStore;
use dt_core::types::{
    ContentItem, Flashcard, NewFlashcard, NewLegacyFlashcard, NewMultiLanguageFlashcard,
};
use std::collections::BTreeMap;

use crate::Result;

/// Persists drafts through a [`FlashcardStore`]
pub struct RecordBuilder<'a> {
    store: &'a dyn FlashcardStore,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(store: &'a dyn FlashcardStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'a dyn FlashcardStore {
        self.store
    }

    /// Assign an id, persist, and return the stored record.
    ///
    /// The draft is consumed, so the stored record shares nothing with the caller.
    /// Language codes are not format-checked.
    pub async fn build(&self, draft: NewFlashcard) -> Result<Flashcard> {
        let card = Flashcard::from_draft(draft)?;
        self.store.add(&card).await?;

        tracing::debug!(
            id = %card.id(),
            schema = %card.schema_version(),
            languages = ?card.language_codes(),
            "Created flashcard"
        );

        Ok(card)
    }

    /// Create a v1 record
    pub async fn create_legacy(
        &self,
        image: Vec<u8>,
        language: impl Into<String>,
        expressions: Vec<ContentItem>,
        collection: impl Into<String>,
        credits: Option<String>,
    ) -> Result<Flashcard> {
        self.build(
            NewLegacyFlashcard {
                image,
                language: language.into(),
                expressions,
                collection: collection.into(),
                // An empty attribution is no attribution
                credits: credits.filter(|c| !c.is_empty()),
            }
            .into(),
        )
        .await
    }

    /// Create a v2 record
    pub async fn create_multi_language(
        &self,
        image: Vec<u8>,
        languages: BTreeMap<String, ContentItem>,
    ) -> Result<Flashcard> {
        self.build(NewMultiLanguageFlashcard { image, languages }.into())
            .await
    }
}
