//! Flashcard Core
//!
//! Platform-agnostic domain types, storage traits, and error handling shared by the
//! flashcard importer, the SQLite store, and the command-line application.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Flashcard` (tagged v1/v2 record), `ContentItem`, `FlashcardId`
//! - **Drafts**: `NewFlashcard` values produced by importers before an id is assigned
//! - **Core Traits**: `FlashcardStore`, the keyed table every importer persists through
//! - **Migration**: the versioned v1 → v2 rewrite
//! - **Error Handling**: Unified `DtError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use dt_core::types::{ContentItem, Flashcard, NewMultiLanguageFlashcard};
//! use std::collections::BTreeMap;
//!
//! let mut languages = BTreeMap::new();
//! languages.insert("eng".to_string(), ContentItem::text("hello"));
//!
//! let draft = NewMultiLanguageFlashcard { image: vec![0x89, 0x50], languages };
//! let card = Flashcard::from_draft(draft.into()).unwrap();
//!
//! assert!(card.id().as_str().starts_with("flashcard:"));
//! assert_eq!(card.language_codes(), vec!["eng".to_string()]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod migration;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{DtError, Result};
pub use storage::FlashcardStore;

pub use types::{
    ContentItem, Flashcard, FlashcardId, LegacyFlashcard, MultiLanguageFlashcard, NewFlashcard,
    NewLegacyFlashcard, NewMultiLanguageFlashcard, SchemaVersion,
};
