//! Flashcard records in both schema generations
//!
//! v1 records hold one language with several phrasing options. v2 records map language
//! codes to one content item each. Both are stored side by side behind the `Flashcard`
//! tag and neither is ever updated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::content::{base64_bytes, ContentItem};
use super::ids::FlashcardId;
use crate::error::{DtError, Result};

/// Schema generation of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    V1,
    V2,
}

impl SchemaVersion {
    /// Numeric tag written to the storage layer
    pub fn as_i64(self) -> i64 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::V1),
            2 => Some(Self::V2),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

/// Single-language flashcard (schema v1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyFlashcard {
    pub id: FlashcardId,

    /// Cover image
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,

    /// 3-letter language code of every expression
    pub language: String,

    /// Phrasing options, never empty
    pub expressions: Vec<ContentItem>,

    /// Name of the collection the card was imported from
    pub collection: String,

    /// Plain-text attribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Multi-language flashcard (schema v2, canonical)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiLanguageFlashcard {
    pub id: FlashcardId,

    /// Cover image
    #[serde(with = "base64_bytes")]
    pub image: Vec<u8>,

    /// Language code -> content, never empty
    pub languages: BTreeMap<String, ContentItem>,

    pub created_at: DateTime<Utc>,
}

/// A persisted flashcard in either schema generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "lowercase")]
pub enum Flashcard {
    V1(LegacyFlashcard),
    V2(MultiLanguageFlashcard),
}

/// Data for creating a v1 flashcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLegacyFlashcard {
    pub image: Vec<u8>,
    pub language: String,
    pub expressions: Vec<ContentItem>,
    pub collection: String,
    pub credits: Option<String>,
}

/// Data for creating a v2 flashcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMultiLanguageFlashcard {
    pub image: Vec<u8>,
    pub languages: BTreeMap<String, ContentItem>,
}

/// Parsed fields of a flashcard that has no id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewFlashcard {
    V1(NewLegacyFlashcard),
    V2(NewMultiLanguageFlashcard),
}

impl From<NewLegacyFlashcard> for NewFlashcard {
    fn from(draft: NewLegacyFlashcard) -> Self {
        Self::V1(draft)
    }
}

impl From<NewMultiLanguageFlashcard> for NewFlashcard {
    fn from(draft: NewMultiLanguageFlashcard) -> Self {
        Self::V2(draft)
    }
}

impl NewFlashcard {
    /// Check the non-empty invariants of the target schema.
    ///
    /// Language codes are not checked for format.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::V1(draft) => {
                if draft.image.is_empty() {
                    return Err(DtError::invalid_record("image is empty"));
                }
                if draft.expressions.is_empty() {
                    return Err(DtError::invalid_record("v1 record needs at least one expression"));
                }
            }
            Self::V2(draft) => {
                if draft.image.is_empty() {
                    return Err(DtError::invalid_record("image is empty"));
                }
                if draft.languages.is_empty() {
                    return Err(DtError::invalid_record("v2 record needs at least one language"));
                }
            }
        }
        Ok(())
    }
}

impl Flashcard {
    /// Validate a draft and give it a fresh id
    pub fn from_draft(draft: NewFlashcard) -> Result<Self> {
        draft.validate()?;

        let id = FlashcardId::generate();
        let created_at = Utc::now();

        Ok(match draft {
            NewFlashcard::V1(d) => Self::V1(LegacyFlashcard {
                id,
                image: d.image,
                language: d.language,
                expressions: d.expressions,
                collection: d.collection,
                credits: d.credits,
                created_at,
            }),
            NewFlashcard::V2(d) => Self::V2(MultiLanguageFlashcard {
                id,
                image: d.image,
                languages: d.languages,
                created_at,
            }),
        })
    }

    pub fn id(&self) -> &FlashcardId {
        match self {
            Self::V1(card) => &card.id,
            Self::V2(card) => &card.id,
        }
    }

    pub fn image(&self) -> &[u8] {
        match self {
            Self::V1(card) => &card.image,
            Self::V2(card) => &card.image,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::V1(card) => card.created_at,
            Self::V2(card) => card.created_at,
        }
    }

    pub fn schema_version(&self) -> SchemaVersion {
        match self {
            Self::V1(_) => SchemaVersion::V1,
            Self::V2(_) => SchemaVersion::V2,
        }
    }

    /// Language codes this record contributes to the available-languages set, sorted
    pub fn language_codes(&self) -> Vec<String> {
        match self {
            Self::V1(card) => vec![card.language.clone()],
            Self::V2(card) => card.languages.keys().cloned().collect(),
        }
    }

    /// Check the schema invariants of a stored record
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::V1(card) if card.expressions.is_empty() => Err(DtError::invalid_record(
                format!("{} has no expressions", card.id),
            )),
            Self::V2(card) if card.languages.is_empty() => Err(DtError::invalid_record(
                format!("{} has no languages", card.id),
            )),
            _ => Ok(()),
        }
    }

    /// True when both records carry the same content, ignoring id and timestamp
    pub fn same_content(&self, other: &Flashcard) -> bool {
        match (self, other) {
            (Self::V1(a), Self::V1(b)) => {
                a.image == b.image
                    && a.language == b.language
                    && a.expressions == b.expressions
                    && a.collection == b.collection
                    && a.credits == b.credits
            }
            (Self::V2(a), Self::V2(b)) => a.image == b.image && a.languages == b.languages,
            _ => false,
        }
    }
}

/// Sorted, deduplicated union of language codes across records
pub fn available_languages<'a>(cards: impl IntoIterator<Item = &'a Flashcard>) -> Vec<String> {
    let codes: BTreeSet<String> = cards
        .into_iter()
        .flat_map(Flashcard::language_codes)
        .collect();
    codes.into_iter().collect()
}
