//! Folder grouping shared by the archive and manifest importers
//!
//! A folder is one card: `image.<ext>` is the cover image, every other image or text file
//! is the value for the language named by its base name.

use dt_core::types::{ContentItem, NewMultiLanguageFlashcard};
use std::collections::BTreeMap;

use crate::classify::{classify, leaf_name, MediaKind};
use crate::types::SkipReason;

/// Leaf-name prefix of a folder's cover image
const PRIMARY_IMAGE_PREFIX: &str = "image.";

/// What a file contributes to its folder's card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRole {
    PrimaryImage,
    LanguageImage(String),
    LanguageText(String),
    Ignored,
}

/// Decide a file's role from its name alone
pub fn role_of(filename: &str) -> EntryRole {
    let leaf = leaf_name(filename);
    let classification = classify(leaf);

    match classification.kind {
        MediaKind::Image if leaf.starts_with(PRIMARY_IMAGE_PREFIX) => EntryRole::PrimaryImage,
        MediaKind::Image => EntryRole::LanguageImage(classification.base_name),
        MediaKind::Text => EntryRole::LanguageText(classification.base_name),
        MediaKind::Unknown => EntryRole::Ignored,
    }
}

/// Accumulates one folder's files into a v2 draft
#[derive(Debug, Default)]
pub struct FolderDraft {
    image: Option<Vec<u8>>,
    languages: BTreeMap<String, ContentItem>,
}

impl FolderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a loaded file. Text content is trimmed; a later primary image replaces an
    /// earlier one, as does a later file for the same language.
    pub fn apply(&mut self, role: EntryRole, content: Vec<u8>) {
        match role {
            EntryRole::PrimaryImage => {
                if self.image.is_some() {
                    tracing::debug!("Folder has several primary images; keeping the last");
                }
                self.image = Some(content);
            }
            EntryRole::LanguageImage(code) => {
                self.languages.insert(code, ContentItem::Image(content));
            }
            EntryRole::LanguageText(code) => {
                let text = String::from_utf8_lossy(&content).trim().to_string();
                self.languages.insert(code, ContentItem::Text(text));
            }
            EntryRole::Ignored => {}
        }
    }

    /// A folder becomes a card only with a primary image and at least one language
    pub fn finish(self) -> Result<NewMultiLanguageFlashcard, SkipReason> {
        let image = self.image.ok_or(SkipReason::MissingPrimaryImage)?;
        if self.languages.is_empty() {
            return Err(SkipReason::NoLanguageEntries);
        }
        Ok(NewMultiLanguageFlashcard {
            image,
            languages: self.languages,
        })
    }
}
