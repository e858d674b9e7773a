//! Versioned v1 → v2 record migration
//!
//! A v1 card becomes a v2 card with a single language slot. Several expressions collapse
//! into that slot as follows:
//!
//! - every expression is text: they are joined with [`EXPRESSION_SEPARATOR`]
//! - otherwise: the first expression is kept as-is
//!
//! `collection` and `credits` have no v2 counterpart and are dropped. The id, image and
//! creation time are preserved.

use crate::types::{ContentItem, Flashcard, LegacyFlashcard, MultiLanguageFlashcard};
use std::collections::BTreeMap;

/// Separator used when joining text expressions into one slot
pub const EXPRESSION_SEPARATOR: &str = " / ";

/// Collapse an ordered list of expressions into one language slot
pub fn collapse_expressions(expressions: &[ContentItem]) -> Option<ContentItem> {
    let texts: Option<Vec<&str>> = expressions.iter().map(ContentItem::as_text).collect();

    match texts {
        Some(texts) if !texts.is_empty() => {
            Some(ContentItem::text(texts.join(EXPRESSION_SEPARATOR)))
        }
        _ => expressions.first().cloned(),
    }
}

/// Rewrite a v1 record into the v2 shape, keeping its id
pub fn legacy_to_multi_language(card: LegacyFlashcard) -> Option<MultiLanguageFlashcard> {
    let slot = collapse_expressions(&card.expressions)?;

    let mut languages = BTreeMap::new();
    languages.insert(card.language, slot);

    Some(MultiLanguageFlashcard {
        id: card.id,
        image: card.image,
        languages,
        created_at: card.created_at,
    })
}

/// Migrate any record to v2. v2 records pass through unchanged.
///
/// Returns `None` for a v1 record without expressions, which breaks the v1 invariant and
/// cannot be expressed as v2.
pub fn migrate_to_v2(card: Flashcard) -> Option<Flashcard> {
    match card {
        Flashcard::V1(legacy) => legacy_to_multi_language(legacy).map(Flashcard::V2),
        v2 @ Flashcard::V2(_) => Some(v2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewLegacyFlashcard, SchemaVersion};

    fn legacy(expressions: Vec<ContentItem>) -> Flashcard {
        Flashcard::from_draft(
            NewLegacyFlashcard {
                image: vec![7],
                language: "eng".to_string(),
                expressions,
                collection: "basics".to_string(),
                credits: Some("someone".to_string()),
            }
            .into(),
        )
        .unwrap()
    }

    #[test]
    fn test_text_expressions_are_joined() {
        let card = legacy(vec![ContentItem::text("cat"), ContentItem::text("kitty")]);
        let id = card.id().clone();

        let migrated = migrate_to_v2(card).unwrap();
        assert_eq!(migrated.schema_version(), SchemaVersion::V2);
        assert_eq!(migrated.id(), &id);

        let Flashcard::V2(v2) = migrated else {
            panic!("expected v2");
        };
        assert_eq!(v2.languages["eng"], ContentItem::text("cat / kitty"));
    }

    #[test]
    fn test_mixed_expressions_keep_first() {
        let card = legacy(vec![ContentItem::image(vec![1, 2]), ContentItem::text("cat")]);
        let Some(Flashcard::V2(v2)) = migrate_to_v2(card) else {
            panic!("expected v2");
        };
        assert_eq!(v2.languages["eng"], ContentItem::image(vec![1, 2]));
    }

    #[test]
    fn test_v2_passes_through() {
        let card = Flashcard::from_draft(
            crate::types::NewMultiLanguageFlashcard {
                image: vec![1],
                languages: [("fra".to_string(), ContentItem::text("chat"))].into(),
            }
            .into(),
        )
        .unwrap();
        assert_eq!(migrate_to_v2(card.clone()), Some(card));
    }

    #[test]
    fn test_collapse_of_empty_is_none() {
        assert_eq!(collapse_expressions(&[]), None);
    }
}
