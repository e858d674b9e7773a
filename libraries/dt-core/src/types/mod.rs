mod content;
mod flashcard;
mod ids;

pub use content::{base64_bytes, ContentItem};
pub use flashcard::{
    available_languages, Flashcard, LegacyFlashcard, MultiLanguageFlashcard, NewFlashcard,
    NewLegacyFlashcard, NewMultiLanguageFlashcard, SchemaVersion,
};
pub use ids::{FlashcardId, FLASHCARD_ID_PREFIX};
