//! Content values carried by flashcard fields
//!
//! Every expression, language value, or credits-like slot that can hold either literal text
//! or an image is a `ContentItem`. Which variant a value takes is decided by the importer's
//! filename classification, never by sniffing bytes.

use serde::{Deserialize, Serialize};

/// Literal text or binary image content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ContentItem {
    Text(String),
    Image(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl ContentItem {
    /// Create a text item
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Create an image item
    pub fn image(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Image(bytes.into())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }

    /// Text value, if this is a text item
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }

    /// Image bytes, if this is an image item
    pub fn as_image(&self) -> Option<&[u8]> {
        match self {
            Self::Text(_) => None,
            Self::Image(bytes) => Some(bytes),
        }
    }
}

/// Serde adapter storing binary blobs as standard base64 strings
pub mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
