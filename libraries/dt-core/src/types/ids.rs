/// ID types for flashcard records
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DtError;

#[cfg(feature = "sqlx")]
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
    Decode, Encode, Sqlite, Type,
};

/// Prefix carried by every flashcard id
pub const FLASHCARD_ID_PREFIX: &str = "flashcard:";

/// Flashcard identifier of the form `flashcard:<uuid>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlashcardId(String);

impl FlashcardId {
    /// Generate a new random flashcard ID
    pub fn generate() -> Self {
        Self(format!("{FLASHCARD_ID_PREFIX}{}", Uuid::new_v4()))
    }

    /// Parse an id, checking the `flashcard:<uuid>` shape
    pub fn parse(id: &str) -> Result<Self, DtError> {
        let uuid = id.strip_prefix(FLASHCARD_ID_PREFIX).ok_or_else(|| {
            DtError::invalid_input(format!("missing '{FLASHCARD_ID_PREFIX}' prefix: {id}"))
        })?;
        Uuid::parse_str(uuid)
            .map_err(|e| DtError::invalid_input(format!("bad flashcard uuid '{uuid}': {e}")))?;
        Ok(Self(id.to_string()))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlashcardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FlashcardId {
    type Err = DtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FlashcardId {
    type Error = DtError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FlashcardId> for String {
    fn from(id: FlashcardId) -> Self {
        id.0
    }
}

#[cfg(feature = "sqlx")]
impl Type<Sqlite> for FlashcardId {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}

#[cfg(feature = "sqlx")]
impl<'q> Encode<'q, Sqlite> for FlashcardId {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        <String as Encode<Sqlite>>::encode_by_ref(&self.0, args)
    }
}

#[cfg(feature = "sqlx")]
impl<'r> Decode<'r, Sqlite> for FlashcardId {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let s = <String as Decode<Sqlite>>::decode(value)?;
        Ok(FlashcardId::parse(&s)?)
    }
}
