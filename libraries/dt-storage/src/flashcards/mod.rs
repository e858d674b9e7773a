//! Flashcard table queries
//!
//! Records are never updated field by field. The only rewrite is
//! [`migrate_legacy_to_v2`], which replaces a whole v1 row with its v2 form under the same id.

use dt_core::{
    error::{DtError, Result},
    migration,
    types::{Flashcard, FlashcardId, SchemaVersion},
};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::StorageError;

/// id, schema_version, payload
type FlashcardRow = (FlashcardId, i64, String);

fn encode_languages(card: &Flashcard) -> Result<String> {
    Ok(serde_json::to_string(&card.language_codes())?)
}

fn collection_of(card: &Flashcard) -> Option<&str> {
    match card {
        Flashcard::V1(legacy) => Some(legacy.collection.as_str()),
        Flashcard::V2(_) => None,
    }
}

fn decode_row((id, schema_version, payload): FlashcardRow) -> Result<Flashcard> {
    let card: Flashcard = serde_json::from_str(&payload)
        .map_err(|e| StorageError::corrupt(id.as_str(), e.to_string()))?;

    let tagged = SchemaVersion::from_i64(schema_version).ok_or_else(|| {
        StorageError::corrupt(id.as_str(), format!("unknown schema version {schema_version}"))
    })?;

    if tagged != card.schema_version() {
        return Err(StorageError::corrupt(
            id.as_str(),
            format!("row tagged {tagged} but payload is {}", card.schema_version()),
        )
        .into());
    }

    if *card.id() != id {
        let reason = format!("payload carries id {}", card.id());
        return Err(StorageError::corrupt(id.as_str(), reason).into());
    }

    Ok(card)
}

/// Insert a new record
pub async fn create(pool: &SqlitePool, card: &Flashcard) -> Result<()> {
    card.validate()?;

    let payload = serde_json::to_string(card)?;
    let languages = encode_languages(card)?;

    let result = sqlx::query(
        "INSERT INTO flashcards (id, schema_version, languages, collection, payload, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(card.id())
    .bind(card.schema_version().as_i64())
    .bind(&languages)
    .bind(collection_of(card))
    .bind(&payload)
    .bind(card.created_at().timestamp_millis())
    .execute(pool)
    .await;

    match result {
        Ok(_) => {
            tracing::debug!(id = %card.id(), schema = %card.schema_version(), "Stored flashcard");
            Ok(())
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(DtError::Duplicate(card.id().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Get a record by ID
pub async fn get_by_id(pool: &SqlitePool, id: &FlashcardId) -> Result<Option<Flashcard>> {
    let row: Option<FlashcardRow> =
        sqlx::query_as("SELECT id, schema_version, payload FROM flashcards WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    row.map(decode_row).transpose()
}

/// Get all records in insertion order
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Flashcard>> {
    let rows: Vec<FlashcardRow> = sqlx::query_as(
        "SELECT id, schema_version, payload FROM flashcards ORDER BY created_at, rowid",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(decode_row).collect()
}

/// Get every v1 record imported from a collection
pub async fn get_by_collection(pool: &SqlitePool, collection: &str) -> Result<Vec<Flashcard>> {
    let rows: Vec<FlashcardRow> = sqlx::query_as(
        "SELECT id, schema_version, payload FROM flashcards
         WHERE collection = ?
         ORDER BY created_at, rowid",
    )
    .bind(collection)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(decode_row).collect()
}

/// Delete a record. Deleting an unknown id is not an error.
pub async fn delete(pool: &SqlitePool, id: &FlashcardId) -> Result<()> {
    let result = sqlx::query("DELETE FROM flashcards WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        tracing::debug!(id = %id, "Delete of unknown flashcard ignored");
    }

    Ok(())
}

/// Count all records
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM flashcards")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Count records of one schema generation
pub async fn count_by_schema(pool: &SqlitePool, schema: SchemaVersion) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM flashcards WHERE schema_version = ?")
            .bind(schema.as_i64())
            .fetch_one(pool)
            .await?;
    Ok(count)
}

/// Sorted, deduplicated union of v1 `language` values and v2 `languages` keys
pub async fn available_languages(pool: &SqlitePool) -> Result<Vec<String>> {
    let languages: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT codes.value
         FROM flashcards, json_each(flashcards.languages) AS codes
         ORDER BY codes.value",
    )
    .fetch_all(pool)
    .await?;
    Ok(languages)
}

async fn replace_in_tx(tx: &mut Transaction<'_, Sqlite>, card: &Flashcard) -> Result<()> {
    let payload = serde_json::to_string(card)?;
    let languages = encode_languages(card)?;

    sqlx::query(
        "UPDATE flashcards
         SET schema_version = ?, languages = ?, collection = ?, payload = ?
         WHERE id = ?",
    )
    .bind(card.schema_version().as_i64())
    .bind(&languages)
    .bind(collection_of(card))
    .bind(&payload)
    .bind(card.id())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// One-time rewrite of every v1 record into the v2 shape.
///
/// Runs in a single transaction; returns how many records were migrated. Running it again
/// is a no-op.
pub async fn migrate_legacy_to_v2(pool: &SqlitePool) -> Result<usize> {
    let mut tx = pool.begin().await?;

    let rows: Vec<FlashcardRow> = sqlx::query_as(
        "SELECT id, schema_version, payload FROM flashcards WHERE schema_version = 1",
    )
    .fetch_all(&mut *tx)
    .await?;

    let mut migrated = 0;
    for row in rows {
        let card = decode_row(row)?;
        let id = card.id().clone();

        let Some(v2) = migration::migrate_to_v2(card) else {
            return Err(DtError::invalid_record(format!("{id} has no expressions to migrate")));
        };

        replace_in_tx(&mut tx, &v2).await?;
        migrated += 1;
    }

    tx.commit().await?;

    tracing::info!(migrated, "Migrated legacy flashcards to v2");
    Ok(migrated)
}
