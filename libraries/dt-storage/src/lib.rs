//! Flashcard Storage
//!
//! `SQLite` persistence for flashcard records.
//!
//! Both schema generations live in one `flashcards` table, tagged by `schema_version`.
//! The full record is stored as JSON; the language codes it contributes are kept in a
//! separate JSON column so the available-languages query stays in SQL.
//!
//! # Example
//!
//! ```rust,no_run
//! use dt_storage::{create_pool, run_migrations, SqliteFlashcardStore};
//! use dt_core::FlashcardStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://flashcards.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteFlashcardStore::new(pool);
//! let languages = store.available_languages().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

pub mod flashcards;

pub use context::SqliteFlashcardStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://flashcards.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    // Importers write one record at a time
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool ready");

    Ok(pool)
}
