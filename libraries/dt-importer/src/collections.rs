//! Remote collection catalog
//!
//! ```text
//! GET <data-root>/collections.json                   -> {"animals": "Animals", ...}
//! GET <data-root>/collections/<id>/languages.txt     -> one code per line
//! GET <data-root>/collections/<id>/flashcards.jsonl  -> line records
//! GET <data-root>/collections/<id>/<media file>
//! ```
//!
//! Fetch failures propagate to the caller.

use std::collections::BTreeMap;
use tracing::info;

use crate::builder::RecordBuilder;
use crate::lines::{LineRecordImporter, FLASHCARDS_JSONL};
use crate::remote::RemoteClient;
use crate::resolver::RemoteMediaResolver;
use crate::types::{ImportProgress, LineImportOptions, LineImportReport};
use crate::Result;

pub const COLLECTIONS_FILE: &str = "collections.json";
pub const LANGUAGES_FILE: &str = "languages.txt";
const COLLECTIONS_DIR: &str = "collections";

/// Collections served below one data root
pub struct CollectionCatalog {
    client: RemoteClient,
}

impl CollectionCatalog {
    /// `client` must be rooted at the data root
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    fn collection_client(&self, collection_id: &str) -> Result<RemoteClient> {
        self.client
            .scoped(&format!("{COLLECTIONS_DIR}/{collection_id}"))
    }

    /// Collection id → display name
    pub async fn fetch_metadata(&self) -> Result<BTreeMap<String, String>> {
        self.client.get_json(COLLECTIONS_FILE).await
    }

    /// Language codes a collection offers, blank lines dropped
    pub async fn fetch_languages(&self, collection_id: &str) -> Result<Vec<String>> {
        let text = self
            .collection_client(collection_id)?
            .get_text(LANGUAGES_FILE)
            .await?;

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Import a collection's line records, fetching media one file at a time.
    ///
    /// `options.collection` is the display name stored on each record.
    pub async fn import_collection<F>(
        &self,
        collection_id: &str,
        builder: &RecordBuilder<'_>,
        options: LineImportOptions,
        on_progress: F,
    ) -> Result<LineImportReport>
    where
        F: FnMut(ImportProgress) + Send,
    {
        let client = self.collection_client(collection_id)?;
        let jsonl = client.get_text(FLASHCARDS_JSONL).await?;

        info!(
            collection_id,
            bytes = jsonl.len(),
            "Fetched collection line records"
        );

        let mut resolver = RemoteMediaResolver::new(client);
        LineRecordImporter::new(builder, options)
            .import(&jsonl, &mut resolver, on_progress)
            .await
    }
}
