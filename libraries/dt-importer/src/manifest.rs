//! Remote manifest-tree import
//!
//! The remote counterpart of a folder-grouped archive:
//!
//! ```text
//! GET <root>/manifest.json                -> ["card1", "card2"]
//! GET <root>/card1/manifest.json          -> ["image.png", "eng.txt", "fra.jpg"]
//! GET <root>/card1/<file>
//! ```
//!
//! Fetch failures never escape: a failing folder is skipped, a failing top-level manifest
//! ends the load with whatever was gathered.

use dt_core::types::NewMultiLanguageFlashcard;
use tracing::{debug, info, warn};

use crate::builder::RecordBuilder;
use crate::folders::persist_folders;
use crate::grouping::{role_of, EntryRole, FolderDraft};
use crate::remote::RemoteClient;
use crate::types::{FolderImportReport, ParsedFolder, SkipReason};
use crate::Result;

/// Name of the listing file at every level of the tree
pub const MANIFEST_FILE: &str = "manifest.json";

/// Folders gathered from a manifest tree
#[derive(Debug, Default)]
pub struct ManifestLoad {
    pub folders: Vec<ParsedFolder>,

    /// Set when the top-level manifest could not be loaded
    pub aborted: Option<String>,
}

/// Reads a manifest tree rooted at one URL
pub struct ManifestImporter {
    client: RemoteClient,
}

impl ManifestImporter {
    /// `client` must be rooted at the directory holding the top-level `manifest.json`
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    async fn load_folder(
        &self,
        folder: &str,
    ) -> std::result::Result<NewMultiLanguageFlashcard, SkipReason> {
        let unavailable = |e: crate::ImportError| SkipReason::Unavailable(e.to_string());

        let files: Vec<String> = self
            .client
            .get_json(&format!("{folder}/{MANIFEST_FILE}"))
            .await
            .map_err(unavailable)?;

        let mut draft = FolderDraft::new();
        for file in files {
            let role = role_of(&file);
            if role == EntryRole::Ignored {
                debug!(folder, file = %file, "Ignoring unrecognized file");
                continue;
            }

            let content = self
                .client
                .get_bytes(&format!("{folder}/{file}"))
                .await
                .map_err(unavailable)?;
            draft.apply(role, content);
        }

        draft.finish()
    }

    /// Fetch and group every folder, sequentially. Never fails.
    pub async fn load(&self) -> ManifestLoad {
        let folders: Vec<String> = match self.client.get_json(MANIFEST_FILE).await {
            Ok(folders) => folders,
            Err(e) => {
                warn!(error = %e, "Could not load top-level manifest");
                return ManifestLoad {
                    folders: Vec::new(),
                    aborted: Some(e.to_string()),
                };
            }
        };

        let mut load = ManifestLoad::default();
        for folder in folders {
            let draft = self.load_folder(&folder).await;
            if let Err(reason) = &draft {
                debug!(folder = %folder, reason = %reason, "Folder produced no card");
            }
            load.folders.push(ParsedFolder { folder, draft });
        }

        load
    }

    /// Load the tree and persist every complete folder.
    ///
    /// Only storage failures are returned as errors.
    pub async fn import(&self, builder: &RecordBuilder<'_>) -> Result<FolderImportReport> {
        let ManifestLoad { folders, aborted } = self.load().await;

        let mut report = FolderImportReport {
            outcomes: Vec::with_capacity(folders.len()),
            aborted,
        };
        persist_folders(builder, folders, &mut report).await?;

        info!(
            root = %self.client.base_url(),
            imported = report.imported_count(),
            folders = report.outcomes.len(),
            "Manifest import finished"
        );

        Ok(report)
    }
}
