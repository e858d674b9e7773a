//! Folder-grouped archive import
//!
//! ```text
//! card1/image.png   cover image
//! card1/eng.txt     "hello"
//! card1/fra.jpg     image value for "fra"
//! ```
//!
//! Files are grouped by the directory directly holding them; files at the archive root
//! belong to no folder and are ignored. Incomplete folders are reported as skipped, never
//! as errors.

use std::collections::BTreeMap;
use std::io::{Read, Seek};
use tracing::{info, warn};

use crate::archive::{ArchiveEntry, ArchiveReader};
use crate::builder::RecordBuilder;
use crate::grouping::{role_of, EntryRole, FolderDraft};
use crate::types::{FolderImportReport, FolderOutcome, FolderResult, ParsedFolder, SkipReason};
use crate::Result;

/// File entries keyed by their parent directory, in path order
fn group_by_folder<R: Read + Seek>(
    archive: &ArchiveReader<R>,
) -> BTreeMap<String, Vec<ArchiveEntry>> {
    let mut folders: BTreeMap<String, Vec<ArchiveEntry>> = BTreeMap::new();

    for entry in archive.files() {
        match entry.parent_dir() {
            Some(dir) => folders.entry(dir.to_string()).or_default().push(entry.clone()),
            None => tracing::debug!(path = %entry.path, "Ignoring root-level entry"),
        }
    }

    folders
}

fn parse_folder<R: Read + Seek>(
    archive: &mut ArchiveReader<R>,
    entries: &[ArchiveEntry],
) -> std::result::Result<dt_core::types::NewMultiLanguageFlashcard, SkipReason> {
    let mut draft = FolderDraft::new();

    for entry in entries {
        let role = role_of(entry.file_name());
        if role == EntryRole::Ignored {
            continue;
        }

        let content = archive
            .read_bytes(entry.index)
            .map_err(|e| SkipReason::Unreadable(format!("{}: {e}", entry.path)))?;
        draft.apply(role, content);
    }

    draft.finish()
}

/// Group an archive into one draft (or skip reason) per folder, without persisting
pub fn parse_folders<R: Read + Seek>(archive: &mut ArchiveReader<R>) -> Vec<ParsedFolder> {
    group_by_folder(archive)
        .into_iter()
        .map(|(folder, entries)| {
            let draft = parse_folder(archive, &entries);
            ParsedFolder { folder, draft }
        })
        .collect()
}

/// Persist parsed folders one at a time.
///
/// Drafts the builder rejects are skipped; storage failures stop the import.
pub(crate) async fn persist_folders(
    builder: &RecordBuilder<'_>,
    parsed: Vec<ParsedFolder>,
    report: &mut FolderImportReport,
) -> Result<()> {
    for ParsedFolder { folder, draft } in parsed {
        let result = match draft {
            Ok(draft) => match builder
                .create_multi_language(draft.image, draft.languages)
                .await
            {
                Ok(card) => FolderResult::Imported {
                    id: card.id().clone(),
                },
                Err(e) if e.is_skippable() => {
                    warn!(folder = %folder, error = %e, "Skipping folder");
                    FolderResult::Skipped {
                        reason: SkipReason::Rejected(e.to_string()),
                    }
                }
                Err(e) => return Err(e),
            },
            Err(reason) => {
                warn!(folder = %folder, reason = %reason, "Skipping folder");
                FolderResult::Skipped { reason }
            }
        };

        report.outcomes.push(FolderOutcome { folder, result });
    }

    Ok(())
}

/// Import a folder-grouped archive as v2 records
pub async fn import_folders<R: Read + Seek>(
    archive: &mut ArchiveReader<R>,
    builder: &RecordBuilder<'_>,
) -> Result<FolderImportReport> {
    let parsed = parse_folders(archive);

    let mut report = FolderImportReport::default();
    persist_folders(builder, parsed, &mut report).await?;

    info!(
        imported = report.imported_count(),
        folders = report.outcomes.len(),
        "Folder import finished"
    );

    Ok(report)
}
