//! Uploaded archive import with schema detection

use std::io::{Read, Seek};
use tracing::debug;

use crate::archive::ArchiveReader;
use crate::builder::RecordBuilder;
use crate::folders::import_folders;
use crate::lines::{LineRecordImporter, FLASHCARDS_JSONL};
use crate::types::{ArchiveImportReport, ArchiveSchema, ImportProgress, LineImportOptions};
use crate::Result;

/// An archive holding any `*flashcards.jsonl` file is a line-record archive; anything else
/// is read as folder-grouped.
pub fn detect_schema<R: Read + Seek>(archive: &ArchiveReader<R>) -> ArchiveSchema {
    if archive.files().any(|e| e.path.ends_with(FLASHCARDS_JSONL)) {
        ArchiveSchema::LineRecords
    } else {
        ArchiveSchema::FolderGrouped
    }
}

/// Import an uploaded archive.
///
/// `schema` forces a layout; `None` detects it. `options` only applies to line-record
/// archives, and `on_progress` is only called for them.
pub async fn import_archive<R, F>(
    archive: &mut ArchiveReader<R>,
    builder: &RecordBuilder<'_>,
    schema: Option<ArchiveSchema>,
    options: LineImportOptions,
    on_progress: F,
) -> Result<ArchiveImportReport>
where
    R: Read + Seek + Send,
    F: FnMut(ImportProgress) + Send,
{
    let schema = schema.unwrap_or_else(|| detect_schema(archive));
    debug!(?schema, "Importing archive");

    match schema {
        ArchiveSchema::LineRecords => LineRecordImporter::new(builder, options)
            .import_archive(archive, on_progress)
            .await
            .map(ArchiveImportReport::LineRecords),
        ArchiveSchema::FolderGrouped => import_folders(archive, builder)
            .await
            .map(ArchiveImportReport::FolderGrouped),
    }
}
