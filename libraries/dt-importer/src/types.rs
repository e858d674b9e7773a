//! Common types for the importer

use dt_core::types::{FlashcardId, NewMultiLanguageFlashcard};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the line-record importer does when one line cannot be imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineErrorPolicy {
    /// The first bad line fails the whole import; lines before it stay persisted
    #[default]
    Abort,

    /// Bad lines are recorded in the report and the import continues
    Skip,
}

/// Options for a line-record import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineImportOptions {
    /// Collection name written into every imported record
    pub collection: String,

    /// Only import lines whose `language` equals this code exactly
    pub language_filter: Option<String>,

    pub on_error: LineErrorPolicy,
}

impl LineImportOptions {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }

    pub fn with_language_filter(mut self, language: impl Into<String>) -> Self {
        self.language_filter = Some(language.into());
        self
    }

    pub fn with_error_policy(mut self, policy: LineErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }
}

/// Progress update during an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    /// Records imported so far
    pub imported: usize,

    /// Records that will be attempted. Lines skipped under [`LineErrorPolicy::Skip`]
    /// are taken off as they fail, so the final update is always complete.
    pub total: usize,
}

impl ImportProgress {
    pub fn is_complete(&self) -> bool {
        self.imported >= self.total
    }

    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        (self.imported as f32 / self.total as f32) * 100.0
    }
}

/// A line that was excluded under [`LineErrorPolicy::Skip`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 1-based line number in the JSONL input
    pub line_number: usize,
    pub reason: String,
}

/// Summary of a line-record import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineImportReport {
    /// Non-blank lines in the input
    pub total_lines: usize,

    /// Lines dropped by the language filter
    pub filtered_out: usize,

    /// Lines that entered the resolve phase
    pub candidates: usize,

    /// Ids of persisted records, in input order
    pub imported: Vec<FlashcardId>,

    pub skipped: Vec<SkippedLine>,
}

impl LineImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn summary_text(&self) -> String {
        format!(
            "Import complete: {} imported, {} skipped, {} filtered out",
            self.imported.len(),
            self.skipped.len(),
            self.filtered_out
        )
    }
}

/// Why a folder produced no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// No `image.<ext>` image in the folder
    MissingPrimaryImage,

    /// No language content files in the folder
    NoLanguageEntries,

    /// An entry could not be read from the archive
    Unreadable(String),

    /// The folder manifest or one of its files could not be fetched
    Unavailable(String),

    /// The grouped card broke a record invariant, e.g. an empty cover image
    Rejected(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrimaryImage => write!(f, "missing primary image"),
            Self::NoLanguageEntries => write!(f, "no language entries"),
            Self::Unreadable(detail) => write!(f, "unreadable entry: {detail}"),
            Self::Unavailable(detail) => write!(f, "unavailable: {detail}"),
            Self::Rejected(detail) => write!(f, "rejected: {detail}"),
        }
    }
}

/// One folder after grouping, before persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFolder {
    pub folder: String,
    pub draft: std::result::Result<NewMultiLanguageFlashcard, SkipReason>,
}

/// Per-folder result of an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FolderResult {
    Imported { id: FlashcardId },
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderOutcome {
    pub folder: String,
    pub result: FolderResult,
}

/// Summary of a folder-grouped or manifest import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderImportReport {
    /// One entry per folder, in folder order
    pub outcomes: Vec<FolderOutcome>,

    /// Set when the top-level manifest could not be loaded
    pub aborted: Option<String>,
}

impl FolderImportReport {
    pub fn imported(&self) -> impl Iterator<Item = &FlashcardId> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            FolderResult::Imported { id } => Some(id),
            FolderResult::Skipped { .. } => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            FolderResult::Skipped { reason } => Some((o.folder.as_str(), reason)),
            FolderResult::Imported { .. } => None,
        })
    }

    pub fn imported_count(&self) -> usize {
        self.imported().count()
    }

    pub fn summary_text(&self) -> String {
        let skipped = self.outcomes.len() - self.imported_count();
        match &self.aborted {
            Some(reason) => format!("Import aborted: {reason}"),
            None => format!(
                "Import complete: {} imported, {} folders skipped",
                self.imported_count(),
                skipped
            ),
        }
    }
}

/// Layout of an uploaded archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveSchema {
    /// `flashcards.jsonl` plus media files (v1 records)
    LineRecords,

    /// One folder per card (v2 records)
    FolderGrouped,
}

/// Summary of an uploaded-archive import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "snake_case")]
pub enum ArchiveImportReport {
    LineRecords(LineImportReport),
    FolderGrouped(FolderImportReport),
}

impl ArchiveImportReport {
    pub fn imported_count(&self) -> usize {
        match self {
            Self::LineRecords(report) => report.imported_count(),
            Self::FolderGrouped(report) => report.imported_count(),
        }
    }

    pub fn summary_text(&self) -> String {
        match self {
            Self::LineRecords(report) => report.summary_text(),
            Self::FolderGrouped(report) => report.summary_text(),
        }
    }
}
