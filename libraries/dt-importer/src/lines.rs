//! Line-record (JSONL) import
//!
//! Each non-blank line is one v1 flashcard:
//!
//! ```json
//! {"language": "eng", "image": "cat.png", "expressions": ["cat", "cat.png"], "credits": "…"}
//! ```
//!
//! Lines go through two sequential passes. The filter pass reads only `language`, so
//! lines for other languages never reach media resolution. The resolve pass fetches media
//! and persists one record per line.
//!
//! Under [`LineErrorPolicy::Abort`] the first bad line fails the import, leaving earlier
//! lines persisted. Folder imports instead skip bad units; [`LineErrorPolicy::Skip`] gives
//! line imports the same behavior on request.

use dt_core::types::{ContentItem, Flashcard};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::io::{Read, Seek};
use tracing::{debug, info, warn};

use crate::archive::ArchiveReader;
use crate::builder::RecordBuilder;
use crate::classify::is_image_file;
use crate::error::ImportError;
use crate::resolver::{ArchiveMediaResolver, MediaResolver};
use crate::types::{
    ImportProgress, LineErrorPolicy, LineImportOptions, LineImportReport, SkippedLine,
};
use crate::Result;

/// Filename suffix that marks a line-record archive
pub const FLASHCARDS_JSONL: &str = "flashcards.jsonl";

#[derive(Debug, Deserialize)]
struct LanguageTag {
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LineEntry {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    expressions: Option<Vec<String>>,
    #[serde(default)]
    credits: Option<String>,
}

/// Non-blank lines with their 1-based line numbers
fn numbered_lines(jsonl: &str) -> Vec<(usize, &str)> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect()
}

/// Deserialize one line, which must be a JSON object.
///
/// Derived structs would also accept a JSON array by position.
fn parse_line<T: DeserializeOwned>(line: &str, number: usize) -> Result<T> {
    let malformed = |reason: String| ImportError::MalformedLine {
        line: number,
        reason,
    };

    match serde_json::from_str::<Value>(line).map_err(|e| malformed(e.to_string()))? {
        object @ Value::Object(_) => {
            serde_json::from_value(object).map_err(|e| malformed(e.to_string()))
        }
        _ => Err(malformed("expected a JSON object".to_string())),
    }
}

fn non_empty(value: Option<String>, line: usize, field: &'static str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ImportError::MissingField { line, field })
}

/// Imports JSONL line records through a [`RecordBuilder`]
pub struct LineRecordImporter<'a> {
    builder: &'a RecordBuilder<'a>,
    options: LineImportOptions,
}

impl<'a> LineRecordImporter<'a> {
    pub fn new(builder: &'a RecordBuilder<'a>, options: LineImportOptions) -> Self {
        Self { builder, options }
    }

    pub fn options(&self) -> &LineImportOptions {
        &self.options
    }

    /// Record a per-line failure, or propagate it under the abort policy
    fn handle_line_error(
        &self,
        report: &mut LineImportReport,
        line: usize,
        err: ImportError,
    ) -> Result<()> {
        if self.options.on_error == LineErrorPolicy::Skip && err.is_skippable() {
            warn!(line, error = %err, "Skipping line");
            report.skipped.push(SkippedLine {
                line_number: line,
                reason: err.to_string(),
            });
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Filter pass: keep lines whose `language` equals the filter exactly
    fn select_lines<'l>(
        &self,
        lines: Vec<(usize, &'l str)>,
        report: &mut LineImportReport,
    ) -> Result<Vec<(usize, &'l str)>> {
        let Some(filter) = self.options.language_filter.as_deref() else {
            return Ok(lines);
        };

        let mut selected = Vec::with_capacity(lines.len());
        for (number, line) in lines {
            match parse_line::<LanguageTag>(line, number) {
                Ok(tag) if tag.language.as_deref() == Some(filter) => {
                    selected.push((number, line));
                }
                Ok(_) => report.filtered_out += 1,
                Err(err) => self.handle_line_error(report, number, err)?,
            }
        }

        debug!(
            filter,
            selected = selected.len(),
            filtered_out = report.filtered_out,
            "Applied language filter"
        );

        Ok(selected)
    }

    /// Resolve pass for one line
    async fn import_line<R>(
        &self,
        number: usize,
        line: &str,
        resolver: &mut R,
    ) -> Result<Flashcard>
    where
        R: MediaResolver + ?Sized,
    {
        let entry: LineEntry = parse_line(line, number)?;

        let language = non_empty(entry.language, number, "language")?;
        let image_name = non_empty(entry.image, number, "image")?;
        let raw_expressions = entry
            .expressions
            .filter(|e| !e.is_empty())
            .ok_or(ImportError::MissingField {
                line: number,
                field: "expressions",
            })?;

        let image = resolver
            .resolve(&image_name)
            .await?
            .ok_or_else(|| ImportError::MissingMedia(image_name.clone()))?;

        let mut expressions = Vec::with_capacity(raw_expressions.len());
        for expression in raw_expressions {
            // Only names that classify as images and exist in the source become blobs
            let resolved = if is_image_file(&expression) {
                resolver.resolve(&expression).await?
            } else {
                None
            };

            expressions.push(match resolved {
                Some(bytes) => ContentItem::Image(bytes),
                None => ContentItem::Text(expression),
            });
        }

        self.builder
            .create_legacy(
                image,
                language,
                expressions,
                self.options.collection.clone(),
                entry.credits,
            )
            .await
    }

    /// Import every line of `jsonl`, resolving media through `resolver`.
    ///
    /// `on_progress` is called after each line of the resolve phase with the records
    /// imported so far and the lines entering that phase, minus lines skipped so far.
    pub async fn import<R, F>(
        &self,
        jsonl: &str,
        resolver: &mut R,
        mut on_progress: F,
    ) -> Result<LineImportReport>
    where
        R: MediaResolver + ?Sized,
        F: FnMut(ImportProgress) + Send,
    {
        let lines = numbered_lines(jsonl);
        let mut report = LineImportReport {
            total_lines: lines.len(),
            ..LineImportReport::default()
        };

        let selected = self.select_lines(lines, &mut report)?;
        report.candidates = selected.len();

        // Skipped lines leave the total so the last update is complete
        let mut total = report.candidates;
        for (number, line) in selected {
            match self.import_line(number, line, resolver).await {
                Ok(card) => report.imported.push(card.id().clone()),
                Err(err) => {
                    self.handle_line_error(&mut report, number, err)?;
                    total -= 1;
                }
            }
            on_progress(ImportProgress {
                imported: report.imported.len(),
                total,
            });
        }

        info!(
            collection = %self.options.collection,
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            filtered_out = report.filtered_out,
            "Line-record import finished"
        );

        Ok(report)
    }

    /// Import an uploaded line-record archive.
    ///
    /// The archive must hold a file whose path ends in `flashcards.jsonl`; media are looked
    /// up by basename. A missing JSONL fails before anything is persisted.
    pub async fn import_archive<R, F>(
        &self,
        archive: &mut ArchiveReader<R>,
        on_progress: F,
    ) -> Result<LineImportReport>
    where
        R: Read + Seek + Send,
        F: FnMut(ImportProgress) + Send,
    {
        let candidates = archive.find_by_suffix(FLASHCARDS_JSONL);
        let Some(jsonl_entry) = candidates.first() else {
            return Err(ImportError::MissingRequiredFile(format!(
                "{FLASHCARDS_JSONL} not found in archive"
            )));
        };

        if candidates.len() > 1 {
            warn!(
                using = %jsonl_entry.path,
                found = candidates.len(),
                "Archive holds several flashcards.jsonl files; using the first"
            );
        }

        let jsonl = archive.read_text(jsonl_entry.index)?;
        let mut resolver = ArchiveMediaResolver::new(archive);
        self.import(&jsonl, &mut resolver, on_progress).await
    }
}
