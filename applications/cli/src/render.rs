//! Plain-text rendering of records and import reports

use dt_core::types::{ContentItem, Flashcard};
use dt_importer::{ArchiveImportReport, FolderImportReport, LineImportReport};

pub fn content(item: &ContentItem) -> String {
    match item {
        ContentItem::Text(text) => format!("{text:?}"),
        ContentItem::Image(bytes) => format!("<image, {} bytes>", bytes.len()),
    }
}

/// One line per record for `list`
pub fn summary_line(card: &Flashcard) -> String {
    format!(
        "{}  {}  {}",
        card.id(),
        card.schema_version(),
        card.language_codes().join(",")
    )
}

/// Full description for `show`
pub fn describe(card: &Flashcard) -> Vec<String> {
    let mut lines = vec![
        format!("id:       {}", card.id()),
        format!("schema:   {}", card.schema_version()),
        format!("created:  {}", card.created_at().to_rfc3339()),
        format!("image:    {} bytes", card.image().len()),
    ];

    match card {
        Flashcard::V1(card) => {
            lines.push(format!("language: {}", card.language));
            lines.push(format!("collection: {}", card.collection));
            if let Some(credits) = &card.credits {
                lines.push(format!("credits:  {credits}"));
            }
            for (i, expression) in card.expressions.iter().enumerate() {
                lines.push(format!("  [{}] {}", i + 1, content(expression)));
            }
        }
        Flashcard::V2(card) => {
            for (code, item) in &card.languages {
                lines.push(format!("  {code}: {}", content(item)));
            }
        }
    }

    lines
}

pub fn line_report(report: &LineImportReport) -> Vec<String> {
    let mut lines = vec![report.summary_text()];
    lines.extend(
        report
            .skipped
            .iter()
            .map(|s| format!("  line {}: {}", s.line_number, s.reason)),
    );
    lines
}

pub fn folder_report(report: &FolderImportReport) -> Vec<String> {
    let mut lines = vec![report.summary_text()];
    lines.extend(
        report
            .skipped()
            .map(|(folder, reason)| format!("  {folder}: {reason}")),
    );
    lines
}

pub fn archive_report(report: &ArchiveImportReport) -> Vec<String> {
    match report {
        ArchiveImportReport::LineRecords(report) => line_report(report),
        ArchiveImportReport::FolderGrouped(report) => folder_report(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_core::types::{NewLegacyFlashcard, NewMultiLanguageFlashcard};
    use dt_importer::{FolderOutcome, FolderResult, SkipReason, SkippedLine};
    use std::collections::BTreeMap;

    #[test]
    fn test_describe_legacy_card() {
        let draft = NewLegacyFlashcard {
            image: vec![1, 2, 3],
            language: "eng".into(),
            expressions: vec![ContentItem::text("cat"), ContentItem::image(vec![9; 4])],
            collection: "Animals".into(),
            credits: None,
        };
        let card = Flashcard::from_draft(draft.into()).unwrap();

        let lines = describe(&card);
        assert!(lines.contains(&"image:    3 bytes".to_string()));
        assert!(lines.contains(&"language: eng".to_string()));
        assert!(lines.contains(&"  [1] \"cat\"".to_string()));
        assert!(lines.contains(&"  [2] <image, 4 bytes>".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("credits")));
    }

    #[test]
    fn test_summary_line_lists_languages() {
        let mut languages = BTreeMap::new();
        languages.insert("fra".to_string(), ContentItem::text("chat"));
        languages.insert("eng".to_string(), ContentItem::text("cat"));
        let draft = NewMultiLanguageFlashcard {
            image: vec![1],
            languages,
        };
        let card = Flashcard::from_draft(draft.into()).unwrap();

        let line = summary_line(&card);
        assert!(line.starts_with("flashcard:"));
        assert!(line.ends_with("  v2  eng,fra"));
    }

    #[test]
    fn test_reports_list_skips() {
        let lines = line_report(&LineImportReport {
            total_lines: 2,
            skipped: vec![SkippedLine {
                line_number: 2,
                reason: "bad".into(),
            }],
            ..LineImportReport::default()
        });
        assert_eq!(lines[1], "  line 2: bad");

        let lines = folder_report(&FolderImportReport {
            outcomes: vec![FolderOutcome {
                folder: "card9".into(),
                result: FolderResult::Skipped {
                    reason: SkipReason::NoLanguageEntries,
                },
            }],
            aborted: None,
        });
        assert_eq!(lines[1], "  card9: no language entries");
    }
}
