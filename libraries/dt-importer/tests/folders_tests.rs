//! Folder-grouped archive import tests


use dt_core::types::{ContentItem, Flashcard, SchemaVersion};
use dt_core::FlashcardStore;
use dt_importer::folders::{import_folders, parse_folders};
use dt_importer::{FolderResult, RecordBuilder, SkipReason};
use test_helpers::{open_zip, TestDb};

const COVER: &[u8] = b"cover-png";
const FRA: &[u8] = b"fra-jpg";

fn multi(card: &Flashcard) -> &dt_core::MultiLanguageFlashcard {
    match card {
        Flashcard::V2(multi) => multi,
        Flashcard::V1(_) => panic!("expected a v2 record"),
    }
}

#[tokio::test]
async fn test_folder_becomes_multi_language_record() {
    let db = TestDb::new().await;
    let store = db.store();
    let builder = RecordBuilder::new(&store);

    let mut archive = open_zip(&[
        ("card1/", b""),
        ("card1/image.png", COVER),
        ("card1/eng.txt", b"hello\n"),
        ("card1/fra.jpg", FRA),
    ]);

    let report = import_folders(&mut archive, &builder).await.unwrap();
    assert_eq!(report.imported_count(), 1);
    assert_eq!(report.outcomes[0].folder, "card1");

    let id = report.imported().next().unwrap().clone();
    let card = store.require(&id).await.unwrap();
    assert_eq!(card.schema_version(), SchemaVersion::V2);

    let card = multi(&card);
    assert_eq!(card.image, COVER);
    assert_eq!(card.languages.len(), 2);
    assert_eq!(card.languages["eng"], ContentItem::text("hello"));
    assert_eq!(card.languages["fra"], ContentItem::image(FRA));

    assert_eq!(store.available_languages().await.unwrap(), vec!["eng", "fra"]);
}

#[tokio::test]
async fn test_incomplete_folders_are_skipped() {
    let db = TestDb::new().await;
    let store = db.store();
    let builder = RecordBuilder::new(&store);

    let mut archive = open_zip(&[
        ("a_no_image/eng.txt", b"cat"),
        ("b_no_language/image.png", COVER),
        ("b_no_language/notes.md", b"ignored"),
        ("c_ok/image.jpg", COVER),
        ("c_ok/deu.txt", b"Katze"),
    ]);

    let report = import_folders(&mut archive, &builder).await.unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.imported_count(), 1);
    assert_eq!(
        report.skipped().collect::<Vec<_>>(),
        vec![
            ("a_no_image", &SkipReason::MissingPrimaryImage),
            ("b_no_language", &SkipReason::NoLanguageEntries),
        ]
    );
    assert!(matches!(
        report.outcomes[2].result,
        FolderResult::Imported { .. }
    ));

    // Exactly one record per complete folder
    assert_eq!(store.all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_root_level_files_are_ignored() {
    let db = TestDb::new().await;
    let store = db.store();
    let builder = RecordBuilder::new(&store);

    let mut archive = open_zip(&[
        ("image.png", COVER),
        ("eng.txt", b"orphan"),
        ("card/image.png", COVER),
        ("card/spa.txt", b"hola"),
    ]);

    let report = import_folders(&mut archive, &builder).await.unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].folder, "card");
    assert_eq!(store.available_languages().await.unwrap(), vec!["spa"]);
}

#[tokio::test]
async fn test_nested_folders_with_same_name_stay_apart() {
    let db = TestDb::new().await;
    let store = db.store();
    let builder = RecordBuilder::new(&store);

    let mut archive = open_zip(&[
        ("set1/card/image.png", b"one"),
        ("set1/card/eng.txt", b"one"),
        ("set2/card/image.png", b"two"),
        ("set2/card/eng.txt", b"two"),
    ]);

    let report = import_folders(&mut archive, &builder).await.unwrap();

    let folders: Vec<&str> = report.outcomes.iter().map(|o| o.folder.as_str()).collect();
    assert_eq!(folders, vec!["set1/card", "set2/card"]);
    assert_eq!(report.imported_count(), 2);
}

#[test]
fn test_parse_keeps_last_image_and_last_language_file() {
    let mut archive = open_zip(&[
        ("card/image.png", b"first"),
        ("card/eng.txt", b"  text value  "),
        ("card/image.webp", b"second"),
        ("card/eng.png", b"image value"),
    ]);

    let parsed = parse_folders(&mut archive);
    assert_eq!(parsed.len(), 1);

    let draft = parsed[0].draft.as_ref().unwrap();
    assert_eq!(draft.image, b"second");
    assert_eq!(draft.languages["eng"], ContentItem::image(b"image value".to_vec()));
}

#[test]
fn test_parse_trims_text_values() {
    let mut archive = open_zip(&[("card/image.gif", COVER), ("card/ita.txt", b"\n ciao \r\n")]);

    let parsed = parse_folders(&mut archive);
    let draft = parsed[0].draft.as_ref().unwrap();
    assert_eq!(draft.languages["ita"], ContentItem::text("ciao"));
}

#[tokio::test]
async fn test_empty_archive_imports_nothing() {
    let db = TestDb::new().await;
    let store = db.store();
    let builder = RecordBuilder::new(&store);

    let mut archive = open_zip(&[("readme.txt", b"nothing here")]);
    let report = import_folders(&mut archive, &builder).await.unwrap();

    assert!(report.outcomes.is_empty());
    assert!(report.aborted.is_none());
    assert_eq!(store.all().await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_empty_cover_image_is_rejected_not_fatal() {
    let db = TestDb::new().await;
    let store = db.store();
    let builder = RecordBuilder::new(&store);

    let mut archive = open_zip(&[
        ("blank/image.png", b""),
        ("blank/eng.txt", b"nothing"),
        ("good/image.png", COVER),
        ("good/eng.txt", b"something"),
    ]);

    let report = import_folders(&mut archive, &builder).await.unwrap();

    assert_eq!(report.imported_count(), 1);
    let skipped: Vec<_> = report.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].0, "blank");
    assert!(matches!(skipped[0].1, SkipReason::Rejected(_)));
}
