//! Remote collection and manifest-tree import tests.
//!
//! A mock server stands in for the static data host.


use dt_core::types::{ContentItem, Flashcard};
use dt_core::FlashcardStore;
use dt_importer::remote::DEFAULT_TIMEOUT;
use dt_importer::{
    CollectionCatalog, ErrorKind, ImportError, LineImportOptions, ManifestImporter, RecordBuilder,
    RemoteClient, SkipReason,
};
use test_helpers::TestDb;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CAT_PNG: &[u8] = b"remote-cat";

async fn mount_bytes(server: &MockServer, at: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

async fn mount_text(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn client_at(server: &MockServer, root: &str) -> RemoteClient {
    RemoteClient::new(&format!("{}/{root}", server.uri()), DEFAULT_TIMEOUT).unwrap()
}

// =============================================================================
// Collection Catalog Tests
// =============================================================================

mod catalog {
    use super::*;

    #[tokio::test]
    async fn test_fetch_metadata() {
        let server = MockServer::start().await;
        mount_text(
            &server,
            "/data/collections.json",
            r#"{"animals": "Animals", "food": "Food & Drink"}"#,
        )
        .await;

        let catalog = CollectionCatalog::new(client_at(&server, "data"));
        let metadata = catalog.fetch_metadata().await.unwrap();

        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata["food"], "Food & Drink");
    }

    #[tokio::test]
    async fn test_fetch_metadata_rejects_invalid_json() {
        let server = MockServer::start().await;
        mount_text(&server, "/data/collections.json", "[1, 2").await;

        let catalog = CollectionCatalog::new(client_at(&server, "data"));
        let err = catalog.fetch_metadata().await.unwrap_err();

        assert!(matches!(err, ImportError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_fetch_languages_drops_blank_lines() {
        let server = MockServer::start().await;
        mount_text(
            &server,
            "/data/collections/animals/languages.txt",
            "eng\r\nfra\n\n deu \n",
        )
        .await;

        let catalog = CollectionCatalog::new(client_at(&server, "data"));
        let languages = catalog.fetch_languages("animals").await.unwrap();

        assert_eq!(languages, vec!["eng", "fra", "deu"]);
    }

    #[tokio::test]
    async fn test_missing_collection_is_remote_unavailable() {
        let server = MockServer::start().await;

        let catalog = CollectionCatalog::new(client_at(&server, "data"));
        let err = catalog.fetch_languages("nope").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RemoteUnavailable);
        assert!(err.to_string().contains("404"));
    }
}

// =============================================================================
// Remote Collection Import Tests
// =============================================================================

mod collection_import {
    use super::*;

    #[tokio::test]
    async fn test_import_collection_fetches_media() {
        let server = MockServer::start().await;
        let jsonl = [
            r#"{"language":"eng","image":"cat.png","expressions":["cat","cat.png"]}"#,
            r#"{"language":"fra","image":"dog.png","expressions":["chien"]}"#,
        ]
        .join("\n");
        mount_text(&server, "/data/collections/animals/flashcards.jsonl", &jsonl).await;
        mount_bytes(&server, "/data/collections/animals/cat.png", CAT_PNG).await;
        // dog.png is never mounted: the fra line must not be resolved

        let db = TestDb::new().await;
        let store = db.store();
        let builder = RecordBuilder::new(&store);
        let catalog = CollectionCatalog::new(client_at(&server, "data"));

        let options = LineImportOptions::new("Animals").with_language_filter("eng");
        let report = catalog
            .import_collection("animals", &builder, options, |_| {})
            .await
            .unwrap();

        assert_eq!(report.filtered_out, 1);
        assert_eq!(report.imported_count(), 1);

        let card = store.require(&report.imported[0]).await.unwrap();
        let Flashcard::V1(card) = card else {
            panic!("expected a v1 record");
        };
        assert_eq!(card.image, CAT_PNG);
        assert_eq!(card.collection, "Animals");
        assert_eq!(
            card.expressions,
            vec![ContentItem::text("cat"), ContentItem::image(CAT_PNG)]
        );
    }

    #[tokio::test]
    async fn test_media_fetch_failure_propagates() {
        let server = MockServer::start().await;
        mount_text(
            &server,
            "/data/collections/animals/flashcards.jsonl",
            r#"{"language":"eng","image":"gone.png","expressions":["gone"]}"#,
        )
        .await;

        let db = TestDb::new().await;
        let store = db.store();
        let builder = RecordBuilder::new(&store);
        let catalog = CollectionCatalog::new(client_at(&server, "data"));

        let err = catalog
            .import_collection("animals", &builder, LineImportOptions::new("Animals"), |_| {})
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RemoteUnavailable);
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_jsonl_propagates() {
        let server = MockServer::start().await;

        let db = TestDb::new().await;
        let store = db.store();
        let builder = RecordBuilder::new(&store);
        let catalog = CollectionCatalog::new(client_at(&server, "data"));

        let result = catalog
            .import_collection("animals", &builder, LineImportOptions::new("Animals"), |_| {})
            .await;

        assert!(matches!(result, Err(ImportError::RemoteUnavailable { .. })));
    }
}

// =============================================================================
// Manifest Tree Tests
// =============================================================================

mod manifest {
    use super::*;

    #[tokio::test]
    async fn test_manifest_tree_import() {
        let server = MockServer::start().await;
        mount_text(&server, "/tree/manifest.json", r#"["card1", "card2", "card3"]"#).await;

        mount_text(
            &server,
            "/tree/card1/manifest.json",
            r#"["image.png", "eng.txt", "fra.jpg", "notes.md"]"#,
        )
        .await;
        mount_bytes(&server, "/tree/card1/image.png", b"cover").await;
        mount_text(&server, "/tree/card1/eng.txt", " hello \n").await;
        mount_bytes(&server, "/tree/card1/fra.jpg", b"fra-image").await;

        // card2 has no manifest at all
        mount_text(&server, "/tree/card3/manifest.json", r#"["eng.txt"]"#).await;
        mount_text(&server, "/tree/card3/eng.txt", "lonely").await;

        let db = TestDb::new().await;
        let store = db.store();
        let builder = RecordBuilder::new(&store);

        let report = ManifestImporter::new(client_at(&server, "tree"))
            .import(&builder)
            .await
            .unwrap();

        assert!(report.aborted.is_none());
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.imported_count(), 1);

        let skipped: Vec<_> = report.skipped().collect();
        assert_eq!(skipped[0].0, "card2");
        assert!(matches!(skipped[0].1, SkipReason::Unavailable(_)));
        assert_eq!(skipped[1], ("card3", &SkipReason::MissingPrimaryImage));

        let id = report.imported().next().unwrap().clone();
        let Flashcard::V2(card) = store.require(&id).await.unwrap() else {
            panic!("expected a v2 record");
        };
        assert_eq!(card.image, b"cover");
        assert_eq!(card.languages["eng"], ContentItem::text("hello"));
        assert_eq!(card.languages["fra"], ContentItem::image(b"fra-image".to_vec()));

        // Unrecognized files are never fetched
        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| !r.url.path().ends_with("notes.md")));
    }

    #[tokio::test]
    async fn test_folder_file_failure_skips_folder() {
        let server = MockServer::start().await;
        mount_text(&server, "/tree/manifest.json", r#"["card1"]"#).await;
        mount_text(&server, "/tree/card1/manifest.json", r#"["image.png", "eng.txt"]"#).await;
        mount_bytes(&server, "/tree/card1/image.png", b"cover").await;

        let db = TestDb::new().await;
        let store = db.store();
        let builder = RecordBuilder::new(&store);

        let report = ManifestImporter::new(client_at(&server, "tree"))
            .import(&builder)
            .await
            .unwrap();

        assert_eq!(report.imported_count(), 0);
        assert!(matches!(
            report.outcomes[0].result,
            dt_importer::FolderResult::Skipped {
                reason: SkipReason::Unavailable(_)
            }
        ));
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_top_level_manifest_aborts_quietly() {
        let server = MockServer::start().await;

        let db = TestDb::new().await;
        let store = db.store();
        let builder = RecordBuilder::new(&store);

        let report = ManifestImporter::new(client_at(&server, "tree"))
            .import(&builder)
            .await
            .unwrap();

        assert!(report.aborted.is_some());
        assert!(report.outcomes.is_empty());
        assert!(report.summary_text().starts_with("Import aborted"));
    }

    #[tokio::test]
    async fn test_load_without_persisting() {
        let server = MockServer::start().await;
        mount_text(&server, "/tree/manifest.json", r#"["only"]"#).await;
        mount_text(&server, "/tree/only/manifest.json", r#"["image.svg", "jpn.txt"]"#).await;
        mount_bytes(&server, "/tree/only/image.svg", b"<svg/>").await;
        mount_text(&server, "/tree/only/jpn.txt", "neko").await;

        let load = ManifestImporter::new(client_at(&server, "tree")).load().await;

        assert!(load.aborted.is_none());
        assert_eq!(load.folders.len(), 1);
        let draft = load.folders[0].draft.as_ref().unwrap();
        assert_eq!(draft.languages["jpn"], ContentItem::text("neko"));
    }
}
