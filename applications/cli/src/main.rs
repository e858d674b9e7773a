/// dt - import flashcard collections into a local store
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dt_cli::{progress::ImportProgressBar, render, DtConfig};
use dt_core::{FlashcardId, FlashcardStore};
use dt_importer::{
    import_archive, ArchiveReader, ArchiveSchema, CollectionCatalog, LineImportOptions,
    ManifestImporter, RecordBuilder, RemoteClient,
};
use dt_storage::SqliteFlashcardStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dt")]
#[command(about = "Import and inspect flashcard collections", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import an uploaded ZIP archive
    ImportArchive {
        /// Archive path
        path: PathBuf,
        /// Collection name stored on line records
        #[arg(long, default_value = "Uploaded")]
        collection: String,
        /// Only import line records in this language
        #[arg(short, long)]
        language: Option<String>,
        /// Archive layout
        #[arg(long, value_enum, default_value_t = SchemaArg::Auto)]
        schema: SchemaArg,
    },
    /// Import a collection from the remote data root
    ImportCollection {
        /// Collection id
        id: String,
        /// Only import records in this language
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Import the remote manifest tree
    ImportManifest {
        /// Manifest root, overriding the configured one
        #[arg(long)]
        root: Option<String>,
    },
    /// List remote collections
    Collections,
    /// List languages in the store, or offered by a remote collection
    Languages {
        /// Remote collection id
        #[arg(long)]
        collection: Option<String>,
    },
    /// List stored flashcards
    List,
    /// Show one flashcard
    Show {
        /// Flashcard id
        id: String,
    },
    /// Delete one flashcard
    Delete {
        /// Flashcard id
        id: String,
    },
    /// Rewrite every v1 record as v2
    Migrate,
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaArg {
    Auto,
    Lines,
    Folders,
}

impl From<SchemaArg> for Option<ArchiveSchema> {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Auto => None,
            SchemaArg::Lines => Some(ArchiveSchema::LineRecords),
            SchemaArg::Folders => Some(ArchiveSchema::FolderGrouped),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dt=info,dt_importer=info,dt_storage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = DtConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::ImportArchive {
            path,
            collection,
            language,
            schema,
        } => {
            let store = open_store(&config).await?;
            import_archive_file(&config, &store, &path, collection, language, schema).await?;
        }
        Commands::ImportCollection { id, language } => {
            let store = open_store(&config).await?;
            import_collection(&config, &store, &id, language).await?;
        }
        Commands::ImportManifest { root } => {
            let store = open_store(&config).await?;
            let root = root.unwrap_or_else(|| config.remote.manifest_root.clone());
            import_manifest(&config, &store, &root).await?;
        }
        Commands::Collections => {
            let metadata = catalog(&config)?.fetch_metadata().await?;
            for (id, name) in metadata {
                println!("{id}\t{name}");
            }
        }
        Commands::Languages { collection } => {
            let languages = match collection {
                Some(id) => catalog(&config)?.fetch_languages(&id).await?,
                None => open_store(&config).await?.available_languages().await?,
            };
            for code in languages {
                println!("{code}");
            }
        }
        Commands::List => {
            let store = open_store(&config).await?;
            for card in store.all().await? {
                println!("{}", render::summary_line(&card));
            }
        }
        Commands::Show { id } => {
            let store = open_store(&config).await?;
            let card = store.require(&FlashcardId::parse(&id)?).await?;
            for line in render::describe(&card) {
                println!("{line}");
            }
        }
        Commands::Delete { id } => {
            let store = open_store(&config).await?;
            store.delete(&FlashcardId::parse(&id)?).await?;
            println!("Deleted {id}");
        }
        Commands::Migrate => {
            let store = open_store(&config).await?;
            let migrated = store.migrate_legacy_to_v2().await?;
            println!("Migrated {migrated} flashcards to v2");
        }
    }

    Ok(())
}

async fn open_store(config: &DtConfig) -> anyhow::Result<SqliteFlashcardStore> {
    let pool = dt_storage::create_pool(&config.storage.database_url)
        .await
        .with_context(|| format!("Failed to open {}", config.storage.database_url))?;
    dt_storage::run_migrations(&pool).await?;

    tracing::debug!("Database connected");
    Ok(SqliteFlashcardStore::new(pool))
}

fn catalog(config: &DtConfig) -> anyhow::Result<CollectionCatalog> {
    let client = RemoteClient::new(&config.remote.data_root, config.remote.timeout())?;
    Ok(CollectionCatalog::new(client))
}

fn line_options(
    config: &DtConfig,
    collection: String,
    language: Option<String>,
) -> LineImportOptions {
    let options = LineImportOptions::new(collection).with_error_policy(config.import.line_errors);
    match language {
        Some(language) => options.with_language_filter(language),
        None => options,
    }
}

async fn import_archive_file(
    config: &DtConfig,
    store: &SqliteFlashcardStore,
    path: &Path,
    collection: String,
    language: Option<String>,
    schema: SchemaArg,
) -> anyhow::Result<()> {
    let mut archive = ArchiveReader::open(path)
        .with_context(|| format!("Failed to open archive {}", path.display()))?;

    tracing::info!(path = %path.display(), entries = archive.entries().len(), "Importing archive");

    let builder = RecordBuilder::new(store);
    let bar = ImportProgressBar::new("Importing flashcards");
    let report = import_archive(
        &mut archive,
        &builder,
        schema.into(),
        line_options(config, collection, language),
        |progress| bar.update(progress),
    )
    .await;
    bar.finish();

    for line in render::archive_report(&report?) {
        println!("{line}");
    }
    Ok(())
}

async fn import_collection(
    config: &DtConfig,
    store: &SqliteFlashcardStore,
    id: &str,
    language: Option<String>,
) -> anyhow::Result<()> {
    let catalog = catalog(config)?;

    // Records carry the display name, not the id
    let metadata = catalog.fetch_metadata().await?;
    let name = metadata.get(id).cloned().unwrap_or_else(|| {
        tracing::warn!(collection_id = id, "Collection not listed in metadata; using its id");
        id.to_string()
    });

    let builder = RecordBuilder::new(store);
    let bar = ImportProgressBar::new(format!("Importing {name}"));
    let report = catalog
        .import_collection(
            id,
            &builder,
            line_options(config, name.clone(), language),
            |progress| bar.update(progress),
        )
        .await;
    bar.finish();

    for line in render::line_report(&report?) {
        println!("{line}");
    }
    Ok(())
}

async fn import_manifest(
    config: &DtConfig,
    store: &SqliteFlashcardStore,
    root: &str,
) -> anyhow::Result<()> {
    let client = RemoteClient::new(root, config.remote.timeout())?;
    let builder = RecordBuilder::new(store);

    let report = ManifestImporter::new(client).import(&builder).await?;
    for line in render::folder_report(&report) {
        println!("{line}");
    }
    Ok(())
}
