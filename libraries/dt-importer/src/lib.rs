//! Flashcard Importer
//!
//! Normalizes external flashcard collections into canonical records.
//!
//! # Sources
//!
//! - Uploaded ZIP archives in two layouts: line records (`flashcards.jsonl` + media, v1
//!   records) and folder-grouped (one folder per card, v2 records)
//! - Remote collections: a JSONL file plus media below a data root
//! - Remote manifest trees: the folder layout served as nested `manifest.json` listings
//!
//! # Architecture
//!
//! - `classify`: filename → image / text / unknown, shared by every path
//! - `archive`: ZIP entry listing with lazy reads
//! - `resolver`: filename → bytes for line records (archive or remote)
//! - `lines`: line-record importer with language filter and error policy
//! - `grouping`: per-folder accumulation shared by `folders` and `manifest`
//! - `folders` / `manifest`: folder-grouped archive and remote tree importers
//! - `collections`: remote collection metadata, languages, and import
//! - `upload`: archive schema detection
//! - `builder`: the single record creation path
//!
//! Every importer works strictly sequentially and reports what it imported and skipped.

mod error;
mod types;

pub mod archive;
pub mod builder;
pub mod classify;
pub mod collections;
pub mod folders;
pub mod grouping;
pub mod lines;
pub mod manifest;
pub mod remote;
pub mod resolver;
pub mod upload;

pub use archive::{ArchiveEntry, ArchiveReader};
pub use builder::RecordBuilder;
pub use classify::{classify, Classification, MediaKind};
pub use collections::CollectionCatalog;
pub use error::{ErrorKind, ImportError};
pub use lines::LineRecordImporter;
pub use manifest::ManifestImporter;
pub use remote::RemoteClient;
pub use resolver::{ArchiveMediaResolver, MediaResolver, RemoteMediaResolver};
pub use types::*;
pub use upload::{detect_schema, import_archive};

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ImportError>;
