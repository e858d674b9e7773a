//! ZIP archive access
//!
//! The entry listing is read once when the archive is opened; contents are only
//! decompressed when an entry is read.

use crate::classify::leaf_name;
use crate::Result;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Directory prefix macOS adds to archives; never flashcard content
const RESOURCE_FORK_DIR: &str = "__MACOSX";

/// One named entry of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Position inside the archive
    pub index: usize,

    /// Full path with `/` separators
    pub path: String,

    pub is_dir: bool,
}

impl ArchiveEntry {
    /// Leaf filename
    pub fn file_name(&self) -> &str {
        leaf_name(self.path.trim_end_matches('/'))
    }

    /// Directory holding this entry, `None` at the archive root
    pub fn parent_dir(&self) -> Option<&str> {
        self.path
            .trim_end_matches('/')
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .filter(|dir| !dir.is_empty())
    }
}

/// Opened ZIP container
pub struct ArchiveReader<R: Read + Seek> {
    archive: ZipArchive<R>,
    entries: Vec<ArchiveEntry>,
}

impl ArchiveReader<Cursor<Vec<u8>>> {
    /// Open an archive held in memory (an uploaded file)
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(bytes))
    }
}

impl ArchiveReader<File> {
    /// Open an archive on disk
    pub fn open(path: &Path) -> Result<Self> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    pub fn new(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive.by_index(index)?;
            let path = file.name().replace('\\', "/");

            if path.split('/').next() == Some(RESOURCE_FORK_DIR) {
                continue;
            }

            entries.push(ArchiveEntry {
                index,
                path,
                is_dir: file.is_dir(),
            });
        }

        tracing::debug!(entries = entries.len(), "Opened archive");

        Ok(Self { archive, entries })
    }

    /// All entries in archive order, directories included
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// File entries only
    pub fn files(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter().filter(|e| !e.is_dir)
    }

    /// File entries whose full path ends with `suffix`
    pub fn find_by_suffix(&self, suffix: &str) -> Vec<ArchiveEntry> {
        self.files()
            .filter(|e| e.path.ends_with(suffix))
            .cloned()
            .collect()
    }

    /// Decompress one entry
    pub fn read_bytes(&mut self, index: usize) -> Result<Vec<u8>> {
        let mut file = self.archive.by_index(index)?;
        let mut buf = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Decompress one entry as UTF-8 text
    pub fn read_text(&mut self, index: usize) -> Result<String> {
        let mut file = self.archive.by_index(index)?;
        let mut text = String::new();
        file.read_to_string(&mut text)?;
        Ok(text)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::build_zip;
    use super::*;

    #[test]
    fn test_lists_files_and_directories() {
        let bytes = build_zip(&[
            ("card1/", b""),
            ("card1/image.png", b"png"),
            ("card1/eng.txt", b"hello"),
        ]);
        let archive = ArchiveReader::from_bytes(bytes).unwrap();

        assert_eq!(archive.entries().len(), 3);
        assert_eq!(archive.files().count(), 2);
        assert!(archive.entries()[0].is_dir);
    }

    #[test]
    fn test_reads_text_and_bytes() {
        let bytes = build_zip(&[("card1/eng.txt", b"hello"), ("card1/image.png", &[0, 159, 146])]);
        let mut archive = ArchiveReader::from_bytes(bytes).unwrap();

        assert_eq!(archive.read_text(0).unwrap(), "hello");
        assert_eq!(archive.read_bytes(1).unwrap(), vec![0, 159, 146]);
    }

    #[test]
    fn test_entry_paths() {
        let entry = ArchiveEntry {
            index: 0,
            path: "deck/card1/eng.txt".to_string(),
            is_dir: false,
        };
        assert_eq!(entry.file_name(), "eng.txt");
        assert_eq!(entry.parent_dir(), Some("deck/card1"));

        let root = ArchiveEntry {
            index: 1,
            path: "loose.txt".to_string(),
            is_dir: false,
        };
        assert_eq!(root.parent_dir(), None);
    }

    #[test]
    fn test_find_by_suffix() {
        let bytes = build_zip(&[
            ("export/flashcards.jsonl", b"{}"),
            ("export/cat.png", b"png"),
        ]);
        let archive = ArchiveReader::from_bytes(bytes).unwrap();

        let found = archive.find_by_suffix("flashcards.jsonl");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "export/flashcards.jsonl");
    }

    #[test]
    fn test_skips_macos_resource_forks() {
        let bytes = build_zip(&[
            ("card1/image.png", b"png"),
            ("__MACOSX/card1/._image.png", b"junk"),
        ]);
        let archive = ArchiveReader::from_bytes(bytes).unwrap();
        assert_eq!(archive.files().count(), 1);
    }

    #[test]
    fn test_rejects_non_zip_bytes() {
        assert!(ArchiveReader::from_bytes(b"definitely not a zip".to_vec()).is_err());
    }
}
