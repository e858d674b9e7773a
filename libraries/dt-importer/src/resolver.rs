//! Media resolution for line records
//!
//! A line record names its image and image expressions by filename. The resolver turns
//! such a name into bytes, scoped to where the JSONL came from.

use crate::archive::ArchiveReader;
use crate::remote::RemoteClient;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{Read, Seek};

/// Filename → bytes lookup for one import source
#[async_trait]
pub trait MediaResolver: Send {
    /// `Ok(None)` when the source has no such file
    async fn resolve(&mut self, filename: &str) -> Result<Option<Vec<u8>>>;
}

/// Looks media up inside an archive by basename only.
///
/// Files with the same basename in different folders collide; the last one in archive
/// order wins.
pub struct ArchiveMediaResolver<'a, R: Read + Seek> {
    archive: &'a mut ArchiveReader<R>,
    by_basename: HashMap<String, usize>,
}

impl<'a, R: Read + Seek> ArchiveMediaResolver<'a, R> {
    pub fn new(archive: &'a mut ArchiveReader<R>) -> Self {
        let by_basename = archive
            .files()
            .map(|entry| (entry.file_name().to_string(), entry.index))
            .collect();

        Self {
            archive,
            by_basename,
        }
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.by_basename.contains_key(filename)
    }
}

#[async_trait]
impl<R: Read + Seek + Send> MediaResolver for ArchiveMediaResolver<'_, R> {
    async fn resolve(&mut self, filename: &str) -> Result<Option<Vec<u8>>> {
        match self.by_basename.get(filename) {
            Some(&index) => self.archive.read_bytes(index).map(Some),
            None => Ok(None),
        }
    }
}

/// Fetches media relative to a remote collection directory.
///
/// Never answers `None`: a failed fetch is a [`crate::ImportError::RemoteUnavailable`].
pub struct RemoteMediaResolver {
    client: RemoteClient,
}

impl RemoteMediaResolver {
    /// `client` must be rooted at the directory holding the media files
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaResolver for RemoteMediaResolver {
    async fn resolve(&mut self, filename: &str) -> Result<Option<Vec<u8>>> {
        self.client.get_bytes(filename).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::build_zip;

    #[tokio::test]
    async fn test_archive_resolver_uses_basenames() {
        let bytes = build_zip(&[
            ("export/flashcards.jsonl", b"{}"),
            ("export/media/cat.png", b"cat-bytes"),
        ]);
        let mut archive = ArchiveReader::from_bytes(bytes).unwrap();
        let mut resolver = ArchiveMediaResolver::new(&mut archive);

        assert!(resolver.contains("cat.png"));
        assert_eq!(
            resolver.resolve("cat.png").await.unwrap(),
            Some(b"cat-bytes".to_vec())
        );
        assert_eq!(resolver.resolve("media/cat.png").await.unwrap(), None);
        assert_eq!(resolver.resolve("dog.png").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_archive_resolver_last_duplicate_wins() {
        let bytes = build_zip(&[("a/cat.png", b"first"), ("b/cat.png", b"second")]);
        let mut archive = ArchiveReader::from_bytes(bytes).unwrap();
        let mut resolver = ArchiveMediaResolver::new(&mut archive);

        assert_eq!(
            resolver.resolve("cat.png").await.unwrap(),
            Some(b"second".to_vec())
        );
    }
}
