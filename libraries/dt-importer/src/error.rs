//! Error types for the importer

use thiserror::Error;

/// Coarse failure classes callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required top-level file or manifest is absent; the whole operation fails
    FatalFormat,

    /// One record is malformed, incomplete, or references a missing file
    SkippableItem,

    /// A fetch returned a non-success status or failed at the network level
    RemoteUnavailable,

    /// Storage, archive, or I/O failure unrelated to one record's content
    Internal,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Required file not found: {0}")]
    MissingRequiredFile(String),

    #[error("Malformed record on line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("Missing required field '{field}' on line {line}")]
    MissingField { line: usize, field: &'static str },

    #[error("Media file not found: {0}")]
    MissingMedia(String),

    #[error("Remote source unavailable: {url}: {reason}")]
    RemoteUnavailable { url: String, reason: String },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Storage error: {0}")]
    Storage(#[from] dt_core::DtError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRequiredFile(_) => ErrorKind::FatalFormat,
            Self::MalformedLine { .. } | Self::MissingField { .. } | Self::MissingMedia(_) => {
                ErrorKind::SkippableItem
            }
            Self::Storage(dt_core::DtError::InvalidRecord(_)) => ErrorKind::SkippableItem,
            Self::RemoteUnavailable { .. } | Self::InvalidResponse { .. } => {
                ErrorKind::RemoteUnavailable
            }
            Self::InvalidUrl(_) | Self::Archive(_) | Self::Storage(_) | Self::Io(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn is_fatal_format(&self) -> bool {
        self.kind() == ErrorKind::FatalFormat
    }

    pub fn is_skippable(&self) -> bool {
        self.kind() == ErrorKind::SkippableItem
    }

    pub(crate) fn remote(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::RemoteUnavailable {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(ImportError::MissingRequiredFile("flashcards.jsonl".into()).is_fatal_format());
        assert!(ImportError::MissingMedia("cat.png".into()).is_skippable());
        assert!(ImportError::Storage(dt_core::DtError::invalid_record("empty")).is_skippable());
        assert_eq!(
            ImportError::remote("http://x/a.json", "404 Not Found").kind(),
            ErrorKind::RemoteUnavailable
        );
        assert_eq!(
            ImportError::Storage(dt_core::DtError::storage("disk full")).kind(),
            ErrorKind::Internal
        );
    }
}
