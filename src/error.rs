//! Error types for bucket planning and journal replay.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while scanning, planning, journaling or executing.
#[derive(Debug, Error)]
pub enum BucketError {
    /// A path vanished or was never a regular file / directory.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The journal names a source that is gone while its destination is absent too.
    #[error(
        "journal line {line}: source missing: {} (destination {} absent)",
        source_path.display(),
        destination.display()
    )]
    SourceMissing {
        line: usize,
        source_path: PathBuf,
        destination: PathBuf,
    },

    /// Naming or reporting was attempted on a bucket with no members.
    #[error("bucket {index} is empty")]
    EmptyBucket { index: usize },

    /// Executing the entry would overwrite an existing file.
    #[error("journal line {line}: destination already exists: {}", destination.display())]
    DestinationExists { line: usize, destination: PathBuf },

    /// Underlying filesystem failure.
    #[error("{context} {}: {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A journal line could not be decoded.
    #[error("journal line {line} is malformed: {source}")]
    JournalCorrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Another process holds the journal.
    #[error("journal is locked by another process: {}", path.display())]
    JournalLocked { path: PathBuf },

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BucketError {
    /// Wrap an `io::Error`, turning `NotFound` into [`BucketError::NotFound`].
    pub fn io(context: &'static str, path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            return BucketError::NotFound {
                path: path.to_path_buf(),
            };
        }
        BucketError::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, BucketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let err = BucketError::io(
            "Failed to stat",
            Path::new("/gone.pdf"),
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(err, BucketError::NotFound { .. }));
    }

    #[test]
    fn test_io_other_kind_keeps_context() {
        let err = BucketError::io(
            "Failed to create directory",
            Path::new("/out"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.starts_with("Failed to create directory /out"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_messages_name_the_entry() {
        let err = BucketError::DestinationExists {
            line: 7,
            destination: PathBuf::from("/t/0001/0007.pdf"),
        };
        assert!(err.to_string().contains("line 7"));

        let err = BucketError::EmptyBucket { index: 3 };
        assert_eq!(err.to_string(), "bucket 3 is empty");
    }
}
