//! File record definitions
//!
//! A discovered file together with the byte size read for it.

use crate::error::Result;
use crate::size::{humanize, size_of};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A discovered file and its size.
///
/// The size is a snapshot taken once when the record is read from disk;
/// records carry no identity beyond their path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Path as discovered (absolute or relative to the scan root's form)
    pub path: PathBuf,

    /// Size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Create a record with an already-known size
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Read the size of `path` from the filesystem
    pub fn read(path: &Path) -> Result<Self> {
        let size = size_of(path)?;
        Ok(Self::new(path, size))
    }

    /// Human-readable size label
    pub fn size_label(&self) -> String {
        humanize(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BucketError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        fs::write(&path, vec![1u8; 2048]).unwrap();

        let record = FileRecord::read(&path).unwrap();
        assert_eq!(record.path, path);
        assert_eq!(record.size, 2048);
        assert_eq!(record.size_label(), "2KB");
    }

    #[test]
    fn test_read_missing() {
        let dir = tempdir().unwrap();
        let result = FileRecord::read(&dir.path().join("missing.pdf"));
        assert!(matches!(result, Err(BucketError::NotFound { .. })));
    }
}
