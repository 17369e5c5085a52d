//! File Scanner
//!
//! Walks a directory tree with walkdir and collects every regular file
//! whose name ends with a suffix. Results are sorted by path so that
//! size ties downstream resolve the same way on every filesystem.

use crate::error::{BucketError, Result};
use crate::observer::{NullObserver, Observer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Default suffix for discovered files
pub const DEFAULT_SUFFIX: &str = ".pdf";

/// Configuration for the file scanner
#[derive(Debug, Clone)]
pub struct FileScanner {
    /// Case-sensitive file name suffix to match
    suffix: String,
}

impl Default for FileScanner {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

/// Statistics from a scan operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    /// Files whose name matched the suffix
    pub matched_files: usize,

    /// Regular files ignored because of their suffix
    pub skipped_files: usize,

    /// Directories visited, including the root
    pub total_dirs: usize,

    /// Time taken to scan in milliseconds
    pub scan_duration_ms: u64,
}

impl FileScanner {
    /// Create a new scanner with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file name suffix to match
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Scan `root` and return matching paths sorted by path.
    pub fn scan(&self, root: &Path) -> Result<(Vec<PathBuf>, ScanStats)> {
        self.scan_with(root, &NullObserver)
    }

    /// Scan `root`, reporting each matched file as `"scan"` progress.
    ///
    /// The total is unknown while walking, so progress is reported with a
    /// total of 0. Any walk error aborts the scan: a partial file set would
    /// skew the bucket balance.
    pub fn scan_with(
        &self,
        root: &Path,
        observer: &dyn Observer,
    ) -> Result<(Vec<PathBuf>, ScanStats)> {
        let start = Instant::now();
        let mut stats = ScanStats::default();

        if !root.is_dir() {
            return Err(BucketError::NotFound {
                path: root.to_path_buf(),
            });
        }

        let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                BucketError::io("Failed to walk", &path, source)
            })?;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                stats.total_dirs += 1;
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            if self.matches(entry.file_name().to_string_lossy().as_ref()) {
                files.push(entry.into_path());
                observer.on_progress("scan", files.len(), 0);
            } else {
                stats.skipped_files += 1;
            }
        }

        files.sort();
        stats.matched_files = files.len();
        stats.scan_duration_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            root = %root.display(),
            matched = stats.matched_files,
            skipped = stats.skipped_files,
            dirs = stats.total_dirs,
            duration_ms = stats.scan_duration_ms,
            "Scan complete"
        );

        Ok((files, stats))
    }

    /// Check if a file name carries the configured suffix
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.suffix)
    }
}

/// Recursively collect every regular file under `root` ending with `suffix`.
pub fn enumerate_files(root: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    FileScanner::new()
        .with_suffix(suffix)
        .scan(root)
        .map(|(files, _)| files)
}
