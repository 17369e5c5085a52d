//! Journal persistence
//!
//! The journal is a JSON-lines file: one [`PlanEntry`] per line, written in
//! full before anything on disk is moved. It is the only input of the
//! execute phase, so a crash at any point after it is written leaves
//! enough on disk to audit or resume.
//!
//! ## Concurrency Safety
//! Uses an advisory lock file via fs2 so that two processes never plan
//! into or replay the same journal at the same time.

use super::entry::PlanEntry;
use crate::error::{BucketError, Result};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default journal location, relative to the working directory
pub const DEFAULT_JOURNAL: &str = "mv.jsonl";

/// `path` with `suffix` appended to its file name
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("journal"));
    name.push(suffix);
    path.with_file_name(name)
}

/// Get the lock file path for a journal
pub fn lock_path(journal: &Path) -> PathBuf {
    sibling(journal, ".lock")
}

/// Exclusive advisory lock on a journal.
///
/// Held for as long as the value lives. The lock file itself stays on
/// disk so every process always locks the same inode.
#[derive(Debug)]
pub struct JournalLock {
    file: File,
    path: PathBuf,
}

impl JournalLock {
    /// Acquire the lock without blocking.
    ///
    /// Fails with [`BucketError::JournalLocked`] if another process holds it.
    pub fn acquire(journal: &Path) -> Result<Self> {
        ensure_parent(journal)?;

        let path = lock_path(journal);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| BucketError::io("Failed to open lock file", &path, e))?;

        if file.try_lock_exclusive().is_err() {
            return Err(BucketError::JournalLocked {
                path: journal.to_path_buf(),
            });
        }

        tracing::debug!(lock = %path.display(), "Acquired journal lock");
        Ok(Self { file, path })
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for JournalLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| BucketError::io("Failed to create journal directory", parent, e))?;
        }
    }
    Ok(())
}

/// Write `entries` to `path`, replacing any existing journal.
///
/// Writes atomically by writing to a temp file first, then renaming.
/// This ensures we never have a truncated journal on disk.
pub fn write_journal(entries: &[PlanEntry], path: &Path) -> Result<usize> {
    ensure_parent(path)?;

    let temp_path = sibling(path, ".tmp");
    if let Err(err) = write_entries(entries, &temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        BucketError::io("Failed to rename journal file", path, e)
    })?;

    tracing::info!(
        journal = %path.display(),
        entries = entries.len(),
        "Saved journal"
    );

    Ok(entries.len())
}

/// Serialize `entries` into `temp_path` and fsync it
fn write_entries(entries: &[PlanEntry], temp_path: &Path) -> Result<()> {
    let file = File::create(temp_path)
        .map_err(|e| BucketError::io("Failed to create journal temp file", temp_path, e))?;
    let mut writer = BufWriter::new(file);

    for entry in entries {
        serde_json::to_writer(&mut writer, entry).map_err(|e| BucketError::Io {
            context: "Failed to write journal",
            path: temp_path.to_path_buf(),
            source: e.into(),
        })?;
        writer
            .write_all(b"\n")
            .map_err(|e| BucketError::io("Failed to write journal", temp_path, e))?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| BucketError::io("Failed to flush journal", temp_path, e.into_error()))?;
    file.sync_all()
        .map_err(|e| BucketError::io("Failed to sync journal", temp_path, e))
}

/// Read every entry of a journal in order.
///
/// Blank lines are ignored; the first malformed line fails with its
/// 1-based line number.
pub fn read_journal(path: &Path) -> Result<Vec<PlanEntry>> {
    JournalReader::open(path)?.collect()
}

/// Sequential journal reader yielding `(line_number, entry)` pairs.
pub struct JournalReader {
    lines: std::io::Lines<BufReader<File>>,
    path: PathBuf,
    line: usize,
}

impl JournalReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).map_err(|e| BucketError::io("Failed to open journal", path, e))?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            path: path.to_path_buf(),
            line: 0,
        })
    }

    /// Next entry with its 1-based line number
    pub fn next_numbered(&mut self) -> Option<Result<(usize, PlanEntry)>> {
        loop {
            let raw = match self.lines.next()? {
                Ok(raw) => raw,
                Err(e) => {
                    return Some(Err(BucketError::io(
                        "Failed to read journal",
                        &self.path,
                        e,
                    )))
                }
            };
            self.line += 1;

            if raw.trim().is_empty() {
                continue;
            }

            let line = self.line;
            return Some(
                serde_json::from_str(&raw)
                    .map(|entry| (line, entry))
                    .map_err(|source| BucketError::JournalCorrupt { line, source }),
            );
        }
    }
}

impl Iterator for JournalReader {
    type Item = Result<PlanEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_numbered().map(|r| r.map(|(_, entry)| entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_entries() -> Vec<PlanEntry> {
        vec![
            PlanEntry::new("in/big.pdf", "out/1KB-3KB/0001/0001.pdf"),
            PlanEntry::new("in/mid.pdf", "out/1KB-3KB/0001/0002.pdf"),
            PlanEntry::new("in/small.pdf", "out/10bytes-10bytes/0001/0001.pdf"),
        ]
    }

    #[test]
    fn test_write_and_read_journal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mv.jsonl");

        let written = write_journal(&sample_entries(), &path).unwrap();
        assert_eq!(written, 3);
        assert_eq!(read_journal(&path).unwrap(), sample_entries());

        // One record per line, no temp file left behind
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(!sibling(&path, ".tmp").exists());
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mv.jsonl");
        fs::write(&path, "stale contents\nmore\nand more\nand more\n").unwrap();

        write_journal(&sample_entries()[..1], &path).unwrap();
        assert_eq!(read_journal(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/logs/mv.jsonl");

        write_journal(&sample_entries(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mv.jsonl");
        fs::write(
            &path,
            "\n{\"original_path\":\"a.pdf\",\"output_path\":\"b.pdf\"}\n\n",
        )
        .unwrap();

        assert_eq!(
            read_journal(&path).unwrap(),
            vec![PlanEntry::new("a.pdf", "b.pdf")]
        );
    }

    #[test]
    fn test_read_reports_corrupt_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mv.jsonl");
        fs::write(
            &path,
            "{\"original_path\":\"a.pdf\",\"output_path\":\"b.pdf\"}\n{\"original_path\":\n",
        )
        .unwrap();

        let result = read_journal(&path);
        assert!(matches!(
            result,
            Err(BucketError::JournalCorrupt { line: 2, .. })
        ));
    }

    #[test]
    fn test_read_missing_journal() {
        let dir = tempdir().unwrap();
        let result = read_journal(&dir.path().join("absent.jsonl"));
        assert!(matches!(result, Err(BucketError::NotFound { .. })));
    }

    #[test]
    fn test_lock_is_exclusive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mv.jsonl");

        let lock = JournalLock::acquire(&path).unwrap();
        assert!(lock_path(&path).exists());
        assert!(matches!(
            JournalLock::acquire(&path),
            Err(BucketError::JournalLocked { .. })
        ));

        drop(lock);
        // Released but left in place
        assert!(lock_path(&path).exists());
        let again = JournalLock::acquire(&path).unwrap();
        assert_eq!(again.path(), lock_path(&path));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("mv.jsonl");
        fs::write(&path, "previous\n").unwrap();

        // serde_json refuses paths that are not valid UTF-8
        let bad = dir.path().join(OsStr::from_bytes(b"bad\xff.pdf"));
        let entries = vec![
            PlanEntry::new("ok.pdf", "out/0001/0001.pdf"),
            PlanEntry::new(bad, "out/0001/0002.pdf"),
        ];

        assert!(write_journal(&entries, &path).is_err());
        assert!(!dir.path().join("mv.jsonl.tmp").exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous\n");
    }
}
