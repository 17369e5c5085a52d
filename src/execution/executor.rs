//! Execution Engine
//!
//! Replays a journal in order, moving (or copying) each source to its
//! recorded destination. Entries whose source is already gone and whose
//! destination is present are skipped, so an interrupted run can simply
//! be started again on the same journal.

use crate::error::{BucketError, Result};
use crate::observer::{Observer, TracingObserver};
use crate::wal::journal::JournalReader;
use crate::wal::{JournalLock, PlanEntry};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// How a source reaches its destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// Rename, falling back to copy + remove across filesystems
    #[default]
    Move,
    /// Leave the source in place
    Copy,
}

/// Configuration for execution behavior
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    pub mode: TransferMode,
}

/// Outcome of a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// File was transferred
    Completed,
    /// Nothing to do (includes reason)
    Skipped(String),
}

/// Result of replaying a journal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Entries in the journal
    pub total: usize,
    /// Number of files transferred by this run
    pub completed_count: usize,
    /// Number of entries that were already done
    pub skipped_count: usize,
}

/// Replays journals against the filesystem
pub struct ExecutionEngine<'a> {
    config: ExecutionConfig,
    observer: &'a dyn Observer,
}

impl<'a> ExecutionEngine<'a> {
    /// Create an engine that moves files
    pub fn new(observer: &'a dyn Observer) -> Self {
        Self::with_config(ExecutionConfig::default(), observer)
    }

    pub fn with_config(config: ExecutionConfig, observer: &'a dyn Observer) -> Self {
        Self { config, observer }
    }

    /// Execute every entry of the journal at `journal_path`.
    ///
    /// The whole journal is decoded before the first transfer, so a
    /// corrupt line never leaves a half-applied run behind it. The first
    /// failing entry stops the run; earlier transfers stay in place.
    /// The caller is responsible for holding the [`JournalLock`].
    pub fn execute_journal(&self, journal_path: &Path) -> Result<ExecutionResult> {
        let mut reader = JournalReader::open(journal_path)?;
        let mut entries = Vec::new();
        while let Some(item) = reader.next_numbered() {
            entries.push(item?);
        }

        tracing::info!(
            journal = %journal_path.display(),
            entries = entries.len(),
            mode = ?self.config.mode,
            "Executing journal"
        );

        self.execute_entries(&entries)
    }

    /// Execute `(line, entry)` pairs in order
    pub fn execute_entries(&self, entries: &[(usize, PlanEntry)]) -> Result<ExecutionResult> {
        let mut result = ExecutionResult {
            total: entries.len(),
            ..ExecutionResult::default()
        };

        for (done, (line, entry)) in entries.iter().enumerate() {
            tracing::debug!(line, operation = %entry.description(), "Executing entry");

            match self.execute_entry(*line, entry) {
                Ok(ExecutionOutcome::Completed) => result.completed_count += 1,
                Ok(ExecutionOutcome::Skipped(reason)) => {
                    tracing::debug!(line, reason = %reason, "Entry skipped");
                    result.skipped_count += 1;
                }
                Err(err) => {
                    tracing::error!(
                        line,
                        operation = %entry.description(),
                        error = %err,
                        "Execution stopped"
                    );
                    self.observer.on_warning(&format!(
                        "Stopped at journal line {} after {} transfers: {}",
                        line, result.completed_count, err
                    ));
                    return Err(err);
                }
            }

            self.observer.on_progress("execute", done + 1, result.total);
        }

        self.observer.on_event(&format!(
            "Executed {} entries: {} transferred, {} already done",
            result.total, result.completed_count, result.skipped_count
        ));

        Ok(result)
    }

    /// Apply one entry
    pub fn execute_entry(&self, line: usize, entry: &PlanEntry) -> Result<ExecutionOutcome> {
        let source = &entry.original_path;
        let destination = &entry.output_path;

        match (source.exists(), destination.exists()) {
            (false, true) => Ok(ExecutionOutcome::Skipped(
                "Source missing but destination exists".to_string(),
            )),
            (false, false) => Err(BucketError::SourceMissing {
                line,
                source_path: source.clone(),
                destination: destination.clone(),
            }),
            (true, true) => {
                if self.config.mode == TransferMode::Copy && same_contents(source, destination)? {
                    return Ok(ExecutionOutcome::Skipped(
                        "Destination already holds a copy".to_string(),
                    ));
                }
                Err(BucketError::DestinationExists {
                    line,
                    destination: destination.clone(),
                })
            }
            (true, false) => {
                match self.config.mode {
                    TransferMode::Move => perform_move(source, destination)?,
                    TransferMode::Copy => perform_copy(source, destination)?,
                }
                Ok(ExecutionOutcome::Completed)
            }
        }
    }
}

/// Replay `journal_path` with default settings, holding its lock.
pub fn execute(journal_path: &Path) -> Result<ExecutionResult> {
    execute_with(journal_path, ExecutionConfig::default(), &TracingObserver::new())
}

/// Replay `journal_path`, holding its lock for the duration.
pub fn execute_with(
    journal_path: &Path,
    config: ExecutionConfig,
    observer: &dyn Observer,
) -> Result<ExecutionResult> {
    let _lock = JournalLock::acquire(journal_path)?;
    ExecutionEngine::with_config(config, observer).execute_journal(journal_path)
}

/// Byte-for-byte equality of two regular files
fn same_contents(a: &Path, b: &Path) -> Result<bool> {
    let meta_a = fs::metadata(a).map_err(|e| BucketError::io("Failed to stat", a, e))?;
    let meta_b = fs::metadata(b).map_err(|e| BucketError::io("Failed to stat", b, e))?;
    if !meta_a.is_file() || !meta_b.is_file() || meta_a.len() != meta_b.len() {
        return Ok(false);
    }

    let open = |path: &Path| {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| BucketError::io("Failed to open for comparison", path, e))
    };
    let mut reader_a = open(a)?;
    let mut reader_b = open(b)?;

    loop {
        let chunk_a = reader_a
            .fill_buf()
            .map_err(|e| BucketError::io("Failed to read", a, e))?;
        let chunk_b = reader_b
            .fill_buf()
            .map_err(|e| BucketError::io("Failed to read", b, e))?;
        if chunk_a.is_empty() || chunk_b.is_empty() {
            return Ok(chunk_a.is_empty() && chunk_b.is_empty());
        }

        let n = chunk_a.len().min(chunk_b.len());
        if chunk_a[..n] != chunk_b[..n] {
            return Ok(false);
        }
        reader_a.consume(n);
        reader_b.consume(n);
    }
}

/// Ensure destination parent exists
fn ensure_parent(destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                BucketError::io("Failed to create destination directory", parent, e)
            })?;
        }
    }
    Ok(())
}

/// Hidden sibling used while a copy is in flight
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(destination.file_name().unwrap_or_default());
    name.push(".partial");
    destination.with_file_name(name)
}

/// Copy into a temporary sibling, then rename into place.
///
/// The destination only ever appears complete.
fn copy_into_place(source: &Path, destination: &Path) -> Result<()> {
    let partial = partial_path(destination);
    fs::copy(source, &partial).map_err(|e| BucketError::io("Failed to copy", source, e))?;
    fs::rename(&partial, destination).map_err(|e| {
        let _ = fs::remove_file(&partial);
        BucketError::io("Failed to rename copy into", destination, e)
    })
}

/// Helper function to perform a move operation
fn perform_move(source: &Path, destination: &Path) -> Result<()> {
    ensure_parent(destination)?;

    // Try rename first (same filesystem), fall back to copy+delete
    if fs::rename(source, destination).is_err() {
        copy_into_place(source, destination)?;
        fs::remove_file(source).map_err(|e| BucketError::io("Failed to remove source", source, e))?;
    }
    Ok(())
}

/// Helper function to perform a copy operation
fn perform_copy(source: &Path, destination: &Path) -> Result<()> {
    ensure_parent(destination)?;
    copy_into_place(source, destination)
}
