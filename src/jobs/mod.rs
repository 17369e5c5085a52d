//! Distribution job
//!
//! Runs the phases of one invocation strictly in sequence:
//! scan, assign, report, plan, write journal, and optionally execute.
//! The journal is on disk before the first file is touched.

use crate::bucket::{assign_buckets_with, Bucket};
use crate::config::{RunConfig, RunMode};
use crate::error::{BucketError, Result};
use crate::execution::{ExecutionEngine, ExecutionResult};
use crate::observer::Observer;
use crate::planner::plan_with;
use crate::stats::{emit_report, report, BucketStats};
use crate::vfs::{FileScanner, ScanStats};
use crate::wal::{write_journal, JournalLock};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// What a finished job did
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub scan: ScanStats,
    /// Files discovered and planned
    pub files: usize,
    /// Buckets requested, including empty ones
    pub bucket_count: usize,
    pub buckets: Vec<BucketStats>,
    /// Entries written to the journal
    pub entries: usize,
    pub journal_path: PathBuf,
    /// Present in plan-and-execute mode
    pub execution: Option<ExecutionResult>,
    pub elapsed_ms: u64,
}

/// One planning (and optionally executing) run
pub struct DistributionJob<'a> {
    config: RunConfig,
    observer: &'a dyn Observer,
}

impl<'a> DistributionJob<'a> {
    pub fn new(config: RunConfig, observer: &'a dyn Observer) -> Self {
        Self { config, observer }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every phase in order.
    ///
    /// Scan and size errors abort before the journal is written. Execute
    /// errors abort after it, leaving the journal for a later replay.
    pub fn run(&self) -> Result<JobSummary> {
        self.config.validate()?;

        let started_at = Local::now();
        let clock = Instant::now();
        let config = &self.config;

        self.observer.on_event(&format!(
            "Size classification started at {}",
            started_at.format("%Y%m%d%H%M%S")
        ));

        let _lock = JournalLock::acquire(&config.journal_path)?;

        let (files, scan) = FileScanner::new()
            .with_suffix(config.suffix.clone())
            .scan_with(&config.source_dir, self.observer)?;
        self.observer.on_event(&format!(
            "Found {} {} files under {}",
            files.len(),
            config.suffix,
            config.source_dir.display()
        ));
        if files.is_empty() {
            self.observer
                .on_warning("No matching files found; writing an empty journal");
        }
        let file_count = files.len();

        let buckets = assign_buckets_with(files, config.num_buckets, self.observer)?;
        let stats = report(&buckets)?;
        emit_report(&stats, empty_count(&buckets), self.observer);

        let entries = plan_with(&buckets, &config.target_dir, &config.plan)?;
        write_journal(&entries, &config.journal_path)?;
        self.observer.on_event(&format!(
            "Journal written: {} ({} entries)",
            config.journal_path.display(),
            entries.len()
        ));

        let execution = match config.mode {
            RunMode::PlanOnly => {
                self.observer.on_event("Plan-only mode; no files were touched");
                None
            }
            RunMode::PlanAndExecute => {
                fs::create_dir_all(&config.target_dir).map_err(|e| {
                    BucketError::io("Failed to create target directory", &config.target_dir, e)
                })?;
                let engine = ExecutionEngine::with_config(config.execution.clone(), self.observer);
                Some(engine.execute_journal(&config.journal_path)?)
            }
        };

        let finished_at = Local::now();
        let elapsed_ms = clock.elapsed().as_millis() as u64;
        self.observer.on_event(&format!(
            "Size classification completed at {} in {} s",
            finished_at.format("%Y%m%d%H%M%S"),
            elapsed_ms / 1000
        ));

        Ok(JobSummary {
            started_at,
            finished_at,
            scan,
            files: file_count,
            bucket_count: buckets.len(),
            buckets: stats,
            entries: entries.len(),
            journal_path: config.journal_path.clone(),
            execution,
            elapsed_ms,
        })
    }
}

fn empty_count(buckets: &[Bucket]) -> usize {
    buckets.iter().filter(|b| b.is_empty()).count()
}
