//! Run configuration
//!
//! Everything one invocation needs, independent of where the values came
//! from (CLI flags, environment, `.env`).

use crate::error::{BucketError, Result};
use crate::execution::ExecutionConfig;
use crate::planner::PlanConfig;
use crate::vfs::DEFAULT_SUFFIX;
use crate::wal::DEFAULT_JOURNAL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of buckets
pub const DEFAULT_BUCKETS: usize = 10;

/// Whether a run stops after writing the journal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Write journal and statistics, touch nothing else
    #[default]
    PlanOnly,
    /// Plan, then replay the journal
    PlanAndExecute,
}

/// Configuration for one planning run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory scanned for input files
    pub source_dir: PathBuf,
    /// Root under which bucket folders are created
    pub target_dir: PathBuf,
    pub num_buckets: usize,
    /// Case-sensitive name suffix of input files
    pub suffix: String,
    pub journal_path: PathBuf,
    pub mode: RunMode,
    pub plan: PlanConfig,
    pub execution: ExecutionConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            target_dir: PathBuf::from("buckets"),
            num_buckets: DEFAULT_BUCKETS,
            suffix: DEFAULT_SUFFIX.to_string(),
            journal_path: PathBuf::from(DEFAULT_JOURNAL),
            mode: RunMode::default(),
            plan: PlanConfig::default(),
            execution: ExecutionConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_buckets(mut self, num_buckets: usize) -> Self {
        self.num_buckets = num_buckets;
        self
    }

    pub fn with_journal(mut self, journal_path: impl Into<PathBuf>) -> Self {
        self.journal_path = journal_path.into();
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reject values the pipeline cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.num_buckets == 0 {
            return Err(BucketError::InvalidConfig(
                "number of buckets must be at least 1".to_string(),
            ));
        }
        if self.suffix.is_empty() {
            return Err(BucketError::InvalidConfig(
                "file suffix must not be empty".to_string(),
            ));
        }
        if self.journal_path.as_os_str().is_empty() {
            return Err(BucketError::InvalidConfig(
                "journal path must not be empty".to_string(),
            ));
        }
        if self.target_dir.starts_with(&self.source_dir) && self.target_dir != self.source_dir {
            tracing::warn!(
                source = %self.source_dir.display(),
                target = %self.target_dir.display(),
                "Target lies inside the source tree; planned files will be rescanned on the next run"
            );
        }
        self.plan.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new("in", "out");
        assert_eq!(config.num_buckets, 10);
        assert_eq!(config.suffix, ".pdf");
        assert_eq!(config.journal_path, PathBuf::from("mv.jsonl"));
        assert_eq!(config.mode, RunMode::PlanOnly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(RunConfig::new("in", "out").with_buckets(0).validate().is_err());

        let mut config = RunConfig::new("in", "out");
        config.suffix.clear();
        assert!(config.validate().is_err());

        let mut config = RunConfig::new("in", "out");
        config.plan.shard_size = 0;
        assert!(matches!(
            config.validate(),
            Err(BucketError::InvalidConfig(_))
        ));
    }
}
