//! Size-balanced reorganization of PDF corpora.
//!
//! A run scans a source tree, deals the files into size-ordered buckets,
//! writes every planned transfer to a JSON-lines journal and, optionally,
//! replays that journal to move or copy the files. The journal is always
//! complete on disk before the first file is touched, so an interrupted
//! run is resumed by replaying it again.

pub mod bucket;
pub mod config;
pub mod error;
pub mod execution;
pub mod jobs;
pub mod logging;
pub mod observer;
pub mod planner;
pub mod size;
pub mod stats;
pub mod vfs;
pub mod wal;

pub use bucket::{assign_buckets, assign_buckets_with, assign_records, bucket_name, Bucket};
pub use config::{RunConfig, RunMode};
pub use error::{BucketError, Result};
pub use execution::{execute, execute_with, ExecutionConfig, ExecutionResult, TransferMode};
pub use jobs::{DistributionJob, JobSummary};
pub use observer::{NullObserver, Observer, TracingObserver};
pub use planner::{plan, plan_with, PlanConfig};
pub use size::{humanize, size_of};
pub use stats::{report, BucketStats};
pub use vfs::{enumerate_files, FileRecord};
pub use wal::{audit_journal, read_journal, write_journal, AuditReport, PlanEntry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
