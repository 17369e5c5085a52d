//! `execute` command implementation.

use pdf_buckets::execution::{execute_with, ExecutionConfig};
use pdf_buckets::{TracingObserver, TransferMode};
use std::path::Path;

/// Replays `journal`, resuming wherever a previous run stopped.
pub fn run(journal: &Path, mode: TransferMode) -> Result<(), Box<dyn std::error::Error>> {
    println!("Replaying journal {:?}", journal);

    let observer = TracingObserver::new();
    let result = execute_with(journal, ExecutionConfig { mode }, &observer)?;

    println!(
        "✓ {} entries: {} transferred, {} already done",
        result.total, result.completed_count, result.skipped_count
    );
    Ok(())
}
