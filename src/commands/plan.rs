//! `plan` and `run` command implementation.

use crate::{OutputFormat, PlanArgs};
use pdf_buckets::execution::ExecutionConfig;
use pdf_buckets::planner::PlanConfig;
use pdf_buckets::{DistributionJob, JobSummary, RunConfig, RunMode, TracingObserver, TransferMode};

/// Runs a planning job, executing it when `mode` asks for it.
pub fn run(
    args: PlanArgs,
    mode: RunMode,
    transfer: TransferMode,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RunConfig::new(args.source, args.target)
        .with_buckets(args.buckets)
        .with_journal(args.journal)
        .with_mode(mode);
    config.suffix = args.suffix;
    config.plan = PlanConfig {
        shard_size: args.shard_size,
        ..PlanConfig::default()
    };
    config.execution = ExecutionConfig { mode: transfer };

    let observer = TracingObserver::new();
    let summary = DistributionJob::new(config, &observer).run()?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_summary(&summary),
    }
    Ok(())
}

fn print_summary(summary: &JobSummary) {
    println!(
        "Planned {} files into {} buckets",
        summary.files, summary.bucket_count
    );
    println!();
    for bucket in &summary.buckets {
        println!("  {}", bucket.description());
    }
    let empty = summary.bucket_count - summary.buckets.len();
    if empty > 0 {
        println!("  ({} empty buckets)", empty);
    }
    println!();
    println!(
        "Journal: {} ({} entries)",
        summary.journal_path.display(),
        summary.entries
    );
    match &summary.execution {
        Some(result) => println!(
            "Executed: {} transferred, {} already done",
            result.completed_count, result.skipped_count
        ),
        None => println!("Dry run: no files were moved"),
    }
    println!("Elapsed: {} ms", summary.elapsed_ms);
}
