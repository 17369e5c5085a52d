//! `audit` command implementation.

use crate::OutputFormat;
use pdf_buckets::wal::{audit_journal, AuditReport, EntryState};
use std::path::Path;

/// Most issues listed in text output
const MAX_LISTED: usize = 20;

/// Prints where each journal entry stands; fails if replay cannot finish.
pub fn run(journal: &Path, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let report = audit_journal(journal)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(journal, &report),
    }

    if report.is_resumable() {
        Ok(())
    } else {
        Err("Journal has conflicting or missing entries".into())
    }
}

fn print_report(journal: &Path, report: &AuditReport) {
    println!("Auditing journal at {:?}", journal);
    println!();
    println!("  Entries:    {}", report.total);
    println!("  Done:       {}", report.done_count);
    println!("  Pending:    {}", report.pending_count);
    println!("  Conflicts:  {}", report.conflict_count);
    println!("  Missing:    {}", report.missing_count);

    if !report.issues.is_empty() {
        println!();
        for issue in report.issues.iter().take(MAX_LISTED) {
            let label = match issue.state {
                EntryState::Conflict => "both present",
                EntryState::Missing => "neither present",
                EntryState::Pending | EntryState::Done => continue,
            };
            println!(
                "  line {}: {} ({})",
                issue.line,
                issue.entry.description(),
                label
            );
        }
        if report.issues.len() > MAX_LISTED {
            println!("  ... {} more", report.issues.len() - MAX_LISTED);
        }
    }

    println!();
    if report.is_complete() {
        println!("✓ Journal fully applied");
    } else if report.is_resumable() {
        println!("Journal can be resumed with `pdf-buckets execute`");
    } else {
        println!("✗ Journal needs attention before it can be replayed");
    }
}
