//! Journal audit
//!
//! Classifies every journal entry against the current filesystem without
//! touching it. Run this after an interrupted execute to see how far the
//! previous run got before replaying the journal again.

use super::entry::PlanEntry;
use super::journal::JournalReader;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where an entry stands on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Source present, destination absent
    Pending,
    /// Source gone, destination present
    Done,
    /// Both present; replay would fail in move mode
    Conflict,
    /// Neither present
    Missing,
}

impl EntryState {
    pub fn of(entry: &PlanEntry) -> Self {
        match (entry.original_path.exists(), entry.output_path.exists()) {
            (true, false) => EntryState::Pending,
            (false, true) => EntryState::Done,
            (true, true) => EntryState::Conflict,
            (false, false) => EntryState::Missing,
        }
    }
}

/// An entry that needs operator attention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditIssue {
    pub line: usize,
    pub state: EntryState,
    pub entry: PlanEntry,
}

/// Information about a journal's progress
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub total: usize,
    pub pending_count: usize,
    pub done_count: usize,
    pub conflict_count: usize,
    pub missing_count: usize,
    /// Conflicting and missing entries, in journal order
    pub issues: Vec<AuditIssue>,
}

impl AuditReport {
    /// Whether replaying the journal in move mode can finish without errors
    pub fn is_resumable(&self) -> bool {
        self.conflict_count == 0 && self.missing_count == 0
    }

    /// Whether every entry has been applied
    pub fn is_complete(&self) -> bool {
        self.done_count == self.total
    }
}

/// Audit the journal at `journal_path`.
pub fn audit_journal(journal_path: &Path) -> Result<AuditReport> {
    let mut reader = JournalReader::open(journal_path)?;
    let mut report = AuditReport::default();

    while let Some(item) = reader.next_numbered() {
        let (line, entry) = item?;
        report.total += 1;

        let state = EntryState::of(&entry);
        match state {
            EntryState::Pending => report.pending_count += 1,
            EntryState::Done => report.done_count += 1,
            EntryState::Conflict => report.conflict_count += 1,
            EntryState::Missing => report.missing_count += 1,
        }
        if matches!(state, EntryState::Conflict | EntryState::Missing) {
            report.issues.push(AuditIssue { line, state, entry });
        }
    }

    tracing::info!(
        journal = %journal_path.display(),
        total = report.total,
        pending = report.pending_count,
        done = report.done_count,
        conflicts = report.conflict_count,
        missing = report.missing_count,
        "Audited journal"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::write_journal;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_audit_classifies_entries() {
        let dir = tempdir().unwrap();
        let p = |name: &str| dir.path().join(name);

        fs::write(p("pending.pdf"), b"1").unwrap();
        fs::write(p("done-dst.pdf"), b"2").unwrap();
        fs::write(p("conflict.pdf"), b"3").unwrap();
        fs::write(p("conflict-dst.pdf"), b"3").unwrap();

        let entries = vec![
            PlanEntry::new(p("pending.pdf"), p("pending-dst.pdf")),
            PlanEntry::new(p("done.pdf"), p("done-dst.pdf")),
            PlanEntry::new(p("conflict.pdf"), p("conflict-dst.pdf")),
            PlanEntry::new(p("missing.pdf"), p("missing-dst.pdf")),
        ];
        let journal = p("mv.jsonl");
        write_journal(&entries, &journal).unwrap();

        let report = audit_journal(&journal).unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.pending_count, 1);
        assert_eq!(report.done_count, 1);
        assert_eq!(report.conflict_count, 1);
        assert_eq!(report.missing_count, 1);
        assert!(!report.is_resumable());
        assert!(!report.is_complete());

        let lines: Vec<_> = report.issues.iter().map(|i| (i.line, i.state)).collect();
        assert_eq!(
            lines,
            vec![(3, EntryState::Conflict), (4, EntryState::Missing)]
        );
    }

    #[test]
    fn test_audit_does_not_touch_files() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.pdf");
        fs::write(&source, b"x").unwrap();
        let journal = dir.path().join("mv.jsonl");
        write_journal(
            &[PlanEntry::new(&source, dir.path().join("out/a.pdf"))],
            &journal,
        )
        .unwrap();

        let report = audit_journal(&journal).unwrap();
        assert!(report.is_resumable());
        assert!(source.exists());
        assert!(!dir.path().join("out").exists());
    }
}
