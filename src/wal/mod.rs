//! Plan journal
//!
//! Append-only JSON-lines record of every planned transfer. Written once,
//! fully, before the execute phase touches the filesystem.

pub mod entry;
pub mod journal;
pub mod recovery;

pub use entry::PlanEntry;
pub use journal::{read_journal, write_journal, JournalLock, JournalReader, DEFAULT_JOURNAL};
pub use recovery::{audit_journal, AuditIssue, AuditReport, EntryState};
