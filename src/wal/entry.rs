//! Journal entry types
//!
//! One planned transfer per line of the journal.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A planned transfer of one file.
///
/// Serialized as `{"original_path": ..., "output_path": ...}`, one object
/// per journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Source path as discovered
    pub original_path: PathBuf,
    /// Planned destination
    pub output_path: PathBuf,
}

impl PlanEntry {
    pub fn new(original_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            original_path: original_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Get a human-readable description of this entry
    pub fn description(&self) -> String {
        format!(
            "{} -> {}",
            self.original_path.display(),
            self.output_path.display()
        )
    }

    /// Directory the destination lives in
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_path.parent()
    }
}
