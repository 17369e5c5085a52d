//! Filesystem discovery
//!
//! Enumerates candidate files and turns them into sized records.

pub mod node;
pub mod scanner;

pub use node::FileRecord;
pub use scanner::{enumerate_files, FileScanner, ScanStats, DEFAULT_SUFFIX};
