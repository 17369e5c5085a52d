//! Process-wide logging setup, owned by the binary.
//!
//! Stdout honors `RUST_LOG`; every run also gets its own plain-text log
//! file named after its start time.

use crate::error::{BucketError, Result};
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Default directory for run logs
pub const DEFAULT_LOG_DIR: &str = "./log";

/// Install stdout and file layers; returns the log file path.
pub fn init(log_dir: &Path, verbose: bool) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .map_err(|e| BucketError::io("Failed to create log directory", log_dir, e))?;

    let prefix = format!("pdf_buckets_{}", Local::now().format("%Y%m%d%H%M%S"));
    let log_file = log_dir.join(format!("{}.log", prefix));

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| BucketError::Io {
            context: "Failed to open log file",
            path: log_file.clone(),
            source: io::Error::other(e),
        })?;

    // Default: warn for dependencies, info for this crate
    let stdout_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,pdf_buckets=info"))
    };
    let file_filter = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let stdout_layer = fmt::layer().with_ansi(true).with_filter(stdout_filter);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(file_appender)
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| BucketError::InvalidConfig(format!("logging already initialized: {}", e)))?;

    tracing::debug!(log_file = %log_file.display(), "Logging initialized");
    Ok(log_file)
}

#[cfg(test)]
pub fn init_for_tests() {
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("pdf_buckets=debug"))
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_for_tests_is_reentrant() {
        init_for_tests();
        init_for_tests();
        tracing::debug!("still alive");
    }
}
