//! Plan generation
//!
//! Turns finalized buckets into an ordered list of [`PlanEntry`] values:
//!
//! ```text
//! target_root/<min>-<max>/<shard>/<sequence>.pdf
//! ```
//!
//! Shard folders hold at most `shard_size` files and are numbered from
//! `0001`. Sequence numbers run across the whole bucket, not per shard.
//!
//! Labels are truncated sizes, so neighbouring buckets can share one
//! (`1KB-1KB` for both 1800..1900 and 1050..1100 bytes). A bucket whose
//! label is already taken lands in the same folder and continues its
//! shard and sequence numbering, so every destination stays unique.

use crate::bucket::{bucket_name, Bucket};
use crate::error::{BucketError, Result};
use crate::wal::PlanEntry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Files per shard folder
pub const DEFAULT_SHARD_SIZE: usize = 10_000;

/// Extension given to every planned destination
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Layout options for destination paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanConfig {
    /// Maximum files per shard folder
    pub shard_size: usize,
    /// Extension for destination file names, without the dot
    pub extension: String,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            shard_size: DEFAULT_SHARD_SIZE,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl PlanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.shard_size == 0 {
            return Err(BucketError::InvalidConfig(
                "shard size must be at least 1".to_string(),
            ));
        }
        let bad_char = |c: char| matches!(c, '/' | '\\' | '.');
        if self.extension.is_empty() || self.extension.contains(bad_char) {
            return Err(BucketError::InvalidConfig(format!(
                "invalid output extension: {:?}",
                self.extension
            )));
        }
        Ok(())
    }

    /// Relative path of the `position`-th (0-based) file within a bucket
    fn relative_path(&self, position: usize) -> PathBuf {
        let shard = position / self.shard_size + 1;
        let sequence = position + 1;
        PathBuf::from(format!("{:04}", shard))
            .join(format!("{:04}.{}", sequence, self.extension))
    }
}

/// Plan destinations with the default layout.
pub fn plan(buckets: &[Bucket], target_root: &Path) -> Result<Vec<PlanEntry>> {
    plan_with(buckets, target_root, &PlanConfig::default())
}

/// Plan destinations for every file, in bucket then intra-bucket order.
///
/// Empty buckets contribute nothing and are never named.
pub fn plan_with(
    buckets: &[Bucket],
    target_root: &Path,
    config: &PlanConfig,
) -> Result<Vec<PlanEntry>> {
    config.validate()?;

    let total: usize = buckets.iter().map(Bucket::len).sum();
    let mut entries = Vec::with_capacity(total);
    // Files already planned under each label
    let mut used: HashMap<String, usize> = HashMap::new();

    for bucket in buckets.iter().filter(|b| !b.is_empty()) {
        let name = bucket_name(bucket)?;
        let bucket_dir = target_root.join(&name);
        let offset = used.entry(name).or_insert(0);

        if *offset > 0 {
            tracing::warn!(
                bucket = bucket.index,
                dir = %bucket_dir.display(),
                continue_at = *offset + 1,
                "Bucket label already used; continuing its numbering"
            );
        }

        for (position, record) in bucket.files.iter().enumerate() {
            entries.push(PlanEntry::new(
                record.path.clone(),
                bucket_dir.join(config.relative_path(*offset + position)),
            ));
        }
        *offset += bucket.len();

        tracing::debug!(
            bucket = bucket.index,
            dir = %bucket_dir.display(),
            files = bucket.len(),
            shards = offset.div_ceil(config.shard_size),
            "Planned bucket"
        );
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::assign_records;
    use crate::vfs::FileRecord;

    fn bucket(index: usize, sizes: &[u64]) -> Bucket {
        let mut bucket = Bucket::new(index);
        bucket.files = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| FileRecord::new(format!("in/{}-{}.pdf", index, i), *size))
            .collect();
        bucket
    }

    #[test]
    fn test_default_layout() {
        let buckets = vec![bucket(0, &[4096, 2048])];
        let entries = plan(&buckets, Path::new("/out")).unwrap();

        assert_eq!(
            entries,
            vec![
                PlanEntry::new("in/0-0.pdf", "/out/2KB-4KB/0001/0001.pdf"),
                PlanEntry::new("in/0-1.pdf", "/out/2KB-4KB/0001/0002.pdf"),
            ]
        );
    }

    #[test]
    fn test_sharding_continues_sequence() {
        let buckets = vec![bucket(0, &[50, 40, 30, 20, 10])];
        let config = PlanConfig {
            shard_size: 2,
            ..PlanConfig::default()
        };
        let entries = plan_with(&buckets, Path::new("t"), &config).unwrap();

        let outputs: Vec<_> = entries
            .iter()
            .map(|e| e.output_path.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            outputs,
            vec![
                "t/10bytes-50bytes/0001/0001.pdf",
                "t/10bytes-50bytes/0001/0002.pdf",
                "t/10bytes-50bytes/0002/0003.pdf",
                "t/10bytes-50bytes/0002/0004.pdf",
                "t/10bytes-50bytes/0003/0005.pdf",
            ]
        );
    }

    #[test]
    fn test_sequence_beyond_four_digits() {
        let config = PlanConfig {
            shard_size: 10_000,
            ..PlanConfig::default()
        };
        assert_eq!(
            config.relative_path(9_999),
            Path::new("0001").join("10000.pdf")
        );
        assert_eq!(
            config.relative_path(10_000),
            Path::new("0002").join("10001.pdf")
        );
    }

    #[test]
    fn test_empty_buckets_are_skipped() {
        let records: Vec<FileRecord> = [30u64, 20, 10]
            .iter()
            .enumerate()
            .map(|(i, s)| FileRecord::new(format!("f{}.pdf", i), *s))
            .collect();
        let buckets = assign_records(records, 10).unwrap();

        let entries = plan(&buckets, Path::new("out")).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0].output_path,
            Path::new("out/30bytes-30bytes/0001/0001.pdf")
        );
        assert_eq!(
            entries[2].output_path,
            Path::new("out/10bytes-20bytes/0001/0002.pdf")
        );
    }

    #[test]
    fn test_shared_label_continues_numbering() {
        // Both buckets humanize to 1KB-1KB
        let buckets = assign_records(
            vec![
                FileRecord::new("d0.pdf", 1900),
                FileRecord::new("d1.pdf", 1800),
                FileRecord::new("d2.pdf", 1100),
                FileRecord::new("d3.pdf", 1050),
            ],
            2,
        )
        .unwrap();
        assert_eq!(bucket_name(&buckets[0]).unwrap(), "1KB-1KB");
        assert_eq!(bucket_name(&buckets[1]).unwrap(), "1KB-1KB");

        let entries = plan(&buckets, Path::new("out")).unwrap();
        let outputs: Vec<_> = entries.iter().map(|e| e.output_path.clone()).collect();
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/1KB-1KB/0001/0001.pdf"),
                PathBuf::from("out/1KB-1KB/0001/0002.pdf"),
                PathBuf::from("out/1KB-1KB/0001/0003.pdf"),
                PathBuf::from("out/1KB-1KB/0001/0004.pdf"),
            ]
        );
    }

    #[test]
    fn test_shared_label_continues_shards() {
        let buckets = vec![bucket(0, &[1900, 1800]), bucket(1, &[1100])];
        let config = PlanConfig {
            shard_size: 2,
            ..PlanConfig::default()
        };
        let entries = plan_with(&buckets, Path::new("o"), &config).unwrap();
        assert_eq!(
            entries[2].output_path,
            PathBuf::from("o/1KB-1KB/0002/0003.pdf")
        );
    }

    #[test]
    fn test_plan_is_deterministic() {
        let buckets = vec![bucket(0, &[9, 8]), bucket(1, &[7, 6, 5])];
        let first = plan(&buckets, Path::new("out")).unwrap();
        let second = plan(&buckets, Path::new("out")).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_custom_extension_and_validation() {
        let buckets = vec![bucket(0, &[1])];
        let config = PlanConfig {
            extension: "bin".to_string(),
            ..PlanConfig::default()
        };
        let entries = plan_with(&buckets, Path::new("o"), &config).unwrap();
        assert!(entries[0].output_path.ends_with("0001/0001.bin"));

        let zero = PlanConfig {
            shard_size: 0,
            ..PlanConfig::default()
        };
        assert!(matches!(
            plan_with(&buckets, Path::new("o"), &zero),
            Err(BucketError::InvalidConfig(_))
        ));

        let dotted = PlanConfig {
            extension: ".pdf".to_string(),
            ..PlanConfig::default()
        };
        assert!(dotted.validate().is_err());
    }
}
