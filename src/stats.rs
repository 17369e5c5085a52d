//! Bucket composition statistics for operator visibility.

use crate::bucket::{bucket_name, Bucket};
use crate::error::Result;
use crate::observer::Observer;
use crate::size::humanize;
use serde::{Deserialize, Serialize};

/// Summary of one non-empty bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    pub index: usize,
    pub name: String,
    pub file_count: usize,
    pub total_size: u64,
    /// `total_size / file_count`, truncated
    pub average_size: u64,
    pub total_label: String,
    pub average_label: String,
}

impl BucketStats {
    /// Single report line
    pub fn description(&self) -> String {
        format!(
            "bucket {} [{}]: {} files, total {}, average {}",
            self.index, self.name, self.file_count, self.total_label, self.average_label
        )
    }
}

/// Statistics for every non-empty bucket, in index order.
pub fn report(buckets: &[Bucket]) -> Result<Vec<BucketStats>> {
    buckets
        .iter()
        .filter(|b| !b.is_empty())
        .map(|bucket| -> Result<BucketStats> {
            let file_count = bucket.len();
            let total_size = bucket.total_size();
            let average_size = total_size / file_count as u64;
            Ok(BucketStats {
                index: bucket.index,
                name: bucket_name(bucket)?,
                file_count,
                total_size,
                average_size,
                total_label: humanize(total_size),
                average_label: humanize(average_size),
            })
        })
        .collect()
}

/// Send one line per bucket to `observer`
pub fn emit_report(stats: &[BucketStats], empty_buckets: usize, observer: &dyn Observer) {
    for entry in stats {
        observer.on_event(&entry.description());
    }
    if empty_buckets > 0 {
        observer.on_warning(&format!(
            "{} bucket(s) received no files (fewer files than buckets?)",
            empty_buckets
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::assign_records;
    use crate::observer::testing::RecordingObserver;
    use crate::vfs::FileRecord;

    fn records(sizes: &[u64]) -> Vec<FileRecord> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, s)| FileRecord::new(format!("{}.pdf", i), *s))
            .collect()
    }

    #[test]
    fn test_report_skips_empty_buckets() {
        let buckets = assign_records(records(&[3000, 2048, 1024]), 5).unwrap();
        let stats = report(&buckets).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].index, 0);
        assert_eq!(stats[1].index, 4);
        assert_eq!(stats[1].file_count, 2);
        assert_eq!(stats[1].total_size, 3072);
        assert_eq!(stats[1].average_size, 1536);
        assert_eq!(stats[1].average_label, "1KB");
        assert_eq!(stats[1].total_label, "3KB");
        assert_eq!(stats[1].name, "1KB-2KB");
    }

    #[test]
    fn test_average_truncates() {
        let buckets = assign_records(records(&[10, 5]), 1).unwrap();
        let stats = report(&buckets).unwrap();
        assert_eq!(stats[0].average_size, 7);
        assert_eq!(stats[0].average_label, "7bytes");
    }

    #[test]
    fn test_emit_report() {
        let buckets = assign_records(records(&[10, 5, 1]), 4).unwrap();
        let stats = report(&buckets).unwrap();
        let observer = RecordingObserver::default();

        emit_report(&stats, buckets.len() - stats.len(), &observer);

        assert_eq!(observer.events.borrow().len(), 2);
        assert!(observer.events.borrow()[0].starts_with("bucket 0 [10bytes-10bytes]: 1 files"));
        assert_eq!(observer.warnings.borrow().len(), 1);
    }
}
