//! Size-balanced bucket assignment
//!
//! Files are sorted largest first and dealt into `num_buckets` buckets of
//! `total / num_buckets` files each, with the last bucket taking whatever
//! remains. Bucket 0 therefore always holds the globally largest files.
//!
//! When there are fewer files than buckets, `files_per_bucket` is zero:
//! the first file stays in bucket 0 and every later file goes straight to
//! the last bucket, leaving the buckets in between empty. That skew is the
//! defined behavior and is kept on purpose.

use crate::error::{BucketError, Result};
use crate::observer::{NullObserver, Observer};
use crate::size::humanize;
use crate::vfs::FileRecord;
use std::path::PathBuf;

/// Files assigned together, largest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Position in the bucket list (0 holds the largest files)
    pub index: usize,
    /// Members in descending size order
    pub files: Vec<FileRecord>,
}

impl Bucket {
    /// Create an empty bucket
    pub fn new(index: usize) -> Self {
        Self {
            index,
            files: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Largest member (first assigned)
    pub fn largest(&self) -> Option<&FileRecord> {
        self.files.first()
    }

    /// Smallest member (last assigned)
    pub fn smallest(&self) -> Option<&FileRecord> {
        self.files.last()
    }

    /// `(min, max)` member sizes, `None` when empty
    pub fn size_range(&self) -> Option<(u64, u64)> {
        Some((self.smallest()?.size, self.largest()?.size))
    }

    /// Sum of member sizes
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Directory label for a bucket: `"{humanize(min)}-{humanize(max)}"`.
pub fn bucket_name(bucket: &Bucket) -> Result<String> {
    let (min, max) = bucket
        .size_range()
        .ok_or(BucketError::EmptyBucket {
            index: bucket.index,
        })?;
    Ok(format!("{}-{}", humanize(min), humanize(max)))
}

/// Read sizes for `files` and deal them into `num_buckets` buckets.
///
/// A file that cannot be sized aborts the whole assignment.
pub fn assign_buckets(files: Vec<PathBuf>, num_buckets: usize) -> Result<Vec<Bucket>> {
    assign_buckets_with(files, num_buckets, &NullObserver)
}

/// [`assign_buckets`], reporting each size read as `"size"` progress.
pub fn assign_buckets_with(
    files: Vec<PathBuf>,
    num_buckets: usize,
    observer: &dyn Observer,
) -> Result<Vec<Bucket>> {
    check_bucket_count(num_buckets)?;

    let total = files.len();
    let mut records = Vec::with_capacity(total);
    for (done, path) in files.iter().enumerate() {
        records.push(FileRecord::read(path)?);
        observer.on_progress("size", done + 1, total);
    }

    assign_records(records, num_buckets)
}

/// Deal already-sized records into `num_buckets` buckets.
///
/// The sort is stable, so equal sizes keep their input order.
pub fn assign_records(mut records: Vec<FileRecord>, num_buckets: usize) -> Result<Vec<Bucket>> {
    check_bucket_count(num_buckets)?;

    records.sort_by(|a, b| b.size.cmp(&a.size));

    let files_per_bucket = records.len() / num_buckets;
    let last = num_buckets - 1;

    let mut buckets: Vec<Bucket> = (0..num_buckets).map(Bucket::new).collect();
    let mut current = 0;
    let mut count = 0;

    for record in records {
        if count >= files_per_bucket && current < last {
            current += 1;
            count = 0;
        }
        buckets[current].files.push(record);
        count += 1;
    }

    tracing::debug!(
        buckets = num_buckets,
        files_per_bucket,
        last_bucket = buckets[last].len(),
        "Assigned buckets"
    );

    Ok(buckets)
}

fn check_bucket_count(num_buckets: usize) -> Result<()> {
    if num_buckets == 0 {
        return Err(BucketError::InvalidConfig(
            "number of buckets must be at least 1".to_string(),
        ));
    }
    Ok(())
}
