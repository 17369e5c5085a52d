//! Size inspection and base-1024 magnitude labels.

use crate::error::{BucketError, Result};
use std::fs;
use std::path::Path;

/// Magnitude suffixes, smallest first.
const UNITS: [&str; 6] = ["bytes", "KB", "MB", "GB", "TB", "PB"];

/// Byte size of a regular file.
///
/// Fails with [`BucketError::NotFound`] when the path does not exist or is
/// not a regular file at call time.
pub fn size_of(path: &Path) -> Result<u64> {
    let metadata =
        fs::metadata(path).map_err(|e| BucketError::io("Failed to read metadata for", path, e))?;

    if !metadata.is_file() {
        return Err(BucketError::NotFound {
            path: path.to_path_buf(),
        });
    }

    Ok(metadata.len())
}

/// Format a byte count as an integer-truncated label such as `"1KB"`.
///
/// Divides by 1024 until the quotient drops below 1024 or the unit list
/// runs out; the integer and unit are joined with no separator.
pub fn humanize(bytes: u64) -> String {
    let mut value = bytes;
    let mut unit = 0;

    while value >= 1024 && unit < UNITS.len() - 1 {
        value /= 1024;
        unit += 1;
    }

    format!("{}{}", value, UNITS[unit])
}
