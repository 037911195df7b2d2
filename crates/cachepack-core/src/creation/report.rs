//! Archive creation operation reporting.

use std::time::Duration;

/// Report of an archive creation operation.
///
/// # Examples
///
/// ```
/// use cachepack_core::creation::CreationReport;
///
/// let mut report = CreationReport::default();
/// report.files_added = 10;
/// report.bytes_read = 1024;
/// report.bytes_compressed = 512;
///
/// assert_eq!(report.compression_ratio(), 2.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreationReport {
    /// Number of regular files stored with content.
    pub files_added: usize,

    /// Number of directory entries.
    pub directories_added: usize,

    /// Number of symlink entries.
    pub symlinks_added: usize,

    /// Number of hard link entries (tar formats only).
    pub hardlinks_added: usize,

    /// Total bytes of file content read from the sources.
    pub bytes_read: u64,

    /// Size of the finished archive on disk.
    pub bytes_compressed: u64,

    /// Duration of the creation operation.
    pub duration: Duration,
}

impl CreationReport {
    /// Creates a new empty creation report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries written.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added + self.symlinks_added + self.hardlinks_added
    }

    /// Returns the compression ratio (content bytes / archive bytes).
    ///
    /// Returns 0.0 if either side is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.bytes_compressed as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_ratio_edge_cases() {
        let mut report = CreationReport::new();
        assert!(report.compression_ratio().abs() < f64::EPSILON);

        report.bytes_read = 1000;
        report.bytes_compressed = 1000;
        assert!((report.compression_ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_entries() {
        let report = CreationReport {
            files_added: 2,
            directories_added: 1,
            symlinks_added: 1,
            hardlinks_added: 1,
            ..CreationReport::default()
        };
        assert_eq!(report.total_entries(), 5);
    }
}
