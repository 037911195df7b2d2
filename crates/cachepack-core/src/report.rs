//! Extraction operation reporting.

use crate::ArchiveError;
use std::time::Duration;

/// Statistics and non-fatal problems collected during one extraction.
///
/// # Examples
///
/// ```
/// use cachepack_core::ExtractionReport;
///
/// let mut report = ExtractionReport::new();
/// report.files_extracted = 3;
/// report.symlinks_created = 1;
/// assert_eq!(report.total_items(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of regular files written.
    pub files_extracted: usize,

    /// Number of directories created.
    pub directories_created: usize,

    /// Number of symlinks created.
    pub symlinks_created: usize,

    /// Number of hard links created.
    pub hardlinks_created: usize,

    /// Number of entries skipped (special nodes, unsupported types,
    /// unresolvable links).
    pub entries_skipped: usize,

    /// Total bytes of regular file content written.
    pub bytes_written: u64,

    /// Duration of the extraction.
    pub duration: Duration,

    /// Warnings generated during extraction.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Records a recoverable error as a warning.
    pub(crate) fn record(&mut self, err: &ArchiveError) {
        tracing::warn!("{err}");
        self.add_warning(err.to_string());
    }

    /// Returns the number of filesystem objects created.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted
            + self.directories_created
            + self.symlinks_created
            + self.hardlinks_created
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
