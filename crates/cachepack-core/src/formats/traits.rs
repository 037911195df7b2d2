//! Common trait for archive format codecs.

use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::MatchStrategy;
use crate::Result;
use crate::creation::CreationConfig;
use crate::creation::CreationReport;
use crate::formats::ArchiveFormat;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use std::path::Path;
use std::path::PathBuf;

/// One container format: compress, extract and query.
///
/// Every implementation applies the same guard, unsupported-entry policy
/// and match strategies, so callers can treat formats interchangeably.
pub trait ArchiveCodec {
    /// The format this codec reads and writes.
    fn format(&self) -> ArchiveFormat;

    /// Packs `sources` into a new archive at `output`.
    ///
    /// # Errors
    ///
    /// Fails on a missing source, an unsupported filesystem object, or I/O
    /// errors. The output file may be left truncated.
    fn compress(
        &self,
        output: &Path,
        sources: &[PathBuf],
        config: &CreationConfig,
    ) -> Result<CreationReport>;

    /// Unpacks `archive` under `dest`.
    ///
    /// # Errors
    ///
    /// Fails on containment violations, corrupt input, I/O errors, and
    /// unsupported entries under [`UnsupportedEntryPolicy::Abort`].
    /// Partial output is left in place.
    ///
    /// [`UnsupportedEntryPolicy::Abort`]: crate::UnsupportedEntryPolicy::Abort
    fn extract(
        &self,
        archive: &Path,
        dest: &DestDir,
        config: &ExtractionConfig,
    ) -> Result<ExtractionReport>;

    /// Scans the archive and returns its entries in stream order, without
    /// reading regular file content.
    ///
    /// # Errors
    ///
    /// Fails on corrupt input, I/O errors, and unsupported entries under
    /// [`UnsupportedEntryPolicy::Abort`](crate::UnsupportedEntryPolicy::Abort).
    fn entries(&self, archive: &Path, config: &ExtractionConfig) -> Result<Vec<ArchiveEntry>>;

    /// Returns one descriptor line per entry (`File: `, `Dir: `,
    /// `Symlink: a -> b`, `Hardlink: a => b`).
    ///
    /// # Errors
    ///
    /// Same as [`ArchiveCodec::entries`].
    fn list(&self, archive: &Path, config: &ExtractionConfig) -> Result<Vec<String>> {
        Ok(self
            .entries(archive, config)?
            .iter()
            .map(ArchiveEntry::descriptor)
            .collect())
    }

    /// Returns `true` as soon as an entry matches `query`.
    ///
    /// # Errors
    ///
    /// Fails on corrupt input or I/O errors encountered before a match.
    fn file_in(&self, archive: &Path, query: &str, strategy: MatchStrategy) -> Result<bool>;
}
