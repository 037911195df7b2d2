//! Error conversion utilities for CLI.
//!
//! Turns typed `ArchiveError`s into contextual anyhow errors with a hint
//! on what to do next.

use anyhow::anyhow;
use cachepack_core::ArchiveError;
use std::path::Path;

/// Converts `ArchiveError` to a user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, archive: &Path) -> anyhow::Error {
    match err {
        ArchiveError::PathTraversal { path } => anyhow!(
            "Security violation: Archive '{}' attempted path traversal with '{}'\n\
             HINT: This archive may be malicious. Do not extract from untrusted sources.",
            archive.display(),
            path.display()
        ),
        ArchiveError::SymlinkEscape { path, target } => anyhow!(
            "Security violation: Symlink '{}' in '{}' points outside the destination ({})\n\
             HINT: This archive may be malicious. Do not extract from untrusted sources.",
            path.display(),
            archive.display(),
            target.display()
        ),
        ArchiveError::HardlinkEscape { path, target } => anyhow!(
            "Security violation: Hard link '{}' in '{}' targets a path outside the destination ({})\n\
             HINT: This archive may be malicious. Do not extract from untrusted sources.",
            path.display(),
            archive.display(),
            target.display()
        ),
        ArchiveError::UnsupportedFormat { .. } => anyhow!(
            "Archive format not supported: {}\n\
             HINT: Supported formats: .tar.gz, .tgz, .tar.zst, .tzst, .zip",
            archive.display()
        ),
        ArchiveError::UnsupportedEntryType { path, kind } => anyhow!(
            "Unsupported entry '{}' ({kind}) in '{}'\n\
             HINT: Omit --abort-on-unsupported to skip entries of unknown type.",
            path.display(),
            archive.display()
        ),
        ArchiveError::SourceNotFound { path } => anyhow!(
            "Source not found while creating '{}': {}\n\
             HINT: Check that every SOURCE path exists.",
            archive.display(),
            path.display()
        ),
        ArchiveError::InvalidArchive(reason) => anyhow!(
            "Invalid archive '{}': {reason}\n\
             HINT: The archive may be corrupted or truncated.",
            archive.display()
        ),
        ArchiveError::Io(io_err) => anyhow!(
            "I/O error while processing '{}': {io_err}",
            archive.display()
        ),
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Adds archive context to a core result
pub fn add_archive_context<T>(
    result: cachepack_core::Result<T>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, archive))
}
