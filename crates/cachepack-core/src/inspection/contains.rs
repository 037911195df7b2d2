//! Membership queries that stop at the first matching entry.

use crate::MatchStrategy;
use crate::Result;
use crate::formats::tar::tar_entry_name;
use std::io::Read;
use std::io::Seek;
use zip::ZipArchive;

/// Returns `true` when an entry of the decompressed tar stream matches
/// `query`. Content of non-matching entries is skipped, not read.
///
/// # Errors
///
/// Fails on a corrupt header or I/O error met before a match.
pub fn tar_contains<R: Read>(reader: R, query: &str, strategy: MatchStrategy) -> Result<bool> {
    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries()? {
        if strategy.matches(&tar_entry_name(&entry?), query) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Returns `true` when a central directory name of `archive` matches
/// `query`. No entry content is read.
///
/// # Errors
///
/// Never fails once the archive is open; the signature matches
/// [`tar_contains`].
pub fn zip_contains<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    query: &str,
    strategy: MatchStrategy,
) -> Result<bool> {
    Ok(archive.file_names().any(|name| strategy.matches(name, query)))
}
