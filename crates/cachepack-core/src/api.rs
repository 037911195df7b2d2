//! High-level operations with format detection.
//!
//! Each function picks the codec from the archive's file name and
//! delegates to it.

use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::MatchStrategy;
use crate::Result;
use crate::creation::CreationConfig;
use crate::creation::CreationReport;
use crate::formats::codec_for;
use crate::formats::detect_format;
use crate::types::DestDir;
use std::path::Path;
use std::path::PathBuf;
use tracing::info;

/// Packs files and directories into a new archive.
///
/// The format follows the extension of `output`. A directory source is
/// stored under its own name with its whole tree; a file source is stored
/// under its base name.
///
/// # Errors
///
/// Returns an error if:
/// - The output extension is not a supported format
/// - A source does not exist
/// - A source tree contains a device, socket or fifo
/// - The compression level is out of range
/// - I/O fails
///
/// # Examples
///
/// ```no_run
/// use cachepack_core::creation::CreationConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = cachepack_core::compress(
///     "/tmp/venv.tar.zst",
///     &["/opt/app/.venv"],
///     &CreationConfig::default(),
/// )?;
/// println!("Packed {} entries", report.total_entries());
/// # Ok(())
/// # }
/// ```
pub fn compress<P: AsRef<Path>, Q: AsRef<Path>>(
    output: P,
    sources: &[Q],
    config: &CreationConfig,
) -> Result<CreationReport> {
    let output = output.as_ref();
    let format = detect_format(output)?;

    let sources: Vec<PathBuf> = sources.iter().map(|s| s.as_ref().to_path_buf()).collect();
    info!(
        "creating {format} archive {} from {} sources",
        output.display(),
        sources.len()
    );
    codec_for(format).compress(output, &sources, config)
}

/// Unpacks an archive under `dest`.
///
/// A leading `~` in `dest` is expanded and the directory is created when
/// missing.
///
/// # Errors
///
/// Returns an error if:
/// - The archive extension is not a supported format
/// - The destination cannot be created or is not writable
/// - An entry name or link target resolves outside `dest`
/// - The archive is corrupt or I/O fails
/// - An unsupported entry is met under
///   [`UnsupportedEntryPolicy::Abort`](crate::UnsupportedEntryPolicy::Abort)
///
/// # Examples
///
/// ```no_run
/// use cachepack_core::ExtractionConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = cachepack_core::extract(
///     "venv.tar.zst",
///     "~/.cache/restore",
///     &ExtractionConfig::default(),
/// )?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    dest: Q,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    let archive = archive.as_ref();
    let format = detect_format(archive)?;
    let dest = DestDir::resolve(dest)?;
    info!(
        "extracting {format} archive {} into {}",
        archive.display(),
        dest.as_path().display()
    );
    codec_for(format).extract(archive, &dest, config)
}

/// Returns one descriptor line per archive entry, in stream order.
///
/// # Errors
///
/// Returns an error for an unsupported extension, a corrupt archive, I/O
/// failures, or an unsupported entry under
/// [`UnsupportedEntryPolicy::Abort`](crate::UnsupportedEntryPolicy::Abort).
pub fn list<P: AsRef<Path>>(archive: P, config: &ExtractionConfig) -> Result<Vec<String>> {
    let archive = archive.as_ref();
    codec_for(detect_format(archive)?).list(archive, config)
}

/// Returns `true` when the archive holds an entry matching `query`.
///
/// # Errors
///
/// Returns an error for an unsupported extension, or a corrupt archive or
/// I/O failure met before a match.
///
/// # Examples
///
/// ```no_run
/// use cachepack_core::MatchStrategy;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// if cachepack_core::file_in("models.zip", "config.json", MatchStrategy::Suffix)? {
///     println!("model config present");
/// }
/// # Ok(())
/// # }
/// ```
pub fn file_in<P: AsRef<Path>>(archive: P, query: &str, strategy: MatchStrategy) -> Result<bool> {
    let archive = archive.as_ref();
    codec_for(detect_format(archive)?).file_in(archive, query, strategy)
}
