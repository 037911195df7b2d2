//! Filesystem writes shared by the tar and zip extractors.
//!
//! Every function here takes a [`GuardedPath`]: the caller has already
//! checked containment.

use crate::ArchiveError;
use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::security::GuardedPath;
use crate::types::ArchiveEntry;
use std::fs;
use std::fs::File;
use std::fs::FileTimes;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Removes a symlink left at `path` by an earlier entry, so the write that
/// follows cannot go through it.
fn remove_existing_link(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => Ok(fs::remove_file(path)?),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn open_output(path: &Path, mode: u32) -> io::Result<File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(if mode == 0 { 0o644 } else { mode & 0o777 });
    }
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path)
}

/// Writes one regular file from `reader`, then applies stored timestamps
/// and permission bits.
///
/// A timestamp failure is recorded as a warning; everything else aborts.
pub(crate) fn write_regular<R: Read + ?Sized>(
    target: &GuardedPath,
    reader: &mut R,
    entry: &ArchiveEntry,
    config: &ExtractionConfig,
    report: &mut ExtractionReport,
) -> Result<()> {
    let path = target.absolute();
    ensure_parent(path)?;
    remove_existing_link(path)?;

    let mode = if config.preserve_permissions { entry.mode } else { 0 };
    let file = open_output(path, mode)?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    let written = io::copy(reader, &mut writer)?;
    writer.flush()?;
    let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;

    if config.restore_timestamps
        && let Some(times) = file_times(entry)
        && let Err(source) = file.set_times(times)
    {
        report.record(&ArchiveError::TimestampRestore {
            path: target.relative().to_path_buf(),
            source,
        });
    }

    #[cfg(unix)]
    if config.preserve_permissions && entry.mode != 0 {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(entry.mode & 0o7777))?;
    }

    report.files_extracted += 1;
    report.bytes_written += written;
    Ok(())
}

fn file_times(entry: &ArchiveEntry) -> Option<FileTimes> {
    let modified = entry.mtime?;
    Some(
        FileTimes::new()
            .set_modified(modified)
            .set_accessed(entry.atime.unwrap_or(modified)),
    )
}

/// Creates a directory and its missing parents. The root and directories
/// that already exist are left alone and not counted.
pub(crate) fn create_directory(
    target: &GuardedPath,
    mode: u32,
    report: &mut ExtractionReport,
) -> Result<()> {
    let path = target.absolute();
    if target.is_root() || path.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(if mode == 0 { 0o755 } else { mode & 0o7777 });
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)?;

    report.directories_created += 1;
    Ok(())
}

/// Creates a symlink with the stored (already validated) link text.
///
/// Failures are recorded as warnings and the entry counts as skipped.
pub(crate) fn create_symlink(
    link: &GuardedPath,
    text: &str,
    report: &mut ExtractionReport,
) -> Result<()> {
    let path = link.absolute();
    ensure_parent(path)?;

    if let Err(e) = replace_with_symlink(path, text) {
        report.record(&ArchiveError::LinkResolution {
            path: link.relative().to_path_buf(),
            reason: e.to_string(),
        });
        report.entries_skipped += 1;
        return Ok(());
    }

    report.symlinks_created += 1;
    Ok(())
}

fn replace_with_symlink(path: &Path, text: &str) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir(path)?,
        Ok(_) => fs::remove_file(path)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(text, path)
    }
    #[cfg(not(unix))]
    {
        let _ = text;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symlinks are not supported on this platform",
        ))
    }
}

/// Creates a hard link at `link` pointing to the already extracted
/// `source`.
///
/// A missing source or a failing link call is recorded as a warning and
/// the entry counts as skipped.
pub(crate) fn create_hardlink(
    link: &GuardedPath,
    source: &Path,
    report: &mut ExtractionReport,
) -> Result<()> {
    let skip = |report: &mut ExtractionReport, reason: String| {
        report.record(&ArchiveError::LinkResolution {
            path: link.relative().to_path_buf(),
            reason,
        });
        report.entries_skipped += 1;
    };

    match fs::symlink_metadata(source) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            skip(report, format!("{} is not a regular file", source.display()));
            return Ok(());
        }
        Err(e) => {
            skip(report, format!("{}: {e}", source.display()));
            return Ok(());
        }
    }

    let path = link.absolute();
    ensure_parent(path)?;
    remove_existing_link(path)?;
    if path.exists() {
        fs::remove_file(path)?;
    }

    if let Err(e) = fs::hard_link(source, path) {
        skip(report, e.to_string());
        return Ok(());
    }

    report.hardlinks_created += 1;
    Ok(())
}
