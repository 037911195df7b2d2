//! ZIP archive creation.
//!
//! Regular files are Deflate-compressed. Symlinks follow the Unix
//! convention: the link text is stored uncompressed as the entry content
//! and the external attributes carry `S_IFLNK`. Zip has no hard links, so
//! every regular file is stored with its content.

use crate::ArchiveError;
use crate::Result;
use crate::creation::compression::compression_level_to_deflate;
use crate::creation::config::CreationConfig;
use crate::creation::report::CreationReport;
use crate::creation::walker::SourceEntry;
use crate::creation::walker::collect_entries;
use crate::types::EntryKind;
use chrono::Datelike;
use chrono::Timelike;
use std::fs::File;
use std::io::BufWriter;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use std::time::SystemTime;
use tracing::warn;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Creates a ZIP archive.
///
/// # Examples
///
/// ```no_run
/// use cachepack_core::creation::CreationConfig;
/// use cachepack_core::creation::zip::create_zip;
/// use std::path::Path;
///
/// let report = create_zip(Path::new("models.zip"), &[Path::new("models")], &CreationConfig::default())?;
/// println!("Added {} files", report.files_added);
/// # Ok::<(), cachepack_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - A source path does not exist
/// - A source tree contains a device, socket or fifo
/// - The output file cannot be created or written
pub fn create_zip<P: AsRef<Path>>(
    output: &Path,
    sources: &[P],
    config: &CreationConfig,
) -> Result<CreationReport> {
    config.validate()?;
    let start = Instant::now();
    let entries = collect_entries(sources)?;

    let file = File::create(output)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let mut report = CreationReport::default();

    let body = append_entries(&mut zip, &entries, config, &mut report);
    let writer = match (body, zip.finish()) {
        (Ok(()), Ok(writer)) => writer,
        (Ok(()), Err(e)) => {
            return Err(ArchiveError::Io(std::io::Error::other(format!(
                "failed to finish ZIP archive: {e}"
            ))));
        }
        (Err(primary), Ok(_)) => return Err(primary),
        (Err(primary), Err(e)) => {
            warn!("failed to finish ZIP archive after error: {e}");
            return Err(primary);
        }
    };

    let file = writer
        .into_inner()
        .map_err(std::io::IntoInnerError::into_error)?;
    report.bytes_compressed = file.metadata()?.len();
    report.duration = start.elapsed();
    Ok(report)
}

fn append_entries<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entries: &[SourceEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
) -> Result<()> {
    let base = SimpleFileOptions::default();

    for entry in entries {
        let options = with_metadata(base, entry);
        match entry.kind {
            EntryKind::Directory => {
                zip.add_directory(entry.name.as_str(), options)?;
                report.directories_added += 1;
            }
            EntryKind::Symlink => {
                let target = entry
                    .link_target
                    .as_deref()
                    .map(|t| t.to_string_lossy().into_owned())
                    .unwrap_or_default();
                zip.add_symlink(entry.name.as_str(), target.as_str(), options)?;
                report.symlinks_added += 1;
            }
            EntryKind::Regular | EntryKind::HardLink => {
                let size = entry.metadata.len();
                let options = options
                    .compression_method(CompressionMethod::Deflated)
                    .compression_level(compression_level_to_deflate(config.compression_level))
                    .large_file(size >= u64::from(u32::MAX));
                zip.start_file(entry.name.as_str(), options)?;

                let mut file = File::open(&entry.path)?;
                let copied = std::io::copy(&mut file, zip)?;

                report.files_added += 1;
                report.bytes_read += copied;
            }
        }
    }

    Ok(())
}

fn with_metadata(options: SimpleFileOptions, entry: &SourceEntry) -> SimpleFileOptions {
    let options = match entry.metadata.modified().ok().and_then(zip_datetime) {
        Some(time) => options.last_modified_time(time),
        None => options,
    };
    match entry.kind {
        EntryKind::Symlink => options.unix_permissions(0o777),
        _ => options.unix_permissions(permission_bits(entry)),
    }
}

#[cfg(unix)]
fn permission_bits(entry: &SourceEntry) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    entry.metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(entry: &SourceEntry) -> u32 {
    match entry.kind {
        EntryKind::Directory => 0o755,
        _ if entry.metadata.permissions().readonly() => 0o444,
        _ => 0o644,
    }
}

/// Converts a timestamp to the DOS local time stored in zip headers.
///
/// Returns `None` outside the representable range (1980-2107).
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn zip_datetime(time: SystemTime) -> Option<zip::DateTime> {
    let local = chrono::DateTime::<chrono::Local>::from(time);
    let year = u16::try_from(local.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}
