//! TAR archive creation (gzip and zstd framing).
//!
//! The stream chain is `File -> CountingWriter -> compressor -> tar::Builder`.
//! It is released in reverse order: the tar trailer first, then the
//! compressor.

use crate::ArchiveError;
use crate::Result;
use crate::codec;
use crate::creation::FinishStream;
use crate::creation::compression::compression_level_to_flate2;
use crate::creation::config::CreationConfig;
use crate::creation::report::CreationReport;
use crate::creation::walker::SourceEntry;
use crate::creation::walker::collect_entries;
use crate::io::CountingWriter;
use crate::types::EntryKind;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tar::Builder;
use tar::Header;
use tracing::debug;
use tracing::warn;

/// Creates a gzip-compressed TAR archive (.tar.gz).
///
/// # Examples
///
/// ```no_run
/// use cachepack_core::creation::CreationConfig;
/// use cachepack_core::creation::tar::create_tar_gz;
/// use std::path::Path;
///
/// let config = CreationConfig::default().with_compression_level(9);
/// let report = create_tar_gz(Path::new("venv.tar.gz"), &[Path::new("venv")], &config)?;
/// println!("{} entries", report.total_entries());
/// # Ok::<(), cachepack_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - A source path does not exist
/// - A source tree contains a device, socket or fifo
/// - The output file cannot be created or written
pub fn create_tar_gz<P: AsRef<Path>>(
    output: &Path,
    sources: &[P],
    config: &CreationConfig,
) -> Result<CreationReport> {
    config.validate()?;
    let start = Instant::now();
    let entries = collect_entries(sources)?;

    let file = File::create(output)?;
    let level = compression_level_to_flate2(config.compression_level);
    let encoder = flate2::write::GzEncoder::new(CountingWriter::new(file), level);

    let mut report = CreationReport::default();
    let counting = encode(encoder, &entries, config, &mut report)?;
    finish_report(counting, report, start)
}

/// Creates a zstd-compressed TAR archive (.tar.zst) with content checksums.
///
/// The compression context comes from the shared pool and is returned to it
/// when this call ends.
///
/// # Errors
///
/// Same conditions as [`create_tar_gz`].
pub fn create_tar_zst<P: AsRef<Path>>(
    output: &Path,
    sources: &[P],
    config: &CreationConfig,
) -> Result<CreationReport> {
    config.validate()?;
    let start = Instant::now();
    let entries = collect_entries(sources)?;

    let mut ctx = codec::zstd_write_context(config.compression_level)?;
    let file = File::create(output)?;
    let encoder = codec::zstd_encoder(CountingWriter::new(file), &mut ctx);

    let mut report = CreationReport::default();
    let counting = encode(encoder, &entries, config, &mut report)?;
    finish_report(counting, report, start)
}

/// Writes all entries through `encoder`, then releases the tar container and
/// the compressor.
///
/// A release failure becomes the result only when writing succeeded;
/// otherwise it is logged and the write error is returned.
fn encode<E: FinishStream>(
    encoder: E,
    entries: &[SourceEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
) -> Result<E::Inner> {
    let mut builder = Builder::new(encoder);
    let body = append_entries(&mut builder, entries, config, report);

    match (body, builder.into_inner()) {
        (Ok(()), Ok(encoder)) => encoder
            .finish_stream()
            .map_err(|e| release_error("compressor", &e)),
        (Ok(()), Err(e)) => Err(release_error("tar container", &e)),
        (Err(primary), Ok(encoder)) => {
            if let Err(e) = encoder.finish_stream() {
                warn!("failed to finish compressor after error: {e}");
            }
            Err(primary)
        }
        (Err(primary), Err(e)) => {
            warn!("failed to finish tar container after error: {e}");
            Err(primary)
        }
    }
}

fn release_error(what: &str, e: &std::io::Error) -> ArchiveError {
    ArchiveError::Io(std::io::Error::new(
        e.kind(),
        format!("failed to finish {what}: {e}"),
    ))
}

fn finish_report(
    mut counting: CountingWriter<File>,
    mut report: CreationReport,
    start: Instant,
) -> Result<CreationReport> {
    counting.flush()?;
    report.bytes_compressed = counting.total_bytes();
    report.duration = start.elapsed();
    Ok(report)
}

fn append_entries<W: Write>(
    builder: &mut Builder<W>,
    entries: &[SourceEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
) -> Result<()> {
    let mut seen_inodes = HashMap::new();

    for entry in entries {
        match entry.kind {
            EntryKind::Directory => {
                let mut header = header_for(entry);
                header.set_entry_type(tar::EntryType::Directory);
                header.set_size(0);
                builder.append_data(&mut header, &entry.name, std::io::empty())?;
                report.directories_added += 1;
            }
            EntryKind::Symlink => {
                let target = entry.link_target.as_deref().unwrap_or(Path::new(""));
                let mut header = header_for(entry);
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_size(0);
                builder.append_link(&mut header, &entry.name, target)?;
                report.symlinks_added += 1;
            }
            EntryKind::Regular | EntryKind::HardLink => {
                let first = if config.detect_hard_links {
                    inode_key(entry).and_then(|key| {
                        let first = seen_inodes.get(&key).cloned();
                        seen_inodes.entry(key).or_insert_with(|| entry.name.clone());
                        first
                    })
                } else {
                    None
                };

                match first {
                    Some(first) => {
                        debug!("{} is a hard link to {first}", entry.name);
                        let mut header = header_for(entry);
                        header.set_entry_type(tar::EntryType::Link);
                        header.set_size(0);
                        builder.append_link(&mut header, &entry.name, &first)?;
                        report.hardlinks_added += 1;
                    }
                    None => append_file(builder, entry, report)?,
                }
            }
        }
    }

    Ok(())
}

fn append_file<W: Write>(
    builder: &mut Builder<W>,
    entry: &SourceEntry,
    report: &mut CreationReport,
) -> Result<()> {
    let mut file = File::open(&entry.path)?;
    let size = entry.metadata.len();

    let mut header = header_for(entry);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(size);
    builder.append_data(&mut header, &entry.name, &mut file)?;

    report.files_added += 1;
    report.bytes_read += size;
    Ok(())
}

/// Builds a GNU header carrying mode, ownership and the three timestamps.
#[cfg(unix)]
fn header_for(entry: &SourceEntry) -> Header {
    use std::os::unix::fs::MetadataExt;

    let metadata = &entry.metadata;
    let mut header = Header::new_gnu();
    header.set_mode(metadata.mode() & 0o7777);
    header.set_uid(u64::from(metadata.uid()));
    header.set_gid(u64::from(metadata.gid()));
    // Timestamps before the epoch are clamped to 0
    #[allow(clippy::cast_sign_loss)]
    let (mtime, atime, ctime) = (
        metadata.mtime().max(0) as u64,
        metadata.atime().max(0) as u64,
        metadata.ctime().max(0) as u64,
    );
    header.set_mtime(mtime);
    if let Some(gnu) = header.as_gnu_mut() {
        gnu.set_atime(atime);
        gnu.set_ctime(ctime);
    }
    header
}

#[cfg(not(unix))]
fn header_for(entry: &SourceEntry) -> Header {
    let metadata = &entry.metadata;
    let mut header = Header::new_gnu();
    let mode = match entry.kind {
        EntryKind::Directory => 0o755,
        _ if metadata.permissions().readonly() => 0o444,
        _ => 0o644,
    };
    header.set_mode(mode);
    if let Ok(modified) = metadata.modified()
        && let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH)
    {
        header.set_mtime(duration.as_secs());
    }
    header
}

/// `(device, inode)` of a regular file with more than one link.
#[cfg(unix)]
fn inode_key(entry: &SourceEntry) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    (entry.metadata.nlink() > 1).then(|| (entry.metadata.dev(), entry.metadata.ino()))
}

#[cfg(not(unix))]
fn inode_key(_entry: &SourceEntry) -> Option<(u64, u64)> {
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    fn read_gz_names(path: &Path) -> Vec<(String, tar::EntryType)> {
        let file = File::open(path).unwrap();
        let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|e| {
                let e = e.unwrap();
                let name = String::from_utf8_lossy(&e.path_bytes()).into_owned();
                (name, e.header().entry_type())
            })
            .collect()
    }

    #[test]
    fn test_create_tar_gz_directory() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("pkg");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("a.txt"), "content1").unwrap();
        fs::write(src.join("sub/b.txt"), "content2").unwrap();
        let output = temp.path().join("out.tar.gz");

        let report = create_tar_gz(&output, &[&src], &CreationConfig::default()).unwrap();
        assert_eq!(report.files_added, 2);
        assert_eq!(report.directories_added, 2);
        assert_eq!(report.bytes_read, 16);
        assert!(report.bytes_compressed > 0);
        assert_eq!(report.bytes_compressed, fs::metadata(&output).unwrap().len());

        let names = read_gz_names(&output);
        assert_eq!(
            names,
            vec![
                ("pkg/".to_string(), tar::EntryType::Directory),
                ("pkg/a.txt".to_string(), tar::EntryType::Regular),
                ("pkg/sub/".to_string(), tar::EntryType::Directory),
                ("pkg/sub/b.txt".to_string(), tar::EntryType::Regular),
            ]
        );
    }

    #[test]
    fn test_create_tar_gz_magic_bytes() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("f.txt");
        fs::write(&src, "a".repeat(1000)).unwrap();
        let output = temp.path().join("out.tgz");

        create_tar_gz(&output, &[&src], &CreationConfig::default()).unwrap();
        let data = fs::read(&output).unwrap();
        assert_eq!(&data[0..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_create_tar_zst_is_finished_frame() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("data");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("x.bin"), vec![7u8; 4096]).unwrap();
        let output = temp.path().join("out.tar.zst");

        let report = create_tar_zst(&output, &[&src], &CreationConfig::default()).unwrap();
        assert_eq!(report.files_added, 1);

        let data = fs::read(&output).unwrap();
        assert_eq!(&data[0..4], &[0x28, 0xB5, 0x2F, 0xFD]);

        // Decoding to the end fails on a truncated frame
        let mut decoded = Vec::new();
        zstd::stream::read::Decoder::new(data.as_slice())
            .unwrap()
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded.len() % 512, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_stored_with_literal_target() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("pkg");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("real.so.1"), "elf").unwrap();
        std::os::unix::fs::symlink("real.so.1", src.join("real.so")).unwrap();
        let output = temp.path().join("out.tar.gz");

        let report = create_tar_gz(&output, &[&src], &CreationConfig::default()).unwrap();
        assert_eq!(report.symlinks_added, 1);

        let file = File::open(&output).unwrap();
        let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
        let link = archive
            .entries()
            .unwrap()
            .map(std::result::Result::unwrap)
            .find(|e| e.header().entry_type() == tar::EntryType::Symlink)
            .unwrap();
        assert_eq!(
            link.link_name().unwrap().unwrap().to_str().unwrap(),
            "real.so.1"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_hard_links_detected() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("pkg");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("a"), "shared").unwrap();
        fs::hard_link(src.join("a"), src.join("b")).unwrap();
        let output = temp.path().join("out.tar.gz");

        let report = create_tar_gz(&output, &[&src], &CreationConfig::default()).unwrap();
        assert_eq!(report.files_added, 1);
        assert_eq!(report.hardlinks_added, 1);

        let disabled = CreationConfig::default().with_detect_hard_links(false);
        let report = create_tar_gz(&output, &[&src], &disabled).unwrap();
        assert_eq!(report.files_added, 2);
        assert_eq!(report.hardlinks_added, 0);
    }

    #[test]
    fn test_create_tar_source_not_found() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out.tar.gz");
        let result = create_tar_gz(
            &output,
            &[temp.path().join("missing")],
            &CreationConfig::default(),
        );
        assert!(matches!(result, Err(ArchiveError::SourceNotFound { .. })));
    }

    #[test]
    fn test_compression_levels() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("f.txt");
        fs::write(&src, "a".repeat(10_000)).unwrap();

        for level in [1, 6, 9] {
            let output = temp.path().join(format!("out_{level}.tar.zst"));
            let config = CreationConfig::default().with_compression_level(level);
            let report = create_tar_zst(&output, &[&src], &config).unwrap();
            assert_eq!(report.files_added, 1);
        }
    }
}
