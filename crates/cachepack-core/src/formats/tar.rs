//! TAR codecs (gzip and zstd framing) and header classification.

use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::MatchStrategy;
use crate::Result;
use crate::codec;
use crate::creation::CreationConfig;
use crate::creation::CreationReport;
use crate::creation::tar::create_tar_gz;
use crate::creation::tar::create_tar_zst;
use crate::extraction::tar::extract_tar;
use crate::formats::ArchiveFormat;
use crate::formats::traits::ArchiveCodec;
use crate::inspection::contains::tar_contains;
use crate::inspection::list::list_tar;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryKind;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::SystemTime;
use tar::Header;

/// What a tar header describes.
#[derive(Debug)]
pub(crate) enum TarItem {
    /// A regular file, directory, symlink or hard link.
    Entry(ArchiveEntry),
    /// A character device, block device or fifo. Always skipped.
    Special(&'static str),
    /// PAX extended or global header, or a GNU long-name record.
    PseudoHeader,
    /// Any other type flag.
    Unknown(u8),
}

/// Reads the (possibly long) name of a tar entry. Directory names get a
/// trailing `/` when the archive omitted it.
pub(crate) fn tar_entry_name<R: Read>(entry: &tar::Entry<'_, R>) -> String {
    let mut name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
    if entry.header().entry_type().is_dir() && !name.ends_with('/') {
        name.push('/');
    }
    name
}

/// Maps a tar header to an [`ArchiveEntry`] or one of the skip classes.
pub(crate) fn classify_tar<R: Read>(entry: &tar::Entry<'_, R>, name: String) -> Result<TarItem> {
    let header = entry.header();
    let entry_type = header.entry_type();

    let kind = match entry_type {
        tar::EntryType::Regular | tar::EntryType::Continuous => EntryKind::Regular,
        tar::EntryType::Directory => EntryKind::Directory,
        tar::EntryType::Symlink => EntryKind::Symlink,
        tar::EntryType::Link => EntryKind::HardLink,
        tar::EntryType::Char => return Ok(TarItem::Special("character device")),
        tar::EntryType::Block => return Ok(TarItem::Special("block device")),
        tar::EntryType::Fifo => return Ok(TarItem::Special("fifo")),
        tar::EntryType::XHeader
        | tar::EntryType::XGlobalHeader
        | tar::EntryType::GNULongName
        | tar::EntryType::GNULongLink => return Ok(TarItem::PseudoHeader),
        other => return Ok(TarItem::Unknown(other.as_byte())),
    };

    let link_target = match kind {
        EntryKind::Symlink | EntryKind::HardLink => entry
            .link_name_bytes()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
        _ => None,
    };

    Ok(TarItem::Entry(ArchiveEntry {
        name,
        kind,
        size: header.size()?,
        mode: header.mode()?,
        mtime: Some(epoch_seconds(header.mtime()?)),
        atime: gnu_time(header, |gnu| gnu.atime().ok()),
        ctime: gnu_time(header, |gnu| gnu.ctime().ok()),
        link_target,
    }))
}

fn gnu_time(header: &Header, read: impl Fn(&tar::GnuHeader) -> Option<u64>) -> Option<SystemTime> {
    header
        .as_gnu()
        .and_then(read)
        .filter(|secs| *secs > 0)
        .map(epoch_seconds)
}

fn epoch_seconds(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

fn open_buffered(archive: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(archive)?))
}

/// Gzip-compressed tar (`.tar.gz`, `.tgz`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGz;

impl ArchiveCodec for TarGz {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::TarGz
    }

    fn compress(
        &self,
        output: &Path,
        sources: &[PathBuf],
        config: &CreationConfig,
    ) -> Result<CreationReport> {
        create_tar_gz(output, sources, config)
    }

    fn extract(
        &self,
        archive: &Path,
        dest: &DestDir,
        config: &ExtractionConfig,
    ) -> Result<ExtractionReport> {
        let decoder = flate2::read::GzDecoder::new(open_buffered(archive)?);
        extract_tar(decoder, dest, config)
    }

    fn entries(&self, archive: &Path, config: &ExtractionConfig) -> Result<Vec<ArchiveEntry>> {
        let decoder = flate2::read::GzDecoder::new(open_buffered(archive)?);
        list_tar(decoder, config)
    }

    fn file_in(&self, archive: &Path, query: &str, strategy: MatchStrategy) -> Result<bool> {
        let decoder = flate2::read::GzDecoder::new(open_buffered(archive)?);
        tar_contains(decoder, query, strategy)
    }
}

/// Zstd-compressed tar (`.tar.zst`, `.tzst`).
///
/// Decompression contexts are borrowed from the shared pool for the
/// duration of each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarZst;

impl ArchiveCodec for TarZst {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::TarZst
    }

    fn compress(
        &self,
        output: &Path,
        sources: &[PathBuf],
        config: &CreationConfig,
    ) -> Result<CreationReport> {
        create_tar_zst(output, sources, config)
    }

    fn extract(
        &self,
        archive: &Path,
        dest: &DestDir,
        config: &ExtractionConfig,
    ) -> Result<ExtractionReport> {
        let mut ctx = codec::zstd_read_context()?;
        let decoder = codec::zstd_decoder(open_buffered(archive)?, &mut ctx);
        extract_tar(decoder, dest, config)
    }

    fn entries(&self, archive: &Path, config: &ExtractionConfig) -> Result<Vec<ArchiveEntry>> {
        let mut ctx = codec::zstd_read_context()?;
        let decoder = codec::zstd_decoder(open_buffered(archive)?, &mut ctx);
        list_tar(decoder, config)
    }

    fn file_in(&self, archive: &Path, query: &str, strategy: MatchStrategy) -> Result<bool> {
        let mut ctx = codec::zstd_read_context()?;
        let decoder = codec::zstd_decoder(open_buffered(archive)?, &mut ctx);
        tar_contains(decoder, query, strategy)
    }
}
