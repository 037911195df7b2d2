//! ZIP codec and entry classification.

use crate::ArchiveError;
use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::MatchStrategy;
use crate::Result;
use crate::creation::CreationConfig;
use crate::creation::CreationReport;
use crate::creation::zip::create_zip;
use crate::extraction::zip::extract_zip;
use crate::formats::ArchiveFormat;
use crate::formats::traits::ArchiveCodec;
use crate::inspection::contains::zip_contains;
use crate::inspection::list::list_zip;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryKind;
use chrono::TimeZone;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use zip::ZipArchive;
use zip::read::ZipFile;

/// Longest symlink text accepted from a zip entry.
pub(crate) const MAX_LINK_TEXT: u64 = 4096;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFREG: u32 = 0o100_000;

/// What a zip entry describes.
#[derive(Debug)]
pub(crate) enum ZipItem {
    /// A regular file, directory or symlink. Symlinks have no target yet;
    /// it is the entry content.
    Entry(ArchiveEntry),
    /// Unix mode bits name a device, socket or fifo.
    Unknown(u32),
}

/// Classifies a zip entry from its name and Unix mode bits.
pub(crate) fn classify_zip<R: Read>(file: &ZipFile<'_, R>) -> ZipItem {
    let name = file.name().to_string();
    let unix_mode = file.unix_mode();
    let file_type = unix_mode.map_or(0, |mode| mode & S_IFMT);

    let kind = match file_type {
        S_IFLNK => EntryKind::Symlink,
        S_IFDIR => EntryKind::Directory,
        0 | S_IFREG if file.is_dir() => EntryKind::Directory,
        0 | S_IFREG => EntryKind::Regular,
        other => return ZipItem::Unknown(other),
    };

    let default_mode = if kind == EntryKind::Directory { 0o755 } else { 0o644 };
    ZipItem::Entry(ArchiveEntry {
        name,
        kind,
        size: file.size(),
        mode: unix_mode.map_or(default_mode, |mode| mode & 0o7777),
        mtime: file.last_modified().and_then(from_zip_datetime),
        atime: None,
        ctime: None,
        link_target: None,
    })
}

/// Reads symlink text from the entry content into a bounded buffer.
pub(crate) fn read_link_text<R: Read>(file: &mut ZipFile<'_, R>) -> Result<String> {
    let size = file.size();
    if size > MAX_LINK_TEXT {
        return Err(ArchiveError::InvalidArchive(format!(
            "symlink {} has {size} bytes of target text",
            file.name()
        )));
    }
    let mut text = Vec::with_capacity(usize::try_from(size).unwrap_or_default());
    file.take(MAX_LINK_TEXT).read_to_end(&mut text)?;
    Ok(String::from_utf8_lossy(&text).into_owned())
}

/// Describes Unix file type bits for error messages.
pub(crate) fn file_type_name(bits: u32) -> String {
    match bits {
        0o010_000 => "fifo".to_string(),
        0o020_000 => "character device".to_string(),
        0o060_000 => "block device".to_string(),
        0o140_000 => "socket".to_string(),
        other => format!("unix file type {other:#o}"),
    }
}

/// Converts the DOS local time of a zip header back to a timestamp.
fn from_zip_datetime(time: zip::DateTime) -> Option<SystemTime> {
    let naive = chrono::NaiveDate::from_ymd_opt(
        i32::from(time.year()),
        u32::from(time.month()),
        u32::from(time.day()),
    )?
    .and_hms_opt(
        u32::from(time.hour()),
        u32::from(time.minute()),
        u32::from(time.second()),
    )?;
    let local = chrono::Local.from_local_datetime(&naive).earliest()?;
    Some(SystemTime::from(local))
}

pub(crate) fn open_zip(archive: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(archive)?;
    Ok(ZipArchive::new(BufReader::new(file))?)
}

/// ZIP archive (`.zip`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Zip;

impl ArchiveCodec for Zip {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }

    fn compress(
        &self,
        output: &Path,
        sources: &[PathBuf],
        config: &CreationConfig,
    ) -> Result<CreationReport> {
        create_zip(output, sources, config)
    }

    fn extract(
        &self,
        archive: &Path,
        dest: &DestDir,
        config: &ExtractionConfig,
    ) -> Result<ExtractionReport> {
        extract_zip(&mut open_zip(archive)?, dest, config)
    }

    fn entries(&self, archive: &Path, config: &ExtractionConfig) -> Result<Vec<ArchiveEntry>> {
        list_zip(&mut open_zip(archive)?, config)
    }

    fn file_in(&self, archive: &Path, query: &str, strategy: MatchStrategy) -> Result<bool> {
        zip_contains(&mut open_zip(archive)?, query, strategy)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::creation::zip::zip_datetime;
    use std::io::Cursor;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn single_entry_zip(name: &str, mode: u32, data: &[u8]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().unix_permissions(mode);
        zip.start_file(name, options).unwrap();
        zip.write_all(data).unwrap();
        zip.finish().unwrap().into_inner()
    }

    /// Overwrites the external attributes of the first central directory
    /// record, which carry the full Unix mode including file type bits.
    fn set_unix_mode(bytes: &mut [u8], mode: u32) {
        let pos = bytes.windows(4).position(|w| w == b"PK\x01\x02").unwrap();
        bytes[pos + 38..pos + 42].copy_from_slice(&(mode << 16).to_le_bytes());
    }

    #[test]
    fn test_classify_regular_file() {
        let bytes = single_entry_zip("a/b.txt", 0o640, b"hello");
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let file = archive.by_index(0).unwrap();

        let ZipItem::Entry(entry) = classify_zip(&file) else {
            panic!("expected entry");
        };
        assert_eq!(entry.kind, EntryKind::Regular);
        assert_eq!(entry.mode, 0o640);
        assert_eq!(entry.size, 5);
    }

    #[test]
    fn test_read_link_text() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.add_symlink("lib/link", "../real", SimpleFileOptions::default())
            .unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_index(0).unwrap();
        let ZipItem::Entry(entry) = classify_zip(&file) else {
            panic!("expected entry");
        };
        assert_eq!(entry.kind, EntryKind::Symlink);
        assert_eq!(read_link_text(&mut file).unwrap(), "../real");
    }

    #[test]
    fn test_oversized_link_text_rejected() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.add_symlink("big", "x".repeat(5000), SimpleFileOptions::default())
            .unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_index(0).unwrap();
        assert!(matches!(
            read_link_text(&mut file),
            Err(ArchiveError::InvalidArchive(_))
        ));
    }

    #[test]
    fn test_fifo_mode_is_unknown() {
        let mut bytes = single_entry_zip("pipe", 0o644, b"");
        set_unix_mode(&mut bytes, 0o010_644);
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let file = archive.by_index(0).unwrap();
        assert!(matches!(classify_zip(&file), ZipItem::Unknown(0o010_000)));
        assert_eq!(file_type_name(0o010_000), "fifo");
    }

    #[test]
    fn test_datetime_conversion_round_trip() {
        let now = SystemTime::now();
        let dos = zip_datetime(now).unwrap();
        let back = from_zip_datetime(dos).unwrap();
        let drift = now
            .duration_since(back)
            .unwrap_or_else(|e| e.duration());
        assert!(drift.as_secs() <= 2);
    }
}
