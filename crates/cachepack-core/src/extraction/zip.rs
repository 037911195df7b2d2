//! Two-phase zip extraction.
//!
//! Regular files and directories are written in central directory order
//! while symlinks are buffered; the links are created once every file
//! exists, so a symlink listed before its target still resolves.

use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::extraction::fs;
use crate::formats::unsupported_entry;
use crate::formats::zip::ZipItem;
use crate::formats::zip::classify_zip;
use crate::formats::zip::file_type_name;
use crate::formats::zip::read_link_text;
use crate::security::ExtractionGuard;
use crate::types::DeferredLink;
use crate::types::DestDir;
use crate::types::EntryKind;
use std::io::Read;
use std::io::Seek;
use std::time::Instant;
use tracing::debug;
use tracing::info;
use zip::ZipArchive;

/// Unpacks every entry of `archive` under `dest`.
///
/// # Errors
///
/// Returns the first containment violation, corrupt entry, I/O error, or
/// (under [`UnsupportedEntryPolicy::Abort`]) unsupported entry. Files
/// written before the failure remain on disk and deferred links are not
/// created.
///
/// [`UnsupportedEntryPolicy::Abort`]: crate::UnsupportedEntryPolicy::Abort
pub fn extract_zip<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    dest: &DestDir,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let guard = ExtractionGuard::new(dest);
    let mut report = ExtractionReport::new();
    let mut deferred = Vec::new();

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let name = file.name().to_string();
        let target = guard.entry_target(&name)?;

        let entry = match classify_zip(&file) {
            ZipItem::Entry(entry) => entry,
            ZipItem::Unknown(bits) => {
                unsupported_entry(config.unsupported_entries, &name, file_type_name(bits))?;
                report.entries_skipped += 1;
                continue;
            }
        };

        match entry.kind {
            EntryKind::Regular => {
                fs::write_regular(&target, &mut file, &entry, config, &mut report)?;
            }
            EntryKind::Directory => {
                fs::create_directory(&target, entry.mode, &mut report)?;
            }
            EntryKind::Symlink => {
                let link_text = read_link_text(&mut file)?;
                debug!("deferring symlink {name} -> {link_text}");
                deferred.push(DeferredLink { name, link_text });
            }
            // zip has no hard link representation
            EntryKind::HardLink => report.entries_skipped += 1,
        }
    }

    for link in deferred {
        let target = guard.entry_target(&link.name)?;
        guard.symlink_target(&target, &link.link_text)?;
        fs::create_symlink(&target, &link.link_text, &mut report)?;
    }

    report.duration = start.elapsed();
    info!(
        "extracted {} items into {} in {:?}",
        report.total_items(),
        dest.as_path().display(),
        report.duration
    );
    Ok(report)
}
