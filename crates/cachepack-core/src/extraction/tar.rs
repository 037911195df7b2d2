//! Streaming tar extraction.

use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::Result;
use crate::extraction::fs;
use crate::formats::tar::TarItem;
use crate::formats::tar::classify_tar;
use crate::formats::tar::tar_entry_name;
use crate::formats::unsupported_entry;
use crate::security::ExtractionGuard;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryKind;
use std::io::Read;
use std::time::Instant;
use tracing::debug;
use tracing::info;

/// Unpacks a decompressed tar stream under `dest`.
///
/// Entries are applied in stream order. Every entry name is checked by the
/// guard before anything touches the filesystem, and link targets are
/// checked before the link is created. Hard links must refer to an entry
/// that appeared earlier in the stream.
///
/// # Errors
///
/// Returns the first containment violation, corrupt header, I/O error, or
/// (under [`UnsupportedEntryPolicy::Abort`]) unsupported entry. Files
/// written before the failure remain on disk.
///
/// [`UnsupportedEntryPolicy::Abort`]: crate::UnsupportedEntryPolicy::Abort
pub fn extract_tar<R: Read>(
    reader: R,
    dest: &DestDir,
    config: &ExtractionConfig,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let guard = ExtractionGuard::new(dest);
    let mut report = ExtractionReport::new();
    let mut archive = tar::Archive::new(reader);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let name = tar_entry_name(&entry);

        let item = classify_tar(&entry, name.clone())?;
        if matches!(item, TarItem::PseudoHeader) {
            debug!("skipping pseudo header {name}");
            continue;
        }

        let target = guard.entry_target(&name)?;

        let archived = match item {
            TarItem::Entry(archived) => archived,
            TarItem::Special(kind) => {
                debug!("skipping {kind} {name}");
                report.entries_skipped += 1;
                continue;
            }
            TarItem::Unknown(flag) => {
                unsupported_entry(
                    config.unsupported_entries,
                    &name,
                    format!("tar type flag {:?}", char::from(flag)),
                )?;
                report.entries_skipped += 1;
                continue;
            }
            TarItem::PseudoHeader => continue,
        };

        match archived.kind {
            EntryKind::Regular => {
                fs::write_regular(&target, &mut entry, &archived, config, &mut report)?;
            }
            EntryKind::Directory => {
                fs::create_directory(&target, archived.mode, &mut report)?;
            }
            EntryKind::Symlink => {
                let text = link_text(&archived);
                guard.symlink_target(&target, text)?;
                fs::create_symlink(&target, text, &mut report)?;
            }
            EntryKind::HardLink => {
                let source = guard.hardlink_source(&target, link_text(&archived))?;
                fs::create_hardlink(&target, &source, &mut report)?;
            }
        }
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

fn link_text(entry: &ArchiveEntry) -> &str {
    entry.link_target.as_deref().unwrap_or_default()
}
