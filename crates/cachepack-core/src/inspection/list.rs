//! Archive listing without extraction.

use crate::ExtractionConfig;
use crate::Result;
use crate::formats::tar::TarItem;
use crate::formats::tar::classify_tar;
use crate::formats::tar::tar_entry_name;
use crate::formats::unsupported_entry;
use crate::formats::zip::ZipItem;
use crate::formats::zip::classify_zip;
use crate::formats::zip::file_type_name;
use crate::formats::zip::read_link_text;
use crate::types::ArchiveEntry;
use crate::types::EntryKind;
use std::io::Read;
use std::io::Seek;
use tracing::debug;
use zip::ZipArchive;

/// Collects the entries of a decompressed tar stream in stream order.
///
/// Pseudo headers and special nodes are left out. Entries with an unknown
/// type flag are left out under
/// [`UnsupportedEntryPolicy::Skip`](crate::UnsupportedEntryPolicy::Skip).
///
/// # Errors
///
/// Fails on a corrupt header, an I/O error, or an unknown type flag under
/// [`UnsupportedEntryPolicy::Abort`](crate::UnsupportedEntryPolicy::Abort).
pub fn list_tar<R: Read>(reader: R, config: &ExtractionConfig) -> Result<Vec<ArchiveEntry>> {
    let mut archive = tar::Archive::new(reader);
    let mut entries = Vec::new();

    for entry in archive.entries()? {
        let entry = entry?;
        let name = tar_entry_name(&entry);
        match classify_tar(&entry, name.clone())? {
            TarItem::Entry(archived) => entries.push(archived),
            TarItem::Special(kind) => debug!("not listing {kind} {name}"),
            TarItem::PseudoHeader => {}
            TarItem::Unknown(flag) => unsupported_entry(
                config.unsupported_entries,
                &name,
                format!("tar type flag {:?}", char::from(flag)),
            )?,
        }
    }

    Ok(entries)
}

/// Collects the entries of a zip archive in central directory order.
///
/// Symlink text is read from the entry content into
/// [`ArchiveEntry::link_target`].
///
/// # Errors
///
/// Fails on a corrupt entry, an oversized symlink, an I/O error, or a
/// device/socket/fifo entry under
/// [`UnsupportedEntryPolicy::Abort`](crate::UnsupportedEntryPolicy::Abort).
pub fn list_zip<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    config: &ExtractionConfig,
) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        match classify_zip(&file) {
            ZipItem::Entry(mut entry) => {
                if entry.kind == EntryKind::Symlink {
                    entry.link_target = Some(read_link_text(&mut file)?);
                }
                entries.push(entry);
            }
            ZipItem::Unknown(bits) => {
                unsupported_entry(config.unsupported_entries, file.name(), file_type_name(bits))?;
            }
        }
    }

    Ok(entries)
}
