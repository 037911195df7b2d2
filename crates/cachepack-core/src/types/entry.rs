//! Archive entry model and filesystem object classification.

use crate::ArchiveError;
use crate::Result;
use std::fmt;
use std::fs::Metadata;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

/// Kind of an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file with content.
    Regular,
    /// Directory, no content.
    Directory,
    /// Symbolic link; the entry carries the literal link text.
    Symlink,
    /// Hard link to an earlier entry of the same archive (tar only).
    HardLink,
}

impl EntryKind {
    /// Classifies a filesystem object from its `symlink_metadata`.
    ///
    /// Hard links are never produced here: whether a regular file is stored
    /// as a hard link depends on what was already archived, so the tar
    /// writer decides that.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedEntryType` for devices, sockets and fifos.
    pub fn classify(path: &Path, metadata: &Metadata) -> Result<Self> {
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            Ok(Self::Symlink)
        } else if file_type.is_dir() {
            Ok(Self::Directory)
        } else if file_type.is_file() {
            Ok(Self::Regular)
        } else {
            Err(ArchiveError::UnsupportedEntryType {
                path: path.to_path_buf(),
                kind: special_kind_name(metadata).to_string(),
            })
        }
    }
}

#[cfg(unix)]
fn special_kind_name(metadata: &Metadata) -> &'static str {
    use std::os::unix::fs::FileTypeExt;
    let file_type = metadata.file_type();
    if file_type.is_fifo() {
        "fifo"
    } else if file_type.is_socket() {
        "socket"
    } else if file_type.is_char_device() {
        "character device"
    } else if file_type.is_block_device() {
        "block device"
    } else {
        "unknown"
    }
}

#[cfg(not(unix))]
fn special_kind_name(_metadata: &Metadata) -> &'static str {
    "unknown"
}

/// One entry of an archive, as written during encode or observed during
/// decode.
///
/// Names always use forward slashes and are relative; directory names end
/// with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Slash-normalized relative entry name.
    pub name: String,
    /// Entry kind.
    pub kind: EntryKind,
    /// Content size in bytes (0 for directories and links).
    pub size: u64,
    /// Unix permission bits.
    pub mode: u32,
    /// Modification time.
    pub mtime: Option<SystemTime>,
    /// Access time.
    pub atime: Option<SystemTime>,
    /// Change time.
    pub ctime: Option<SystemTime>,
    /// Link text for symlinks, target entry name for hard links.
    pub link_target: Option<String>,
}

impl ArchiveEntry {
    /// Creates an entry of the given kind with empty metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            size: 0,
            mode: 0,
            mtime: None,
            atime: None,
            ctime: None,
            link_target: None,
        }
    }

    /// Sets the link target.
    #[must_use]
    pub fn with_link_target(mut self, target: impl Into<String>) -> Self {
        self.link_target = Some(target.into());
        self
    }

    /// Renders the one-line descriptor used by archive listings.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachepack_core::types::{ArchiveEntry, EntryKind};
    ///
    /// let entry = ArchiveEntry::new("lib/libfoo.so", EntryKind::Symlink)
    ///     .with_link_target("libfoo.so.1");
    /// assert_eq!(entry.descriptor(), "Symlink: lib/libfoo.so -> libfoo.so.1");
    /// ```
    #[must_use]
    pub fn descriptor(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArchiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.link_target.as_deref().unwrap_or_default();
        match self.kind {
            EntryKind::Regular => write!(f, "File: {}", self.name),
            EntryKind::Directory => write!(f, "Dir: {}", self.name),
            EntryKind::Symlink => write!(f, "Symlink: {} -> {target}", self.name),
            EntryKind::HardLink => write!(f, "Hardlink: {} => {target}", self.name),
        }
    }
}

/// A zip symlink whose creation is postponed until every other entry has
/// been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredLink {
    /// Entry name of the link.
    pub name: String,
    /// Link text read from the entry content.
    pub link_text: String,
}

/// Converts a relative filesystem path to an archive entry name.
///
/// Components are joined with `/` on every platform.
#[must_use]
pub fn entry_name(path: &Path) -> String {
    let parts: Vec<_> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    parts.join("/")
}

/// Converts an archive entry name back to a relative path.
#[must_use]
pub fn entry_path(name: &str) -> PathBuf {
    name.split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_descriptors() {
        assert_eq!(
            ArchiveEntry::new("a/b.txt", EntryKind::Regular).descriptor(),
            "File: a/b.txt"
        );
        assert_eq!(
            ArchiveEntry::new("a/", EntryKind::Directory).descriptor(),
            "Dir: a/"
        );
        assert_eq!(
            ArchiveEntry::new("a/copy", EntryKind::HardLink)
                .with_link_target("a/orig")
                .descriptor(),
            "Hardlink: a/copy => a/orig"
        );
    }

    #[test]
    fn test_classify_regular_and_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        fs::write(&file, b"x").unwrap();

        let meta = fs::symlink_metadata(&file).unwrap();
        assert_eq!(EntryKind::classify(&file, &meta).unwrap(), EntryKind::Regular);

        let meta = fs::symlink_metadata(temp.path()).unwrap();
        assert_eq!(
            EntryKind::classify(temp.path(), &meta).unwrap(),
            EntryKind::Directory
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_classify_symlink_is_not_followed() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("dir")).unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink("dir", &link).unwrap();

        let meta = fs::symlink_metadata(&link).unwrap();
        assert_eq!(EntryKind::classify(&link, &meta).unwrap(), EntryKind::Symlink);
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let path: PathBuf = ["base", "sub", "file.txt"].iter().collect();
        assert_eq!(entry_name(&path), "base/sub/file.txt");
    }

    #[test]
    fn test_entry_path_skips_empty_segments() {
        assert_eq!(entry_path("a//b/"), PathBuf::from("a").join("b"));
    }
}
