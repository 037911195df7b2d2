//! Source tree walking.
//!
//! Turns each source argument into the ordered, typed entry sequence the
//! archive writers consume. Directories come before their contents and
//! siblings are sorted by file name so archives are reproducible.

use crate::ArchiveError;
use crate::Result;
use crate::types::EntryKind;
use crate::types::entry_name;
use std::fs::Metadata;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// A filesystem object ready to be written to an archive.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// Filesystem path of the object.
    pub path: PathBuf,
    /// Archive entry name. Directory names end with `/`.
    pub name: String,
    /// Classified kind (never `HardLink`; see the tar writer).
    pub kind: EntryKind,
    /// Metadata of the object itself (symlinks are not followed).
    pub metadata: Metadata,
    /// Literal link text for symlinks.
    pub link_target: Option<PathBuf>,
}

/// Walks one source argument.
///
/// A directory source named `base` produces `base/` followed by
/// `base/<relative path>` for every node below it. A file or symlink source
/// produces a single entry named by its file name.
///
/// # Examples
///
/// ```no_run
/// use cachepack_core::creation::walker::TreeWalker;
/// use std::path::Path;
///
/// for entry in TreeWalker::new(Path::new("./venv")).walk() {
///     let entry = entry?;
///     println!("{}", entry.name);
/// }
/// # Ok::<(), cachepack_core::ArchiveError>(())
/// ```
pub struct TreeWalker<'a> {
    source: &'a Path,
}

impl<'a> TreeWalker<'a> {
    /// Creates a walker for the given source path.
    #[must_use]
    pub fn new(source: &'a Path) -> Self {
        Self { source }
    }

    /// Returns an iterator over the entries of the source.
    ///
    /// # Errors
    ///
    /// Items are errors when metadata or link text cannot be read, and
    /// `UnsupportedEntryType` for devices, sockets and fifos.
    pub fn walk(&self) -> impl Iterator<Item = Result<SourceEntry>> + '_ {
        let base = base_name(self.source);
        WalkDir::new(self.source)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => self.build_entry(&entry, base.as_deref()).transpose(),
                Err(e) => Some(Err(e.into())),
            })
    }

    fn build_entry(
        &self,
        entry: &walkdir::DirEntry,
        base: Option<&str>,
    ) -> Result<Option<SourceEntry>> {
        let path = entry.path().to_path_buf();
        let metadata = entry.metadata()?;
        let kind = EntryKind::classify(&path, &metadata)?;

        let relative = path.strip_prefix(self.source).unwrap_or(&path);
        let mut name = match (base, relative.as_os_str().is_empty()) {
            (Some(base), true) => base.to_string(),
            (Some(base), false) => format!("{base}/{}", entry_name(relative)),
            (None, true) => return Ok(None),
            (None, false) => entry_name(relative),
        };

        let link_target = match kind {
            EntryKind::Symlink => Some(read_link(&path)?),
            EntryKind::Directory => {
                name.push('/');
                None
            }
            _ => None,
        };

        Ok(Some(SourceEntry {
            path,
            name,
            kind,
            metadata,
            link_target,
        }))
    }
}

/// Collects the entries of every source, in argument order.
///
/// # Errors
///
/// Returns `SourceNotFound` if a source does not exist, and any error the
/// walk produces. The first unsupported node aborts the whole collection.
pub fn collect_entries<P: AsRef<Path>>(sources: &[P]) -> Result<Vec<SourceEntry>> {
    let mut entries = Vec::new();

    for source in sources {
        let path = source.as_ref();
        let metadata = std::fs::symlink_metadata(path).map_err(|_| ArchiveError::SourceNotFound {
            path: path.to_path_buf(),
        })?;

        if path.is_dir() {
            for entry in TreeWalker::new(path).walk() {
                entries.push(entry?);
            }
        } else {
            let kind = EntryKind::classify(path, &metadata)?;
            let link_target = if kind == EntryKind::Symlink {
                Some(read_link(path)?)
            } else {
                None
            };
            let name = base_name(path).ok_or_else(|| ArchiveError::SourceNotFound {
                path: path.to_path_buf(),
            })?;
            entries.push(SourceEntry {
                path: path.to_path_buf(),
                name,
                kind,
                metadata,
                link_target,
            });
        }
    }

    Ok(entries)
}

/// Returns the name a source is archived under: its final component, or
/// the final component of its canonical form for `.` and similar paths.
fn base_name(path: &Path) -> Option<String> {
    let from = |p: &Path| {
        p.file_name()
            .map(|name| name.to_string_lossy().into_owned())
    };
    from(path).or_else(|| path.canonicalize().ok().as_deref().and_then(from))
}

fn read_link(path: &Path) -> Result<PathBuf> {
    std::fs::read_link(path).map_err(|e| {
        ArchiveError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot read symlink target for {}: {e}", path.display()),
        ))
    })
}
