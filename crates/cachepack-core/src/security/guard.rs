//! Containment checks run before every extraction syscall.

use crate::ArchiveError;
use crate::Result;
use crate::types::DestDir;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// An entry target that passed the guard.
///
/// Holds both the normalized relative path and its absolute form under the
/// destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedPath {
    relative: PathBuf,
    absolute: PathBuf,
}

impl GuardedPath {
    /// Normalized path relative to the destination root.
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Absolute path under the destination root.
    #[must_use]
    pub fn absolute(&self) -> &Path {
        &self.absolute
    }

    /// Returns `true` when the entry resolves to the root itself (`./`).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }
}

/// Validates entry names and link targets against one destination root.
///
/// The containment rule is the same for every check: the resolved target
/// must equal the root or lie beneath it, compared component-wise.
///
/// # Examples
///
/// ```no_run
/// use cachepack_core::security::ExtractionGuard;
/// use cachepack_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/restore")?;
/// let guard = ExtractionGuard::new(&dest);
///
/// assert!(guard.entry_target("pkg/bin/tool").is_ok());
/// assert!(guard.entry_target("../../etc/passwd").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExtractionGuard<'a> {
    dest: &'a DestDir,
}

impl<'a> ExtractionGuard<'a> {
    /// Creates a guard for the given destination root.
    #[must_use]
    pub fn new(dest: &'a DestDir) -> Self {
        Self { dest }
    }

    /// Returns the destination root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dest.as_path()
    }

    /// Validates an archive entry name and computes its target path.
    ///
    /// Rejects names that contain a NUL byte, a `..` segment, or a root or
    /// drive prefix, and names whose nearest existing ancestor resolves
    /// outside the root through a symlink already present in the
    /// destination.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::PathTraversal` on any violation.
    pub fn entry_target(&self, name: &str) -> Result<GuardedPath> {
        let traversal = || ArchiveError::PathTraversal {
            path: PathBuf::from(name),
        };

        if name.contains('\0') || has_root_or_prefix(name) {
            return Err(traversal());
        }

        let mut relative = PathBuf::new();
        for part in name.split(['/', '\\']) {
            match part {
                "" | "." => {}
                ".." => return Err(traversal()),
                normal => relative.push(normal),
            }
        }

        let absolute = self.root().join(&relative);
        if !self.ancestors_contained(&absolute)? {
            return Err(traversal());
        }

        Ok(GuardedPath { relative, absolute })
    }

    /// Validates the text of a symlink about to be created at `link`.
    ///
    /// Relative text is resolved against the canonical parent of the link;
    /// absolute text is taken as-is. Symlinks already present in the
    /// destination are followed for every existing prefix of the result,
    /// and the remainder is normalized lexically. The result must stay
    /// inside the root.
    ///
    /// A `..` segment is only accepted before the first named segment of
    /// the text. Anything after a named segment may be replaced by a later
    /// entry, so climbing out of it is refused.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::SymlinkEscape` when the target leaves the
    /// root, and `ArchiveError::Io` when an existing prefix cannot be
    /// resolved.
    pub fn symlink_target(&self, link: &GuardedPath, text: &str) -> Result<PathBuf> {
        let escape = || ArchiveError::SymlinkEscape {
            path: link.relative.clone(),
            target: PathBuf::from(text),
        };

        let target = Path::new(text);
        if text.is_empty() || text.contains('\0') || climbs_after_descending(target) {
            return Err(escape());
        }

        let joined = if target.is_absolute() {
            target.to_path_buf()
        } else {
            let parent = link.absolute.parent().unwrap_or_else(|| self.root());
            resolve_existing(parent)?.join(target)
        };

        let resolved = resolve_existing(&joined)?;
        if resolved.starts_with(self.root()) {
            Ok(resolved)
        } else {
            Err(escape())
        }
    }

    /// Validates the target of a hard link entry and returns the absolute
    /// path of the existing file to link from.
    ///
    /// Hard link targets are archive entry names, so they go through the
    /// same checks as [`ExtractionGuard::entry_target`].
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::HardlinkEscape` when the target leaves the
    /// root.
    pub fn hardlink_source(&self, link: &GuardedPath, target_name: &str) -> Result<PathBuf> {
        match self.entry_target(target_name) {
            Ok(source) if !source.is_root() => Ok(source.absolute),
            Ok(_) | Err(ArchiveError::PathTraversal { .. }) => Err(ArchiveError::HardlinkEscape {
                path: link.relative.clone(),
                target: PathBuf::from(target_name),
            }),
            Err(other) => Err(other),
        }
    }

    /// Canonicalizes the nearest existing ancestor of `absolute` (excluding
    /// `absolute` itself, which may be a symlink about to be replaced) and
    /// checks it is inside the root.
    fn ancestors_contained(&self, absolute: &Path) -> Result<bool> {
        let root = self.root();
        let mut probe = absolute.parent();
        while let Some(dir) = probe {
            if dir == root || !dir.starts_with(root) {
                return Ok(dir.starts_with(root));
            }
            match dir.canonicalize() {
                Ok(canonical) => return Ok(canonical.starts_with(root)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => probe = dir.parent(),
                Err(e) => {
                    return Err(ArchiveError::Io(std::io::Error::new(
                        e.kind(),
                        format!("failed to canonicalize {}: {e}", dir.display()),
                    )));
                }
            }
        }
        Ok(false)
    }
}

/// Resolves `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the filesystem root.
///
/// # Examples
///
/// ```
/// use cachepack_core::security::normalize_lexically;
/// use std::path::Path;
///
/// assert_eq!(
///     normalize_lexically(Path::new("/data/cache/../lib/./x")),
///     Path::new("/data/lib/x")
/// );
/// ```
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Canonicalizes the longest existing prefix of `path` and appends the
/// rest, normalized lexically.
fn resolve_existing(path: &Path) -> Result<PathBuf> {
    for prefix in path.ancestors() {
        if prefix.as_os_str().is_empty() {
            break;
        }
        match prefix.canonicalize() {
            Ok(canonical) => {
                let rest = path.strip_prefix(prefix).unwrap_or_else(|_| Path::new(""));
                return Ok(normalize_lexically(&canonical.join(rest)));
            }
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) => {}
            Err(e) => {
                return Err(ArchiveError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to canonicalize {}: {e}", prefix.display()),
                )));
            }
        }
    }
    Ok(normalize_lexically(path))
}

/// `true` when a `..` segment follows a named segment.
fn climbs_after_descending(path: &Path) -> bool {
    let mut descended = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => descended = true,
            Component::ParentDir if descended => return true,
            _ => {}
        }
    }
    false
}

fn has_root_or_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    let drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    name.starts_with('/') || name.starts_with('\\') || drive
}
