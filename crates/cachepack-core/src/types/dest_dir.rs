//! Validated destination directory type.

use crate::ArchiveError;
use crate::Result;
use crate::env::path::expand_home;
use std::path::Path;
use std::path::PathBuf;

/// A validated extraction root.
///
/// Once constructed, a `DestDir` is an existing, writable directory held as
/// an absolute, symlink-resolved path. Every extraction target is checked
/// against this path.
///
/// # Examples
///
/// ```no_run
/// use cachepack_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::resolve("~/.cache/cachepack/restore")?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Creates a new `DestDir` from an existing directory.
    ///
    /// # Security Considerations
    ///
    /// There is a window between the `is_dir()` check and `canonicalize()`
    /// in which the directory could be swapped for a symlink. Canonicalizing
    /// resolves such a symlink, and every extracted path is validated
    /// against the canonical root afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist
    /// - The path exists but is not a directory
    /// - The path cannot be canonicalized
    /// - The directory is not writable (on Unix)
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(ArchiveError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("destination directory does not exist: {}", path.display()),
            )));
        }

        if !path.is_dir() {
            return Err(ArchiveError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            ArchiveError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {}", path.display(), e),
            ))
        })?;

        #[cfg(unix)]
        {
            use std::ffi::CString;
            use std::os::unix::ffi::OsStrExt;

            let path_cstring = CString::new(canonical.as_os_str().as_bytes()).map_err(|_| {
                ArchiveError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path contains null byte",
                ))
            })?;

            // SAFETY: `path_cstring` is a valid NUL-terminated string that
            // outlives the call; access() only reads it.
            #[allow(unsafe_code)]
            let result = unsafe { libc::access(path_cstring.as_ptr(), libc::W_OK) };

            if result != 0 {
                return Err(ArchiveError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("directory is not writable: {}", canonical.display()),
                )));
            }
        }

        Ok(Self(canonical))
    }

    /// Expands a leading `~`, creates the directory (and parents) when
    /// missing, then validates it like [`DestDir::new`].
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined, the
    /// directory cannot be created, or validation fails.
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self> {
        let expanded = expand_home(path.as_ref()).map_err(|e| {
            ArchiveError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;
        std::fs::create_dir_all(&expanded)?;
        Self::new(expanded)
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a relative path that already passed the extraction guard.
    #[inline]
    #[must_use]
    pub fn join_path(&self, path: &Path) -> PathBuf {
        self.0.join(path)
    }

    /// Converts into the inner `PathBuf`.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for DestDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dest_dir_new_valid() {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::new(temp.path().to_path_buf()).unwrap();
        assert!(dest.as_path().is_absolute());
        assert_eq!(dest.as_path(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_dest_dir_new_nonexistent() {
        let temp = TempDir::new().unwrap();
        let result = DestDir::new(temp.path().join("missing"));
        assert!(matches!(result, Err(ArchiveError::Io(_))));
    }

    #[test]
    fn test_dest_dir_new_not_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(DestDir::new(file).is_err());
    }

    #[test]
    fn test_dest_dir_resolve_creates_missing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a").join("b");
        let dest = DestDir::resolve(&target).unwrap();
        assert!(target.is_dir());
        assert_eq!(dest.as_path(), target.canonicalize().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_dest_dir_resolves_symlinked_root() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        std::fs::create_dir(&real).unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let dest = DestDir::new(link).unwrap();
        assert_eq!(dest.as_path(), real.canonicalize().unwrap());
    }

    #[test]
    fn test_join_path() {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::new(temp.path().to_path_buf()).unwrap();
        let joined = dest.join_path(Path::new("sub/file.txt"));
        assert!(joined.starts_with(dest.as_path()));
    }
}
