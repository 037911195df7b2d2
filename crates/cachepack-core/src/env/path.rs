//! Path helpers: home expansion, separators and executable location.

use super::EnvError;
use super::Result;
use std::path::MAIN_SEPARATOR;
use std::path::MAIN_SEPARATOR_STR;
use std::path::Path;
use std::path::PathBuf;

/// Rewrites both `/` and `\` to the host separator.
///
/// # Examples
///
/// ```
/// use cachepack_core::env::path::ensure_path_separator;
///
/// #[cfg(unix)]
/// assert_eq!(ensure_path_separator("C:\\Users\\go"), "C:/Users/go");
/// ```
#[must_use]
pub fn ensure_path_separator(path: &str) -> String {
    path.replace(['/', '\\'], MAIN_SEPARATOR_STR)
}

/// Expands a leading `~` to the current user's home directory.
///
/// Paths without a leading `~` are returned unchanged.
///
/// # Errors
///
/// Returns `EnvError::UnsupportedHomeForm` for `~user` forms and
/// `EnvError::HomeNotFound` when the home directory is unknown.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    expand_home_with(path, home::home_dir().as_deref())
}

/// Same as [`expand_home`] with an explicit home directory.
///
/// # Errors
///
/// See [`expand_home`].
pub fn expand_home_with(path: &Path, home: Option<&Path>) -> Result<PathBuf> {
    let text = path.to_string_lossy();
    let Some(rest) = text.strip_prefix('~') else {
        return Ok(path.to_path_buf());
    };

    let rest = ensure_path_separator(rest);
    let rest = match rest.strip_prefix(MAIN_SEPARATOR) {
        Some(rest) => rest,
        None if rest.is_empty() => "",
        None => {
            return Err(EnvError::UnsupportedHomeForm {
                path: path.to_path_buf(),
            });
        }
    };

    let home = home.ok_or(EnvError::HomeNotFound)?;
    let rest = rest.trim_start_matches(MAIN_SEPARATOR);
    if rest.is_empty() {
        Ok(home.to_path_buf())
    } else {
        Ok(home.join(rest))
    }
}

/// Resolves symlinks in `path` and returns it as an absolute path.
///
/// # Errors
///
/// Fails when the path does not exist or cannot be resolved.
pub fn abs_path(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path.canonicalize()?)?)
}

/// Absolute, symlink-resolved path of the running executable.
///
/// # Errors
///
/// Fails when the executable path cannot be determined or resolved.
pub fn exec_path() -> Result<PathBuf> {
    abs_path(&std::env::current_exe()?)
}

/// Directory containing the running executable.
///
/// # Errors
///
/// Fails when the executable path cannot be determined or resolved.
pub fn app_home() -> Result<PathBuf> {
    let exe = exec_path()?;
    Ok(exe.parent().map_or_else(|| exe.clone(), Path::to_path_buf))
}
