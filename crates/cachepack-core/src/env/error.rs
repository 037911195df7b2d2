use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `EnvError`.
pub type Result<T> = std::result::Result<T, EnvError>;

/// Errors from host environment lookups.
#[derive(Debug, Error)]
pub enum EnvError {
    /// A configured or default location exists but is not a directory.
    #[error("{path} is not a directory")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// The current user's home directory could not be determined.
    #[error("cannot determine the home directory")]
    HomeNotFound,

    /// Only a bare `~` prefix is supported, not `~user`.
    #[error("cannot expand home directory in {path}")]
    UnsupportedHomeForm {
        /// The path as given.
        path: PathBuf,
    },

    /// Lookup of a path or file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
