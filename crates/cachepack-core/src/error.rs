//! Error types for archive packing, unpacking and inspection.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while creating, extracting or querying an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive format is unsupported or unrecognized.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// Archive path whose extension could not be mapped to a codec.
        path: PathBuf,
    },

    /// Archive is corrupted or invalid.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Source path for archive creation does not exist.
    #[error("source path not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// A filesystem object or archive entry has a kind this crate does not
    /// handle (device, socket, fifo, unknown tar type flag).
    #[error("unsupported entry type {kind} for {path}")]
    UnsupportedEntryType {
        /// Entry name or filesystem path.
        path: PathBuf,
        /// Human readable description of the kind.
        kind: String,
    },

    /// Entry name would resolve outside the destination root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending entry name.
        path: PathBuf,
    },

    /// Symlink target would resolve outside the destination root.
    #[error("symlink target outside extraction directory: {path} -> {target}")]
    SymlinkEscape {
        /// The symlink entry name.
        path: PathBuf,
        /// The stored link text.
        target: PathBuf,
    },

    /// Hard link target would resolve outside the destination root.
    #[error("hardlink target outside extraction directory: {path} => {target}")]
    HardlinkEscape {
        /// The hard link entry name.
        path: PathBuf,
        /// The stored link target.
        target: PathBuf,
    },

    /// A link could not be materialized. Reported as a warning, never
    /// returned from extraction.
    #[error("cannot create link {path}: {reason}")]
    LinkResolution {
        /// The link entry name.
        path: PathBuf,
        /// Why the link was not created.
        reason: String,
    },

    /// Stored timestamps could not be applied. Reported as a warning.
    #[error("cannot restore timestamps on {path}: {source}")]
    TimestampRestore {
        /// The extracted file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

impl ArchiveError {
    /// Returns `true` if this error represents a containment violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachepack_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ArchiveError::InvalidArchive("truncated".into());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::SymlinkEscape { .. } | Self::HardlinkEscape { .. }
        )
    }

    /// Returns `true` if the error only concerns a single entry and the
    /// surrounding operation can continue.
    ///
    /// Link resolution and timestamp failures are recoverable: extraction
    /// logs them and moves on to the next entry.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::LinkResolution { .. } | Self::TimestampRestore { .. }
        )
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::LinkResolution { reason, .. } => Some(reason),
            Self::UnsupportedEntryType { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for ArchiveError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.display().to_string());
        match err.into_io_error() {
            Some(io) => Self::Io(io),
            None => Self::Io(std::io::Error::other(format!(
                "filesystem loop detected while walking {}",
                path.unwrap_or_default()
            ))),
        }
    }
}
