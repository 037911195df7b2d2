//! Archive format detection and codecs.

pub mod tar;
pub mod traits;
pub mod zip;

use crate::ArchiveError;
use crate::Result;
use crate::UnsupportedEntryPolicy;
use std::fmt;
use std::path::Path;
use traits::ArchiveCodec;
use tracing::error;

pub use self::tar::TarGz;
pub use self::tar::TarZst;
pub use self::zip::Zip;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar archive.
    TarGz,
    /// Zstd-compressed tar archive.
    TarZst,
    /// ZIP archive.
    Zip,
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TarGz => f.write_str("tar.gz"),
            Self::TarZst => f.write_str("tar.zst"),
            Self::Zip => f.write_str("zip"),
        }
    }
}

/// Detects the archive format from a file name.
///
/// Recognizes `.tar.gz`/`.tgz`, `.tar.zst`/`.tzst` and `.zip`, ignoring
/// case.
///
/// # Errors
///
/// Returns `UnsupportedFormat` for any other extension.
///
/// # Examples
///
/// ```
/// use cachepack_core::formats::{ArchiveFormat, detect_format};
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("env.TGZ")).unwrap(), ArchiveFormat::TarGz);
/// assert!(detect_format(Path::new("notes.gz")).is_err());
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveFormat> {
    let unsupported = || ArchiveError::UnsupportedFormat {
        path: path.to_path_buf(),
    };
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(unsupported)?
        .to_ascii_lowercase();

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        Ok(ArchiveFormat::TarGz)
    } else if name.ends_with(".tar.zst") || name.ends_with(".tzst") {
        Ok(ArchiveFormat::TarZst)
    } else if name.ends_with(".zip") {
        Ok(ArchiveFormat::Zip)
    } else {
        Err(unsupported())
    }
}

/// Returns the codec for a format.
#[must_use]
pub fn codec_for(format: ArchiveFormat) -> &'static dyn ArchiveCodec {
    match format {
        ArchiveFormat::TarGz => &TarGz,
        ArchiveFormat::TarZst => &TarZst,
        ArchiveFormat::Zip => &Zip,
    }
}

/// Applies the unsupported-entry policy to one entry.
///
/// Returns `Ok(())` when the entry should be skipped.
pub(crate) fn unsupported_entry(
    policy: UnsupportedEntryPolicy,
    name: &str,
    kind: String,
) -> Result<()> {
    let err = ArchiveError::UnsupportedEntryType {
        path: name.into(),
        kind,
    };
    match policy {
        UnsupportedEntryPolicy::Abort => Err(err),
        UnsupportedEntryPolicy::Skip => {
            error!("skipping entry: {err}");
            Ok(())
        }
    }
}
