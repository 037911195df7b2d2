//! Host C library detection.

use once_cell::sync::OnceCell;
use std::fmt;
use std::path::Path;

/// Which C library the host runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibcFlavor {
    /// GNU libc.
    Gnu,
    /// musl libc.
    Musl,
    /// Neither could be found.
    Unknown,
}

impl LibcFlavor {
    /// Lowercase name: `gnu`, `musl` or `unknown`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gnu => "gnu",
            Self::Musl => "musl",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LibcFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const GLIBC_FILES: &[&str] = &[
    "lib/ld-linux-x86-64.so.2",
    "lib64/ld-linux-x86-64.so.2",
    "lib/libc.so.6",
    "lib64/libc.so.6",
];

const MUSL_FILES: &[&str] = &[
    "lib/ld-musl-x86_64.so.1",
    "lib/ld-musl-aarch64.so.1",
    "lib/ld-musl-armhf.so.1",
    "lib/libc.musl-x86_64.so.1",
    "usr/lib/ld-musl-x86_64.so.1",
];

const ALPINE_RELEASE: &str = "etc/alpine-release";

static DETECTED: OnceCell<LibcFlavor> = OnceCell::new();

/// Detects the host C library once per process and returns the cached
/// answer afterwards.
///
/// # Examples
///
/// ```
/// use cachepack_core::env::libc_flavor::{self, LibcFlavor};
///
/// let flavor = libc_flavor::detect();
/// assert_eq!(flavor, libc_flavor::detect());
/// assert!(matches!(flavor, LibcFlavor::Gnu | LibcFlavor::Musl | LibcFlavor::Unknown));
/// ```
pub fn detect() -> LibcFlavor {
    *DETECTED.get_or_init(|| detect_in(Path::new("/")))
}

/// Probes the loader and libc files under `root`; glibc files win over musl
/// files, and `etc/alpine-release` is the musl fallback.
#[must_use]
pub fn detect_in(root: &Path) -> LibcFlavor {
    let present = |files: &[&str]| files.iter().any(|file| root.join(file).exists());

    if present(GLIBC_FILES) {
        LibcFlavor::Gnu
    } else if present(MUSL_FILES) || root.join(ALPINE_RELEASE).exists() {
        LibcFlavor::Musl
    } else {
        LibcFlavor::Unknown
    }
}
