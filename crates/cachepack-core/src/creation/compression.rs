//! Compression level conversion.
//!
//! Callers choose a level on one 1-9 scale:
//!
//! - **1-3**: fast compression
//! - **6** or unset: codec default
//! - **7-9**: best compression
//!
//! Each codec maps the scale to its own levels.

/// Converts a user level (1-9) to a gzip level.
///
/// # Examples
///
/// ```
/// use cachepack_core::creation::compression::compression_level_to_flate2;
///
/// assert_eq!(compression_level_to_flate2(Some(9)), flate2::Compression::best());
/// ```
#[must_use]
pub fn compression_level_to_flate2(level: Option<u8>) -> flate2::Compression {
    match level {
        None | Some(6) => flate2::Compression::default(),
        Some(1..=3) => flate2::Compression::fast(),
        Some(7..=9) => flate2::Compression::best(),
        Some(n) => flate2::Compression::new(u32::from(n)),
    }
}

/// Default zstd level, also used when no level is configured.
pub const ZSTD_DEFAULT_LEVEL: i32 = 3;

/// Converts a user level (1-9) to a zstd level.
#[must_use]
#[allow(clippy::match_same_arms)]
pub fn compression_level_to_zstd(level: Option<u8>) -> i32 {
    match level {
        None | Some(6) => ZSTD_DEFAULT_LEVEL,
        Some(1) => 1,
        Some(2) => 2,
        Some(7) => 10,
        Some(8) => 15,
        Some(9) => 19,
        _ => ZSTD_DEFAULT_LEVEL,
    }
}

/// Converts a user level (1-9) to a zip Deflate level.
#[must_use]
pub fn compression_level_to_deflate(level: Option<u8>) -> Option<i64> {
    level.map(|n| i64::from(n.clamp(1, 9)))
}
