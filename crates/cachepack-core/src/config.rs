//! Extraction and query configuration.

use std::fmt;
use std::str::FromStr;

/// What to do with an archive entry whose type is neither a regular file,
/// directory, symlink, hard link, special node nor pseudo-header.
///
/// The same policy applies to extraction and listing in every format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedEntryPolicy {
    /// Log the entry and continue with the next one.
    #[default]
    Skip,
    /// Stop and return `ArchiveError::UnsupportedEntryType`.
    Abort,
}

/// How `file_in` compares a query against stored entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// The stored name (trailing `/` trimmed) equals the query or ends with
    /// `/` followed by the query.
    #[default]
    Suffix,
    /// Tries, in order: exact match, separator-anchored suffix, equal
    /// basenames of stored name and query, and for queries ending in `/` a
    /// directory-prefix match.
    Relaxed,
}

impl MatchStrategy {
    /// Returns `true` when `stored` satisfies `query` under this strategy.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachepack_core::MatchStrategy;
    ///
    /// assert!(MatchStrategy::Suffix.matches("pkg/lib/libz.so", "lib/libz.so"));
    /// assert!(!MatchStrategy::Suffix.matches("pkg/mylibz.so", "libz.so"));
    /// assert!(MatchStrategy::Relaxed.matches("pkg/lib/", "pkg/"));
    /// ```
    #[must_use]
    pub fn matches(self, stored: &str, query: &str) -> bool {
        match self {
            Self::Suffix => suffix_match(stored, query),
            Self::Relaxed => relaxed_match(stored, query),
        }
    }
}

fn suffix_match(stored: &str, query: &str) -> bool {
    let stored = stored.trim_end_matches('/');
    let query = query.trim_end_matches('/');
    if query.is_empty() {
        return false;
    }
    stored == query
        || stored
            .strip_suffix(query)
            .is_some_and(|head| head.ends_with('/'))
}

fn relaxed_match(stored: &str, query: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    if stored == query || stored.trim_end_matches('/') == query.trim_end_matches('/') {
        return true;
    }
    if suffix_match(stored, query) {
        return true;
    }
    let query_base = basename(query);
    if !query_base.is_empty() && basename(stored) == query_base {
        return true;
    }
    query.ends_with('/') && stored.starts_with(query)
}

fn basename(name: &str) -> &str {
    name.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suffix => f.write_str("suffix"),
            Self::Relaxed => f.write_str("relaxed"),
        }
    }
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "suffix" => Ok(Self::Suffix),
            "relaxed" => Ok(Self::Relaxed),
            other => Err(format!("unknown match strategy: {other}")),
        }
    }
}

/// Configuration for archive extraction.
///
/// # Examples
///
/// ```
/// use cachepack_core::{ExtractionConfig, UnsupportedEntryPolicy};
///
/// let config = ExtractionConfig::default()
///     .with_unsupported_entries(UnsupportedEntryPolicy::Abort)
///     .with_restore_timestamps(false);
/// assert!(config.preserve_permissions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Handling of unknown entry types.
    ///
    /// Default: [`UnsupportedEntryPolicy::Skip`].
    pub unsupported_entries: UnsupportedEntryPolicy,

    /// Apply stored access and modification times to extracted files.
    ///
    /// Default: `true`.
    pub restore_timestamps: bool,

    /// Apply stored permission bits (Unix only).
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            unsupported_entries: UnsupportedEntryPolicy::Skip,
            restore_timestamps: true,
            preserve_permissions: true,
        }
    }
}

impl ExtractionConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unsupported entry policy.
    #[must_use]
    pub fn with_unsupported_entries(mut self, policy: UnsupportedEntryPolicy) -> Self {
        self.unsupported_entries = policy;
        self
    }

    /// Sets whether timestamps are restored.
    #[must_use]
    pub fn with_restore_timestamps(mut self, restore: bool) -> Self {
        self.restore_timestamps = restore;
        self
    }

    /// Sets whether permission bits are applied.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }
}
