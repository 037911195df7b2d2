//! Configuration for archive creation operations.

use crate::ArchiveError;
use crate::Result;

/// Configuration for archive creation.
///
/// # Examples
///
/// ```
/// use cachepack_core::creation::CreationConfig;
///
/// let config = CreationConfig::default()
///     .with_compression_level(9)
///     .with_detect_hard_links(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationConfig {
    /// Compression level (1-9).
    ///
    /// Each codec maps this scale to its own levels. `None` uses the codec
    /// default.
    ///
    /// Default: `None`.
    pub compression_level: Option<u8>,

    /// Store files that share an inode with an already archived file as tar
    /// hard link entries. Zip archives always store content.
    ///
    /// Default: `true`.
    pub detect_hard_links: bool,
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            compression_level: None,
            detect_hard_links: true,
        }
    }
}

impl CreationConfig {
    /// Creates a new `CreationConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets whether hard links are detected.
    #[must_use]
    pub fn with_detect_hard_links(mut self, detect: bool) -> Self {
        self.detect_hard_links = detect;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is outside 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(ArchiveError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("compression level {level} out of range 1-9"),
            )));
        }
        Ok(())
    }
}
