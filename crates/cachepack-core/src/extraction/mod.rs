//! Archive extraction.
//!
//! Both extractors run every entry through the
//! [`ExtractionGuard`](crate::security::ExtractionGuard) before touching
//! the filesystem and abort on the first violation.

pub(crate) mod fs;
pub mod tar;
pub mod zip;

pub use self::tar::extract_tar;
pub use self::zip::extract_zip;
