//! Archive inspection without extraction.
//!
//! Listing and membership queries read headers only; nothing is written to
//! disk.
//!
//! # Examples
//!
//! ```no_run
//! use cachepack_core::ExtractionConfig;
//! use cachepack_core::MatchStrategy;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! for line in cachepack_core::list("env.tar.zst", &ExtractionConfig::default())? {
//!     println!("{line}");
//! }
//! let present = cachepack_core::file_in("env.tar.zst", "bin/python3", MatchStrategy::Suffix)?;
//! println!("python bundled: {present}");
//! # Ok(())
//! # }
//! ```

pub mod contains;
pub mod list;

pub use contains::tar_contains;
pub use contains::zip_contains;
pub use list::list_tar;
pub use list::list_zip;
