//! Pack and restore cache directories as tar.gz, tar.zst or zip archives.
//!
//! `cachepack-core` walks source trees into archives and unpacks archives
//! under a destination root, refusing any entry or link that would land
//! outside it. Listing and membership queries read headers only.
//!
//! # Examples
//!
//! ```no_run
//! use cachepack_core::ExtractionConfig;
//! use cachepack_core::MatchStrategy;
//! use cachepack_core::creation::CreationConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! cachepack_core::compress("hub.tar.zst", &["/data/hub"], &CreationConfig::default())?;
//! assert!(cachepack_core::file_in("hub.tar.zst", "hub/", MatchStrategy::Suffix)?);
//!
//! let report = cachepack_core::extract("hub.tar.zst", "~/restore", &ExtractionConfig::default())?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod codec;
pub mod config;
pub mod creation;
pub mod env;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod inspection;
pub mod io;
pub mod logging;
pub mod report;
pub mod security;
pub mod types;

pub use api::compress;
pub use api::extract;
pub use api::file_in;
pub use api::list;
pub use config::ExtractionConfig;
pub use config::MatchStrategy;
pub use config::UnsupportedEntryPolicy;
pub use error::ArchiveError;
pub use error::Result;
pub use formats::ArchiveFormat;
pub use formats::codec_for;
pub use formats::detect_format;
pub use report::ExtractionReport;
pub use types::DestDir;
