//! Host environment helpers used around packing and unpacking: home
//! expansion, cache directory discovery, C library detection and variable
//! templating.

pub mod cache;
mod error;
pub mod libc_flavor;
pub mod path;
pub mod template;

pub use cache::CacheLocator;
pub use error::EnvError;
pub use error::Result;
pub use libc_flavor::LibcFlavor;
pub use template::SeparatorMode;
