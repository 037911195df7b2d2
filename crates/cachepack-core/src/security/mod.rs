//! Extraction containment.
//!
//! Every entry of every format passes through [`ExtractionGuard`] before the
//! filesystem is touched. Violations abort the extraction.

mod guard;

pub use guard::ExtractionGuard;
pub use guard::GuardedPath;
pub use guard::normalize_lexically;
