//! Log level names.

use tracing::level_filters::LevelFilter;

/// Maps a level name to a filter, ignoring case.
///
/// `panic` and `fatal` have no tracing counterpart and disable logging like
/// `off`; unknown names fall back to `info`.
///
/// # Examples
///
/// ```
/// use cachepack_core::logging::level_of;
/// use tracing::level_filters::LevelFilter;
///
/// assert_eq!(level_of("WARN"), LevelFilter::WARN);
/// assert_eq!(level_of("fatal"), LevelFilter::OFF);
/// assert_eq!(level_of("verbose"), LevelFilter::INFO);
/// ```
#[must_use]
pub fn level_of(name: &str) -> LevelFilter {
    match name.to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "panic" | "fatal" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}
