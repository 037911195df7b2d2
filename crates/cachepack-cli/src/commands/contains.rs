//! Contains command implementation.

use crate::cli::ContainsArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;

/// Returns whether a matching entry was found.
pub fn execute(args: &ContainsArgs, formatter: &dyn OutputFormatter) -> Result<bool> {
    let found = add_archive_context(
        cachepack_core::file_in(&args.archive, &args.query, args.strategy),
        &args.archive,
    )?;

    formatter.format_contains(&args.archive, &args.query, found)?;
    Ok(found)
}
