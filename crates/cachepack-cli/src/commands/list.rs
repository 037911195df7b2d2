//! List command implementation.

use super::extract::policy;
use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use cachepack_core::ExtractionConfig;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config =
        ExtractionConfig::default().with_unsupported_entries(policy(args.abort_on_unsupported));

    let entries = add_archive_context(cachepack_core::list(&args.archive, &config), &args.archive)?;

    formatter.format_listing(&args.archive, &entries)
}
