//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use cachepack_core::ExtractionConfig;
use cachepack_core::UnsupportedEntryPolicy;
use std::path::Path;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let dest = args.dest.as_deref().unwrap_or_else(|| Path::new("."));
    let config = ExtractionConfig::default()
        .with_unsupported_entries(policy(args.abort_on_unsupported))
        .with_restore_timestamps(!args.no_timestamps)
        .with_preserve_permissions(!args.no_permissions);

    let report = add_archive_context(
        cachepack_core::extract(&args.archive, dest, &config),
        &args.archive,
    )?;

    for warning in &report.warnings {
        formatter.format_warning(warning);
    }
    formatter.format_extraction_result(&report)
}

pub const fn policy(abort: bool) -> UnsupportedEntryPolicy {
    if abort {
        UnsupportedEntryPolicy::Abort
    } else {
        UnsupportedEntryPolicy::Skip
    }
}
