//! Create command implementation.

use crate::cli::CreateArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use cachepack_core::creation::CreationConfig;

pub fn execute(args: &CreateArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let mut config = CreationConfig::default().with_detect_hard_links(!args.no_hard_links);
    if let Some(level) = args.compression_level {
        config = config.with_compression_level(level);
    }

    let report = add_archive_context(
        cachepack_core::compress(&args.output, &args.sources, &config),
        &args.output,
    )?;

    formatter.format_creation_result(&args.output, &report)
}
