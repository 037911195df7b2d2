//! cachepack - pack and restore cache directories as tar.gz, tar.zst or zip.

mod cli;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();

    init_logging(&cli.log_level);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match &cli.command {
        cli::Commands::Create(args) => commands::create::execute(args, &*formatter)?,
        cli::Commands::Extract(args) => commands::extract::execute(args, &*formatter)?,
        cli::Commands::List(args) => commands::list::execute(args, &*formatter)?,
        cli::Commands::Contains(args) => {
            if !commands::contains::execute(args, &*formatter)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        cli::Commands::Info => commands::info::execute(&*formatter)?,
    }

    Ok(ExitCode::SUCCESS)
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let level = cachepack_core::logging::level_of(level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
