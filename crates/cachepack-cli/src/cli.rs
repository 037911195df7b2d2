//! CLI argument parsing using clap.

use cachepack_core::MatchStrategy;
use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cachepack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level: trace, debug, info, warn, error or off
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack files and directories into an archive
    Create(CreateArgs),
    /// Extract archive contents under a destination directory
    Extract(ExtractArgs),
    /// List archive entries without extracting
    List(ListArgs),
    /// Check whether an archive holds a matching entry
    Contains(ContainsArgs),
    /// Show host libc flavor and cache directories
    Info,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Output archive path (.tar.gz, .tgz, .tar.zst, .tzst or .zip)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Source files or directories to archive
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Store every file as regular content instead of linking repeats
    #[arg(long)]
    pub no_hard_links: bool,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Destination directory (default: current directory, `~` is expanded)
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// Fail on unknown entry types instead of skipping them
    #[arg(long)]
    pub abort_on_unsupported: bool,

    /// Do not restore stored modification times
    #[arg(long)]
    pub no_timestamps: bool,

    /// Do not apply stored permission bits
    #[arg(long)]
    pub no_permissions: bool,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Fail on unknown entry types instead of skipping them
    #[arg(long)]
    pub abort_on_unsupported: bool,
}

#[derive(clap::Args)]
pub struct ContainsArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Entry name, name suffix or directory prefix to look for
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Matching strategy: suffix or relaxed
    #[arg(long, default_value = "suffix")]
    pub strategy: MatchStrategy,
}
