//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use crate::commands::info::HostInfo;
use anyhow::Result;
use cachepack_core::ExtractionReport;
use cachepack_core::creation::CreationReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()> {
        #[derive(Serialize)]
        struct CreationOutput {
            output_path: String,
            files_added: usize,
            directories_added: usize,
            symlinks_added: usize,
            hardlinks_added: usize,
            bytes_read: u64,
            bytes_compressed: u64,
            compression_ratio: f64,
            duration_ms: u128,
        }

        let data = CreationOutput {
            output_path: output_path.display().to_string(),
            files_added: report.files_added,
            directories_added: report.directories_added,
            symlinks_added: report.symlinks_added,
            hardlinks_added: report.hardlinks_added,
            bytes_read: report.bytes_read,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            duration_ms: report.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("create", data))
    }

    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        #[derive(Serialize)]
        struct ExtractionOutput<'a> {
            files_extracted: usize,
            directories_created: usize,
            symlinks_created: usize,
            hardlinks_created: usize,
            entries_skipped: usize,
            bytes_written: u64,
            duration_ms: u128,
            warnings: &'a [String],
        }

        let data = ExtractionOutput {
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            symlinks_created: report.symlinks_created,
            hardlinks_created: report.hardlinks_created,
            entries_skipped: report.entries_skipped,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            warnings: &report.warnings,
        };

        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_listing(&self, archive: &Path, entries: &[String]) -> Result<()> {
        #[derive(Serialize)]
        struct ListingOutput<'a> {
            archive: String,
            total_entries: usize,
            entries: &'a [String],
        }

        let data = ListingOutput {
            archive: archive.display().to_string(),
            total_entries: entries.len(),
            entries,
        };

        Self::output(&JsonOutput::success("list", data))
    }

    fn format_contains(&self, archive: &Path, query: &str, found: bool) -> Result<()> {
        #[derive(Serialize)]
        struct ContainsOutput<'a> {
            archive: String,
            query: &'a str,
            found: bool,
        }

        let data = ContainsOutput {
            archive: archive.display().to_string(),
            query,
            found,
        };

        Self::output(&JsonOutput::success("contains", data))
    }

    fn format_info(&self, info: &HostInfo) -> Result<()> {
        Self::output(&JsonOutput::success("info", info))
    }

    fn format_warning(&self, message: &str) {
        // Warnings are repeated inside the extraction result; stderr keeps
        // stdout a single JSON document.
        if let Ok(json) = serde_json::to_string(&JsonOutput::<()>::warning("warning", message)) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}
