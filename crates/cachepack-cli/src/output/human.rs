//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::commands::info::HostInfo;
use anyhow::Result;
use cachepack_core::ExtractionReport;
use cachepack_core::creation::CreationReport;
use console::Term;
use console::style;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (i, c) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn header(&self, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.header(&format!("Archive created: {}", output_path.display()));

        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Directories:      {}",
            Self::format_number(report.directories_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_read)
        ));
        if report.bytes_compressed > 0 {
            let _ = self.term.write_line(&format!(
                "  Compressed size:  {}",
                Self::format_size(report.bytes_compressed)
            ));
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Symlinks:         {}", report.symlinks_added));
            let _ = self
                .term
                .write_line(&format!("  Hard links:       {}", report.hardlinks_added));
            let _ = self.term.write_line(&format!(
                "  Ratio:            {:.2}",
                report.compression_ratio()
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        Ok(())
    }

    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.header("Extraction complete");

        let _ = self
            .term
            .write_line(&format!("  Files extracted: {}", report.files_extracted));
        let _ = self
            .term
            .write_line(&format!("  Directories: {}", report.directories_created));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));
        if report.entries_skipped > 0 {
            let _ = self
                .term
                .write_line(&format!("  Skipped: {}", report.entries_skipped));
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Symlinks: {}", report.symlinks_created));
            let _ = self
                .term
                .write_line(&format!("  Hard links: {}", report.hardlinks_created));
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        Ok(())
    }

    fn format_listing(&self, archive: &Path, entries: &[String]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            let _ = self.term.write_line(entry);
        }

        if self.verbose {
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "Total: {} entries in {}",
                Self::format_number(entries.len()),
                archive.display()
            ));
        }

        Ok(())
    }

    fn format_contains(&self, archive: &Path, query: &str, found: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let verdict = match (found, self.use_colors) {
            (true, true) => style("found").green().bold().to_string(),
            (false, true) => style("not found").red().bold().to_string(),
            (true, false) => "found".to_string(),
            (false, false) => "not found".to_string(),
        };
        let _ = self
            .term
            .write_line(&format!("{query}: {verdict} in {}", archive.display()));

        Ok(())
    }

    fn format_info(&self, info: &HostInfo) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let _ = self.term.write_line(&format!("libc: {}", info.libc));
        for dir in &info.cache_dirs {
            let value = match (&dir.path, &dir.error) {
                (Some(path), _) => path.display().to_string(),
                (None, Some(err)) if self.use_colors => style(err).dim().to_string(),
                (None, Some(err)) => format!("({err})"),
                (None, None) => "-".to_string(),
            };
            let _ = self.term.write_line(&format!("{:<22} {value}", dir.name));
        }

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = term.write_line(&format!("WARNING: {message}"));
        }
    }
}
