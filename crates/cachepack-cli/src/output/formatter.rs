//! Output formatter trait for CLI results.

use crate::commands::info::HostInfo;
use anyhow::Result;
use cachepack_core::ExtractionReport;
use cachepack_core::creation::CreationReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format archive creation result
    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()>;

    /// Format extraction result
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()>;

    /// Format entry listing
    fn format_listing(&self, archive: &Path, entries: &[String]) -> Result<()>;

    /// Format membership query result
    fn format_contains(&self, archive: &Path, query: &str, found: bool) -> Result<()>;

    /// Format host information
    fn format_info(&self, info: &HostInfo) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            warning: None,
        }
    }

    pub fn warning(operation: impl Into<String>, message: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Warning,
            data: None,
            warning: Some(message.into()),
        }
    }
}
