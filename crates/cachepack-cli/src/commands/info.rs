//! Info command implementation.

use crate::output::OutputFormatter;
use anyhow::Result;
use cachepack_core::env::CacheLocator;
use cachepack_core::env::libc_flavor;
use serde::Serialize;
use std::path::PathBuf;

/// Host facts shown by `cachepack info`.
#[derive(Debug, Serialize)]
pub struct HostInfo {
    pub libc: String,
    pub cache_dirs: Vec<CacheDir>,
}

#[derive(Debug, Serialize)]
pub struct CacheDir {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CacheDir {
    fn new(name: &'static str, path: cachepack_core::env::Result<PathBuf>) -> Self {
        match path {
            Ok(path) => Self {
                name,
                path: Some(path),
                error: None,
            },
            Err(err) => Self {
                name,
                path: None,
                error: Some(err.to_string()),
            },
        }
    }
}

pub fn execute(formatter: &dyn OutputFormatter) -> Result<()> {
    formatter.format_info(&collect(&CacheLocator::from_process()))
}

fn collect<E>(locator: &CacheLocator<E>) -> HostInfo
where
    E: Fn(&str) -> Option<std::ffi::OsString>,
{
    HostInfo {
        libc: libc_flavor::detect().to_string(),
        cache_dirs: vec![
            CacheDir::new("xdg_cache_home", locator.xdg_cache_home()),
            CacheDir::new("hf_home", locator.hf_home()),
            CacheDir::new("huggingface_hub_cache", locator.huggingface_hub_cache()),
            CacheDir::new("hf_datasets_cache", locator.hf_datasets_cache()),
            CacheDir::new("modelscope_home", locator.modelscope_home()),
            CacheDir::new("modelscope_hub_cache", locator.modelscope_hub_cache()),
        ],
    }
}
