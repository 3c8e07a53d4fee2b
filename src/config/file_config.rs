use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub data_dir: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,
    pub provider_url: Option<String>,
    pub provider_timeout_sec: Option<u64>,
    pub upstream_timeout_sec: Option<u64>,
    pub ingestion_interval_hours: Option<u64>,
    pub recommendations_count: Option<usize>,

    pub paths: Option<PathsConfig>,
}

/// Overrides for the documents under `data_dir`. Relative paths are taken
/// relative to `data_dir`.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PathsConfig {
    pub catalog_file: Option<String>,
    pub artists_file: Option<String>,
    pub users_dir: Option<String>,
    pub popular_file: Option<String>,
    pub chart_file: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
