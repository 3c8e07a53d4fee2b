mod file_config;

pub use file_config::{FileConfig, PathsConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROVIDER_TIMEOUT_SEC: u64 = 30;
pub const DEFAULT_UPSTREAM_TIMEOUT_SEC: u64 = 15;
pub const DEFAULT_INGESTION_INTERVAL_HOURS: u64 = 3;
pub const DEFAULT_RECOMMENDATIONS_COUNT: usize = 20;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub provider_url: Option<String>,
    pub provider_timeout_sec: u64,
    pub upstream_timeout_sec: u64,
    pub ingestion_interval_hours: u64,
    pub recommendations_count: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            port: 3001,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::default(),
            frontend_dir_path: None,
            provider_url: None,
            provider_timeout_sec: DEFAULT_PROVIDER_TIMEOUT_SEC,
            upstream_timeout_sec: DEFAULT_UPSTREAM_TIMEOUT_SEC,
            ingestion_interval_hours: DEFAULT_INGESTION_INTERVAL_HOURS,
            recommendations_count: DEFAULT_RECOMMENDATIONS_COUNT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub provider_url: String,
    pub provider_timeout_sec: u64,
    pub upstream_timeout_sec: u64,
    pub ingestion_interval_hours: u64,
    pub recommendations_count: usize,

    pub paths: DataPaths,
}

/// Location of every document the server reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub catalog_file: PathBuf,
    pub artists_file: PathBuf,
    pub users_dir: PathBuf,
    pub popular_file: PathBuf,
    pub chart_file: PathBuf,
}

impl DataPaths {
    /// Default layout, everything directly under `data_dir`.
    pub fn under(data_dir: &Path) -> Self {
        Self {
            catalog_file: data_dir.join("Links.json"),
            artists_file: data_dir.join("artists.json"),
            users_dir: data_dir.join("Users"),
            popular_file: data_dir.join("Popular.json"),
            chart_file: data_dir.join("Tab50.json"),
        }
    }

    fn with_overrides(data_dir: &Path, overrides: PathsConfig) -> Self {
        let defaults = Self::under(data_dir);
        let pick = |value: Option<String>, default: PathBuf| {
            value.map(|v| data_dir.join(v)).unwrap_or(default)
        };
        Self {
            catalog_file: pick(overrides.catalog_file, defaults.catalog_file),
            artists_file: pick(overrides.artists_file, defaults.artists_file),
            users_dir: pick(overrides.users_dir, defaults.users_dir),
            popular_file: pick(overrides.popular_file, defaults.popular_file),
            chart_file: pick(overrides.chart_file, defaults.chart_file),
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("data_dir must be specified via --data-dir or in config file")
            })?;

        if !data_dir.exists() {
            bail!("Data directory does not exist: {:?}", data_dir);
        }
        if !data_dir.is_dir() {
            bail!("data_dir is not a directory: {:?}", data_dir);
        }

        let provider_url = file
            .provider_url
            .or_else(|| cli.provider_url.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "provider_url must be specified via --provider-url or in config file"
                )
            })?;

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port {
            bail!("port and metrics_port must differ, both are {}", port);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let provider_timeout_sec = file
            .provider_timeout_sec
            .unwrap_or(cli.provider_timeout_sec);
        let upstream_timeout_sec = file
            .upstream_timeout_sec
            .unwrap_or(cli.upstream_timeout_sec);
        let ingestion_interval_hours = file
            .ingestion_interval_hours
            .unwrap_or(cli.ingestion_interval_hours);
        if ingestion_interval_hours == 0 {
            bail!("ingestion_interval_hours must be at least 1");
        }
        let recommendations_count = file
            .recommendations_count
            .unwrap_or(cli.recommendations_count);

        let paths = DataPaths::with_overrides(&data_dir, file.paths.unwrap_or_default());

        Ok(Self {
            data_dir,
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            provider_url,
            provider_timeout_sec,
            upstream_timeout_sec,
            ingestion_interval_hours,
            recommendations_count,
            paths,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
