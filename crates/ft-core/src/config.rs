//! Configuration management for fiscal-tracker

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FiscalError, Result};
use crate::export::DEFAULT_PREFIX;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "FISCAL_TRACKER_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend settings
    pub api: ApiConfig,
    /// Export settings
    pub export: ExportConfig,
    /// Data source settings
    pub data: DataConfig,
    /// Local storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Load from a TOML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("Using API URL from {}", API_URL_ENV);
                self.api.base_url = url;
            }
        }
        self
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FiscalError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(FiscalError::Config(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.data.ranking_limit == 0 {
            return Err(FiscalError::Config(
                "data.ranking_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Where the CSV document is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStrategy {
    /// Encode locally from the filtered records
    #[default]
    Client,
    /// Download from `/empresas/exportar/`
    Server,
}

/// Export-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub strategy: ExportStrategy,
    /// Filename prefix, `<prefix>-<date>.csv`
    pub filename_prefix: String,
    /// Directory exports are saved into
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            strategy: ExportStrategy::Client,
            filename_prefix: DEFAULT_PREFIX.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Data source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Fall back to the sample dataset when the API is unreachable
    pub fallback_to_sample: bool,
    /// Default ranking size
    pub ranking_limit: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            fallback_to_sample: true,
            ranking_limit: 10,
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data directory
    pub dir: Option<PathBuf>,
}
