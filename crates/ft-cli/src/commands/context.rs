//! Shared command context
//!
//! Configuration, local storage and the restored session, plus helpers for
//! running API calls from synchronous command handlers.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use ft_api::{HttpClient, LoadedRecords};
use ft_core::config::Config;
use ft_core::session::Session;
use ft_storage::FileSystemStore;

/// Config file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = ".fiscal-tracker/config.toml";

/// Resolve the config file location
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration, apply env overrides and validate the result
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        .with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Everything a command needs to talk to the backend
pub struct AppContext {
    pub config: Config,
    pub store: FileSystemStore,
    pub session: Session,
}

impl AppContext {
    /// Load config, open local storage and restore the session
    pub fn load(config_path_arg: Option<PathBuf>) -> Result<Self> {
        let path = config_path(config_path_arg);
        let config = load_config(&path)?;

        let store = match &config.storage.dir {
            Some(dir) => FileSystemStore::new(dir),
            None => FileSystemStore::default_location(),
        }
        .context("Failed to open local storage")?;
        debug!("Local storage at {:?}", store.base_dir());

        let session = Session::init_from_storage(&store)?;

        Ok(Self {
            config,
            store,
            session,
        })
    }

    /// API client carrying the session token
    pub fn client(&self) -> Result<HttpClient> {
        Ok(HttpClient::new(&self.config.api)?.with_session(&self.session))
    }

    /// The company list, from the API or the built-in sample set
    pub fn records(&self, sample: bool) -> Result<LoadedRecords> {
        if sample {
            return Ok(LoadedRecords::sample());
        }
        let client = self.client()?;
        let fallback = self.config.data.fallback_to_sample;
        let loaded = block_on("Loading companies...", ft_api::load_records(&client, fallback))??;
        Ok(loaded)
    }
}

/// Run `future` to completion on a fresh runtime, with a spinner on stderr
pub fn block_on<F: Future>(message: &str, future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let spinner = spinner(message);
    let output = runtime.block_on(future);
    spinner.finish_and_clear();
    Ok(output)
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Format a monetary value in reais
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let reais = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, c) in reais.chars().enumerate() {
        if i > 0 && (reais.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}
