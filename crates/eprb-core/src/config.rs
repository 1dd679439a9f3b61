use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::downloader::DEFAULT_MAX_CONCURRENT;
use crate::http::HttpOptions;
use crate::registry::DEFAULT_REGISTRY_URL;
use crate::retry::{RetryPolicy, DEFAULT_RETRY_STATUSES};

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
    /// HTTP statuses that are retried.
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,
}

fn default_retry_statuses() -> Vec<u16> {
    DEFAULT_RETRY_STATUSES.to_vec()
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.5,
            max_delay_secs: 30,
            retry_statuses: default_retry_statuses(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::try_from_secs_f64(self.base_delay_secs)
                .unwrap_or(defaults.base_delay),
            max_delay: Duration::from_secs(self.max_delay_secs),
            retry_statuses: self.retry_statuses.clone(),
        }
    }
}

/// Global configuration loaded from `~/.config/eprb/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EprbConfig {
    /// Registry origin; `/search` is appended for catalog queries.
    pub registry_url: String,
    /// Parent of the per-run `{timestamp}-{version}` directories (relative to the working directory).
    pub builds_dir: PathBuf,
    /// Maximum concurrent file transfers.
    pub max_concurrent_downloads: usize,
    pub connect_timeout_secs: u64,
    /// Upper bound for one transfer attempt.
    pub transfer_timeout_secs: u64,
    /// Readme template file; the embedded template is used when unset.
    pub readme_template: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for EprbConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            builds_dir: PathBuf::from("builds"),
            max_concurrent_downloads: DEFAULT_MAX_CONCURRENT,
            connect_timeout_secs: 30,
            transfer_timeout_secs: 600,
            readme_template: None,
            retry: None,
        }
    }
}

impl EprbConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_default()
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            transfer_timeout: Duration::from_secs(self.transfer_timeout_secs),
            ..HttpOptions::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("eprb")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<EprbConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = EprbConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<EprbConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: EprbConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
