use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".smae";

/// Environment variable prefix; nested keys use `__`
pub const ENV_PREFIX: &str = "SMAE_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid stale_after_secs: {0}. Must be at least 1")]
    InvalidStaleness(u64),

    #[error("Invalid max_retries: {0}. Reads are retried at most once")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid poll_interval_secs: {0}. Must be at least 1")]
    InvalidPollInterval(u64),

    #[error("Invalid canvas size {0}x{1}. Both dimensions must be positive")]
    InvalidCanvas(f64, f64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Config file not found: {0}")]
    MissingFile(PathBuf),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the current directory
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .smae/config.yaml
    /// 3. .smae/local.yaml (optional local overrides)
    /// 4. `explicit`, when given (must exist)
    /// 5. Environment variables (SMAE_* prefix, highest priority)
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        Self::load_from_dir(Path::new("."), explicit)
    }

    /// Same as [`ConfigLoader::load`] with project files resolved under `root`
    pub fn load_from_dir(root: &Path, explicit: Option<&Path>) -> Result<Config> {
        let dir = root.join(CONFIG_DIR);
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()).into());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a single file over the defaults
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.api.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        if config.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.api.timeout_secs));
        }

        let fetch = &config.fetch;
        if fetch.stale_after_secs == 0 {
            return Err(ConfigError::InvalidStaleness(fetch.stale_after_secs));
        }

        if fetch.max_retries > 1 {
            return Err(ConfigError::InvalidMaxRetries(fetch.max_retries));
        }

        if fetch.initial_backoff_ms > fetch.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                fetch.initial_backoff_ms,
                fetch.max_backoff_ms,
            ));
        }

        if fetch.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidPollInterval(fetch.poll_interval_secs));
        }

        let canvas = config.canvas;
        // NaN fails both comparisons
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(ConfigError::InvalidCanvas(canvas.width, canvas.height));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}
