//! Configuration service implementation.
//!
//! Loads the root configuration from `~/.config/moodflix/config.toml` (or an
//! explicit path), then applies `MOODFLIX_*` environment overrides.

use crate::paths::MoodflixPaths;
use moodflix_core::config::RootConfig;
use moodflix_core::error::{MoodflixError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};

pub const ENV_RECOMMENDATION_URL: &str = "MOODFLIX_RECOMMENDATION_URL";
pub const ENV_AUTH_URL: &str = "MOODFLIX_AUTH_URL";
pub const ENV_TICK_PERIOD_MS: &str = "MOODFLIX_TICK_PERIOD_MS";
pub const ENV_REPORT_THRESHOLD: &str = "MOODFLIX_REPORT_THRESHOLD";
pub const ENV_LOG_LEVEL: &str = "MOODFLIX_LOG_LEVEL";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file location.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `path` instead of the default location.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| MoodflixError::internal(format!("config lock poisoned: {}", e)))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let path = match &self.path {
            Some(path) => path.clone(),
            None => MoodflixPaths::config_file()?,
        };
        let mut loaded = load_config_file(&path)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok())?;
        loaded.validate()?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| MoodflixError::internal(format!("config lock poisoned: {}", e)))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `path` as TOML. A missing file yields defaults.
pub fn load_config_file(path: &Path) -> Result<RootConfig> {
    if !path.exists() {
        tracing::debug!(
            "[ConfigService] No config at {}, using defaults",
            path.display()
        );
        return Ok(RootConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: RootConfig = toml::from_str(&content)?;
    tracing::debug!("[ConfigService] Loaded config from {}", path.display());
    Ok(config)
}

/// Applies `MOODFLIX_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut RootConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_RECOMMENDATION_URL) {
        config.services.recommendation_url = url;
    }
    if let Some(url) = lookup(ENV_AUTH_URL) {
        config.services.auth_url = url;
    }
    if let Some(raw) = lookup(ENV_TICK_PERIOD_MS) {
        config.capture.tick_period_ms = parse_override(ENV_TICK_PERIOD_MS, &raw)?;
    }
    if let Some(raw) = lookup(ENV_REPORT_THRESHOLD) {
        config.capture.report_threshold = parse_override(ENV_REPORT_THRESHOLD, &raw)?;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    Ok(())
}

fn parse_override<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| MoodflixError::config(format!("{} has an invalid value: '{}'", key, raw)))
}
