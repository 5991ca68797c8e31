//! Client configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! holds the server URL, timeouts and the last username the user asked us
//! to remember. Passwords are never written here.
//!
//! Configuration is stored at `~/.config/ticketmule/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::api::ApiConfig;
use crate::notification::DEFAULT_CLEAR_DELAY_MS;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "ticketmule";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Server used when nothing is configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub server_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub notification_timeout_ms: Option<u64>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Rewrite only `last_username` in the file at `path`. Every other field
    /// keeps whatever is on disk, so runtime overrides are never persisted.
    /// Fails without writing if the file exists but cannot be parsed.
    pub fn save_last_username(path: &Path, username: &str, remember: bool) -> Result<Self> {
        let mut on_disk = Self::load_from(path)?;
        on_disk.remember_username(username, remember);
        on_disk.save_to(path)?;
        Ok(on_disk)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for log files
    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn server_url(&self) -> &str {
        self.server_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn api_config(&self) -> ApiConfig {
        let mut api = ApiConfig::new(self.server_url());
        api.request_timeout =
            Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS));
        api
    }

    pub fn notification_delay(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms.unwrap_or(DEFAULT_CLEAR_DELAY_MS))
    }

    /// Keep the username for next time only when the user asked for it
    pub fn remember_username(&mut self, username: &str, remember: bool) {
        self.last_username = if remember {
            Some(username.to_string())
        } else {
            None
        };
    }
}
