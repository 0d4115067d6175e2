//! Client configuration.
//!
//! Loaded from `$FORKFUL_CONFIG` or `<config dir>/forkful/config.toml`.
//! A missing file means defaults; `FORKFUL_BASE_URL` overrides the file.
//!
//! ```toml
//! base_url = "https://api.forkful.app"
//! listing_page_size = 10
//! search_debounce_ms = 300
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "FORKFUL_CONFIG";
pub const BASE_URL_ENV: &str = "FORKFUL_BASE_URL";

const APP_DIR: &str = "forkful";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the marketplace API. Endpoint paths are appended to it.
    pub base_url: String,
    /// Page size of the listing fetch triggered by selecting a restaurant.
    pub listing_page_size: u32,
    pub search_debounce_ms: u64,
    pub request_timeout_secs: u64,
    /// Entries kept in the in-memory action log.
    pub action_log_capacity: usize,
    /// Token file. Defaults to `<data dir>/forkful/token`.
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            listing_page_size: 10,
            search_debounce_ms: 300,
            request_timeout_secs: 30,
            action_log_capacity: 100,
            credentials_path: None,
        }
    }
}

impl ClientConfig {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => default_config_path()?,
        };

        let mut config = if path.exists() {
            Self::load_from_path(&path)?
        } else {
            tracing::debug!(path = %path.display(), "No config file; using defaults");
            Self::default()
        };
        config.apply_env_with(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from `lookup`, normally the process environment.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|err| ConfigError::Validation {
            field: "base_url".into(),
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "base_url".into(),
                reason: format!("unsupported scheme {:?}", url.scheme()),
            });
        }
        if self.listing_page_size == 0 {
            return Err(ConfigError::Validation {
                field: "listing_page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn credentials_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.credentials_path {
            Some(path) => Ok(path.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR).join("token"))
                .ok_or(ConfigError::NoDirectory("data")),
        }
    }
}

fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join("config.toml"))
        .ok_or(ConfigError::NoDirectory("config"))
}
