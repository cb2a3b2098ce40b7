//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: backend
//! URL, timeouts, token storage backend and the last used email address.
//!
//! Configuration is stored at `~/.config/paraphrase-client/config.json`.
//! `PARAPHRASE_API_URL` and `PARAPHRASE_RECAPTCHA_TOKEN` override the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::{FileStore, KeyringStore, MemoryStore, TokenStore, NATIVE_KEYCHAIN};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "paraphrase-client";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Paraphrasing long inputs is slow on the backend; give it three minutes.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;

/// How often the session re-checks expiry when nothing else happens.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5 * 60;

const ENV_API_URL: &str = "PARAPHRASE_API_URL";
const ENV_RECAPTCHA_TOKEN: &str = "PARAPHRASE_RECAPTCHA_TOKEN";

/// Where the bearer token is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub token_backend: TokenBackend,
    pub last_email: Option<String>,
    /// Pre-solved reCAPTCHA response forwarded with login/register requests.
    pub recaptcha_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            token_backend: TokenBackend::default(),
            last_email: None,
            recaptcha_token: None,
        }
    }
}

impl Config {
    /// Load from disk (or defaults), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(token) = lookup(ENV_RECAPTCHA_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.recaptcha_token = Some(token);
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Open the configured token store. Falls back to memory when the
    /// keychain can't be reached; the session does the same on later errors.
    pub fn token_store(&self) -> Result<Box<dyn TokenStore>> {
        let store: Box<dyn TokenStore> = match self.token_backend {
            TokenBackend::File => Box::new(FileStore::new(self.cache_dir()?)),
            TokenBackend::Keyring => match KeyringStore::new() {
                Ok(store) => {
                    if !NATIVE_KEYCHAIN {
                        warn!("No native keychain on this platform, token will not persist");
                    }
                    Box::new(store)
                }
                Err(e) => {
                    warn!(error = %e, "Keychain unavailable, token will not persist");
                    Box::new(MemoryStore::new())
                }
            },
            TokenBackend::Memory => Box::new(MemoryStore::new()),
        };
        Ok(store)
    }
}
