use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::tracking::POLL_INTERVAL;

pub const ACCESS_KEY_ENV: &str = "FLIGHT_TRACKER_ACCESS_KEY";
pub const DEFAULT_BASE_URL: &str = "http://api.aviationstack.com";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub polling: PollingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub access_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            access_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub interval_secs: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: POLL_INTERVAL.as_secs(),
        }
    }
}

impl PollingSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("flight-tracker").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path().context("Could not determine config directory")?;

        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            let settings: Settings = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            tracing::info!(?path, "Loaded config");
            settings
        } else {
            tracing::info!(?path, "Config file not found, using defaults");
            Self::default()
        };

        settings.apply_env_overrides(std::env::var(ACCESS_KEY_ENV).ok());
        settings.validate()?;
        Ok(settings)
    }

    fn apply_env_overrides(&mut self, access_key: Option<String>) {
        if let Some(key) = access_key.filter(|k| !k.trim().is_empty()) {
            tracing::debug!("Using access key from {}", ACCESS_KEY_ENV);
            self.api.access_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_secs == 0 {
            anyhow::bail!("polling.interval_secs must be greater than 0");
        }
        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than 0");
        }
        reqwest::Url::parse(&self.api.base_url)
            .with_context(|| format!("api.base_url is not a valid URL: {}", self.api.base_url))?;
        Ok(())
    }
}
