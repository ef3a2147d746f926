use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://online.v3.staging.traxmate.io";
pub const DEFAULT_LOGIN_PATH: &str = "/api/auth/login";
pub const DEFAULT_RESOURCE_PATH: &str = "/api/customers/all";
pub const DEFAULT_INTERVAL_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub debug: bool,
    pub api: ApiSettings,
    pub polling: PollingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub login_path: String,
    pub resource_path: String,
    /// No timeout unless set; a hung endpoint then stalls its cycle indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            resource_path: DEFAULT_RESOURCE_PATH.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ApiSettings {
    pub fn login_url(&self) -> Result<Url, ConfigError> {
        self.endpoint(&self.login_path)
    }

    pub fn resource_url(&self) -> Result<Url, ConfigError> {
        self.endpoint(&self.resource_path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            source,
        })?;

        base.join(path).map_err(|source| ConfigError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            source,
        })
    }
}

/// What to do when a tick fires while the previous cycle is still in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Drop the tick; at most one cycle runs at a time.
    #[default]
    Skip,
    /// Start another cycle regardless.
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub interval_secs: u64,
    pub overlap: OverlapPolicy,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            overlap: OverlapPolicy::default(),
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
        dirs::config_dir().map(|p| p.join("traxmate-poller").join("config.toml"))
    }

    /// Loads settings from `path`, or the default location when `None`.
    ///
    /// A missing file at the default location yields defaults. A missing file
    /// that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path().ok_or(ConfigError::NoConfigDir)?, false),
        };

        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let settings: Settings =
            toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "polling.interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.api.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "api.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let login = self.api.login_url()?;
        if !matches!(login.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must be http or https, got {}",
                self.api.base_url
            )));
        }
        self.api.resource_url()?;

        Ok(())
    }
}
