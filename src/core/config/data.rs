use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::url::{is_http_url, normalize_base_url};

/// Origin the analysis service listens on when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8004";

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "HEIDI_BASE_URL";

pub const THEME_NAMES: &[&str] = &["dark", "light"];

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin of the analysis service, e.g. "http://localhost:8004"
    pub base_url: Option<String>,
    /// Give up on a request after this many seconds. Unset waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
}

/// Errors that can occur when modifying configuration settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    UnknownKey(String),
    InvalidUrl(String),
    InvalidTimeout(String),
    UnknownTheme(String),
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (expected base-url, timeout, or theme)"
            ),
            SettingError::InvalidUrl(value) => {
                write!(f, "Invalid base URL: {value} (expected http:// or https://)")
            }
            SettingError::InvalidTimeout(value) => {
                write!(f, "Invalid timeout: {value} (expected whole seconds)")
            }
            SettingError::UnknownTheme(value) => write!(
                f,
                "Unknown theme: {value} (available: {})",
                THEME_NAMES.join(", ")
            ),
        }
    }
}

impl std::error::Error for SettingError {}

impl Config {
    /// Flag beats environment beats config file beats the built-in default.
    pub fn resolve_base_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        let chosen = flag
            .filter(|value| !value.trim().is_empty())
            .or_else(|| env.filter(|value| !value.trim().is_empty()))
            .or(self.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL);
        normalize_base_url(chosen)
    }

    /// A timeout of zero seconds means "no timeout", same as leaving it unset.
    pub fn resolve_timeout(&self, flag: Option<u64>) -> Option<Duration> {
        flag.or(self.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Apply a `set <key> <value>` request, returning a confirmation line.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<String, SettingError> {
        let value = value.trim();
        match key {
            "base-url" => {
                if !is_http_url(value) {
                    return Err(SettingError::InvalidUrl(value.to_string()));
                }
                let normalized = normalize_base_url(value);
                self.base_url = Some(normalized.clone());
                Ok(format!("Set base-url to: {normalized}"))
            }
            "timeout" => {
                let secs = value
                    .parse::<u64>()
                    .map_err(|_| SettingError::InvalidTimeout(value.to_string()))?;
                self.request_timeout_secs = Some(secs);
                Ok(format!("Set timeout to: {secs}s"))
            }
            "theme" => {
                let name = value.to_ascii_lowercase();
                if !THEME_NAMES.contains(&name.as_str()) {
                    return Err(SettingError::UnknownTheme(value.to_string()));
                }
                self.theme = Some(name.clone());
                Ok(format!("Set theme to: {name}"))
            }
            other => Err(SettingError::UnknownKey(other.to_string())),
        }
    }

    pub fn unset_value(&mut self, key: &str) -> Result<String, SettingError> {
        match key {
            "base-url" => self.base_url = None,
            "timeout" => self.request_timeout_secs = None,
            "theme" => self.theme = None,
            other => return Err(SettingError::UnknownKey(other.to_string())),
        }
        Ok(format!("Unset {key}"))
    }
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
