use crate::core::config::io::ConfigError;
use crate::core::constants::{DEFAULT_ENDPOINT, DEFAULT_NOTIFICATION_SECONDS, DEFAULT_TITLE};
use crate::utils::url::normalize_endpoint;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Keys accepted by `sidechat set` and `sidechat unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "endpoint",
    "title",
    "history-limit",
    "log-file",
    "notification-seconds",
];

/// The on-disk configuration. Every field is optional; [`Settings`] holds the
/// resolved values.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend chat endpoint (e.g., "http://localhost:8000/api/chat/")
    pub endpoint: Option<String>,
    /// Title shown at the top of the panel
    pub title: Option<String>,
    /// Keep at most this many entries; unset keeps everything
    pub history_limit: Option<usize>,
    /// Append the transcript to this file
    pub log_file: Option<PathBuf>,
    /// Seconds a notification stays visible
    pub notification_seconds: Option<u64>,
}

/// Values given on the command line. They win over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub title: String,
    pub history_limit: Option<usize>,
    pub log_file: Option<PathBuf>,
    pub notification_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            title: DEFAULT_TITLE.to_string(),
            history_limit: None,
            log_file: None,
            notification_seconds: DEFAULT_NOTIFICATION_SECONDS,
        }
    }
}

impl Config {
    /// Resolve the effective settings. Endpoint precedence is command line,
    /// then `env_endpoint`, then the config file, then the built-in default.
    pub fn resolve(
        &self,
        overrides: &Overrides,
        env_endpoint: Option<String>,
    ) -> Result<Settings, ConfigError> {
        let raw_endpoint = overrides
            .endpoint
            .clone()
            .or(env_endpoint.filter(|value| !value.trim().is_empty()))
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = normalize_endpoint(&raw_endpoint)?;

        let defaults = Settings::default();
        Ok(Settings {
            endpoint,
            title: self
                .title
                .clone()
                .filter(|title| !title.trim().is_empty())
                .unwrap_or(defaults.title),
            history_limit: positive("history-limit", self.history_limit)?,
            log_file: overrides.log_file.clone().or_else(|| self.log_file.clone()),
            notification_seconds: positive("notification-seconds", self.notification_seconds)?
                .unwrap_or(defaults.notification_seconds),
        })
    }

    pub fn set_key(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "endpoint" => {
                self.endpoint = Some(normalize_endpoint(value)?);
            }
            "title" => {
                if value.is_empty() {
                    return Err(invalid(key, value, "title cannot be empty"));
                }
                self.title = Some(value.to_string());
            }
            "history-limit" => {
                let limit = value
                    .parse::<usize>()
                    .ok()
                    .filter(|limit| *limit > 0)
                    .ok_or_else(|| invalid(key, value, "expected a positive whole number"))?;
                self.history_limit = Some(limit);
            }
            "log-file" => {
                if value.is_empty() {
                    return Err(invalid(key, value, "expected a file path"));
                }
                self.log_file = Some(PathBuf::from(value));
            }
            "notification-seconds" => {
                let seconds = value
                    .parse::<u64>()
                    .ok()
                    .filter(|seconds| *seconds > 0)
                    .ok_or_else(|| invalid(key, value, "expected a positive whole number"))?;
                self.notification_seconds = Some(seconds);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn unset_key(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "endpoint" => self.endpoint = None,
            "title" => self.title = None,
            "history-limit" => self.history_limit = None,
            "log-file" => self.log_file = None,
            "notification-seconds" => self.notification_seconds = None,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

/// Values read from the file get the same positivity check as `set_key`.
fn positive<N>(key: &str, value: Option<N>) -> Result<Option<N>, ConfigError>
where
    N: Copy + Default + PartialEq + std::fmt::Display,
{
    match value {
        Some(n) if n == N::default() => Err(invalid(
            key,
            &n.to_string(),
            "expected a positive whole number",
        )),
        other => Ok(other),
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
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
