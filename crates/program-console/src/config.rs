//! # Settings
//!
//! Resolved in three layers: built-in defaults, then an optional TOML file,
//! then `CONSOLE__*` environment variables.
//!
//! ```toml
//! api_base_url = "http://localhost:5000"
//! backend = "http"
//! request_timeout_secs = 10
//! search_debounce_ms = 300
//! channel_capacity = 32
//! ```

use crate::error::ConsoleError;
use console_framework::ManagerOptions;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "console.toml";

const ENV_PREFIX: &str = "CONSOLE__";

/// Where the screens send their list and CRUD calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The REST API at `api_base_url`.
    Http,
    /// In-process store actors; nothing leaves the process.
    Memory,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Backend::Http),
            "memory" => Ok(Backend::Memory),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Http => write!(f, "http"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub api_base_url: String,
    pub backend: Backend,
    pub request_timeout_secs: u64,
    pub search_debounce_ms: u64,
    pub channel_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".into(),
            backend: Backend::Http,
            request_timeout_secs: 10,
            search_debounce_ms: 300,
            channel_capacity: 32,
        }
    }
}

impl Settings {
    /// Defaults, then `path` if it exists, then the process environment.
    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        let settings = match Self::from_file(path)? {
            Some(settings) => settings,
            None => Self::default(),
        };
        settings.with_env(std::env::vars())
    }

    /// Reads a TOML file. A missing file is not an error; keys left out
    /// keep their defaults.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConsoleError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConsoleError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&raw)
            .map(Some)
            .map_err(|source| ConsoleError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Applies `CONSOLE__<KEY>` overrides. Unrelated variables are ignored;
    /// an unknown `CONSOLE__` key or an unparseable value is an error.
    pub fn with_env<I>(mut self, vars: I) -> Result<Self, ConsoleError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name.to_ascii_lowercase().as_str() {
                "api_base_url" => self.api_base_url = value,
                "backend" => self.backend = parse(&key, &value)?,
                "request_timeout_secs" => self.request_timeout_secs = parse(&key, &value)?,
                "search_debounce_ms" => self.search_debounce_ms = parse(&key, &value)?,
                "channel_capacity" => self.channel_capacity = parse(&key, &value)?,
                _ => return Err(ConsoleError::ConfigValue { key, value }),
            }
        }
        if self.channel_capacity == 0 {
            return Err(ConsoleError::ConfigValue {
                key: "channel_capacity".into(),
                value: "0".into(),
            });
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions {
            buffer_size: self.channel_capacity,
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConsoleError> {
    value.trim().parse().map_err(|_| ConsoleError::ConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
