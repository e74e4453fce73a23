//! # Console Errors
//!
//! Every screen client maps [`FrameworkError`] into [`ConsoleError`], tagging
//! it with the screen that raised it. Startup failures (configuration,
//! HTTP client construction, shutdown) share the same type so `main` has one
//! error to report.

use console_framework::FrameworkError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The screen's manager task is gone; the console must be restarted.
    #[error("The {screen} screen is no longer running")]
    ScreenStopped { screen: &'static str },

    /// The manager refused an action in its current state.
    #[error("{screen}: {source}")]
    Rejected {
        screen: &'static str,
        #[source]
        source: FrameworkError,
    },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    ConfigValue { key: String, value: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Screen task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl ConsoleError {
    /// Attributes a framework error to a screen.
    pub fn screen(screen: &'static str, error: FrameworkError) -> Self {
        match error {
            FrameworkError::ManagerClosed | FrameworkError::ManagerDropped => {
                ConsoleError::ScreenStopped { screen }
            }
            source => ConsoleError::Rejected { screen, source },
        }
    }

    /// The underlying framework error, when the manager rejected an action.
    pub fn rejection(&self) -> Option<&FrameworkError> {
        match self {
            ConsoleError::Rejected { source, .. } => Some(source),
            _ => None,
        }
    }
}
