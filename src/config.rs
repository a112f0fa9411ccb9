//! Configuration handling

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default auth API location
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";

/// Environment variable overriding the API URL
pub const API_URL_ENV: &str = "NUPAY_API_URL";

const SESSION_FILE: &str = "session.json";
const LOG_FILE: &str = "nupay-signup.log";

/// User configuration, read from `config.json` in the platform config dir
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Auth API base URL
    pub api_url: Option<String>,
    /// Where the session is persisted
    pub session_file: Option<PathBuf>,
    /// Per-request timeout; requests wait indefinitely when unset
    pub request_timeout_secs: Option<u64>,
}

impl Settings {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("finance", "nupay", "nupay-signup")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let settings: Settings = serde_json::from_str(&content)?;
                return Ok(settings);
            }
        }

        Ok(Self::default())
    }

    /// API URL from the environment, then the config file, then the default
    pub fn api_url(&self) -> String {
        self.resolve_api_url(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_api_url(&self, from_env: Option<String>) -> String {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Session file, defaulting to the platform data dir
    pub fn session_path(&self) -> PathBuf {
        if let Some(path) = &self.session_file {
            return path.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(SESSION_FILE))
            .unwrap_or_else(|| PathBuf::from(SESSION_FILE))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Log file in the platform data dir, if one can be determined
    pub fn log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join(LOG_FILE))
    }
}
