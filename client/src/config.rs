//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8001/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_EXPORT_TIMEOUT_SECS: u64 = 30;
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Applied to every request unless overridden.
    pub request_secs: u64,
    /// Applied to website export, which streams a zip archive.
    pub export_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn export(&self) -> Duration {
        Duration::from_secs(self.export_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, export_secs: DEFAULT_EXPORT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeouts: Timeouts,
    /// Location of the persisted credential; `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Build a config pointing at `api_url` with default timeouts and no session file.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base_url(&api_url.into()),
            timeouts: Timeouts::default(),
            session_file: None,
        }
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `SITEGEN_API_URL`: default `http://localhost:8001/api`
    /// - `SITEGEN_TIMEOUT_SECS`: default 10
    /// - `SITEGEN_EXPORT_TIMEOUT_SECS`: default 30
    /// - `SITEGEN_SESSION_FILE`: default `<config dir>/sitegen/session.json`
    #[must_use]
    pub fn from_env() -> Self {
        let api_url = std::env::var("SITEGEN_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let timeouts = Timeouts {
            request_secs: env_parse_u64("SITEGEN_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            export_secs: env_parse_u64("SITEGEN_EXPORT_TIMEOUT_SECS", DEFAULT_EXPORT_TIMEOUT_SECS),
        };
        let session_file = std::env::var("SITEGEN_SESSION_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_session_file);

        Self { api_url: normalize_base_url(&api_url), timeouts, session_file }
    }
}

/// `<config dir>/sitegen/session.json`, when the platform has a config dir.
#[must_use]
pub fn default_session_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sitegen").join(SESSION_FILE_NAME))
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
