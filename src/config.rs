//! Runtime configuration.
//!
//! Everything is environment-driven; there is no config file. The settings
//! dialog can adjust the refresh interval at runtime without touching this.

use crate::api::DEFAULT_API_URL;

/// Default contest-history window (days) for the profile view.
pub const DEFAULT_CONTEST_DAYS: u32 = 365;
/// Default problem-stats window (days) for the profile view.
pub const DEFAULT_PROBLEM_DAYS: u32 = 30;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the tracker backend, e.g. `http://localhost:5000/api`.
    pub api_url: String,
    /// Auto-refresh interval for the student list in seconds; 0 disables.
    pub refresh_secs: u64,
    /// Log file path; logging is disabled when unset.
    pub log_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_secs: 0,
            log_path: None,
        }
    }
}

impl Config {
    /// Build configuration from `CFTRACK_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("CFTRACK_API_URL") {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        if let Ok(secs) = std::env::var("CFTRACK_REFRESH_SECS") {
            if let Ok(secs) = secs.parse() {
                config.refresh_secs = secs;
            }
        }
        if let Ok(path) = std::env::var("CFTRACK_LOG") {
            if !path.is_empty() {
                config.log_path = Some(path);
            }
        }
        config
    }
}
