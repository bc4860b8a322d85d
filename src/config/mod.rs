// src/config/mod.rs
//! Process configuration. Defaults cover normal operation; a handful of env
//! vars (optionally from `.env`) can override them.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3003;
pub const DEFAULT_LOG_DIR: &str = "Log";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_USER_AGENT: &str = concat!("blog-extractor/", env!("CARGO_PKG_VERSION"));

pub const ENV_PORT: &str = "EXTRACTOR_PORT";
pub const ENV_LOG_DIR: &str = "EXTRACTOR_LOG_DIR";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "EXTRACTOR_FETCH_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "EXTRACTOR_USER_AGENT";

/// Settings for the outbound page fetches done by the extractors.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory holding the daily request logs.
    pub log_dir: PathBuf,
    pub fetch: FetchSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            fetch: FetchSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults with env overrides applied. Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(port) = parse_env::<u16>(ENV_PORT) {
            cfg.port = port;
        }
        if let Some(dir) = env_non_empty(ENV_LOG_DIR) {
            cfg.log_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parse_env::<u64>(ENV_FETCH_TIMEOUT_SECS).filter(|s| *s > 0) {
            cfg.fetch.timeout = Duration::from_secs(secs);
        }
        if let Some(ua) = env_non_empty(ENV_USER_AGENT) {
            cfg.fetch.user_agent = ua;
        }

        cfg
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env_non_empty(name)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparsable env override");
            None
        }
    }
}
