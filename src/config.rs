//! Client configuration parsed from environment variables.
//!
//! The API base is resolved once at startup. A path-style base (the default
//! `/api`) is joined onto `COUPLES_ORIGIN`, which points at the dev server
//! that proxies `/api` to the backend; an absolute `http(s)://` base is used
//! as-is.

use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_DATA_DIR: &str = ".couples";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    /// The origin used to resolve a relative API base is not absolute.
    #[error("origin must start with http:// or https://, got {0:?}")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Fully resolved API base URL, without a trailing slash.
    pub api_base_url: String,
    /// Directory backing the durable session storage.
    pub data_dir: PathBuf,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `VITE_API_BASE_URL`: default `/api`
    /// - `COUPLES_ORIGIN`: default `http://localhost:5173`
    /// - `COUPLES_DATA_DIR`: default `.couples`
    /// - `COUPLES_REQUEST_TIMEOUT_SECS`: default 60
    /// - `COUPLES_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout is not a number or the origin is not absolute.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_base = read("VITE_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
        let origin = read("COUPLES_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_owned());
        let api_base_url = resolve_api_base(&origin, &api_base)?;

        let data_dir = read("COUPLES_DATA_DIR").map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let timeouts = Timeouts {
            request_secs: parse_u64(
                "COUPLES_REQUEST_TIMEOUT_SECS",
                read("COUPLES_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            connect_secs: parse_u64(
                "COUPLES_CONNECT_TIMEOUT_SECS",
                read("COUPLES_CONNECT_TIMEOUT_SECS"),
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
        };

        Ok(Self { api_base_url, data_dir, timeouts })
    }

    /// Config pointing at an absolute base URL with default timeouts.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.trim_end_matches('/').to_owned(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timeouts: Timeouts::default(),
        }
    }
}

/// Join a path-style API base onto `origin`, or accept an absolute base as-is.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidOrigin`] when a relative base needs an origin
/// that is not an absolute http(s) URL.
pub fn resolve_api_base(origin: &str, api_base: &str) -> Result<String, ConfigError> {
    if is_absolute(api_base) {
        return Ok(api_base.trim_end_matches('/').to_owned());
    }
    if !is_absolute(origin) {
        return Err(ConfigError::InvalidOrigin(origin.to_owned()));
    }
    let origin = origin.trim_end_matches('/');
    let path = api_base.trim_matches('/');
    if path.is_empty() {
        Ok(origin.to_owned())
    } else {
        Ok(format!("{origin}/{path}"))
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn parse_u64(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse::<u64>().map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
