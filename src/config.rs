//! Client configuration parsed from environment variables.
//!
//! The API base URL comes from an explicit override or is inferred from
//! the page origin. Natively both inputs come from the environment:
//!
//! - `ORBE_API_URL`: explicit API base URL (wins when non-empty)
//! - `ORBE_PAGE_ORIGIN`: origin the frontend is served from, e.g.
//!   `http://localhost:5173`, used to infer the backend URL
//! - `ORBE_TOKEN_FILE`: where the session token is persisted
//! - `ORBE_REQUEST_TIMEOUT_SECS`: default 30
//! - `ORBE_CONNECT_TIMEOUT_SECS`: default 10

use std::path::PathBuf;

use crate::net::base_url::{PageOrigin, resolve_base_url};

pub const DEFAULT_TOKEN_FILE: &str = ".orbe-session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The page origin is not an absolute `scheme://host[:port]` URL.
    #[error("invalid page origin '{raw}': {reason}")]
    InvalidOrigin { raw: String, reason: String },

    /// A numeric setting could not be parsed.
    #[error("invalid value for {key}: '{raw}'")]
    InvalidNumber { key: &'static str, raw: String },
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
    /// Explicit API base URL override.
    pub api_url: Option<String>,
    /// Origin used to infer the backend URL when no override is set.
    pub page_origin: Option<PageOrigin>,
    /// File backing the persisted session token.
    pub token_file: PathBuf,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_url: None, page_origin: None, token_file: PathBuf::from(DEFAULT_TOKEN_FILE), timeouts: Timeouts::default() }
    }
}

impl ClientConfig {
    /// Build typed client config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the page origin or a timeout value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed client config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the page origin or a timeout value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = non_empty(lookup("ORBE_API_URL"));
        let page_origin = non_empty(lookup("ORBE_PAGE_ORIGIN"))
            .map(|raw| PageOrigin::parse(&raw))
            .transpose()?;
        let token_file = non_empty(lookup("ORBE_TOKEN_FILE")).map_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE), PathBuf::from);
        let timeouts = Timeouts {
            request_secs: parse_secs("ORBE_REQUEST_TIMEOUT_SECS", lookup("ORBE_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_secs("ORBE_CONNECT_TIMEOUT_SECS", lookup("ORBE_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_url, page_origin, token_file, timeouts })
    }

    /// Resolve the API base URL from the override and page origin.
    #[must_use]
    pub fn base_url(&self) -> String {
        resolve_base_url(self.api_url.as_deref(), self.page_origin.as_ref())
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn parse_secs(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match non_empty(raw) {
        None => Ok(default),
        Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber { key, raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
