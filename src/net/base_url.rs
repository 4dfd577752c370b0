//! API base URL resolution.
//!
//! Resolution order: explicit override, then inference from the origin the
//! frontend is served from, then the same-origin `/api` path. Local dev
//! servers run on their own ports, so inference remaps those onto the port
//! the backend listens on.

use url::Url;

use crate::config::ConfigError;

/// Same-origin API path, used when nothing else is known.
pub const DEFAULT_API_PATH: &str = "/api";

/// Frontend dev-server port → backend port.
pub const DEV_PORT_REMAP: [(u16, u16); 3] = [(3000, 8000), (3001, 8001), (5173, 8000)];

/// Scheme, host and port of the page the client is running under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrigin {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl PageOrigin {
    #[must_use]
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> Self {
        Self { scheme: scheme.into(), host: host.into(), port }
    }

    /// Parse an origin such as `http://localhost:5173`. Any path is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not an absolute URL with a host.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidOrigin { raw: raw.to_owned(), reason: e.to_string() })?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidOrigin { raw: raw.to_owned(), reason: "missing host".to_owned() })?;
        Ok(Self::new(parsed.scheme(), host, parsed.port()))
    }

    /// Backend API base URL for this origin, with dev ports remapped.
    #[must_use]
    pub fn api_base(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}{DEFAULT_API_PATH}", self.scheme, self.host, remap_port(port)),
            None => format!("{}://{}{DEFAULT_API_PATH}", self.scheme, self.host),
        }
    }
}

/// Map a dev-server port onto its backend port; other ports pass through.
#[must_use]
pub fn remap_port(port: u16) -> u16 {
    DEV_PORT_REMAP
        .iter()
        .find(|(from, _)| *from == port)
        .map_or(port, |(_, to)| *to)
}

/// Resolve the API base URL.
#[must_use]
pub fn resolve_base_url(override_url: Option<&str>, origin: Option<&PageOrigin>) -> String {
    if let Some(explicit) = override_url.map(str::trim).filter(|v| !v.is_empty()) {
        return explicit.trim_end_matches('/').to_owned();
    }
    match origin {
        Some(origin) => origin.api_base(),
        None => DEFAULT_API_PATH.to_owned(),
    }
}

/// Whether `endpoint` is already an absolute `http(s)://` URL.
#[must_use]
pub fn is_absolute(endpoint: &str) -> bool {
    let lower = endpoint.get(..8).unwrap_or(endpoint).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Join `endpoint` onto `base` unless it is already absolute.
#[must_use]
pub fn join(base: &str, endpoint: &str) -> String {
    if is_absolute(endpoint) {
        return endpoint.to_owned();
    }
    let base = base.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{base}{endpoint}")
    } else {
        format!("{base}/{endpoint}")
    }
}

#[cfg(test)]
#[path = "base_url_test.rs"]
mod tests;
