//! Navigation guard run before every route transition.
//!
//! ORDER
//! =====
//! 1. Set the document title.
//! 2. Rehydrate the user when only a token is held.
//! 3. Send anonymous visitors of protected routes to login, remembering
//!    where they were going.
//! 4. Send signed-in members away from the login and home routes.
//! 5. Keep non-board members out of board routes.
//!
//! Hydration precedes every auth check, and the login bounce (4) is only
//! considered once the auth gate (3) has passed, so an anonymous visit to
//! a board route ends at login rather than at the dashboard.

use std::fmt::{self, Write as _};

use super::routes::{self, DASHBOARD, HOME, LOGIN, RouteMatch};
use crate::state::auth::AuthStore;

pub const APP_TITLE: &str = "ORBE Platform";

/// Query key carrying the originally requested path to the login view.
pub const REDIRECT_QUERY: &str = "redirect";

#[must_use]
pub fn document_title(title: Option<&str>) -> String {
    match title.filter(|t| !t.is_empty()) {
        Some(title) => format!("{title} | {APP_TITLE}"),
        None => APP_TITLE.to_owned(),
    }
}

/// Redirect target: a path plus query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), query: Vec::new() }
    }

    /// Location of a named route from the table.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::new(routes::find(name).map_or("/", |route| route.path))
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{}={}", encode_query(key), encode_query(value))?;
        }
        Ok(())
    }
}

/// Bytes left as-is in a query component besides ASCII alphanumerics.
const QUERY_KEEP: &[u8] = b"-_.~/:@!$'()*,;";

/// Percent-encode a query component, leaving path separators readable.
fn encode_query(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || QUERY_KEEP.contains(&byte) {
            out.push(char::from(byte));
        } else {
            // Writing to a String cannot fail.
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Location),
}

/// Decide whether the transition to `to` may proceed. Always updates
/// `title` first.
pub async fn before_each(to: &RouteMatch, auth: &mut AuthStore, title: &mut String) -> GuardDecision {
    *title = document_title(to.route.meta.title);

    if auth.user.is_none() && auth.token().is_some() {
        auth.initialize().await;
    }

    let meta = to.route.meta;
    let authenticated = auth.is_authenticated();

    if meta.requires_auth && !authenticated {
        tracing::debug!(to = %to.full_path, "anonymous visit to protected route");
        return GuardDecision::Redirect(Location::named(LOGIN).with_query(REDIRECT_QUERY, to.full_path.clone()));
    }

    if !meta.requires_auth && authenticated && matches!(to.name(), LOGIN | HOME) {
        return GuardDecision::Redirect(Location::named(DASHBOARD));
    }

    if meta.requires_board && !auth.can_create_cases() {
        tracing::debug!(to = %to.full_path, "board route denied");
        return GuardDecision::Redirect(Location::named(DASHBOARD));
    }

    GuardDecision::Allow
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
