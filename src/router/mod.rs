//! Client-side routing: route table, navigation guard and the router that
//! drives them.
//!
//! DESIGN
//! ======
//! `navigate` resolves a location against the table, follows static route
//! redirects, runs the guard and follows its redirects until a route is
//! allowed. Redirect chains are bounded so a misconfigured table cannot
//! loop forever. The settled path is written back to the client's
//! navigator, which the 401 handling consults.

pub mod guard;
pub mod routes;

use std::collections::BTreeMap;

use guard::{GuardDecision, document_title};
use routes::RouteMatch;

use crate::state::auth::AuthStore;

/// Longest redirect chain a single navigation may follow.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouterError {
    /// Redirects kept bouncing between routes.
    #[error("too many redirects navigating to {from} (last: {last})")]
    RedirectLoop { from: String, last: String },
}

/// The settled result of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub name: &'static str,
    pub full_path: String,
    pub params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    /// Requested location when it differs from where navigation ended.
    pub redirected_from: Option<String>,
}

impl Navigation {
    fn settled(to: RouteMatch, requested: &str) -> Self {
        let redirected_from = (to.full_path != requested).then(|| requested.to_owned());
        Self { name: to.route.name, full_path: to.full_path, params: to.params, query: to.query, redirected_from }
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    current: Option<Navigation>,
    title: String,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self { current: None, title: document_title(None) }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Navigation> {
        self.current.as_ref()
    }

    /// Document title set by the last guard run.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Navigate to `location`, applying route redirects and the guard.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::RedirectLoop`] when more than
    /// [`MAX_REDIRECTS`] redirects are followed.
    pub async fn navigate(&mut self, location: &str, auth: &mut AuthStore) -> Result<&Navigation, RouterError> {
        let mut target = location.to_owned();

        for _ in 0..=MAX_REDIRECTS {
            let to = routes::resolve(&target);
            if let Some(redirect) = to.route.redirect {
                tracing::trace!(from = %to.full_path, to = redirect, "route redirect");
                target = redirect.to_owned();
                continue;
            }

            match guard::before_each(&to, auth, &mut self.title).await {
                GuardDecision::Allow => {
                    tracing::debug!(route = to.route.name, path = %to.full_path, "navigated");
                    auth.api().navigator().set_current_path(&to.path);
                    let requested = routes::resolve(location).full_path;
                    return Ok(&*self.current.insert(Navigation::settled(to, &requested)));
                }
                GuardDecision::Redirect(next) => {
                    tracing::debug!(from = %to.full_path, to = %next, "guard redirect");
                    target = next.to_string();
                }
            }
        }

        tracing::warn!(from = location, last = %target, "redirect loop");
        Err(RouterError::RedirectLoop { from: location.to_owned(), last: target })
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
