//! Hard-navigation seam used when the backend rejects the session.
//!
//! A 401 must reset all in-memory state, so it triggers a full page load
//! of the login view rather than a router transition. The side effect
//! sits behind [`Navigator`] so tests can observe it and the CLI can
//! replace it with a log message.

use std::sync::{Mutex, PoisonError};

/// Path of the login view.
pub const LOGIN_PATH: &str = "/login";

/// Target of the forced redirect after a 401.
pub const EXPIRED_LOGIN_URL: &str = "/login?expired=true";

pub trait Navigator: Send + Sync {
    /// Path of the page currently shown.
    fn current_path(&self) -> String;

    /// Record a settled in-app navigation.
    fn set_current_path(&self, path: &str);

    /// Full page navigation to `url`, discarding in-memory state.
    fn hard_redirect(&self, url: &str);
}

/// Navigator for terminal front ends: there is no page to reload, so
/// expiry is reported through the log.
#[derive(Debug)]
pub struct TerminalNavigator {
    path: Mutex<String>,
}

impl Default for TerminalNavigator {
    fn default() -> Self {
        Self { path: Mutex::new("/".to_owned()) }
    }
}

impl Navigator for TerminalNavigator {
    fn current_path(&self) -> String {
        self.path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_current_path(&self, path: &str) {
        *self.path.lock().unwrap_or_else(PoisonError::into_inner) = path.to_owned();
    }

    fn hard_redirect(&self, url: &str) {
        tracing::warn!(%url, "session expired; log in again");
        self.set_current_path(LOGIN_PATH);
    }
}

/// Navigator that tracks the current path in memory and records every
/// hard redirect.
#[derive(Debug)]
pub struct MemoryNavigator {
    path: Mutex<String>,
    redirects: Mutex<Vec<String>>,
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::at("/")
    }
}

impl MemoryNavigator {
    #[must_use]
    pub fn at(path: &str) -> Self {
        Self { path: Mutex::new(path.to_owned()), redirects: Mutex::new(Vec::new()) }
    }

    #[must_use]
    pub fn redirects(&self) -> Vec<String> {
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_current_path(&self, path: &str) {
        *self.path.lock().unwrap_or_else(PoisonError::into_inner) = path.to_owned();
    }

    fn hard_redirect(&self, url: &str) {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        self.set_current_path(path);
        self.redirects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_owned());
    }
}

#[cfg(test)]
#[path = "navigator_test.rs"]
mod tests;
