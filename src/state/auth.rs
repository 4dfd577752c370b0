#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde_json::Value;

use crate::net::api::ApiClient;
use crate::net::envelope::ApiResponse;
use crate::net::types::{LoginCredentials, PasswordSetup, PreferencesUpdate, Profile, Registration, Role, TokenKey, User};

const LOGIN_FALLBACK: &str = "Login failed";
const STORE_FAILED: &str = "Could not save the session";
const REGISTRATION_FALLBACK: &str = "Registration failed";
const SETUP_FALLBACK: &str = "Account setup failed";

const LOGIN_ERROR_FIELDS: [&str; 2] = ["non_field_errors", "detail"];
const REGISTRATION_ERROR_FIELDS: [&str; 3] = ["email", "password1", "non_field_errors"];
const SETUP_ERROR_FIELDS: [&str; 4] = ["password", "password_confirm", "token", "non_field_errors"];

/// Authentication state for the logged-in member.
///
/// The token itself lives in the [`ApiClient`]; this store only caches the
/// user fetched with it. A session counts as authenticated once both are
/// present.
#[derive(Debug, Clone)]
pub struct AuthStore {
    api: ApiClient,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, user: None, loading: false, error: None }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // =========================================================================
    // DERIVED
    // =========================================================================

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.api.auth_token()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token().is_some()
    }

    fn has_role(&self, role: Role) -> bool {
        self.user.as_ref().is_some_and(|user| user.role == role)
    }

    #[must_use]
    pub fn is_board_member(&self) -> bool {
        self.has_role(Role::Board)
    }

    #[must_use]
    pub fn is_fiscal_council_member(&self) -> bool {
        self.has_role(Role::FiscalCouncil)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::SuperAdmin)
    }

    #[must_use]
    pub fn can_create_cases(&self) -> bool {
        self.is_board_member() || self.is_admin()
    }

    #[must_use]
    pub fn can_approve_cases(&self) -> bool {
        self.is_fiscal_council_member() || self.is_admin()
    }

    // =========================================================================
    // FLOWS
    // =========================================================================

    /// Log in and load the member. Returns `false` with `error` set when the
    /// backend rejects the credentials or the token cannot be stored.
    pub async fn login(&mut self, credentials: &LoginCredentials) -> bool {
        self.begin();
        let response = self.api.login(credentials).await;
        let ok = self.open_session(&response, &LOGIN_ERROR_FIELDS, LOGIN_FALLBACK).await;
        self.loading = false;
        ok
    }

    /// Create an account and load the new member.
    pub async fn register(&mut self, registration: &Registration) -> bool {
        self.begin();
        let response = self.api.register(registration).await;
        let ok = self.open_session(&response, &REGISTRATION_ERROR_FIELDS, REGISTRATION_FALLBACK).await;
        self.loading = false;
        ok
    }

    /// Accept an invitation. The backend logs the member in and returns the
    /// user inline, so no separate fetch follows.
    ///
    /// # Errors
    ///
    /// Returns the most specific field error the backend reported, which is
    /// also kept in `error`.
    pub async fn setup_password(&mut self, setup: &PasswordSetup) -> Result<(), String> {
        self.begin();
        let response = self.api.setup_password(setup).await;
        let status = response.status;
        let result = match response.into_result() {
            Ok(accepted) => match self.store_token(&accepted.token) {
                Ok(()) => {
                    tracing::info!(user_id = accepted.user.id, "invitation accepted");
                    self.user = Some(accepted.user);
                    Ok(())
                }
                Err(message) => Err(message),
            },
            Err(failed) => {
                let message = flow_error(&failed, &SETUP_ERROR_FIELDS, SETUP_FALLBACK);
                tracing::info!(status, error = %message, "password setup rejected");
                self.error = Some(message.clone());
                Err(message)
            }
        };
        self.loading = false;
        result
    }

    /// Load the member for the held token. Any failure ends the session.
    pub async fn fetch_user(&mut self) {
        if self.token().is_none() {
            return;
        }
        let response = self.api.current_user().await;
        let status = response.status;
        match response.into_result() {
            Ok(user) => self.user = Some(user),
            Err(failed) => {
                tracing::warn!(status, error = failed.error().unwrap_or("empty response"), "failed to fetch user");
                self.logout().await;
            }
        }
    }

    /// End the session. The server call is best-effort; local state is
    /// always cleared.
    pub async fn logout(&mut self) {
        if self.token().is_some() {
            let response = self.api.logout().await;
            if let Some(error) = response.error() {
                tracing::warn!(status = response.status, error, "logout request failed");
            }
        }
        // Logged inside set_auth_token; local state is cleared regardless.
        let _ = self.api.set_auth_token(None);
        self.user = None;
        self.error = None;
    }

    /// Save preferences and merge the stored values into the cached profile.
    pub async fn update_preferences(&mut self, update: &PreferencesUpdate) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        let response = self.api.update_preferences(update).await;
        let Some(stored) = response.data_ref() else {
            tracing::warn!(
                status = response.status,
                error = response.error().unwrap_or("empty response"),
                "failed to update preferences"
            );
            return false;
        };
        let Some(user) = self.user.as_mut() else {
            return false;
        };
        match merge_profile(&user.profile, stored) {
            Ok(profile) => {
                user.profile = profile;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "preferences response did not fit the profile");
                false
            }
        }
    }

    /// Rehydrate the user when a token survived from a previous run.
    pub async fn initialize(&mut self) {
        if self.token().is_some() {
            self.fetch_user().await;
        }
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Store the issued token, then load the member. The user fetch only
    /// runs once the token is persisted.
    async fn open_session(&mut self, response: &ApiResponse<TokenKey>, fields: &[&str], fallback: &str) -> bool {
        let Some(key) = accepted_key(response) else {
            let message = flow_error(response, fields, fallback);
            tracing::info!(status = response.status, error = %message, "credentials rejected");
            self.error = Some(message);
            return false;
        };
        if self.store_token(&key).is_err() {
            return false;
        }
        self.fetch_user().await;
        true
    }

    /// Persist `token`, recording a storage failure in `error`.
    fn store_token(&mut self, token: &str) -> Result<(), String> {
        self.api.set_auth_token(Some(token)).map_err(|e| {
            let message = format!("{STORE_FAILED}: {e}");
            self.error = Some(message.clone());
            message
        })
    }
}

fn accepted_key(response: &ApiResponse<TokenKey>) -> Option<String> {
    response
        .data_ref()
        .map(|token| token.key.clone())
        .filter(|key| !key.is_empty())
}

/// Field error from a JSON error body; otherwise the transport message,
/// otherwise `fallback`.
fn flow_error<T>(response: &ApiResponse<T>, fields: &[&str], fallback: &str) -> String {
    if let Some(message) = response.field_error(fields) {
        return message;
    }
    match (response.error_body(), response.error()) {
        (None, Some(message)) => message.to_owned(),
        _ => fallback.to_owned(),
    }
}

/// Shallow merge of the fields the backend echoed back over `profile`.
fn merge_profile(profile: &Profile, stored: &Value) -> Result<Profile, serde_json::Error> {
    let mut merged = match serde_json::to_value(profile)? {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    if let Value::Object(fields) = stored {
        for (key, value) in fields {
            if key != "message" {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    serde_json::from_value(Value::Object(merged))
}
