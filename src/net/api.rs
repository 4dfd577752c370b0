//! REST client for the ORBE backend.
//!
//! ARCHITECTURE
//! ============
//! Every call funnels through [`ApiClient::request`], which attaches the
//! standard headers, encodes the body, sends it through the transport and
//! folds the outcome into an [`ApiResponse`]. Domain methods below it only
//! pick the verb, the endpoint template and the payload type.
//!
//! SESSION TOKEN
//! =============
//! The client is the single writer of the persisted token. It is read live
//! from storage on every request, so a logout performed by another process
//! sharing the same storage takes effect on the next call. A 401 clears the
//! token and forces a hard redirect to the login view.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::base_url;
use super::envelope::{ApiResponse, decode_response};
use super::navigator::{EXPIRED_LOGIN_URL, LOGIN_PATH, Navigator};
use super::storage::{FileStorage, StorageError, TOKEN_KEY, TokenStorage};
use super::transport::{Body, HttpRequest, HttpTransport, Method, MultipartForm, ReqwestTransport, TransportError};
use super::types::{
    AssistanceCase, Attachment, CaseCreate, DonationRequest, DonationRequestCreate, DonationRequestUpdate,
    InvitationValidation, Listing, LoginCredentials, MembershipFee, OnboardingData, OnboardingStatus, PasswordSetup,
    PasswordSetupResponse, PreferencesUpdate, Registration, TokenKey, Upload, User, VoluntaryDonation,
    VoluntaryDonationCreate,
};
use crate::config::ClientConfig;

/// Request body before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON text with `Content-Type: application/json`.
    Json(Value),
    /// Sent as-is; the transport sets the multipart boundary.
    Form(MultipartForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Leave the stored token off the request.
    pub anonymous: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::Get)
    }
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self { method, headers: Vec::new(), body: None, anonymous: false }
    }

    /// Send without the stored token. Auth endpoints must not present a
    /// token the server may already have revoked.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// Client for the backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    storage: Arc<dyn TokenStorage>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl ApiClient {
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        storage: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { base_url: base_url.into(), transport, storage, navigator }
    }

    /// Build a reqwest-backed client persisting its token to the configured file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.timeouts)?;
        let storage = FileStorage::new(config.token_file.clone());
        Ok(Self::new(config.base_url(), Arc::new(transport), Arc::new(storage), navigator))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `endpoint`.
    #[must_use]
    pub fn resolve(&self, endpoint: &str) -> String {
        base_url::join(&self.base_url, endpoint)
    }

    // =========================================================================
    // TOKEN
    // =========================================================================

    /// Current bearer token, read from storage.
    #[must_use]
    pub fn auth_token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Persist `token`, or remove the persisted token on `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend could not be updated.
    pub fn set_auth_token(&self, token: Option<&str>) -> Result<(), StorageError> {
        let result = match token {
            Some(token) => self.storage.set(TOKEN_KEY, token),
            None => self.storage.remove(TOKEN_KEY),
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, "failed to persist auth token");
        }
        result
    }

    /// Navigator that performs the hard redirect on session expiry.
    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    // =========================================================================
    // CORE REQUEST
    // =========================================================================

    /// Send a request and fold every outcome into an envelope.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> ApiResponse {
        let request = self.build_request(self.resolve(endpoint), options);
        let method = request.method.as_str();
        tracing::debug!(method, url = %request.url, "api request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(method, endpoint, error = %e, "api request failed");
                return ApiResponse::transport_failure(e.to_string());
            }
        };

        if response.status == 401 {
            self.expire_session();
        }

        let envelope = decode_response(&response);
        if let Some(error) = envelope.error() {
            tracing::debug!(method, endpoint, status = envelope.status, error, "api error response");
        }
        envelope
    }

    fn build_request(&self, url: String, options: RequestOptions) -> HttpRequest {
        let RequestOptions { method, mut headers, body, anonymous } = options;

        if !has_header(&headers, "accept") {
            headers.push(("Accept".to_owned(), "application/json".to_owned()));
        }
        if !anonymous && !has_header(&headers, "authorization") {
            if let Some(token) = self.auth_token() {
                headers.push(("Authorization".to_owned(), format!("Token {token}")));
            }
        }

        let body = body.map(|body| match body {
            RequestBody::Json(value) => {
                if !has_header(&headers, "content-type") {
                    headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
                }
                Body::Text(value.to_string())
            }
            RequestBody::Form(form) => Body::Multipart(form),
        });

        HttpRequest { method, url, headers, body }
    }

    fn expire_session(&self) {
        // Logged inside set_auth_token.
        let _ = self.set_auth_token(None);
        let path = self.navigator.current_path();
        if path.contains(LOGIN_PATH) {
            tracing::debug!(%path, "401 on login view; not redirecting");
        } else {
            tracing::info!(%path, "session rejected by server; redirecting to login");
            self.navigator.hard_redirect(EXPIRED_LOGIN_URL);
        }
    }

    pub async fn get(&self, endpoint: &str) -> ApiResponse {
        self.request(endpoint, RequestOptions::new(Method::Get)).await
    }

    pub async fn post(&self, endpoint: &str, body: Option<RequestBody>) -> ApiResponse {
        self.request(endpoint, with_body(Method::Post, body)).await
    }

    pub async fn patch(&self, endpoint: &str, body: Option<RequestBody>) -> ApiResponse {
        self.request(endpoint, with_body(Method::Patch, body)).await
    }

    pub async fn put(&self, endpoint: &str, body: Option<RequestBody>) -> ApiResponse {
        self.request(endpoint, with_body(Method::Put, body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> ApiResponse {
        self.request(endpoint, RequestOptions::new(Method::Delete)).await
    }

    /// Send `payload` as a JSON body. A payload that cannot be serialized
    /// never leaves the client and reports as a transport failure.
    async fn send_json<P: Serialize>(&self, method: Method, endpoint: &str, payload: &P) -> ApiResponse {
        self.send_json_with(RequestOptions::new(method), endpoint, payload).await
    }

    async fn send_json_with<P: Serialize>(&self, options: RequestOptions, endpoint: &str, payload: &P) -> ApiResponse {
        match serde_json::to_value(payload) {
            Ok(value) => self.request(endpoint, options.body(RequestBody::Json(value))).await,
            Err(e) => ApiResponse::transport_failure(format!("failed to encode request: {e}")),
        }
    }

    async fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<Vec<T>> {
        self.get(endpoint)
            .await
            .decode::<Listing<T>>()
            .map(Listing::into_items)
    }

    // =========================================================================
    // AUTH & USERS
    // =========================================================================

    /// `POST /auth/login/`
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResponse<TokenKey> {
        self.send_json_with(RequestOptions::new(Method::Post).anonymous(), "/auth/login/", credentials)
            .await
            .decode()
    }

    /// `POST /auth/logout/`
    pub async fn logout(&self) -> ApiResponse<()> {
        self.post("/auth/logout/", None).await.discard()
    }

    /// `POST /auth/registration/`
    pub async fn register(&self, registration: &Registration) -> ApiResponse<TokenKey> {
        self.send_json_with(RequestOptions::new(Method::Post).anonymous(), "/auth/registration/", registration)
            .await
            .decode()
    }

    /// `POST /users/invitations/validate-token/`
    pub async fn validate_invitation(&self, token: &str) -> ApiResponse<InvitationValidation> {
        self.send_json(Method::Post, "/users/invitations/validate-token/", &json!({ "token": token }))
            .await
            .decode()
    }

    /// `POST /users/invitations/setup-password/`
    pub async fn setup_password(&self, setup: &PasswordSetup) -> ApiResponse<PasswordSetupResponse> {
        self.send_json_with(RequestOptions::new(Method::Post).anonymous(), "/users/invitations/setup-password/", setup)
            .await
            .decode()
    }

    /// `GET /users/me/`
    pub async fn current_user(&self) -> ApiResponse<User> {
        self.get("/users/me/").await.decode()
    }

    /// `PATCH /users/preferences/`. Returns the stored preference fields.
    pub async fn update_preferences(&self, update: &PreferencesUpdate) -> ApiResponse {
        self.send_json(Method::Patch, "/users/preferences/", update).await
    }

    /// `POST /users/onboarding/`
    pub async fn submit_onboarding(&self, data: &OnboardingData) -> ApiResponse {
        self.send_json(Method::Post, "/users/onboarding/", data).await
    }

    /// `GET /users/onboarding/status/`
    pub async fn onboarding_status(&self) -> ApiResponse<OnboardingStatus> {
        self.get("/users/onboarding/status/").await.decode()
    }

    // =========================================================================
    // MEMBERSHIP FEES
    // =========================================================================

    pub async fn my_fees(&self) -> ApiResponse<Vec<MembershipFee>> {
        self.get_list("/finance/fees/my_fees/").await
    }

    pub async fn all_fees(&self) -> ApiResponse<Vec<MembershipFee>> {
        self.get_list("/finance/fees/").await
    }

    // =========================================================================
    // VOLUNTARY DONATIONS
    // =========================================================================

    /// Multipart `POST /finance/voluntary-donations/` with optional proof file.
    pub async fn create_voluntary_donation(&self, donation: VoluntaryDonationCreate) -> ApiResponse<VoluntaryDonation> {
        let mut form = MultipartForm::new().text("amount", donation.amount.to_string());
        if let Some(message) = donation.message.filter(|m| !m.is_empty()) {
            form = form.text("message", message);
        }
        if let Some(anonymous) = donation.is_anonymous {
            form = form.text("is_anonymous", anonymous.to_string());
        }
        if let Some(proof) = donation.payment_proof {
            form = with_upload(form, "payment_proof", proof);
        }
        self.post("/finance/voluntary-donations/", Some(RequestBody::Form(form)))
            .await
            .decode()
    }

    pub async fn my_voluntary_donations(&self) -> ApiResponse<Vec<VoluntaryDonation>> {
        self.get_list("/finance/voluntary-donations/my_donations/").await
    }

    pub async fn all_voluntary_donations(&self) -> ApiResponse<Vec<VoluntaryDonation>> {
        self.get_list("/finance/voluntary-donations/").await
    }

    pub async fn pending_voluntary_donations(&self) -> ApiResponse<Vec<VoluntaryDonation>> {
        self.get_list("/finance/voluntary-donations/pending_verification/").await
    }

    pub async fn verify_voluntary_donation(&self, id: i64) -> ApiResponse<VoluntaryDonation> {
        self.post(&format!("/finance/voluntary-donations/{id}/verify/"), None)
            .await
            .decode()
    }

    // =========================================================================
    // DONATION REQUESTS
    // =========================================================================

    pub async fn create_donation_request(&self, request: &DonationRequestCreate) -> ApiResponse<DonationRequest> {
        self.send_json(Method::Post, "/finance/donation-requests/", request)
            .await
            .decode()
    }

    pub async fn my_donation_requests(&self) -> ApiResponse<Vec<DonationRequest>> {
        self.get_list("/finance/donation-requests/my_requests/").await
    }

    pub async fn all_donation_requests(&self) -> ApiResponse<Vec<DonationRequest>> {
        self.get_list("/finance/donation-requests/").await
    }

    pub async fn pending_donation_requests(&self) -> ApiResponse<Vec<DonationRequest>> {
        self.get_list("/finance/donation-requests/pending_approval/").await
    }

    pub async fn approve_donation_request(&self, id: i64) -> ApiResponse<DonationRequest> {
        self.post(&format!("/finance/donation-requests/{id}/approve/"), None)
            .await
            .decode()
    }

    pub async fn reject_donation_request(&self, id: i64, reason: &str) -> ApiResponse<DonationRequest> {
        let endpoint = format!("/finance/donation-requests/{id}/reject/");
        self.send_json(Method::Post, &endpoint, &json!({ "rejection_reason": reason }))
            .await
            .decode()
    }

    /// Aggregate counters; the shape is backend-defined.
    pub async fn donation_request_stats(&self) -> ApiResponse {
        self.get("/finance/donation-requests/stats/").await
    }

    pub async fn update_donation_request(&self, id: i64, update: &DonationRequestUpdate) -> ApiResponse<DonationRequest> {
        let endpoint = format!("/finance/donation-requests/{id}/");
        self.send_json(Method::Patch, &endpoint, update).await.decode()
    }

    pub async fn delete_donation_request(&self, id: i64) -> ApiResponse<()> {
        self.delete(&format!("/finance/donation-requests/{id}/"))
            .await
            .discard()
    }

    // =========================================================================
    // ASSISTANCE CASES
    // =========================================================================

    pub async fn assistance_cases(&self) -> ApiResponse<Vec<AssistanceCase>> {
        self.get_list("/assistance/cases/").await
    }

    pub async fn assistance_case(&self, id: i64) -> ApiResponse<AssistanceCase> {
        self.get(&format!("/assistance/cases/{id}/")).await.decode()
    }

    pub async fn my_cases(&self) -> ApiResponse<Vec<AssistanceCase>> {
        self.get_list("/assistance/cases/my_cases/").await
    }

    pub async fn pending_cases(&self) -> ApiResponse<Vec<AssistanceCase>> {
        self.get_list("/assistance/cases/pending/").await
    }

    pub async fn create_case(&self, case: &CaseCreate) -> ApiResponse<AssistanceCase> {
        self.send_json(Method::Post, "/assistance/cases/", case)
            .await
            .decode()
    }

    /// Draft → pending approval.
    pub async fn submit_case(&self, id: i64) -> ApiResponse<AssistanceCase> {
        self.post(&format!("/assistance/cases/{id}/submit/"), None)
            .await
            .decode()
    }

    pub async fn approve_case(&self, id: i64) -> ApiResponse<AssistanceCase> {
        self.post(&format!("/assistance/cases/{id}/approve/"), None)
            .await
            .decode()
    }

    pub async fn reject_case(&self, id: i64, reason: &str) -> ApiResponse<AssistanceCase> {
        let endpoint = format!("/assistance/cases/{id}/reject/");
        self.send_json(Method::Post, &endpoint, &json!({ "rejection_reason": reason }))
            .await
            .decode()
    }

    /// Bank details for the transfer stage; field names are backend-defined.
    pub async fn submit_bank_info(&self, case_id: i64, bank_data: &Value) -> ApiResponse {
        let endpoint = format!("/assistance/cases/{case_id}/submit_bank_info/");
        self.send_json(Method::Post, &endpoint, bank_data).await
    }

    pub async fn confirm_transfer(&self, case_id: i64) -> ApiResponse {
        self.post(&format!("/assistance/cases/{case_id}/confirm_transfer/"), None)
            .await
    }

    pub async fn submit_member_proof(&self, case_id: i64) -> ApiResponse {
        self.post(&format!("/assistance/cases/{case_id}/submit_member_proof/"), None)
            .await
    }

    pub async fn complete_case(&self, case_id: i64) -> ApiResponse {
        self.post(&format!("/assistance/cases/{case_id}/complete/"), None)
            .await
    }

    // =========================================================================
    // ATTACHMENTS
    // =========================================================================

    /// Multipart `POST /assistance/attachments/` with fields `case` and `file`.
    pub async fn upload_attachment(&self, case_id: i64, file: Upload) -> ApiResponse<Attachment> {
        let form = with_upload(MultipartForm::new().text("case", case_id.to_string()), "file", file);
        self.post("/assistance/attachments/", Some(RequestBody::Form(form)))
            .await
            .decode()
    }

    pub async fn delete_attachment(&self, attachment_id: i64) -> ApiResponse<()> {
        self.delete(&format!("/assistance/attachments/{attachment_id}/"))
            .await
            .discard()
    }
}

fn with_body(method: Method, body: Option<RequestBody>) -> RequestOptions {
    RequestOptions { body, ..RequestOptions::new(method) }
}

fn with_upload(form: MultipartForm, field: &str, upload: Upload) -> MultipartForm {
    form.file(field, upload.file_name, upload.mime, upload.bytes)
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
