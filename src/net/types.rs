//! Wire types shared with the backend REST API.
//!
//! Field names follow the backend serializers. Enumerations serialize to
//! the backend's lowercase values and also accept uppercase spellings.
//! Dates stay ISO-8601 strings; the client never does date arithmetic.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// USERS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "super_admin", alias = "SUPER_ADMIN")]
    SuperAdmin,
    #[serde(rename = "board", alias = "BOARD")]
    Board,
    #[serde(rename = "fiscal_council", alias = "FISCAL_COUNCIL")]
    FiscalCouncil,
    #[serde(rename = "member", alias = "MEMBER")]
    Member,
}

impl Role {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::Board => "Board",
            Self::FiscalCouncil => "Fiscal Council",
            Self::Member => "Member",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "white", alias = "WHITE")]
    White,
    #[serde(rename = "black", alias = "BLACK")]
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "pt-br", alias = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "es")]
    Es,
}

/// Member profile embedded in [`User`]. Fields the client does not model
/// are kept in `extra` so a shallow merge never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub membership_due_day: Option<u8>,
    #[serde(default)]
    pub theme_preference: Option<Theme>,
    #[serde(default)]
    pub language_preference: Option<Language>,
    #[serde(default)]
    pub is_onboarding_completed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile: Profile,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_owned()
    }
}

/// Compact user reference nested in cases and attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Option<Role>,
}

// =============================================================================
// AUTH PAYLOADS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Token issued by login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenKey {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub email: String,
    pub password1: String,
    pub password2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// One-time invitation token plus the new password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordSetup {
    pub token: String,
    pub password: String,
    pub password_confirm: String,
}

/// Password setup logs the member in and returns the hydrated user inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordSetupResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationSummary {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationValidation {
    pub valid: bool,
    pub message: Option<String>,
    pub invitation: Option<InvitationSummary>,
}

/// Partial preference update; unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferencesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_preference: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_preference: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_due_day: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

// =============================================================================
// ONBOARDING
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardingData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub membership_due_day: u8,
    pub theme_preference: Theme,
    pub language_preference: Language,
    pub terms_accepted: bool,
    pub privacy_accepted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingStatus {
    pub is_completed: bool,
    #[serde(default)]
    pub profile: Value,
}

// =============================================================================
// FINANCE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Pending,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipFee {
    pub id: i64,
    pub user: i64,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    pub competency_month: String,
    #[serde(deserialize_with = "amount")]
    pub amount: f64,
    pub due_date: String,
    pub status: FeeStatus,
    pub paid_at: Option<String>,
    #[serde(default)]
    pub is_overdue: bool,
    #[serde(default)]
    pub days_overdue: i64,
    #[serde(default)]
    pub created_at: String,
}

/// File attached to a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoluntaryDonation {
    pub id: i64,
    pub donor: Option<i64>,
    #[serde(default)]
    pub donor_name: String,
    pub donor_email: Option<String>,
    #[serde(deserialize_with = "amount")]
    pub amount: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_anonymous: bool,
    pub payment_proof: Option<String>,
    pub donated_at: String,
    pub verified_by: Option<i64>,
    #[serde(default)]
    pub verified_by_name: String,
    pub verified_at: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoluntaryDonationCreate {
    pub amount: f64,
    pub message: Option<String>,
    pub is_anonymous: Option<bool>,
    pub payment_proof: Option<Upload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationRequestStatus {
    PendingApproval,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRequest {
    pub id: i64,
    pub requested_by: i64,
    #[serde(default)]
    pub requester_name: String,
    #[serde(default)]
    pub requester_email: String,
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_description: String,
    #[serde(deserialize_with = "amount")]
    pub amount: f64,
    #[serde(default)]
    pub reason: String,
    pub urgency_level: UrgencyLevel,
    #[serde(default)]
    pub urgency_display: String,
    pub status: DonationRequestStatus,
    #[serde(default)]
    pub status_display: String,
    pub reviewed_by: Option<i64>,
    #[serde(default)]
    pub reviewed_by_name: String,
    #[serde(default)]
    pub rejection_reason: String,
    pub created_at: String,
    pub approved_at: Option<String>,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationRequestCreate {
    pub recipient_name: String,
    pub recipient_description: String,
    pub amount: f64,
    pub reason: String,
    pub urgency_level: UrgencyLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DonationRequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
}

// =============================================================================
// ASSISTANCE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    /// Transfer-stage statuses the client only displays.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub case: i64,
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub uploaded_at: String,
    pub uploaded_by: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistanceCase {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub public_description: String,
    /// Only present for board, fiscal council and admin viewers.
    pub internal_description: Option<String>,
    #[serde(deserialize_with = "amount")]
    pub total_value: f64,
    pub status: CaseStatus,
    #[serde(default)]
    pub status_display: String,
    pub created_by: Option<UserSummary>,
    pub reviewed_by: Option<UserSummary>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub approved_at: Option<String>,
    #[serde(default)]
    pub rejection_reason: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub attachment_count: u32,
    #[serde(default)]
    pub can_be_edited: bool,
}

/// Draft case created by a board member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseCreate {
    pub title: String,
    pub public_description: String,
    pub internal_description: String,
    pub total_value: f64,
}

// =============================================================================
// HELPERS
// =============================================================================

/// List payload: a bare array, or a DRF page when pagination is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> Listing<T> {
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Plain(items) | Self::Paginated { results: items } => items,
        }
    }
}

/// Decimal fields arrive as JSON strings (`"60.00"`) or numbers.
fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid amount '{text}': {e}"))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
