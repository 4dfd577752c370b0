//! Response envelope returned by every API call.
//!
//! DESIGN
//! ======
//! Callers never see a transport error or a panic: every failure mode is
//! folded into [`ApiResponse`]. Status `0` marks a failure that happened
//! before (or instead of) a usable HTTP response, `204` is success without
//! a payload, and any other non-2xx status carries a failure message.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::transport::HttpResponse;

/// Status used for failures that produced no usable HTTP status.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Error payload fields consulted, in order, for a display message.
const MESSAGE_FIELDS: [&str; 3] = ["detail", "message", "error"];

/// Server-reported or transport failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// Display message.
    pub message: String,
    /// Raw JSON error body, when the server sent one.
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Data(T),
    /// Success without a payload (204).
    Empty,
    Failure(Failure),
}

/// Uniform result of an API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T = Value> {
    pub status: u16,
    pub outcome: Outcome<T>,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn data(status: u16, data: T) -> Self {
        Self { status, outcome: Outcome::Data(data) }
    }

    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self { status, outcome: Outcome::Empty }
    }

    #[must_use]
    pub fn failure(status: u16, message: impl Into<String>, body: Option<Value>) -> Self {
        Self { status, outcome: Outcome::Failure(Failure { message: message.into(), body }) }
    }

    /// Failure that never reached a usable HTTP status.
    #[must_use]
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::failure(TRANSPORT_FAILURE_STATUS, message, None)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, Outcome::Failure(_))
    }

    #[must_use]
    pub fn data_ref(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Data(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self.outcome {
            Outcome::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Payload on success; the whole envelope otherwise, including an
    /// empty success.
    ///
    /// # Errors
    ///
    /// Returns `self` when there is no payload to hand out.
    pub fn into_result(self) -> Result<T, Self> {
        match self.outcome {
            Outcome::Data(data) => Ok(data),
            outcome => Err(Self { status: self.status, outcome }),
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failure(failure) => Some(failure.message.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_body(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Failure(failure) => failure.body.as_ref(),
            _ => None,
        }
    }

    /// First validation message found under `fields` in the error body.
    #[must_use]
    pub fn field_error(&self, fields: &[&str]) -> Option<String> {
        self.error_body().and_then(|body| first_field_error(body, fields))
    }

    /// Transform the payload, keeping status and failure.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        let outcome = match self.outcome {
            Outcome::Data(data) => Outcome::Data(f(data)),
            Outcome::Empty => Outcome::Empty,
            Outcome::Failure(failure) => Outcome::Failure(failure),
        };
        ApiResponse { status: self.status, outcome }
    }

    /// Discard the payload, keeping status and failure.
    #[must_use]
    pub fn discard(self) -> ApiResponse<()> {
        let outcome = match self.outcome {
            Outcome::Data(_) | Outcome::Empty => Outcome::Empty,
            Outcome::Failure(failure) => Outcome::Failure(failure),
        };
        ApiResponse { status: self.status, outcome }
    }
}

impl ApiResponse<Value> {
    /// Decode the JSON payload into `T`.
    ///
    /// A payload that does not match `T` becomes a transport failure, the
    /// same as a body that was not valid JSON at all.
    #[must_use]
    pub fn decode<T: DeserializeOwned>(self) -> ApiResponse<T> {
        let status = self.status;
        match self.outcome {
            Outcome::Data(value) => match serde_json::from_value::<T>(value) {
                Ok(data) => ApiResponse::data(status, data),
                Err(e) => ApiResponse::transport_failure(format!("failed to decode response: {e}")),
            },
            Outcome::Empty => ApiResponse::empty(status),
            Outcome::Failure(failure) => ApiResponse { status, outcome: Outcome::Failure(failure) },
        }
    }
}

/// Fold a raw HTTP response into an envelope.
#[must_use]
pub fn decode_response(response: &HttpResponse) -> ApiResponse<Value> {
    let status = response.status;
    if status == 204 {
        return ApiResponse::empty(status);
    }

    if !is_json(response.content_type.as_deref()) {
        let text = response.body.trim();
        let message = if text.is_empty() { format!("Server error ({status})") } else { text.to_owned() };
        return ApiResponse::failure(status, message, None);
    }

    let payload: Value = match serde_json::from_str(&response.body) {
        Ok(payload) => payload,
        Err(e) => return ApiResponse::transport_failure(format!("invalid JSON response: {e}")),
    };

    if (200..300).contains(&status) {
        ApiResponse::data(status, payload)
    } else {
        ApiResponse::failure(status, error_message(&payload), Some(payload))
    }
}

/// Whether a `Content-Type` header denotes JSON.
#[must_use]
pub fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}

/// Display message for a JSON error payload.
///
/// Uses the first present of `detail`, `message`, `error`; falls back to
/// the serialized payload.
#[must_use]
pub fn error_message(payload: &Value) -> String {
    MESSAGE_FIELDS
        .iter()
        .filter_map(|field| payload.get(field))
        .find_map(present_text)
        .unwrap_or_else(|| payload.to_string())
}

/// First message under any of `fields`; list values yield their first item.
#[must_use]
pub fn first_field_error(body: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().filter_map(|field| body.get(field)).find_map(|value| match value {
        Value::Array(items) => items.first().and_then(present_text),
        other => present_text(other),
    })
}

fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
