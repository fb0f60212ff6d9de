//! Uniform failure value for provider API calls
//!
//! Every failure an SDK call can hit (non-2xx status, network error,
//! timeout, undecodable body, local serialization problem) is normalized
//! into a [`NetworkErrorResponse`]. SDK methods return it as the `Err` arm
//! of an [`ApiResult`], never as a provider-specific error type.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status code used when a failure did not come from a real HTTP response.
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Result of a provider API call.
pub type ApiResult<T> = std::result::Result<T, NetworkErrorResponse>;

/// Normalized failure returned by every SDK call.
///
/// Serialized in camelCase (`errorMessage`, `statusCode`, `errorObject`).
/// `error_object` holds the serialized original error body for diagnostics.
///
/// # Examples
///
/// ```
/// use malipo::http::NetworkErrorResponse;
///
/// let err = NetworkErrorResponse::from_status(400, r#"{"message":"bad request"}"#);
/// assert_eq!(err.error_message, "bad request");
/// assert_eq!(err.status_code, 400);
/// assert_eq!(err.error_object, r#"{"message":"bad request"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{error_message} (status {status_code})")]
pub struct NetworkErrorResponse {
    /// Human-readable message extracted from the failure.
    pub error_message: String,
    /// HTTP status, or 500 when none was available.
    pub status_code: u16,
    /// Serialized copy of the original error body.
    pub error_object: String,
}

/// Body fields searched, in order, for a human-readable message.
const MESSAGE_PATHS: &[&[&str]] = &[
    &["message"],
    &["error"],
    &["errorMessage"],
    &["error_description"],
    &["detail"],
    &["failureReason", "failureMessage"],
    &["rejectionReason", "rejectionMessage"],
    &["error", "message"],
];

impl NetworkErrorResponse {
    /// Creates an error value from its three parts.
    pub fn new(
        error_message: impl Into<String>,
        status_code: u16,
        error_object: impl Into<String>,
    ) -> Self {
        Self {
            error_message: error_message.into(),
            status_code,
            error_object: error_object.into(),
        }
    }

    /// Normalizes a non-2xx HTTP response.
    ///
    /// The message is taken from the first string found among well-known
    /// body fields, then the raw text body, then the canonical status
    /// reason. `error_object` is the compact JSON body, keys in their
    /// original order, when it parses; the raw text otherwise.
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code of the response
    /// * `body` - Raw response body text
    pub fn from_status(status: u16, body: &str) -> Self {
        let trimmed = body.trim();
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(value) => {
                let message = extract_message(&value)
                    .unwrap_or_else(|| canonical_reason(status));
                let error_object =
                    serde_json::to_string(&value).unwrap_or_else(|_| trimmed.to_string());
                Self::new(message, status, error_object)
            }
            Err(_) => {
                let message = if trimmed.is_empty() {
                    canonical_reason(status)
                } else {
                    trimmed.to_string()
                };
                Self::new(message, status, trimmed)
            }
        }
    }

    /// Normalizes a transport-level failure from `reqwest`.
    ///
    /// Uses the status carried by the error when there is one, otherwise
    /// [`DEFAULT_ERROR_STATUS`].
    pub fn from_transport(error: &reqwest::Error) -> Self {
        let status = error
            .status()
            .map(|s| s.as_u16())
            .unwrap_or(DEFAULT_ERROR_STATUS);
        let message = if error.is_timeout() {
            format!("Request timed out: {}", error)
        } else if error.is_connect() {
            format!("Connection failed: {}", error)
        } else {
            format!("Request failed: {}", error)
        };
        let error_object = serde_json::json!({ "error": error.to_string() }).to_string();
        Self::new(message, status, error_object)
    }

    /// Normalizes a 2xx response whose body could not be decoded.
    pub fn from_decode(error: &serde_json::Error, body: &str) -> Self {
        Self::new(
            format!("Failed to decode response: {}", error),
            DEFAULT_ERROR_STATUS,
            body,
        )
    }

    /// Normalizes a failure raised locally, before or after any HTTP I/O.
    pub fn local(message: impl Into<String>) -> Self {
        let message = message.into();
        let error_object = serde_json::json!({ "error": message }).to_string();
        Self::new(message, DEFAULT_ERROR_STATUS, error_object)
    }
}

fn extract_message(value: &serde_json::Value) -> Option<String> {
    MESSAGE_PATHS.iter().find_map(|path| {
        let mut current = value;
        for key in *path {
            current = current.get(key)?;
        }
        current
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn canonical_reason(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}
