//! Normalized FluxGen error shape

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Known error categories reported by the backend.
///
/// `ApiError::category` is an open string (the backend may introduce new
/// categories at any time); these constants cover the documented ones.
pub mod category {
    pub const RATE_LIMIT: &str = "rate_limit";
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const UNKNOWN: &str = "unknown";
}

const FALLBACK_ERROR: &str = "Generation failed";
const FALLBACK_MESSAGE: &str = "An unexpected error occurred";
const FALLBACK_CODE: &str = "UNKNOWN_ERROR";

/// Normalized failure from any FluxGen operation
///
/// Every failure path (transport error, non-2xx response, or an error
/// payload embedded in a 2xx body) is coerced into this shape before it
/// reaches caller state. Fields absent from the backend payload fall back to
/// documented defaults, so `category` and `message` are always non-empty.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{error}: {message}")]
pub struct ApiError {
    /// Short human-readable error title
    pub error: String,
    /// Error category (see [`category`]); open string, never empty
    pub category: String,
    /// Detailed human-readable message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// HTTP status code, when the failure came from a response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Backend request identifier, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Whether retrying the same request may succeed
    #[serde(default)]
    pub retryable: bool,
    /// Which rate-limit rule was hit (rate_limit category only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_type: Option<String>,
    /// Opaque usage details attached to rate-limit errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
    /// Unix timestamp at which the rate-limit window resets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_time: Option<i64>,
    /// Seconds to wait before retrying
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    /// RFC 3339 timestamp at which the error was normalized client-side
    pub timestamp: String,
}

impl ApiError {
    /// Normalize a backend error payload, applying documented fallbacks for
    /// any missing field.
    ///
    /// `status_code` is the HTTP status of the failing response, used when
    /// the payload does not carry its own `statusCode`.
    pub(crate) fn from_payload(status_code: Option<u16>, payload: &Value) -> Self {
        let text = |key: &str| payload.get(key).and_then(Value::as_str).map(String::from);

        Self {
            error: text("error").unwrap_or_else(|| FALLBACK_ERROR.to_string()),
            category: text("category").unwrap_or_else(|| category::UNKNOWN.to_string()),
            message: text("message").unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            code: text("code").unwrap_or_else(|| FALLBACK_CODE.to_string()),
            status_code: payload
                .get("statusCode")
                .and_then(Value::as_u64)
                .map(|v| v as u16)
                .or(status_code),
            request_id: text("requestId"),
            retryable: payload
                .get("retryable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            limit_type: text("limitType"),
            usage: payload.get("usage").cloned(),
            reset_time: payload.get("resetTime").and_then(Value::as_i64),
            retry_after: payload.get("retryAfter").and_then(Value::as_u64),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Transport-level failure (connection refused, timeout, TLS, ...).
    pub(crate) fn network(err: reqwest::Error) -> Self {
        Self {
            error: FALLBACK_ERROR.to_string(),
            category: category::UNKNOWN.to_string(),
            message: err.to_string(),
            code: "NETWORK_ERROR".to_string(),
            status_code: err.status().map(|s| s.as_u16()),
            request_id: None,
            retryable: false,
            limit_type: None,
            usage: None,
            reset_time: None,
            retry_after: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// A 2xx body that could not be decoded into the expected shape.
    pub(crate) fn decode(err: serde_json::Error) -> Self {
        Self {
            error: FALLBACK_ERROR.to_string(),
            category: category::UNKNOWN.to_string(),
            message: err.to_string(),
            code: "INVALID_RESPONSE".to_string(),
            status_code: None,
            request_id: None,
            retryable: false,
            limit_type: None,
            usage: None,
            reset_time: None,
            retry_after: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Returns true for rate-limit errors.
    pub fn is_rate_limit(&self) -> bool {
        self.category == category::RATE_LIMIT
    }

    /// Human-formatted retry countdown derived from `retry_after`.
    ///
    /// Renders `"1m 5s"` for 65 seconds and `"45s"` for 45 seconds. Returns
    /// `None` when the backend supplied no `retryAfter`.
    pub fn retry_after_text(&self) -> Option<String> {
        let secs = self.retry_after?;
        let minutes = secs / 60;
        let seconds = secs % 60;

        if minutes > 0 {
            Some(format!("{}m {}s", minutes, seconds))
        } else {
            Some(format!("{}s", seconds))
        }
    }
}

/// Result type for FluxGen operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload_uses_backend_fields() {
        let payload = json!({
            "error": "Too many requests",
            "category": "rate_limit",
            "message": "Hourly limit reached",
            "code": "RATE_LIMITED",
            "requestId": "req_42",
            "retryable": true,
            "limitType": "hourly",
            "retryAfter": 65
        });

        let err = ApiError::from_payload(Some(429), &payload);
        assert_eq!(err.error, "Too many requests");
        assert_eq!(err.category, "rate_limit");
        assert_eq!(err.code, "RATE_LIMITED");
        assert_eq!(err.status_code, Some(429));
        assert_eq!(err.request_id.as_deref(), Some("req_42"));
        assert!(err.retryable);
        assert!(err.is_rate_limit());
        assert_eq!(err.limit_type.as_deref(), Some("hourly"));
        assert_eq!(err.retry_after, Some(65));
    }

    #[test]
    fn test_from_payload_fallbacks() {
        let err = ApiError::from_payload(Some(500), &Value::Null);
        assert_eq!(err.error, "Generation failed");
        assert_eq!(err.category, "unknown");
        assert_eq!(err.message, "An unexpected error occurred");
        assert_eq!(err.code, "UNKNOWN_ERROR");
        assert_eq!(err.status_code, Some(500));
        assert!(!err.retryable);
        assert!(!err.is_rate_limit());
    }

    #[test]
    fn test_payload_status_code_wins_over_http_status() {
        let payload = json!({ "statusCode": 429 });
        let err = ApiError::from_payload(Some(200), &payload);
        assert_eq!(err.status_code, Some(429));
    }

    #[test]
    fn test_retry_after_text() {
        let mut err = ApiError::from_payload(None, &Value::Null);
        assert_eq!(err.retry_after_text(), None);

        err.retry_after = Some(65);
        assert_eq!(err.retry_after_text().as_deref(), Some("1m 5s"));

        err.retry_after = Some(45);
        assert_eq!(err.retry_after_text().as_deref(), Some("45s"));

        err.retry_after = Some(60);
        assert_eq!(err.retry_after_text().as_deref(), Some("1m 0s"));

        err.retry_after = Some(0);
        assert_eq!(err.retry_after_text().as_deref(), Some("0s"));
    }

    #[test]
    fn test_display_combines_error_and_message() {
        let payload = json!({ "error": "Bad prompt", "message": "Prompt too short" });
        let err = ApiError::from_payload(Some(400), &payload);
        assert_eq!(err.to_string(), "Bad prompt: Prompt too short");
    }
}
