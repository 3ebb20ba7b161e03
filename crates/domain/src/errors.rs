//! Error types used throughout the application
//!
//! Every transport or HTTP outcome is classified into a fixed set of
//! variants at the gateway boundary, so nothing downstream ever branches
//! on raw status codes or untyped error bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Main error type for Pavilion gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
    /// The session token was rejected (HTTP 401). Terminal for the session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The requested resource or endpoint does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected the request payload (other 4xx).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Timeout or connection failure; the request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// Anything else, including 5xx responses.
    #[error("Unexpected error: {message}")]
    Unknown {
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
        /// Best-effort human-readable description.
        message: String,
    },
}

impl ApiError {
    /// Classify a non-success HTTP response.
    ///
    /// The human-readable message is extracted from the body's `message` or
    /// `error` field when present, falling back to a generic string.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| format!("request failed with status {status}"));

        match status {
            401 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            s if (400..500).contains(&s) => Self::Validation(message),
            s => Self::Unknown { status: Some(s), message },
        }
    }

    /// True when this error terminates the current session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

/// Pull a message out of a structured error body.
fn extract_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Result type alias for Pavilion operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn classifies_unauthorized() {
        let err = ApiError::from_response(401, &json!({ "message": "token expired" }));
        assert_eq!(err, ApiError::Unauthorized("token expired".into()));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn classifies_not_found() {
        let err = ApiError::from_response(404, &json!({ "error": "no such brand" }));
        assert_eq!(err, ApiError::NotFound("no such brand".into()));
    }

    #[test]
    fn classifies_structured_4xx_as_validation() {
        let err = ApiError::from_response(422, &json!({ "message": "name is required" }));
        assert_eq!(err, ApiError::Validation("name is required".into()));
    }

    #[test]
    fn classifies_server_errors_as_unknown_with_status() {
        let err = ApiError::from_response(503, &json!(null));
        assert_eq!(
            err,
            ApiError::Unknown {
                status: Some(503),
                message: "request failed with status 503".into()
            }
        );
    }

    #[test]
    fn falls_back_to_generic_message_when_body_is_unstructured() {
        let err = ApiError::from_response(400, &json!(["not", "an", "object"]));
        assert_eq!(err, ApiError::Validation("request failed with status 400".into()));
    }
}
