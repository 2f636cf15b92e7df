//! Normalized error taxonomy for calls against the platform API gateway.
//!
//! Every failure leaving the HTTP layer is folded into a single [`ApiError`]
//! so callers never inspect raw transport errors or ad-hoc response bodies.
//!
//! | HTTP status | ApiError |
//! |-------------|----------|
//! | no response | `Network` |
//! | 401 | `Authentication` |
//! | 403 | `Forbidden` |
//! | 404 | `NotFound` |
//! | 400 / 422 | `Validation` |
//! | 409 | `Conflict` |
//! | 5xx | `Server` |
//! | other | `Http` |

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Authentication,
    Forbidden,
    NotFound,
    Validation,
    Conflict,
    Registration,
    Server,
    Http,
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "network",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Registration => "registration",
            ErrorKind::Server => "server",
            ErrorKind::Http => "http",
            ErrorKind::Decode => "decode",
        };
        f.write_str(name)
    }
}

/// A single field-level validation failure reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation {
        status: u16,
        message: String,
        fields: Vec<FieldError>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Registration failed: {0}")]
    Registration(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response.
    ///
    /// `body` is the raw response text; the message is taken from a `detail`,
    /// `message` or `error` field when the body is JSON, otherwise the text
    /// itself, otherwise the canonical reason phrase.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let fields = parsed.as_ref().map(field_errors).unwrap_or_default();
        let message = parsed
            .as_ref()
            .and_then(detail_message)
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && parsed.is_none()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| default_message(status));

        match status {
            401 => ApiError::Authentication(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            400 | 422 => ApiError::Validation {
                status,
                message,
                fields,
            },
            409 => ApiError::Conflict(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Http { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Authentication(_) => ErrorKind::Authentication,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::Registration(_) => ErrorKind::Registration,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// HTTP status associated with the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::Registration(_) => None,
            ApiError::Authentication(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::Validation { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Http { status, .. } => Some(*status),
        }
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(msg)
            | ApiError::Authentication(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Registration(msg)
            | ApiError::Decode(msg) => msg,
            ApiError::Validation { message, .. }
            | ApiError::Server { message, .. }
            | ApiError::Http { message, .. } => message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => ApiError::from_response(status.as_u16(), ""),
            None => ApiError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

fn detail_message(body: &Value) -> Option<String> {
    for key in ["detail", "message", "error"] {
        match body.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            // FastAPI-style validation errors: a list of {loc, msg}
            Some(Value::Array(items)) if !items.is_empty() => {
                let joined = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("; ");
                if !joined.is_empty() {
                    return Some(joined);
                }
            }
            _ => {}
        }
    }
    match body {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn field_errors(body: &Value) -> Vec<FieldError> {
    let Some(items) = body.get("detail").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let message = item.get("msg")?.as_str()?.to_string();
            let field = item
                .get("loc")
                .and_then(Value::as_array)
                .and_then(|loc| loc.last())
                .map(|last| match last {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default();
            Some(FieldError { field, message })
        })
        .collect()
}

fn default_message(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_field_is_preferred() {
        let err = ApiError::from_response(409, r#"{"detail":"Email already registered"}"#);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.message(), "Email already registered");
    }

    #[test]
    fn test_message_field_fallback() {
        let err = ApiError::from_response(500, r#"{"message":"boom"}"#);
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn test_raw_text_body() {
        let err = ApiError::from_response(502, "upstream unavailable");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.message(), "upstream unavailable");
    }

    #[test]
    fn test_empty_body_uses_reason_phrase() {
        let err = ApiError::from_response(404, "");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Not Found");
    }

    #[test]
    fn test_field_level_validation() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"invalid email"},{"loc":["body","password"],"msg":"too short"}]}"#;
        let err = ApiError::from_response(422, body);
        match err {
            ApiError::Validation {
                status,
                message,
                fields,
            } => {
                assert_eq!(status, 422);
                assert_eq!(message, "invalid email; too short");
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "email");
                assert_eq!(fields[1].message, "too short");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unauthorized_classification() {
        let err = ApiError::from_response(401, r#"{"detail":"Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Authentication error: Invalid credentials");
    }

    #[test]
    fn test_network_error_has_no_status() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.kind().to_string(), "network");
    }
}
