//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request produced no response at all (network unreachable, timeout)
    #[error("network unreachable: {0}")]
    Unreachable(String),

    /// Login or registration rejected by the service
    #[error("{0}")]
    AuthRejected(String),

    /// Success status but an unusable body
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The session was invalidated and navigation to the entry surface
    /// was requested; the caller's operation is implicitly cancelled
    #[error("session invalidated")]
    SessionInvalidated,

    /// Authentication required (401 on a non-protected route)
    #[error("authentication required: {0}")]
    Unauthorized(String),

    /// Permission denied (403 on a non-protected route)
    #[error("permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("validation error: {0}")]
    Validation(String),

    /// Any other failure status
    #[error("request failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// Durable storage I/O failed
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Map a failure status and body to the matching error variant.
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> ClientError {
    let message = extract_error_message(
        body,
        status.canonical_reason().unwrap_or("request failed"),
    );
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Extract a human-readable message from an error body.
///
/// The service is inconsistent about error shapes, so this tries, in
/// order: a JSON string body, a `message` field, an `error` field, the
/// raw body text, and finally `fallback`. The service prefixes some
/// messages with "Error: "; that prefix is stripped.
pub(crate) fn extract_error_message(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(s)) => strip_error_prefix(&s),
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(|v| v.as_str())
            .or_else(|| map.get("error").and_then(|v| v.as_str()))
            .map(strip_error_prefix)
            .unwrap_or_else(|| fallback.to_string()),
        _ if !body.trim().is_empty() => strip_error_prefix(body.trim()),
        _ => fallback.to_string(),
    }
}

fn strip_error_prefix(message: &str) -> String {
    message
        .strip_prefix("Error: ")
        .unwrap_or(message)
        .to_string()
}
