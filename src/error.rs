//! Application error type and its HTTP representation.
//!
//! Every failure surfaced by the service layer is an [`AppError`]. Handlers
//! return it directly and axum renders it as
//! `{"error": {"code", "message", "details"}}` with a matching status code.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed input: bad URL or TTL outside `1..=365` days.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Unknown or expired short code. The two cases are deliberately
    /// indistinguishable to callers.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// No free short code found within the configured number of attempts.
    #[error("{message}")]
    CapacityExhausted { message: String, details: Value },

    /// Storage backend unavailable or a record could not be (de)serialized.
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn capacity_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::CapacityExhausted {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status and stable error code for this error.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::CapacityExhausted { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "capacity_exhausted")
            }
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status();
        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::NotFound { message, details }
            | AppError::CapacityExhausted { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "Storage backend failure");
        AppError::internal("Storage error", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status(),
            (StatusCode::BAD_REQUEST, "validation_error")
        );
        assert_eq!(
            AppError::not_found("x", json!({})).status(),
            (StatusCode::NOT_FOUND, "not_found")
        );
        assert_eq!(
            AppError::capacity_exhausted("x", json!({})).status(),
            (StatusCode::SERVICE_UNAVAILABLE, "capacity_exhausted")
        );
        assert_eq!(
            AppError::internal("x", json!({})).status(),
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        );
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::not_found("Short link not found", json!({ "code": "abc123" }));
        assert_eq!(err.to_string(), "Short link not found");
    }

    #[test]
    fn test_error_info_carries_details() {
        let err = AppError::bad_request("bad ttl", json!({ "expiration_days": 0 }));
        let info = err.to_error_info();

        assert_eq!(info.code, "validation_error");
        assert_eq!(info.message, "bad ttl");
        assert_eq!(info.details["expiration_days"], 0);
    }

    #[test]
    fn test_store_error_becomes_internal() {
        let err: AppError = StoreError::Connection("refused".to_string()).into();

        assert!(matches!(err, AppError::Internal { .. }));
        assert!(err.to_error_info().details["reason"]
            .as_str()
            .unwrap()
            .contains("refused"));
    }
}
