//! API error handling
//!
//! Every failure leaves as the response envelope with `success: false`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::{MoneyError, PortError, TemporalError};
use domain_ledger::LedgerError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed query string or path parameter
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Well-formed request the ledger cannot accept
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<Vec<String>>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A newer request for the same view arrived before this one finished
    #[error("Superseded: {0}")]
    Superseded(String),

    /// The ledger store failed or is unreachable
    #[error("Upstream error: {0}")]
    Transport(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Superseded(_) => (StatusCode::CONFLICT, "superseded"),
            ApiError::Transport(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let (message, details) = match self {
            ApiError::Validation { message, details } => (message, details),
            ApiError::NotFound(m)
            | ApiError::BadRequest(m)
            | ApiError::Conflict(m)
            | ApiError::Superseded(m)
            | ApiError::Transport(m)
            | ApiError::Internal(m) => (m, None),
        };

        let body = ErrorResponse {
            success: false,
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(failure) => ApiError::validation(failure.to_string()),
            LedgerError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} {} not found", entity, id))
            }
            LedgerError::Transport(PortError::Conflict { message }) => ApiError::Conflict(message),
            LedgerError::Transport(port) => {
                error!(error = %port, transient = port.is_transient(), "Ledger store failed");
                ApiError::Transport(port.to_string())
            }
        }
    }
}

impl From<MoneyError> for ApiError {
    fn from(err: MoneyError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<TemporalError> for ApiError {
    fn from(err: TemporalError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(move |e| format!("{}: {}", field, e.code))
            })
            .collect::<Vec<_>>();
        warn!(?details, "Request failed validation");

        ApiError::Validation {
            message: "request failed validation".to_string(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ledger::ValidationFailure;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::validation("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::Superseded("x".into()), StatusCode::CONFLICT),
            (ApiError::Transport("x".into()), StatusCode::BAD_GATEWAY),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_ledger_errors_map_to_http_classes() {
        let validation: ApiError =
            LedgerError::Validation(ValidationFailure::Amount("NaN".into())).into();
        assert!(matches!(validation, ApiError::Validation { .. }));

        let missing: ApiError = LedgerError::not_found("Party", "PTY-1").into();
        assert!(matches!(missing, ApiError::NotFound(_)));

        let down: ApiError = LedgerError::Transport(PortError::connection("refused")).into();
        assert!(matches!(down, ApiError::Transport(_)));
    }
}
