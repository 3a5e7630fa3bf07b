//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps registry failures to HTTP status codes by category and returns a
//! JSON body with code, message and, for registry failures, the stable
//! failure reason in `details.reason`. Internal error messages are logged,
//! never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ireg_registry::{ErrorCategory, RegistryError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "FORBIDDEN", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body or query could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure — missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A registry call was rejected. Status follows the error category;
    /// internal failures answer 500 with the message logged, not returned.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Registry(err) => registry_status(err),
        }
    }

    fn is_internal(&self) -> bool {
        matches!(self, Self::Registry(err) if err.category() == ErrorCategory::Internal)
    }
}

fn registry_status(err: &RegistryError) -> (StatusCode, &'static str) {
    match err {
        RegistryError::NotInitialized => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        RegistryError::AlreadyInitialized => (StatusCode::CONFLICT, "CONFLICT"),
        RegistryError::InvalidFounder(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
        other => match other.category() {
            ErrorCategory::Unauthorized => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorCategory::InvalidStateTransition
            | ErrorCategory::DuplicateMembership
            | ErrorCategory::SelfRemoval
            | ErrorCategory::Bootstrap => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorCategory::MissingMembership => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorCategory::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if self.is_internal() {
            tracing::error!(error = %self, "internal server error");
            let body = ErrorBody {
                error: ErrorDetail {
                    code: code.to_string(),
                    message: "An internal error occurred".to_string(),
                    details: None,
                },
            };
            return (status, Json(body)).into_response();
        }

        let details = match &self {
            Self::Registry(err) => Some(serde_json::json!({
                "reason": err.reason(),
                "category": err.category(),
            })),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert identifier validation errors to API errors.
impl From<ireg_core::ValidationError> for AppError {
    fn from(err: ireg_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
