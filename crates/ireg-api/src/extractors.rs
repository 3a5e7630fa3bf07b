//! # Extractors & Validation
//!
//! Helpers that map axum rejections onto [`AppError`], plus the path
//! parsers shared by every route module.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use ireg_core::{CredentialDigest, Principal};

use crate::error::AppError;

/// Request types that check business rules beyond what serde checks.
pub trait Validate {
    /// Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Extract a query string, mapping parse errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Parse a `:principal` path segment (422 on failure).
pub fn principal_param(raw: String) -> Result<Principal, AppError> {
    Ok(Principal::new(raw)?)
}

/// Parse a `:digest` path segment as a 64-byte hex credential hash.
pub fn digest_param(raw: &str) -> Result<CredentialDigest, AppError> {
    Ok(CredentialDigest::from_hex(raw)?)
}
