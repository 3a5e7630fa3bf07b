//! # Authentication Middleware
//!
//! Establishes the caller principal for every registry call. Role checks
//! happen inside the registry, not here.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {principal}:{secret}   — when AUTH_TOKEN is configured
//! Bearer {principal}            — development mode (no AUTH_TOKEN)
//! ```
//!
//! The secret is split off at the last `:`, so principals such as
//! `did:ethr:0xabc` are accepted unchanged. The secret is compared in
//! constant time.
//!
//! ## Caller
//!
//! The middleware inserts a [`CallerIdentity`] into the request extensions.
//! Handlers extract it via [`Caller`]. `GET` requests without an
//! `Authorization` header pass through anonymously, since reads need no
//! role; a header that is present must still be valid.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ireg_core::Principal;
use ireg_registry::CallerIdentity;
use subtle::ConstantTimeEq;

use crate::config::SecretToken;
use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token: Option<SecretToken>,
}

// ── Caller extractor ────────────────────────────────────────────────────────

/// The authenticated caller, as injected by [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub CallerIdentity);

/// Returns 401 if no identity is present (middleware didn't run or failed).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer secrets.
///
/// When lengths differ, performs a dummy comparison to avoid leaking length
/// information through timing variance.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse the credential part of a bearer header into a caller.
pub fn parse_bearer_token(
    provided: &str,
    expected_secret: Option<&SecretToken>,
) -> Result<CallerIdentity, String> {
    let principal = match expected_secret {
        Some(expected) => {
            let (principal, secret) = provided
                .rsplit_once(':')
                .ok_or_else(|| "invalid token format — expected {principal}:{secret}".to_string())?;
            if !constant_time_token_eq(secret, expected.expose()) {
                return Err("invalid bearer token".into());
            }
            principal
        }
        None => provided,
    };
    Principal::new(principal)
        .map(CallerIdentity::new)
        .map_err(|e| format!("invalid principal: {e}"))
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Validate the Bearer header and inject the caller into request extensions.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.token.clone());

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header_value) => match header_value.strip_prefix("Bearer ") {
            Some(provided) => match parse_bearer_token(provided, expected.as_ref()) {
                Ok(identity) => {
                    request.extensions_mut().insert(identity);
                    next.run(request).await
                }
                Err(msg) => {
                    tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                    unauthorized_response(&msg)
                }
            },
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                unauthorized_response("authorization header must use Bearer scheme")
            }
        },
        // Reads are unrestricted: safe methods may proceed anonymously.
        None if request.method().is_safe() => next.run(request).await,
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
