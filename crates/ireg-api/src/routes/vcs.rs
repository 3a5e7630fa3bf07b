//! # VC Lifecycle API
//!
//! Credentials are addressed by their 64-byte hash, hex encoded with an
//! optional `0x` prefix.
//!
//! ## Endpoints
//!
//! - `POST /v1/vcs/:digest/issue` — Platform wallet issues a VC.
//! - `POST /v1/vcs/:digest/usage` — Platform wallet records one use of an active VC.
//! - `POST /v1/vcs/:digest/expire` — Platform wallet expires an active VC.
//! - `POST /v1/vcs/:digest/suspend` — Admin suspends an active VC.
//! - `POST /v1/vcs/:digest/unsuspend` — Admin reactivates a suspended VC.
//! - `POST /v1/vcs/:digest/terminate` — Admin terminates an active VC.
//! - `GET /v1/vcs/:digest` — Usage count and status.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use ireg_core::CredentialDigest;
use ireg_registry::{AuditRecord, VcStatus};
use serde::{Deserialize, Serialize};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::digest_param;
use crate::state::AppState;

/// VC status lookup result.
#[derive(Debug, Serialize, Deserialize)]
pub struct VcStatusResponse {
    pub digest: CredentialDigest,
    pub usage_count: u64,
    pub status: VcStatus,
    pub code: u8,
}

/// Build the VC router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/vcs/:digest", get(get_vc))
        .route("/v1/vcs/:digest/issue", post(issue))
        .route("/v1/vcs/:digest/usage", post(record_usage))
        .route("/v1/vcs/:digest/expire", post(expire))
        .route("/v1/vcs/:digest/suspend", post(suspend))
        .route("/v1/vcs/:digest/unsuspend", post(unsuspend))
        .route("/v1/vcs/:digest/terminate", post(terminate))
}

async fn issue(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(digest): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let vc = digest_param(&digest)?;
    Ok(Json(state.registry.issue_vc(&caller, &vc)?))
}

/// POST /v1/vcs/:digest/usage — Increment the usage count by one.
async fn record_usage(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(digest): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let vc = digest_param(&digest)?;
    Ok(Json(state.registry.update_usage_vc(&caller, &vc)?))
}

async fn expire(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(digest): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let vc = digest_param(&digest)?;
    Ok(Json(state.registry.expire_vc(&caller, &vc)?))
}

async fn suspend(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(digest): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let vc = digest_param(&digest)?;
    Ok(Json(state.registry.suspend_vc(&caller, &vc)?))
}

async fn unsuspend(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(digest): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let vc = digest_param(&digest)?;
    Ok(Json(state.registry.unsuspend_vc(&caller, &vc)?))
}

async fn terminate(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(digest): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let vc = digest_param(&digest)?;
    Ok(Json(state.registry.terminate_vc(&caller, &vc)?))
}

/// GET /v1/vcs/:digest — Read usage count and status.
async fn get_vc(
    State(state): State<AppState>,
    Path(digest): Path<String>,
) -> Result<Json<VcStatusResponse>, AppError> {
    let vc = digest_param(&digest)?;
    let report = state.registry.vc_status(&vc);
    Ok(Json(VcStatusResponse {
        digest: vc,
        usage_count: report.usage_count,
        status: report.status,
        code: report.status.code(),
    }))
}
