//! # DID Lifecycle API
//!
//! ## Endpoints
//!
//! - `POST /v1/dids/:principal/register` — Platform wallet registers a DID.
//! - `POST /v1/dids/:principal/suspend` — Admin suspends an active DID.
//! - `POST /v1/dids/:principal/unsuspend` — Admin reactivates a suspended DID.
//! - `POST /v1/dids/:principal/terminate` — Admin terminates an active DID.
//! - `GET /v1/dids/:principal` — Status lookup; unknown DIDs read as `INACTIVE`.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use ireg_core::Principal;
use ireg_registry::{AuditRecord, DidStatus};
use serde::{Deserialize, Serialize};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::principal_param;
use crate::state::AppState;

/// DID status lookup result.
#[derive(Debug, Serialize, Deserialize)]
pub struct DidStatusResponse {
    pub principal: Principal,
    pub status: DidStatus,
    /// Numeric status code (0 inactive, 1 active, 2 suspended, 3 terminated).
    pub code: u8,
}

/// Build the DID router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/dids/:principal", get(get_did))
        .route("/v1/dids/:principal/register", post(register))
        .route("/v1/dids/:principal/suspend", post(suspend))
        .route("/v1/dids/:principal/unsuspend", post(unsuspend))
        .route("/v1/dids/:principal/terminate", post(terminate))
}

async fn register(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(principal): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let did = principal_param(principal)?;
    Ok(Json(state.registry.register_did(&caller, &did)?))
}

async fn suspend(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(principal): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let did = principal_param(principal)?;
    Ok(Json(state.registry.suspend_did(&caller, &did)?))
}

async fn unsuspend(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(principal): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let did = principal_param(principal)?;
    Ok(Json(state.registry.unsuspend_did(&caller, &did)?))
}

async fn terminate(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(principal): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let did = principal_param(principal)?;
    Ok(Json(state.registry.terminate_did(&caller, &did)?))
}

/// GET /v1/dids/:principal — Read the DID status.
async fn get_did(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> Result<Json<DidStatusResponse>, AppError> {
    let principal = principal_param(principal)?;
    let status = state.registry.did_status(&principal);
    Ok(Json(DidStatusResponse {
        principal,
        status,
        code: status.code(),
    }))
}
