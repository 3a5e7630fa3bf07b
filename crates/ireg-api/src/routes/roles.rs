//! # Role Management API
//!
//! Administrators add and remove administrators and platform wallets.
//! Membership lookups are open to anonymous readers.
//!
//! ## Endpoints
//!
//! - `POST /v1/admins` — Add an administrator.
//! - `GET /v1/admins` — List administrators.
//! - `GET /v1/admins/:principal` — Membership lookup.
//! - `DELETE /v1/admins/:principal` — Remove an administrator.
//! - `POST /v1/platform-wallets` — Add a platform wallet.
//! - `GET /v1/platform-wallets` — List platform wallets.
//! - `GET /v1/platform-wallets/:principal` — Membership lookup.
//! - `DELETE /v1/platform-wallets/:principal` — Remove a platform wallet.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use ireg_core::Principal;
use ireg_registry::{AuditRecord, Role};
use serde::{Deserialize, Serialize};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, principal_param, Validate};
use crate::state::AppState;

/// Request body naming the principal to add.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberRequest {
    pub principal: String,
}

impl Validate for MemberRequest {
    fn validate(&self) -> Result<(), String> {
        Principal::new(self.principal.as_str())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Membership lookup result.
#[derive(Debug, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub principal: Principal,
    pub role: Role,
    pub member: bool,
}

/// Role listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct MembersResponse {
    pub role: Role,
    pub members: Vec<Principal>,
}

/// Build the role management router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/admins", post(add_admin).get(list_admins))
        .route(
            "/v1/admins/:principal",
            get(get_admin).delete(remove_admin),
        )
        .route(
            "/v1/platform-wallets",
            post(add_platform_wallet).get(list_platform_wallets),
        )
        .route(
            "/v1/platform-wallets/:principal",
            get(get_platform_wallet).delete(remove_platform_wallet),
        )
}

fn target(body: Result<Json<MemberRequest>, JsonRejection>) -> Result<Principal, AppError> {
    let req = extract_validated_json(body)?;
    principal_param(req.principal)
}

fn membership(state: &AppState, role: Role, principal: Principal) -> MembershipResponse {
    let member = match role {
        Role::Admin => state.registry.is_admin(&principal),
        Role::PlatformWallet => state.registry.is_platform_wallet(&principal),
    };
    MembershipResponse {
        principal,
        role,
        member,
    }
}

/// POST /v1/admins — Add an administrator.
async fn add_admin(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<MemberRequest>, JsonRejection>,
) -> Result<Json<AuditRecord>, AppError> {
    let admin = target(body)?;
    Ok(Json(state.registry.add_admin(&caller, &admin)?))
}

/// DELETE /v1/admins/:principal — Remove an administrator other than the caller.
async fn remove_admin(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(principal): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let admin = principal_param(principal)?;
    Ok(Json(state.registry.remove_admin(&caller, &admin)?))
}

async fn get_admin(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> Result<Json<MembershipResponse>, AppError> {
    let principal = principal_param(principal)?;
    Ok(Json(membership(&state, Role::Admin, principal)))
}

async fn list_admins(State(state): State<AppState>) -> Json<MembersResponse> {
    Json(MembersResponse {
        role: Role::Admin,
        members: state.registry.members(Role::Admin),
    })
}

/// POST /v1/platform-wallets — Add a platform wallet.
async fn add_platform_wallet(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<MemberRequest>, JsonRejection>,
) -> Result<Json<AuditRecord>, AppError> {
    let wallet = target(body)?;
    Ok(Json(state.registry.add_platform_wallet(&caller, &wallet)?))
}

/// DELETE /v1/platform-wallets/:principal — Remove a platform wallet.
async fn remove_platform_wallet(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(principal): Path<String>,
) -> Result<Json<AuditRecord>, AppError> {
    let wallet = principal_param(principal)?;
    Ok(Json(state.registry.remove_platform_wallet(&caller, &wallet)?))
}

async fn get_platform_wallet(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> Result<Json<MembershipResponse>, AppError> {
    let principal = principal_param(principal)?;
    Ok(Json(membership(&state, Role::PlatformWallet, principal)))
}

async fn list_platform_wallets(State(state): State<AppState>) -> Json<MembersResponse> {
    Json(MembersResponse {
        role: Role::PlatformWallet,
        members: state.registry.members(Role::PlatformWallet),
    })
}
