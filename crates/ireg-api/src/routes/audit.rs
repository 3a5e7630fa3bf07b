//! # Audit Trail API
//!
//! Read-only access to the hash-chained audit log.
//!
//! ## Endpoints
//!
//! - `GET /v1/audit?after=&limit=&subject=` — Records in sequence order.
//! - `GET /v1/audit/verify` — Recompute and check the chain.
//! - `GET /v1/registry` — Aggregate counts and the chain head.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use ireg_registry::{AuditRecord, ChainIntegrity, RegistrySnapshot};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::AppState;

/// Default page size.
const DEFAULT_LIMIT: usize = 100;
/// Upper bound on page size.
const MAX_LIMIT: usize = 1000;

/// Audit listing query.
#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    /// Return records with a sequence number greater than this.
    pub after: Option<u64>,
    pub limit: Option<usize>,
    /// Only records about this principal or `0x`-prefixed credential hash.
    pub subject: Option<String>,
}

/// A page of audit records.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuditPage {
    pub records: Vec<AuditRecord>,
    /// Pass as `after` to fetch the next page; absent when the page is empty.
    pub next_after: Option<u64>,
}

/// Build the audit router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/audit", get(list_audit))
        .route("/v1/audit/verify", get(verify_audit))
        .route("/v1/registry", get(snapshot))
}

/// GET /v1/audit — List audit records.
async fn list_audit(
    State(state): State<AppState>,
    query: Result<Query<AuditQuery>, QueryRejection>,
) -> Result<Json<AuditPage>, AppError> {
    let query = extract_query(query)?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    let after = query.after.unwrap_or(0);

    let records: Vec<AuditRecord> = match query.subject {
        Some(subject) => state
            .registry
            .audit_for_subject(&subject)
            .into_iter()
            .filter(|r| r.sequence > after)
            .take(limit)
            .collect(),
        None => state.registry.audit_since(after, Some(limit)),
    };
    let next_after = records.last().map(|r| r.sequence);
    Ok(Json(AuditPage {
        records,
        next_after,
    }))
}

/// GET /v1/audit/verify — Verify the chain end to end.
async fn verify_audit(State(state): State<AppState>) -> Json<ChainIntegrity> {
    let integrity = state.registry.verify_audit_chain();
    if !integrity.chain_valid {
        tracing::error!(
            broken_links = integrity.broken_links,
            first_broken = ?integrity.first_broken,
            "audit chain verification failed"
        );
    }
    Json(integrity)
}

/// GET /v1/registry — Aggregate registry counts.
async fn snapshot(State(state): State<AppState>) -> Json<RegistrySnapshot> {
    Json(state.registry.snapshot())
}
