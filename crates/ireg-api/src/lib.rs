//! # ireg-api — HTTP Surface for the Identity Registry
//!
//! Exposes the registry façade over Axum. Every mutating call carries the
//! caller principal established by [`auth::auth_middleware`]; role checks
//! and state transitions happen inside [`ireg_registry::Registry`].
//!
//! ## API Surface
//!
//! | Prefix | Module | Domain |
//! |---|---|---|
//! | `/v1/admins/*`, `/v1/platform-wallets/*` | [`routes::roles`] | Role store |
//! | `/v1/dids/*` | [`routes::dids`] | DID ledger |
//! | `/v1/vcs/*` | [`routes::vcs`] | VC ledger |
//! | `/v1/audit/*`, `/v1/registry` | [`routes::audit`] | Audit trail |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::roles::router())
        .merge(routes::dids::router())
        .merge(routes::vcs::router())
        .merge(routes::audit::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state.clone());

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

async fn liveness() -> &'static str {
    "ok"
}

/// Ready once the founding administrator is installed.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.registry.is_initialized() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not initialized")
    }
}
