//! # ireg-api — Binary Entry Point
//!
//! Installs the founding administrator, then serves the registry over HTTP.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ireg_api::config::{ApiConfig, Cli};
use ireg_api::state::AppState;
use ireg_registry::{Registry, TracingSink};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::try_from(Cli::parse()).context("invalid configuration")?;
    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set: bearer tokens are accepted without a secret");
    }

    let registry = Registry::new().with_sink(Arc::new(TracingSink));
    registry
        .initialize(config.founding_admin.clone())
        .context("registry initialization failed")?;

    let mut state = AppState::new(registry);
    if let Some(token) = config.auth_token {
        state = state.with_auth_token(token);
    }
    let app = ireg_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, founding_admin = %config.founding_admin, "identity registry listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
