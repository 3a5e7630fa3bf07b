//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. The registry is the only store; it carries its
//! own lock, so the state is a cheap `Arc` clone.

use std::sync::Arc;

use ireg_registry::Registry;

use crate::config::SecretToken;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The registry façade.
    pub registry: Arc<Registry>,
    /// Shared bearer secret; `None` disables the secret check.
    pub auth_token: Option<SecretToken>,
}

impl AppState {
    /// State over `registry` with the secret check disabled.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            auth_token: None,
        }
    }

    /// Require `token` as the secret half of every bearer token.
    pub fn with_auth_token(mut self, token: SecretToken) -> Self {
        self.auth_token = Some(token);
        self
    }
}
