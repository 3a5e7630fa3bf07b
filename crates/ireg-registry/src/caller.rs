//! Authenticated caller context.

use ireg_core::Principal;
use serde::{Deserialize, Serialize};

/// The principal on whose behalf a mutating call is made.
///
/// Produced by the transport layer after authentication; the registry
/// trusts it as given and only checks role membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// The authenticated principal.
    pub principal: Principal,
}

impl CallerIdentity {
    /// Wrap an authenticated principal.
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }
}

impl From<Principal> for CallerIdentity {
    fn from(principal: Principal) -> Self {
        Self::new(principal)
    }
}

impl std::fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.principal.fmt(f)
    }
}
