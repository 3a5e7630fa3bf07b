//! # Service Configuration
//!
//! Command-line flags with environment fallbacks, parsed by `clap`:
//!
//! | Flag | Env | Default |
//! |---|---|---|
//! | `--port` | `PORT` | `8080` |
//! | `--auth-token` | `AUTH_TOKEN` | unset (development mode) |
//! | `--founding-admin` | `IREG_FOUNDING_ADMIN` | required |
//!
//! The auth token is the shared secret half of `Bearer {principal}:{secret}`,
//! so it may not be empty or contain `:`.

use clap::Parser;
use ireg_core::{Principal, ValidationError};
use thiserror::Error;

/// Shared bearer secret.
///
/// Custom `Debug` redacts the value to prevent credential leakage in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(String);

impl SecretToken {
    /// Wrap a secret, rejecting values that cannot appear after the last
    /// `:` of a bearer token.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.is_empty() || value.contains(':') || value.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidAuthToken);
        }
        Ok(Self(value))
    }

    /// The raw secret, for comparison only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretToken([REDACTED])")
    }
}

/// Errors raised while turning flags into an [`ApiConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `AUTH_TOKEN` is empty or contains `:` or whitespace.
    #[error("AUTH_TOKEN must be non-empty and contain no ':' or whitespace")]
    InvalidAuthToken,

    /// `IREG_FOUNDING_ADMIN` is not a valid principal.
    #[error("invalid IREG_FOUNDING_ADMIN: {0}")]
    InvalidFoundingAdmin(#[from] ValidationError),
}

/// Raw command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "ireg-api", version, about = "Role-gated DID/VC registry HTTP service")]
pub struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Shared bearer secret. When unset, `Bearer {principal}` is accepted
    /// without a secret.
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Principal installed as the sole administrator at startup.
    #[arg(long, env = "IREG_FOUNDING_ADMIN")]
    pub founding_admin: String,
}

/// Validated service configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port to listen on.
    pub port: u16,
    /// Shared bearer secret, if authentication is enabled.
    pub auth_token: Option<SecretToken>,
    /// Founding administrator.
    pub founding_admin: Principal,
}

impl TryFrom<Cli> for ApiConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        Ok(Self {
            port: cli.port,
            auth_token: cli.auth_token.map(SecretToken::new).transpose()?,
            founding_admin: Principal::new(cli.founding_admin)?,
        })
    }
}
