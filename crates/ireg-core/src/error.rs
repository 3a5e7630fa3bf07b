//! # Error Hierarchy
//!
//! Leaf error types for the identity registry, built with `thiserror`.
//! Higher layers (`ireg-state`, `ireg-registry`, `ireg-api`) wrap these.

use thiserror::Error;

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Counters and sequence numbers must be integers.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Validation errors for domain primitive newtypes.
///
/// Each identifier type enforces format constraints at construction time.
/// These errors carry the rejected input so that operators can diagnose
/// malformed requests without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Principal identifier is empty, too long, or contains whitespace or
    /// control characters.
    #[error("invalid principal identifier: \"{0}\" (expected 1-256 bytes, no whitespace)")]
    InvalidPrincipal(String),

    /// Credential digest is not a 64-byte hex string.
    #[error("invalid credential digest: \"{0}\" (expected 128 hex chars, optional 0x prefix)")]
    InvalidDigest(String),
}
