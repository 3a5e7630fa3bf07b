#![deny(missing_docs)]

//! # ireg-core — Foundational Types for the Identity Registry
//!
//! This crate defines the types every other crate in the workspace depends on.
//! It has no internal crate dependencies — only `serde`, `serde_json`,
//! `thiserror`, and `sha2` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A [`Principal`] (who acts or
//!    is registered) and a [`CredentialDigest`] (which credential is tracked)
//!    are distinct types validated at construction. No bare strings as keys.
//!
//! 2. **[`CanonicalBytes`] is the sole path to digest computation.** Audit
//!    record digests flow through `CanonicalBytes::new()`, which sorts keys,
//!    compacts separators, and rejects floats.
//!
//! 3. **Structured errors.** `thiserror` enums only — no `Box<dyn Error>`,
//!    no `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;

// Re-export primary types at crate root for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm, ZERO_DIGEST_HEX};
pub use error::{CanonicalizationError, ValidationError};
pub use identity::{CredentialDigest, Principal, CREDENTIAL_DIGEST_LEN, MAX_PRINCIPAL_LEN};
