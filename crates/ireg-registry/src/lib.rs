//! # ireg-registry — Role-Gated Identity Registry
//!
//! The authorization-and-state-machine engine: who may change the status
//! of an identity or a credential, and what changes are legal.
//!
//! ## Components
//!
//! - [`RoleStore`] (`roles.rs`): the administrator and platform-wallet sets.
//! - [`DidLedger`] / [`VcLedger`] (`ledger.rs`): status per principal and
//!   status plus usage count per credential digest.
//! - [`AuditLog`] (`audit.rs`): append-only, SHA-256 hash-chained record of
//!   every successful mutation, delivered to injected [`AuditSink`]s.
//! - [`Registry`] (`registry.rs`): the single entry point. Every mutation
//!   runs authorize → check state → mutate → emit under one write lock and
//!   either commits all four steps or none of them.
//!
//! ## Caller identity
//!
//! There is no ambient "current caller". Every mutating call takes a
//! [`CallerIdentity`] established by the transport layer.

pub mod audit;
pub mod caller;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod role;
pub mod roles;

pub use audit::{
    verify_records, AuditEvent, AuditLog, AuditRecord, AuditSink, ChainIntegrity, MemorySink,
    TracingSink,
};
pub use caller::CallerIdentity;
pub use error::{ErrorCategory, FailureReason, RegistryError};
pub use ledger::{DidLedger, VcLedger};
pub use registry::{Registry, RegistrySnapshot, VcStatusReport};
pub use role::{Operation, Role};
pub use roles::RoleStore;

// Re-exported so downstream crates can name statuses without a direct
// dependency on the state crate.
pub use ireg_state::{DidStatus, RecordKind, TransitionError, VcStatus};
