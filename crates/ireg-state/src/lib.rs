//! # ireg-state — Lifecycle State Machines
//!
//! The two status machines the registry is built around.
//!
//! ## State Machines
//!
//! - **DID** (`did.rs`): `INACTIVE → ACTIVE → {SUSPENDED, TERMINATED}`,
//!   `SUSPENDED → ACTIVE`.
//!
//! - **VC** (`vc.rs`): `INACTIVE → ACTIVE → {SUSPENDED, TERMINATED, EXPIRED}`,
//!   `SUSPENDED → ACTIVE`, plus a usage counter that only moves while
//!   `ACTIVE`.
//!
//! ## Design
//!
//! Transitions are pure functions: they take the current value and return
//! the next one or a [`TransitionError`]. Nothing here mutates in place, so
//! the caller can validate a whole operation before committing any of it.
//! Records that have never been touched are `INACTIVE` (and, for a VC, have
//! a zero usage count) via `Default`.

pub mod did;
pub mod error;
pub mod vc;

pub use did::DidStatus;
pub use error::{RecordKind, TransitionError};
pub use vc::{VcRecord, VcStatus};
