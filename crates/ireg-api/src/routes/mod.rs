//! # API Route Modules
//!
//! Each module exposes a `router()` mounted by [`crate::app`].

pub mod audit;
pub mod dids;
pub mod roles;
pub mod vcs;
