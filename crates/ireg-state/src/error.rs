//! # Transition Errors
//!
//! Rejections raised by the DID and VC state machines. Each variant carries
//! the record kind and the status the record was in, so the message reads
//! the same way regardless of which machine produced it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which ledger a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    /// A decentralized identity record.
    Did,
    /// A verifiable credential record.
    Vc,
}

impl RecordKind {
    /// Short upper-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Did => "DID",
            Self::Vc => "VC",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle transition rejected by the current status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Activation requested for a record that is already `ACTIVE`.
    #[error("{kind} already ACTIVE")]
    AlreadyActive {
        /// The record kind.
        kind: RecordKind,
    },

    /// The operation requires `ACTIVE`.
    #[error("{kind} not ACTIVE (current status {current})")]
    NotActive {
        /// The record kind.
        kind: RecordKind,
        /// The status the record was in.
        current: String,
    },

    /// The operation requires `SUSPENDED`.
    #[error("{kind} not SUSPENDED (current status {current})")]
    NotSuspended {
        /// The record kind.
        kind: RecordKind,
        /// The status the record was in.
        current: String,
    },

    /// The usage counter is saturated.
    #[error("{kind} usage counter overflow at {count}")]
    UsageOverflow {
        /// The record kind.
        kind: RecordKind,
        /// The counter value that could not be incremented.
        count: u64,
    },
}

impl TransitionError {
    /// The record kind the rejection refers to.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::AlreadyActive { kind }
            | Self::NotActive { kind, .. }
            | Self::NotSuspended { kind, .. }
            | Self::UsageOverflow { kind, .. } => *kind,
        }
    }
}
