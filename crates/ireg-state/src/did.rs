//! # DID Lifecycle State Machine
//!
//! Tracks whether one principal's decentralized identity is usable.
//!
//! ## States
//!
//! ```text
//! INACTIVE ──register──▶ ACTIVE ──suspend──▶ SUSPENDED
//!                          ▲  │                  │
//!                          │  └──terminate──▶ TERMINATED
//!                          └────unsuspend────────┘
//! ```
//!
//! `register` is guarded only against `ACTIVE`: a `SUSPENDED` or
//! `TERMINATED` identity can be registered again, which moves it straight
//! back to `ACTIVE`.

use serde::{Deserialize, Serialize};

use crate::error::{RecordKind, TransitionError};

/// The lifecycle status of a DID.
///
/// Absence of a record means `Inactive`, so `Default` is `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DidStatus {
    /// Never registered.
    #[default]
    Inactive,
    /// Registered and usable.
    Active,
    /// Temporarily disabled by an administrator.
    Suspended,
    /// Permanently disabled by an administrator.
    Terminated,
}

impl DidStatus {
    /// All statuses in ordinal order.
    pub const ALL: [DidStatus; 4] = [
        Self::Inactive,
        Self::Active,
        Self::Suspended,
        Self::Terminated,
    ];

    /// Numeric ordinal (`INACTIVE = 0` … `TERMINATED = 3`).
    pub fn code(&self) -> u8 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
            Self::Suspended => 2,
            Self::Terminated => 3,
        }
    }

    /// Upper-case status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "INACTIVE",
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Terminated => "TERMINATED",
        }
    }

    /// Whether the identity may currently be relied upon.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether no administrative transition leaves this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Register the identity (any status except `ACTIVE` → `ACTIVE`).
    pub fn register(self) -> Result<Self, TransitionError> {
        if self == Self::Active {
            return Err(TransitionError::AlreadyActive {
                kind: RecordKind::Did,
            });
        }
        Ok(Self::Active)
    }

    /// Suspend the identity (`ACTIVE` → `SUSPENDED`).
    pub fn suspend(self) -> Result<Self, TransitionError> {
        self.require_active()?;
        Ok(Self::Suspended)
    }

    /// Lift a suspension (`SUSPENDED` → `ACTIVE`).
    pub fn unsuspend(self) -> Result<Self, TransitionError> {
        if self != Self::Suspended {
            return Err(TransitionError::NotSuspended {
                kind: RecordKind::Did,
                current: self.to_string(),
            });
        }
        Ok(Self::Active)
    }

    /// Terminate the identity (`ACTIVE` → `TERMINATED`).
    pub fn terminate(self) -> Result<Self, TransitionError> {
        self.require_active()?;
        Ok(Self::Terminated)
    }

    fn require_active(self) -> Result<(), TransitionError> {
        if self != Self::Active {
            return Err(TransitionError::NotActive {
                kind: RecordKind::Did,
                current: self.to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for DidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
