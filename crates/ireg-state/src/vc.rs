//! # VC Lifecycle State Machine
//!
//! Tracks whether one credential (identified by its digest) is usable and
//! how many times it has been used.
//!
//! ## States
//!
//! ```text
//! INACTIVE ──issue──▶ ACTIVE ──suspend──▶ SUSPENDED
//!                     ▲ │ │ ▲                 │
//!                     │ │ │ └─record_usage    │
//!                     │ │ └──terminate──▶ TERMINATED
//!                     │ └────expire─────▶ EXPIRED
//!                     └─────unsuspend─────────┘
//! ```
//!
//! ## Usage counter
//!
//! `usage_count` increments by one per `record_usage` and only while
//! `ACTIVE`. No transition resets it, including re-issuance: `issue` is
//! guarded only against `ACTIVE`, and a re-issued credential keeps the count
//! it had.

use serde::{Deserialize, Serialize};

use crate::error::{RecordKind, TransitionError};

/// The lifecycle status of a verifiable credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VcStatus {
    /// Never issued.
    #[default]
    Inactive,
    /// Issued and usable.
    Active,
    /// Past its validity period (terminal for every operation but `issue`).
    Expired,
    /// Temporarily disabled by an administrator.
    Suspended,
    /// Permanently revoked by an administrator (terminal for every
    /// operation but `issue`).
    Terminated,
}

impl VcStatus {
    /// All statuses in ordinal order.
    pub const ALL: [VcStatus; 5] = [
        Self::Inactive,
        Self::Active,
        Self::Expired,
        Self::Suspended,
        Self::Terminated,
    ];

    /// Numeric ordinal (`INACTIVE = 0`, `ACTIVE = 1`, `EXPIRED = 2`,
    /// `SUSPENDED = 3`, `TERMINATED = 4`).
    pub fn code(&self) -> u8 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
            Self::Expired => 2,
            Self::Suspended => 3,
            Self::Terminated => 4,
        }
    }

    /// Upper-case status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "INACTIVE",
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Suspended => "SUSPENDED",
            Self::Terminated => "TERMINATED",
        }
    }

    /// Whether the credential may currently be relied upon.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether no administrative transition leaves this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Expired | Self::Terminated)
    }
}

impl std::fmt::Display for VcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stored state of one credential.
///
/// `Default` is the state of a digest the registry has never seen:
/// `INACTIVE` with a zero count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VcRecord {
    /// Current lifecycle status.
    pub status: VcStatus,
    /// Number of recorded uses while `ACTIVE`.
    pub usage_count: u64,
}

impl VcRecord {
    /// Issue the credential (any status except `ACTIVE` → `ACTIVE`).
    /// The usage count is carried over unchanged.
    pub fn issue(self) -> Result<Self, TransitionError> {
        if self.status == VcStatus::Active {
            return Err(TransitionError::AlreadyActive {
                kind: RecordKind::Vc,
            });
        }
        Ok(self.with_status(VcStatus::Active))
    }

    /// Suspend the credential (`ACTIVE` → `SUSPENDED`).
    pub fn suspend(self) -> Result<Self, TransitionError> {
        self.require_active()?;
        Ok(self.with_status(VcStatus::Suspended))
    }

    /// Lift a suspension (`SUSPENDED` → `ACTIVE`).
    pub fn unsuspend(self) -> Result<Self, TransitionError> {
        if self.status != VcStatus::Suspended {
            return Err(TransitionError::NotSuspended {
                kind: RecordKind::Vc,
                current: self.status.to_string(),
            });
        }
        Ok(self.with_status(VcStatus::Active))
    }

    /// Revoke the credential (`ACTIVE` → `TERMINATED`).
    pub fn terminate(self) -> Result<Self, TransitionError> {
        self.require_active()?;
        Ok(self.with_status(VcStatus::Terminated))
    }

    /// Expire the credential (`ACTIVE` → `EXPIRED`).
    pub fn expire(self) -> Result<Self, TransitionError> {
        self.require_active()?;
        Ok(self.with_status(VcStatus::Expired))
    }

    /// Record one use (`ACTIVE` → `ACTIVE`, count + 1).
    pub fn record_usage(self) -> Result<Self, TransitionError> {
        self.require_active()?;
        let usage_count =
            self.usage_count
                .checked_add(1)
                .ok_or(TransitionError::UsageOverflow {
                    kind: RecordKind::Vc,
                    count: self.usage_count,
                })?;
        Ok(Self {
            usage_count,
            ..self
        })
    }

    fn with_status(self, status: VcStatus) -> Self {
        Self { status, ..self }
    }

    fn require_active(&self) -> Result<(), TransitionError> {
        if self.status != VcStatus::Active {
            return Err(TransitionError::NotActive {
                kind: RecordKind::Vc,
                current: self.status.to_string(),
            });
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
