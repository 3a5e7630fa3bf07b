//! # Registry Errors
//!
//! Every rejected call surfaces as a [`RegistryError`]. Each one is
//! recoverable: the call is aborted with state untouched and nothing is
//! appended to the audit log.
//!
//! Two views are offered on top of the error itself:
//!
//! - [`ErrorCategory`], the coarse taxonomy transports map to status codes.
//! - [`FailureReason`], the fine-grained, stable reason code clients match on.

use ireg_core::{CanonicalizationError, Principal, ValidationError};
use ireg_state::TransitionError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::role::{Operation, Role};

/// A rejected registry call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The caller lacks the role the operation requires.
    #[error("{}: {caller} may not call {operation}", unauthorized_reason(.required))]
    Unauthorized {
        /// The rejected caller.
        caller: Principal,
        /// The role the operation requires.
        required: Role,
        /// The operation attempted.
        operation: Operation,
    },

    /// The target record is not in the status the operation requires.
    #[error(transparent)]
    InvalidStateTransition(#[from] TransitionError),

    /// The principal already holds the role.
    #[error("{} already added: {member}", role_label(.role))]
    DuplicateMembership {
        /// The role set.
        role: Role,
        /// The principal being added.
        member: Principal,
    },

    /// The principal does not hold the role.
    #[error("{} not added: {member}", role_label(.role))]
    MissingMembership {
        /// The role set.
        role: Role,
        /// The principal being removed.
        member: Principal,
    },

    /// An administrator attempted to remove itself.
    #[error("cannot remove self: {admin}")]
    SelfRemoval {
        /// The administrator.
        admin: Principal,
    },

    /// `initialize` was called on an initialized registry.
    #[error("registry already initialized")]
    AlreadyInitialized,

    /// A mutating call arrived before `initialize`.
    #[error("registry not initialized")]
    NotInitialized,

    /// The founding administrator identifier was rejected.
    #[error("invalid founding admin: {0}")]
    InvalidFounder(#[from] ValidationError),

    /// The audit record for an otherwise valid call could not be encoded.
    /// Nothing was committed.
    #[error("audit record encoding failed: {0}")]
    AuditEncoding(String),
}

impl From<CanonicalizationError> for RegistryError {
    fn from(err: CanonicalizationError) -> Self {
        Self::AuditEncoding(err.to_string())
    }
}

fn unauthorized_reason(role: &Role) -> &'static str {
    match role {
        Role::Admin => "only admin",
        Role::PlatformWallet => "only platform wallets",
    }
}

fn role_label(role: &Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::PlatformWallet => "platform wallet",
    }
}

impl RegistryError {
    /// Coarse category of the failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } => ErrorCategory::Unauthorized,
            Self::InvalidStateTransition(_) => ErrorCategory::InvalidStateTransition,
            Self::DuplicateMembership { .. } => ErrorCategory::DuplicateMembership,
            Self::MissingMembership { .. } => ErrorCategory::MissingMembership,
            Self::SelfRemoval { .. } => ErrorCategory::SelfRemoval,
            Self::AlreadyInitialized | Self::NotInitialized | Self::InvalidFounder(_) => {
                ErrorCategory::Bootstrap
            }
            Self::AuditEncoding(_) => ErrorCategory::Internal,
        }
    }

    /// Fine-grained failure reason.
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::Unauthorized { .. } => FailureReason::Unauthorized,
            Self::InvalidStateTransition(t) => match t {
                TransitionError::AlreadyActive { .. } => FailureReason::AlreadyActive,
                TransitionError::NotActive { .. } => FailureReason::NotActive,
                TransitionError::NotSuspended { .. } => FailureReason::NotSuspended,
                TransitionError::UsageOverflow { .. } => FailureReason::UsageOverflow,
            },
            Self::DuplicateMembership { role, .. } => match role {
                Role::Admin => FailureReason::AlreadyAdmin,
                Role::PlatformWallet => FailureReason::AlreadyPlatformWallet,
            },
            Self::MissingMembership { role, .. } => match role {
                Role::Admin => FailureReason::NotAdmin,
                Role::PlatformWallet => FailureReason::NotPlatformWallet,
            },
            Self::SelfRemoval { .. } => FailureReason::SelfRemoval,
            Self::AlreadyInitialized => FailureReason::AlreadyInitialized,
            Self::NotInitialized => FailureReason::NotInitialized,
            Self::InvalidFounder(_) => FailureReason::InvalidFounder,
            Self::AuditEncoding(_) => FailureReason::Internal,
        }
    }
}

/// The error taxonomy of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller lacks the required role.
    Unauthorized,
    /// Record not in the required status.
    InvalidStateTransition,
    /// Role member already present.
    DuplicateMembership,
    /// Role member not present.
    MissingMembership,
    /// An administrator removing itself.
    SelfRemoval,
    /// Initialization misuse.
    Bootstrap,
    /// Failure inside the registry itself.
    Internal,
}

/// Stable reason code for a rejected call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// Caller lacks the required role.
    Unauthorized,
    /// Target is already an administrator.
    AlreadyAdmin,
    /// Target is not an administrator.
    NotAdmin,
    /// Target is already a platform wallet.
    AlreadyPlatformWallet,
    /// Target is not a platform wallet.
    NotPlatformWallet,
    /// An administrator tried to remove itself.
    SelfRemoval,
    /// Record is already `ACTIVE`.
    AlreadyActive,
    /// Record is not `ACTIVE`.
    NotActive,
    /// Record is not `SUSPENDED`.
    NotSuspended,
    /// Usage counter cannot be incremented.
    UsageOverflow,
    /// Registry was already initialized.
    AlreadyInitialized,
    /// Registry has not been initialized.
    NotInitialized,
    /// Founding administrator identifier is invalid.
    InvalidFounder,
    /// Internal failure; nothing was committed.
    Internal,
}

impl FailureReason {
    /// The wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::AlreadyAdmin => "ALREADY_ADMIN",
            Self::NotAdmin => "NOT_ADMIN",
            Self::AlreadyPlatformWallet => "ALREADY_PLATFORM_WALLET",
            Self::NotPlatformWallet => "NOT_PLATFORM_WALLET",
            Self::SelfRemoval => "SELF_REMOVAL",
            Self::AlreadyActive => "ALREADY_ACTIVE",
            Self::NotActive => "NOT_ACTIVE",
            Self::NotSuspended => "NOT_SUSPENDED",
            Self::UsageOverflow => "USAGE_OVERFLOW",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::InvalidFounder => "INVALID_FOUNDER",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
