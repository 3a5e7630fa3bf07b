//! # Roles and Operations
//!
//! Authorization is table-driven: every mutating [`Operation`] names the
//! single [`Role`] its caller must hold. Reads are unrestricted and do not
//! appear here.

use serde::{Deserialize, Serialize};

/// A privileged role a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages roles and suspends, unsuspends and terminates records.
    Admin,
    /// Registers DIDs and issues, expires and uses VCs for end users.
    PlatformWallet,
}

impl Role {
    /// Return the string value for serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::PlatformWallet => "platform_wallet",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every state-changing operation the registry exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// One-time installation of the founding administrator.
    Initialize,
    /// `addAdmin`
    AddAdmin,
    /// `removeAdmin`
    RemoveAdmin,
    /// `addPlatformWallet`
    AddPlatformWallet,
    /// `removePlatformWallet`
    RemovePlatformWallet,
    /// `registerDID`
    #[serde(rename = "registerDID")]
    RegisterDid,
    /// `suspendDID`
    #[serde(rename = "suspendDID")]
    SuspendDid,
    /// `unSuspendDID`
    #[serde(rename = "unSuspendDID")]
    UnsuspendDid,
    /// `terminateDID`
    #[serde(rename = "terminateDID")]
    TerminateDid,
    /// `issueVC`
    #[serde(rename = "issueVC")]
    IssueVc,
    /// `suspendVC`
    #[serde(rename = "suspendVC")]
    SuspendVc,
    /// `unSuspendVC`
    #[serde(rename = "unSuspendVC")]
    UnsuspendVc,
    /// `terminateVC`
    #[serde(rename = "terminateVC")]
    TerminateVc,
    /// `expireVC`
    #[serde(rename = "expireVC")]
    ExpireVc,
    /// `updateUsageVC`
    #[serde(rename = "updateUsageVC")]
    UpdateUsageVc,
}

impl Operation {
    /// The role the caller must hold, or `None` for bootstrap.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::Initialize => None,
            Self::AddAdmin
            | Self::RemoveAdmin
            | Self::AddPlatformWallet
            | Self::RemovePlatformWallet
            | Self::SuspendDid
            | Self::UnsuspendDid
            | Self::TerminateDid
            | Self::SuspendVc
            | Self::UnsuspendVc
            | Self::TerminateVc => Some(Role::Admin),
            Self::RegisterDid
            | Self::IssueVc
            | Self::ExpireVc
            | Self::UpdateUsageVc => Some(Role::PlatformWallet),
        }
    }

    /// The operation's external name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::AddAdmin => "addAdmin",
            Self::RemoveAdmin => "removeAdmin",
            Self::AddPlatformWallet => "addPlatformWallet",
            Self::RemovePlatformWallet => "removePlatformWallet",
            Self::RegisterDid => "registerDID",
            Self::SuspendDid => "suspendDID",
            Self::UnsuspendDid => "unSuspendDID",
            Self::TerminateDid => "terminateDID",
            Self::IssueVc => "issueVC",
            Self::SuspendVc => "suspendVC",
            Self::UnsuspendVc => "unSuspendVC",
            Self::TerminateVc => "terminateVC",
            Self::ExpireVc => "expireVC",
            Self::UpdateUsageVc => "updateUsageVC",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
