//! # Registry Façade
//!
//! The single entry point for every operation. All state lives in one
//! `RegistryState` behind a `parking_lot::RwLock`.
//!
//! ## Transactional boundary
//!
//! Every mutating call runs under the write lock in two phases:
//!
//! 1. **Plan.** With only a shared borrow of the state: check the registry
//!    is initialized, check the caller's role, check membership or record
//!    status, and stage a `Mutation` plus its [`AuditEvent`]. The audit
//!    record is built here too, so encoding cannot fail after commit starts.
//! 2. **Commit.** Apply the mutation, append the record, deliver it to the
//!    sinks. None of these steps can fail: a sink that panics is logged and
//!    skipped, and the call still returns the committed record.
//!
//! A rejected call therefore leaves roles, ledgers and the audit log
//! exactly as they were. Reads take the read lock and always observe the
//! most recently committed call.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use chrono::Utc;
use ireg_core::{CredentialDigest, Principal};
use ireg_state::{DidStatus, TransitionError, VcRecord, VcStatus};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::audit::{AuditEvent, AuditLog, AuditRecord, AuditSink, ChainIntegrity};
use crate::caller::CallerIdentity;
use crate::error::RegistryError;
use crate::ledger::{DidLedger, VcLedger};
use crate::role::{Operation, Role};
use crate::roles::RoleStore;

/// Result of a VC status lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcStatusReport {
    /// Recorded uses.
    pub usage_count: u64,
    /// Current status.
    pub status: VcStatus,
}

impl From<VcRecord> for VcStatusReport {
    fn from(record: VcRecord) -> Self {
        Self {
            usage_count: record.usage_count,
            status: record.status,
        }
    }
}

/// Consistent summary of the registry at one point in the global order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Whether the founding administrator has been installed.
    pub initialized: bool,
    /// Number of administrators.
    pub admins: usize,
    /// Number of platform wallets.
    pub platform_wallets: usize,
    /// DIDs ever registered.
    pub dids: usize,
    /// DIDs currently `ACTIVE`.
    pub active_dids: usize,
    /// VCs ever issued.
    pub vcs: usize,
    /// VCs currently `ACTIVE`.
    pub active_vcs: usize,
    /// Number of audit records.
    pub audit_len: usize,
    /// Digest of the latest audit record (64 zeros when empty).
    pub audit_head: String,
}

/// A validated change, ready to apply.
#[derive(Debug)]
enum Mutation {
    Initialize { founder: Principal },
    AddMember { role: Role, member: Principal },
    RemoveMember { role: Role, member: Principal },
    SetDid { id: Principal, status: DidStatus },
    SetVc { hash: CredentialDigest, record: VcRecord },
}

#[derive(Debug, Default)]
struct RegistryState {
    initialized: bool,
    roles: RoleStore,
    dids: DidLedger,
    vcs: VcLedger,
    audit: AuditLog,
}

impl RegistryState {
    fn authorize(&self, caller: &CallerIdentity, operation: Operation) -> Result<(), RegistryError> {
        if !self.initialized {
            return Err(RegistryError::NotInitialized);
        }
        if let Some(required) = operation.required_role() {
            if !self.roles.has_role(&caller.principal, required) {
                return Err(RegistryError::Unauthorized {
                    caller: caller.principal.clone(),
                    required,
                    operation,
                });
            }
        }
        Ok(())
    }

    fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Initialize { founder } => {
                self.roles.insert(Role::Admin, founder);
                self.initialized = true;
            }
            Mutation::AddMember { role, member } => {
                self.roles.insert(role, member);
            }
            Mutation::RemoveMember { role, member } => {
                self.roles.remove(role, &member);
            }
            Mutation::SetDid { id, status } => self.dids.set(id, status),
            Mutation::SetVc { hash, record } => self.vcs.set(hash, record),
        }
    }
}

/// The role-gated DID/VC registry.
pub struct Registry {
    state: RwLock<RegistryState>,
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("state", &*self.state.read())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// An uninitialized registry with no sinks. Every mutating call fails
    /// with `NotInitialized` until [`initialize`](Self::initialize).
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            sinks: Vec::new(),
        }
    }

    /// Register an audit sink. Sinks receive records in commit order.
    pub fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Create and initialize a registry with `founder` as the sole admin.
    pub fn bootstrap(founder: &str) -> Result<Self, RegistryError> {
        let founder = Principal::new(founder)?;
        let registry = Self::new();
        registry.initialize(founder)?;
        Ok(registry)
    }

    /// Install the founding administrator. Valid exactly once.
    pub fn initialize(&self, founder: Principal) -> Result<AuditRecord, RegistryError> {
        let mut state = self.state.write();
        if state.initialized {
            tracing::warn!(founder = %founder, "rejected re-initialization");
            return Err(RegistryError::AlreadyInitialized);
        }
        let record = state.audit.prepare(
            AuditEvent::RegistryInitialized {
                admin: founder.clone(),
            },
            founder.clone(),
            Utc::now(),
        )?;
        state.apply(Mutation::Initialize { founder });
        Ok(self.commit(&mut state.audit, record))
    }

    /// Whether [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }

    fn execute(
        &self,
        caller: &CallerIdentity,
        operation: Operation,
        plan: impl FnOnce(&RegistryState) -> Result<(Mutation, AuditEvent), RegistryError>,
    ) -> Result<AuditRecord, RegistryError> {
        let mut state = self.state.write();
        let staged = state
            .authorize(caller, operation)
            .and_then(|()| plan(&*state))
            .and_then(|(mutation, event)| {
                let record = state
                    .audit
                    .prepare(event, caller.principal.clone(), Utc::now())?;
                Ok((mutation, record))
            });
        let (mutation, record) = match staged {
            Ok(staged) => staged,
            Err(err) => {
                log_rejection(caller, operation, &err);
                return Err(err);
            }
        };
        state.apply(mutation);
        Ok(self.commit(&mut state.audit, record))
    }

    fn commit(&self, audit: &mut AuditLog, record: AuditRecord) -> AuditRecord {
        audit.append(record.clone());
        for sink in &self.sinks {
            if panic::catch_unwind(AssertUnwindSafe(|| sink.deliver(&record))).is_err() {
                tracing::error!(
                    sequence = record.sequence,
                    event = record.event.name(),
                    "audit sink panicked; record remains committed"
                );
            }
        }
        record
    }

    // -- Role management --------------------------------------------------

    /// `addAdmin`: admin only; fails if `target` is already an admin.
    pub fn add_admin(
        &self,
        caller: &CallerIdentity,
        target: &Principal,
    ) -> Result<AuditRecord, RegistryError> {
        self.add_member(caller, Operation::AddAdmin, Role::Admin, target, |admin| {
            AuditEvent::AdminAdded { admin }
        })
    }

    /// `removeAdmin`: admin only; fails if `target` is not an admin or is
    /// the caller.
    pub fn remove_admin(
        &self,
        caller: &CallerIdentity,
        target: &Principal,
    ) -> Result<AuditRecord, RegistryError> {
        self.remove_member(caller, Operation::RemoveAdmin, Role::Admin, target, |admin| {
            AuditEvent::AdminRemoved { admin }
        })
    }

    /// `addPlatformWallet`: admin only.
    pub fn add_platform_wallet(
        &self,
        caller: &CallerIdentity,
        target: &Principal,
    ) -> Result<AuditRecord, RegistryError> {
        self.add_member(
            caller,
            Operation::AddPlatformWallet,
            Role::PlatformWallet,
            target,
            |wallet| AuditEvent::PlatformWalletAdded { wallet },
        )
    }

    /// `removePlatformWallet`: admin only; no self-removal guard.
    pub fn remove_platform_wallet(
        &self,
        caller: &CallerIdentity,
        target: &Principal,
    ) -> Result<AuditRecord, RegistryError> {
        self.remove_member(
            caller,
            Operation::RemovePlatformWallet,
            Role::PlatformWallet,
            target,
            |wallet| AuditEvent::PlatformWalletRemoved { wallet },
        )
    }

    fn add_member(
        &self,
        caller: &CallerIdentity,
        operation: Operation,
        role: Role,
        target: &Principal,
        event: impl FnOnce(Principal) -> AuditEvent,
    ) -> Result<AuditRecord, RegistryError> {
        self.execute(caller, operation, |state| {
            state.roles.check_add(role, target)?;
            Ok((
                Mutation::AddMember {
                    role,
                    member: target.clone(),
                },
                event(target.clone()),
            ))
        })
    }

    fn remove_member(
        &self,
        caller: &CallerIdentity,
        operation: Operation,
        role: Role,
        target: &Principal,
        event: impl FnOnce(Principal) -> AuditEvent,
    ) -> Result<AuditRecord, RegistryError> {
        self.execute(caller, operation, |state| {
            state.roles.check_remove(role, &caller.principal, target)?;
            Ok((
                Mutation::RemoveMember {
                    role,
                    member: target.clone(),
                },
                event(target.clone()),
            ))
        })
    }

    // -- DID lifecycle ----------------------------------------------------

    /// `registerDID`: platform wallet only; any status but `ACTIVE` → `ACTIVE`.
    pub fn register_did(
        &self,
        caller: &CallerIdentity,
        id: &Principal,
    ) -> Result<AuditRecord, RegistryError> {
        self.did_transition(caller, Operation::RegisterDid, id, DidStatus::register, |did| {
            AuditEvent::DidRegistered { did }
        })
    }

    /// `suspendDID`: admin only; `ACTIVE` → `SUSPENDED`.
    pub fn suspend_did(
        &self,
        caller: &CallerIdentity,
        id: &Principal,
    ) -> Result<AuditRecord, RegistryError> {
        self.did_transition(caller, Operation::SuspendDid, id, DidStatus::suspend, |did| {
            AuditEvent::DidSuspended { did }
        })
    }

    /// `unSuspendDID`: admin only; `SUSPENDED` → `ACTIVE`.
    pub fn unsuspend_did(
        &self,
        caller: &CallerIdentity,
        id: &Principal,
    ) -> Result<AuditRecord, RegistryError> {
        self.did_transition(
            caller,
            Operation::UnsuspendDid,
            id,
            DidStatus::unsuspend,
            |did| AuditEvent::DidUnsuspended { did },
        )
    }

    /// `terminateDID`: admin only; `ACTIVE` → `TERMINATED`.
    pub fn terminate_did(
        &self,
        caller: &CallerIdentity,
        id: &Principal,
    ) -> Result<AuditRecord, RegistryError> {
        self.did_transition(
            caller,
            Operation::TerminateDid,
            id,
            DidStatus::terminate,
            |did| AuditEvent::DidTerminated { did },
        )
    }

    fn did_transition(
        &self,
        caller: &CallerIdentity,
        operation: Operation,
        id: &Principal,
        transition: fn(DidStatus) -> Result<DidStatus, TransitionError>,
        event: impl FnOnce(Principal) -> AuditEvent,
    ) -> Result<AuditRecord, RegistryError> {
        self.execute(caller, operation, |state| {
            let status = transition(state.dids.status(id))?;
            Ok((
                Mutation::SetDid {
                    id: id.clone(),
                    status,
                },
                event(id.clone()),
            ))
        })
    }

    // -- VC lifecycle -----------------------------------------------------

    /// `issueVC`: platform wallet only; any status but `ACTIVE` → `ACTIVE`,
    /// usage count unchanged.
    pub fn issue_vc(
        &self,
        caller: &CallerIdentity,
        hash: &CredentialDigest,
    ) -> Result<AuditRecord, RegistryError> {
        self.vc_transition(caller, Operation::IssueVc, hash, VcRecord::issue, |vc, _| {
            AuditEvent::VcIssued { vc }
        })
    }

    /// `suspendVC`: admin only; `ACTIVE` → `SUSPENDED`.
    pub fn suspend_vc(
        &self,
        caller: &CallerIdentity,
        hash: &CredentialDigest,
    ) -> Result<AuditRecord, RegistryError> {
        self.vc_transition(caller, Operation::SuspendVc, hash, VcRecord::suspend, |vc, _| {
            AuditEvent::VcSuspended { vc }
        })
    }

    /// `unSuspendVC`: admin only; `SUSPENDED` → `ACTIVE`.
    pub fn unsuspend_vc(
        &self,
        caller: &CallerIdentity,
        hash: &CredentialDigest,
    ) -> Result<AuditRecord, RegistryError> {
        self.vc_transition(
            caller,
            Operation::UnsuspendVc,
            hash,
            VcRecord::unsuspend,
            |vc, _| AuditEvent::VcUnsuspended { vc },
        )
    }

    /// `terminateVC`: admin only; `ACTIVE` → `TERMINATED`.
    pub fn terminate_vc(
        &self,
        caller: &CallerIdentity,
        hash: &CredentialDigest,
    ) -> Result<AuditRecord, RegistryError> {
        self.vc_transition(
            caller,
            Operation::TerminateVc,
            hash,
            VcRecord::terminate,
            |vc, _| AuditEvent::VcTerminated { vc },
        )
    }

    /// `expireVC`: platform wallet only; `ACTIVE` → `EXPIRED`.
    pub fn expire_vc(
        &self,
        caller: &CallerIdentity,
        hash: &CredentialDigest,
    ) -> Result<AuditRecord, RegistryError> {
        self.vc_transition(caller, Operation::ExpireVc, hash, VcRecord::expire, |vc, _| {
            AuditEvent::VcExpired { vc }
        })
    }

    /// `updateUsageVC`: platform wallet only; `ACTIVE`, count + 1. The
    /// record carries the new count.
    pub fn update_usage_vc(
        &self,
        caller: &CallerIdentity,
        hash: &CredentialDigest,
    ) -> Result<AuditRecord, RegistryError> {
        self.vc_transition(
            caller,
            Operation::UpdateUsageVc,
            hash,
            VcRecord::record_usage,
            |vc, next| AuditEvent::VcUsageUpdated {
                vc,
                usage_count: next.usage_count,
            },
        )
    }

    fn vc_transition(
        &self,
        caller: &CallerIdentity,
        operation: Operation,
        hash: &CredentialDigest,
        transition: fn(VcRecord) -> Result<VcRecord, TransitionError>,
        event: impl FnOnce(CredentialDigest, &VcRecord) -> AuditEvent,
    ) -> Result<AuditRecord, RegistryError> {
        self.execute(caller, operation, |state| {
            let record = transition(state.vcs.record(hash))?;
            let event = event(*hash, &record);
            Ok((Mutation::SetVc { hash: *hash, record }, event))
        })
    }

    // -- Reads ------------------------------------------------------------

    /// `isAdmin`.
    pub fn is_admin(&self, id: &Principal) -> bool {
        self.state.read().roles.is_admin(id)
    }

    /// `isPlatformWallet`.
    pub fn is_platform_wallet(&self, id: &Principal) -> bool {
        self.state.read().roles.is_platform_wallet(id)
    }

    /// Members of `role` in sorted order.
    pub fn members(&self, role: Role) -> Vec<Principal> {
        self.state.read().roles.members(role).cloned().collect()
    }

    /// `getDIDStatus`: `INACTIVE` for unseen principals.
    pub fn did_status(&self, id: &Principal) -> DidStatus {
        self.state.read().dids.status(id)
    }

    /// `getVCStatus`: `(0, INACTIVE)` for unseen digests.
    pub fn vc_status(&self, hash: &CredentialDigest) -> VcStatusReport {
        self.state.read().vcs.record(hash).into()
    }

    /// Every audit record in commit order.
    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.state.read().audit.records().to_vec()
    }

    /// Up to `limit` audit records with sequence greater than `after`.
    pub fn audit_since(&self, after: u64, limit: Option<usize>) -> Vec<AuditRecord> {
        let state = self.state.read();
        let records = state.audit.since(after);
        let take = limit.unwrap_or(records.len()).min(records.len());
        records[..take].to_vec()
    }

    /// Audit records targeting `subject`.
    pub fn audit_for_subject(&self, subject: &str) -> Vec<AuditRecord> {
        self.state
            .read()
            .audit
            .for_subject(subject)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Walk the audit hash chain.
    pub fn verify_audit_chain(&self) -> ChainIntegrity {
        self.state.read().audit.verify_chain()
    }

    /// Consistent summary under a single read lock.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();
        RegistrySnapshot {
            initialized: state.initialized,
            admins: state.roles.count(Role::Admin),
            platform_wallets: state.roles.count(Role::PlatformWallet),
            dids: state.dids.len(),
            active_dids: state.dids.count_in(DidStatus::Active),
            vcs: state.vcs.len(),
            active_vcs: state.vcs.count_in(VcStatus::Active),
            audit_len: state.audit.len(),
            audit_head: state.audit.head_digest().to_string(),
        }
    }
}

fn log_rejection(caller: &CallerIdentity, operation: Operation, err: &RegistryError) {
    match err {
        RegistryError::Unauthorized { .. } => tracing::warn!(
            operation = %operation,
            caller = %caller,
            error = %err,
            "registry call unauthorized"
        ),
        RegistryError::AuditEncoding(_) => tracing::error!(
            operation = %operation,
            caller = %caller,
            error = %err,
            "audit record encoding failed"
        ),
        RegistryError::InvalidStateTransition(transition) => tracing::debug!(
            operation = %operation,
            caller = %caller,
            record = %transition.kind(),
            reason = %err.reason(),
            error = %err,
            "registry call rejected"
        ),
        _ => tracing::debug!(
            operation = %operation,
            caller = %caller,
            reason = %err.reason(),
            error = %err,
            "registry call rejected"
        ),
    }
}
