//! # DID and VC Ledgers
//!
//! Sparse maps from key to status. A key with no entry reads as the
//! default record (`INACTIVE`, zero usage). Entries are never deleted;
//! `TERMINATED` is kept as a tombstone.

use std::collections::HashMap;

use ireg_core::{CredentialDigest, Principal};
use ireg_state::{DidStatus, VcRecord};

/// DID status per principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DidLedger {
    records: HashMap<Principal, DidStatus>,
}

impl DidLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status; `INACTIVE` when never seen.
    pub fn status(&self, id: &Principal) -> DidStatus {
        self.records.get(id).copied().unwrap_or_default()
    }

    /// Store a new status.
    pub fn set(&mut self, id: Principal, status: DidStatus) {
        self.records.insert(id, status);
    }

    /// Number of principals that have ever been registered.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no principal has ever been registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records currently in `status`.
    pub fn count_in(&self, status: DidStatus) -> usize {
        self.records.values().filter(|s| **s == status).count()
    }
}

/// VC status and usage count per credential digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcLedger {
    records: HashMap<CredentialDigest, VcRecord>,
}

impl VcLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record; `(INACTIVE, 0)` when never seen.
    pub fn record(&self, hash: &CredentialDigest) -> VcRecord {
        self.records.get(hash).copied().unwrap_or_default()
    }

    /// Store a new record.
    pub fn set(&mut self, hash: CredentialDigest, record: VcRecord) {
        self.records.insert(hash, record);
    }

    /// Number of digests that have ever been issued.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no digest has ever been issued.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records currently in `status`.
    pub fn count_in(&self, status: ireg_state::VcStatus) -> usize {
        self.records.values().filter(|r| r.status == status).count()
    }
}
