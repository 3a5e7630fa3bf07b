//! # Audit Chain Integrity
//!
//! The audit log records exactly the successful calls, in order, with an
//! unbroken hash chain. Tampering with any record is detected.

use std::sync::Arc;

use ireg_core::{CredentialDigest, Principal, ZERO_DIGEST_HEX};
use ireg_registry::{verify_records, CallerIdentity, MemorySink, Operation, Registry};
use proptest::prelude::*;

fn p(s: &str) -> Principal {
    Principal::new(s).unwrap()
}

fn as_caller(s: &str) -> CallerIdentity {
    CallerIdentity::new(p(s))
}

fn busy_registry() -> Registry {
    let registry = Registry::bootstrap("A0").unwrap();
    let admin = as_caller("A0");
    let wallet = as_caller("P");
    let vc = CredentialDigest::from_bytes([5; 64]);
    registry.add_platform_wallet(&admin, &p("P")).unwrap();
    registry.register_did(&wallet, &p("U")).unwrap();
    registry.issue_vc(&wallet, &vc).unwrap();
    registry.update_usage_vc(&wallet, &vc).unwrap();
    registry.suspend_did(&admin, &p("U")).unwrap();
    registry
}

#[test]
fn chain_links_from_zero_digest() {
    let records = busy_registry().audit_records();
    assert_eq!(records.len(), 6);
    assert_eq!(records[0].previous_digest, ZERO_DIGEST_HEX);
    for pair in records.windows(2) {
        assert_eq!(pair[1].previous_digest, pair[0].digest);
        assert_eq!(pair[1].sequence, pair[0].sequence + 1);
    }
    let integrity = verify_records(&records);
    assert!(integrity.chain_valid);
    assert_eq!(integrity.total_records, 6);
    assert_eq!(integrity.first_broken, None);
}

#[test]
fn operations_recorded_in_order() {
    let ops: Vec<Operation> = busy_registry()
        .audit_records()
        .iter()
        .map(|r| r.event.operation())
        .collect();
    assert_eq!(
        ops,
        vec![
            Operation::Initialize,
            Operation::AddPlatformWallet,
            Operation::RegisterDid,
            Operation::IssueVc,
            Operation::UpdateUsageVc,
            Operation::SuspendDid,
        ]
    );
}

#[test]
fn tampered_caller_detected() {
    let mut records = busy_registry().audit_records();
    records[2].caller = p("mallory");
    let integrity = verify_records(&records);
    assert!(!integrity.chain_valid);
    assert_eq!(integrity.first_broken, Some(records[2].sequence));
}

#[test]
fn tampering_survives_json_export() {
    let records = busy_registry().audit_records();
    let mut exported = serde_json::to_value(&records).unwrap();
    exported[4]["event"]["usage_count"] = serde_json::json!(99);
    let imported: Vec<ireg_registry::AuditRecord> = serde_json::from_value(exported).unwrap();
    assert!(!verify_records(&imported).chain_valid);

    let untouched: Vec<ireg_registry::AuditRecord> =
        serde_json::from_value(serde_json::to_value(&records).unwrap()).unwrap();
    assert!(verify_records(&untouched).chain_valid);
}

#[test]
fn dropped_record_breaks_chain() {
    let mut records = busy_registry().audit_records();
    records.remove(1);
    assert!(!verify_records(&records).chain_valid);
}

#[test]
fn sink_sees_every_committed_record() {
    let sink = Arc::new(MemorySink::new());
    let registry = Registry::new().with_sink(sink.clone());
    registry.initialize(p("A0")).unwrap();
    registry.add_admin(&as_caller("A0"), &p("A1")).unwrap();
    assert!(registry.add_admin(&as_caller("A0"), &p("A1")).is_err());
    assert_eq!(sink.records(), registry.audit_records());
}

// -- Random operation sequences -----------------------------------------------

#[derive(Debug, Clone)]
enum Step {
    AddWallet(u8),
    RemoveWallet(u8),
    Register(u8, u8),
    Suspend(u8),
    Unsuspend(u8),
    Terminate(u8),
    Issue(u8, u8),
    Use(u8, u8),
    Expire(u8, u8),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u8..3).prop_map(Step::AddWallet),
        (0u8..3).prop_map(Step::RemoveWallet),
        (0u8..4, 0u8..4).prop_map(|(w, d)| Step::Register(w, d)),
        (0u8..4).prop_map(Step::Suspend),
        (0u8..4).prop_map(Step::Unsuspend),
        (0u8..4).prop_map(Step::Terminate),
        (0u8..4, 0u8..4).prop_map(|(w, v)| Step::Issue(w, v)),
        (0u8..4, 0u8..4).prop_map(|(w, v)| Step::Use(w, v)),
        (0u8..4, 0u8..4).prop_map(|(w, v)| Step::Expire(w, v)),
    ]
}

fn run(registry: &Registry, step: &Step) -> bool {
    let admin = as_caller("A0");
    let wallet = |n: &u8| as_caller(&format!("w{n}"));
    let did = |n: &u8| p(&format!("did:test:{n}"));
    let vc = |n: &u8| CredentialDigest::from_bytes([*n; 64]);
    let result = match step {
        Step::AddWallet(w) => registry.add_platform_wallet(&admin, &p(&format!("w{w}"))),
        Step::RemoveWallet(w) => registry.remove_platform_wallet(&admin, &p(&format!("w{w}"))),
        Step::Register(w, d) => registry.register_did(&wallet(w), &did(d)),
        Step::Suspend(d) => registry.suspend_did(&admin, &did(d)),
        Step::Unsuspend(d) => registry.unsuspend_did(&admin, &did(d)),
        Step::Terminate(d) => registry.terminate_did(&admin, &did(d)),
        Step::Issue(w, v) => registry.issue_vc(&wallet(w), &vc(v)),
        Step::Use(w, v) => registry.update_usage_vc(&wallet(w), &vc(v)),
        Step::Expire(w, v) => registry.expire_vc(&wallet(w), &vc(v)),
    };
    result.is_ok()
}

proptest! {
    #[test]
    fn chain_tracks_exactly_the_successful_calls(
        steps in proptest::collection::vec(step_strategy(), 0..40)
    ) {
        let registry = Registry::bootstrap("A0").unwrap();
        let mut expected_len = 1;
        for step in &steps {
            let before = registry.snapshot();
            if run(&registry, step) {
                expected_len += 1;
            } else {
                prop_assert_eq!(registry.snapshot(), before);
            }
        }
        let integrity = registry.verify_audit_chain();
        prop_assert!(integrity.chain_valid);
        prop_assert_eq!(integrity.total_records, expected_len);
    }

    #[test]
    fn usage_never_decreases(
        steps in proptest::collection::vec(step_strategy(), 0..40)
    ) {
        let registry = Registry::bootstrap("A0").unwrap();
        let mut last = [0u64; 4];
        for step in &steps {
            run(&registry, step);
            for (n, prev) in last.iter_mut().enumerate() {
                let count = registry
                    .vc_status(&CredentialDigest::from_bytes([n as u8; 64]))
                    .usage_count;
                prop_assert!(count >= *prev);
                *prev = count;
            }
        }
    }
}
