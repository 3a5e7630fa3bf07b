//! # Registry Scenarios
//!
//! End-to-end flows through the registry façade: role management, DID and
//! VC lifecycles, and the guarantee that rejected calls change nothing.

use std::sync::Arc;

use ireg_core::{CredentialDigest, Principal};
use ireg_registry::{
    AuditEvent, CallerIdentity, DidStatus, FailureReason, MemorySink, Registry, Role, VcStatus,
};

fn p(s: &str) -> Principal {
    Principal::new(s).unwrap()
}

fn as_caller(s: &str) -> CallerIdentity {
    CallerIdentity::new(p(s))
}

fn h(byte: u8) -> CredentialDigest {
    CredentialDigest::from_bytes([byte; 64])
}

/// Founder `A0` plus platform wallet `P`.
fn registry_with_wallet() -> Registry {
    let registry = Registry::bootstrap("A0").unwrap();
    registry
        .add_platform_wallet(&as_caller("A0"), &p("P"))
        .unwrap();
    registry
}

// =========================================================================
// Scenario A: adding an administrator
// =========================================================================

#[test]
fn founder_adds_admin_and_duplicate_is_rejected() {
    let sink = Arc::new(MemorySink::new());
    let registry = Registry::new().with_sink(sink.clone());
    registry.initialize(p("A0")).unwrap();

    let record = registry.add_admin(&as_caller("A0"), &p("A1")).unwrap();
    assert!(registry.is_admin(&p("A1")));
    assert_eq!(record.event, AuditEvent::AdminAdded { admin: p("A1") });
    assert_eq!(sink.records().last().unwrap().event, record.event);

    let err = registry.add_admin(&as_caller("A1"), &p("A1")).unwrap_err();
    assert_eq!(err.reason(), FailureReason::AlreadyAdmin);
    assert_eq!(sink.len(), 2);
}

// =========================================================================
// Scenario B: DID registration and suspension
// =========================================================================

#[test]
fn wallet_registers_and_admin_suspends_did() {
    let registry = registry_with_wallet();

    registry.register_did(&as_caller("P"), &p("U")).unwrap();
    assert_eq!(registry.did_status(&p("U")), DidStatus::Active);

    registry.suspend_did(&as_caller("A0"), &p("U")).unwrap();
    assert_eq!(registry.did_status(&p("U")), DidStatus::Suspended);

    for outsider in ["P", "U", "stranger"] {
        let err = registry
            .suspend_did(&as_caller(outsider), &p("U"))
            .unwrap_err();
        assert_eq!(err.reason(), FailureReason::Unauthorized);
    }
}

#[test]
fn did_suspend_unsuspend_round_trip() {
    let registry = registry_with_wallet();
    let admin = as_caller("A0");
    registry.register_did(&as_caller("P"), &p("U")).unwrap();

    for _ in 0..3 {
        registry.suspend_did(&admin, &p("U")).unwrap();
        registry.unsuspend_did(&admin, &p("U")).unwrap();
    }
    assert_eq!(registry.did_status(&p("U")), DidStatus::Active);
}

#[test]
fn terminated_did_can_be_registered_again() {
    let registry = registry_with_wallet();
    registry.register_did(&as_caller("P"), &p("U")).unwrap();
    registry.terminate_did(&as_caller("A0"), &p("U")).unwrap();
    assert_eq!(registry.did_status(&p("U")), DidStatus::Terminated);

    registry.register_did(&as_caller("P"), &p("U")).unwrap();
    assert_eq!(registry.did_status(&p("U")), DidStatus::Active);
}

// =========================================================================
// Scenario C: VC usage and termination
// =========================================================================

#[test]
fn vc_usage_counts_then_terminated() {
    let registry = registry_with_wallet();
    let wallet = as_caller("P");
    let vc = h(0x11);

    registry.issue_vc(&wallet, &vc).unwrap();
    let report = registry.vc_status(&vc);
    assert_eq!((report.usage_count, report.status), (0, VcStatus::Active));

    for expected in 1..=2 {
        let record = registry.update_usage_vc(&wallet, &vc).unwrap();
        assert_eq!(
            record.event,
            AuditEvent::VcUsageUpdated {
                vc,
                usage_count: expected
            }
        );
        let report = registry.vc_status(&vc);
        assert_eq!((report.usage_count, report.status), (expected, VcStatus::Active));
    }

    registry.terminate_vc(&as_caller("A0"), &vc).unwrap();
    assert_eq!(registry.vc_status(&vc).status, VcStatus::Terminated);

    let err = registry.update_usage_vc(&wallet, &vc).unwrap_err();
    assert_eq!(err.reason(), FailureReason::NotActive);
    assert_eq!(registry.vc_status(&vc).usage_count, 2);
}

#[test]
fn reissue_keeps_usage_count() {
    let registry = registry_with_wallet();
    let wallet = as_caller("P");
    let vc = h(0x22);
    registry.issue_vc(&wallet, &vc).unwrap();
    registry.update_usage_vc(&wallet, &vc).unwrap();
    registry.expire_vc(&wallet, &vc).unwrap();

    registry.issue_vc(&wallet, &vc).unwrap();
    let report = registry.vc_status(&vc);
    assert_eq!((report.usage_count, report.status), (1, VcStatus::Active));
}

#[test]
fn unseen_keys_read_as_inactive() {
    let registry = Registry::bootstrap("A0").unwrap();
    assert_eq!(registry.did_status(&p("never")), DidStatus::Inactive);
    let report = registry.vc_status(&h(0x99));
    assert_eq!((report.usage_count, report.status), (0, VcStatus::Inactive));
}

// =========================================================================
// Scenario D: administrator removal
// =========================================================================

#[test]
fn admin_cannot_remove_self_but_can_remove_another() {
    let registry = Registry::bootstrap("A0").unwrap();
    let founder = as_caller("A0");
    registry.add_admin(&founder, &p("A1")).unwrap();

    let err = registry.remove_admin(&founder, &p("A0")).unwrap_err();
    assert_eq!(err.reason(), FailureReason::SelfRemoval);
    assert!(registry.is_admin(&p("A0")));

    registry.remove_admin(&founder, &p("A1")).unwrap();
    assert!(!registry.is_admin(&p("A1")));

    let err = registry.add_admin(&as_caller("A1"), &p("A2")).unwrap_err();
    assert_eq!(err.reason(), FailureReason::Unauthorized);
    assert_eq!(registry.members(Role::Admin), vec![p("A0")]);
}

// =========================================================================
// Rejected calls change nothing
// =========================================================================

#[test]
fn failed_calls_are_idempotent() {
    let registry = registry_with_wallet();
    registry.register_did(&as_caller("P"), &p("U")).unwrap();
    registry.issue_vc(&as_caller("P"), &h(1)).unwrap();
    let before = registry.snapshot();
    let audit_before = registry.audit_records();

    for _ in 0..2 {
        assert!(registry.register_did(&as_caller("P"), &p("U")).is_err());
        assert!(registry.unsuspend_did(&as_caller("A0"), &p("U")).is_err());
        assert!(registry.update_usage_vc(&as_caller("A0"), &h(1)).is_err());
        assert!(registry.update_usage_vc(&as_caller("P"), &h(2)).is_err());
        assert!(registry.add_platform_wallet(&as_caller("A0"), &p("P")).is_err());
        assert!(registry.remove_platform_wallet(&as_caller("A0"), &p("Q")).is_err());
        assert!(registry.terminate_vc(&as_caller("P"), &h(1)).is_err());
    }

    assert_eq!(registry.snapshot(), before);
    assert_eq!(registry.audit_records(), audit_before);
    assert_eq!(registry.did_status(&p("U")), DidStatus::Active);
    assert_eq!(registry.vc_status(&h(1)).usage_count, 0);
    assert_eq!(registry.vc_status(&h(2)).status, VcStatus::Inactive);
}

#[test]
fn removed_wallet_loses_privileges() {
    let registry = registry_with_wallet();
    registry
        .remove_platform_wallet(&as_caller("A0"), &p("P"))
        .unwrap();
    let err = registry.register_did(&as_caller("P"), &p("U")).unwrap_err();
    assert_eq!(err.reason(), FailureReason::Unauthorized);
}

#[test]
fn calls_before_initialization_are_rejected() {
    let registry = Registry::new();
    let err = registry.add_admin(&as_caller("A0"), &p("A1")).unwrap_err();
    assert_eq!(err.reason(), FailureReason::NotInitialized);
    assert!(registry.audit_records().is_empty());

    registry.initialize(p("A0")).unwrap();
    let err = registry.initialize(p("A9")).unwrap_err();
    assert_eq!(err.reason(), FailureReason::AlreadyInitialized);
}
