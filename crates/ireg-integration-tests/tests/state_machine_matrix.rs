//! # Lifecycle Transition Matrix
//!
//! Drives every registry operation from every reachable status and checks
//! the outcome against the expected transition table.

use ireg_core::{CredentialDigest, Principal};
use ireg_registry::{CallerIdentity, DidStatus, FailureReason, Registry, VcStatus};

fn p(s: &str) -> Principal {
    Principal::new(s).unwrap()
}

fn admin() -> CallerIdentity {
    CallerIdentity::new(p("A0"))
}

fn wallet() -> CallerIdentity {
    CallerIdentity::new(p("P"))
}

fn setup() -> Registry {
    let registry = Registry::bootstrap("A0").unwrap();
    registry.add_platform_wallet(&admin(), &p("P")).unwrap();
    registry
}

// =========================================================================
// DID — 4 statuses × 4 operations
// =========================================================================

#[derive(Debug, Clone, Copy)]
enum DidOp {
    Register,
    Suspend,
    Unsuspend,
    Terminate,
}

fn drive_did_to(registry: &Registry, did: &Principal, target: DidStatus) {
    match target {
        DidStatus::Inactive => {}
        DidStatus::Active => {
            registry.register_did(&wallet(), did).unwrap();
        }
        DidStatus::Suspended => {
            registry.register_did(&wallet(), did).unwrap();
            registry.suspend_did(&admin(), did).unwrap();
        }
        DidStatus::Terminated => {
            registry.register_did(&wallet(), did).unwrap();
            registry.terminate_did(&admin(), did).unwrap();
        }
    }
    assert_eq!(registry.did_status(did), target);
}

fn apply_did(registry: &Registry, did: &Principal, op: DidOp) -> Result<(), FailureReason> {
    let result = match op {
        DidOp::Register => registry.register_did(&wallet(), did),
        DidOp::Suspend => registry.suspend_did(&admin(), did),
        DidOp::Unsuspend => registry.unsuspend_did(&admin(), did),
        DidOp::Terminate => registry.terminate_did(&admin(), did),
    };
    result.map(|_| ()).map_err(|e| e.reason())
}

fn expected_did(from: DidStatus, op: DidOp) -> Result<DidStatus, FailureReason> {
    use DidStatus::*;
    match (op, from) {
        (DidOp::Register, Active) => Err(FailureReason::AlreadyActive),
        (DidOp::Register, _) => Ok(Active),
        (DidOp::Suspend, Active) => Ok(Suspended),
        (DidOp::Terminate, Active) => Ok(Terminated),
        (DidOp::Suspend | DidOp::Terminate, _) => Err(FailureReason::NotActive),
        (DidOp::Unsuspend, Suspended) => Ok(Active),
        (DidOp::Unsuspend, _) => Err(FailureReason::NotSuspended),
    }
}

#[test]
fn did_transition_matrix_exhaustive() {
    let ops = [
        DidOp::Register,
        DidOp::Suspend,
        DidOp::Unsuspend,
        DidOp::Terminate,
    ];
    for from in DidStatus::ALL {
        for op in ops {
            let registry = setup();
            let did = p("U");
            drive_did_to(&registry, &did, from);
            let audit_len = registry.audit_records().len();

            let actual = apply_did(&registry, &did, op);
            match expected_did(from, op) {
                Ok(to) => {
                    assert_eq!(actual, Ok(()), "DID {from} --{op:?}--> expected ok");
                    assert_eq!(registry.did_status(&did), to, "DID {from} --{op:?}");
                    assert_eq!(registry.audit_records().len(), audit_len + 1);
                }
                Err(reason) => {
                    assert_eq!(actual, Err(reason), "DID {from} --{op:?}");
                    assert_eq!(registry.did_status(&did), from);
                    assert_eq!(registry.audit_records().len(), audit_len);
                }
            }
        }
    }
}

// =========================================================================
// VC — 5 statuses × 6 operations
// =========================================================================

#[derive(Debug, Clone, Copy)]
enum VcOp {
    Issue,
    Suspend,
    Unsuspend,
    Terminate,
    Expire,
    Use,
}

fn drive_vc_to(registry: &Registry, vc: &CredentialDigest, target: VcStatus) {
    if target != VcStatus::Inactive {
        registry.issue_vc(&wallet(), vc).unwrap();
    }
    match target {
        VcStatus::Inactive | VcStatus::Active => {}
        VcStatus::Suspended => {
            registry.suspend_vc(&admin(), vc).unwrap();
        }
        VcStatus::Terminated => {
            registry.terminate_vc(&admin(), vc).unwrap();
        }
        VcStatus::Expired => {
            registry.expire_vc(&wallet(), vc).unwrap();
        }
    }
    assert_eq!(registry.vc_status(vc).status, target);
}

fn apply_vc(registry: &Registry, vc: &CredentialDigest, op: VcOp) -> Result<(), FailureReason> {
    let result = match op {
        VcOp::Issue => registry.issue_vc(&wallet(), vc),
        VcOp::Suspend => registry.suspend_vc(&admin(), vc),
        VcOp::Unsuspend => registry.unsuspend_vc(&admin(), vc),
        VcOp::Terminate => registry.terminate_vc(&admin(), vc),
        VcOp::Expire => registry.expire_vc(&wallet(), vc),
        VcOp::Use => registry.update_usage_vc(&wallet(), vc),
    };
    result.map(|_| ()).map_err(|e| e.reason())
}

fn expected_vc(from: VcStatus, op: VcOp) -> Result<(VcStatus, u64), FailureReason> {
    use VcStatus::*;
    match (op, from) {
        (VcOp::Issue, Active) => Err(FailureReason::AlreadyActive),
        (VcOp::Issue, _) => Ok((Active, 0)),
        (VcOp::Suspend, Active) => Ok((Suspended, 0)),
        (VcOp::Terminate, Active) => Ok((Terminated, 0)),
        (VcOp::Expire, Active) => Ok((Expired, 0)),
        (VcOp::Use, Active) => Ok((Active, 1)),
        (VcOp::Suspend | VcOp::Terminate | VcOp::Expire | VcOp::Use, _) => {
            Err(FailureReason::NotActive)
        }
        (VcOp::Unsuspend, Suspended) => Ok((Active, 0)),
        (VcOp::Unsuspend, _) => Err(FailureReason::NotSuspended),
    }
}

#[test]
fn vc_transition_matrix_exhaustive() {
    let ops = [
        VcOp::Issue,
        VcOp::Suspend,
        VcOp::Unsuspend,
        VcOp::Terminate,
        VcOp::Expire,
        VcOp::Use,
    ];
    for from in VcStatus::ALL {
        for op in ops {
            let registry = setup();
            let vc = CredentialDigest::from_bytes([7; 64]);
            drive_vc_to(&registry, &vc, from);

            let actual = apply_vc(&registry, &vc, op);
            let report = registry.vc_status(&vc);
            match expected_vc(from, op) {
                Ok((to, count)) => {
                    assert_eq!(actual, Ok(()), "VC {from} --{op:?}--> expected ok");
                    assert_eq!((report.status, report.usage_count), (to, count));
                }
                Err(reason) => {
                    assert_eq!(actual, Err(reason), "VC {from} --{op:?}");
                    assert_eq!((report.status, report.usage_count), (from, 0));
                }
            }
        }
    }
}

#[test]
fn wrong_role_fails_before_transition_check() {
    let registry = setup();
    let vc = CredentialDigest::from_bytes([3; 64]);
    // Inactive VC: the role check still wins over NotActive.
    let err = registry.suspend_vc(&wallet(), &vc).unwrap_err();
    assert_eq!(err.reason(), FailureReason::Unauthorized);
    let err = registry.update_usage_vc(&admin(), &vc).unwrap_err();
    assert_eq!(err.reason(), FailureReason::Unauthorized);
}
