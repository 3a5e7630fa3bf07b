//! # Role Store
//!
//! The administrator and platform-wallet sets. Membership may overlap; the
//! two sets are independent.
//!
//! Checks (`check_add`, `check_remove`) are split from the mutations
//! (`insert`, `remove`) so the façade can validate a call completely before
//! touching anything.

use std::collections::BTreeSet;

use ireg_core::Principal;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::role::Role;

/// The two role sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStore {
    admins: BTreeSet<Principal>,
    platform_wallets: BTreeSet<Principal>,
}

impl RoleStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, role: Role) -> &BTreeSet<Principal> {
        match role {
            Role::Admin => &self.admins,
            Role::PlatformWallet => &self.platform_wallets,
        }
    }

    fn set_mut(&mut self, role: Role) -> &mut BTreeSet<Principal> {
        match role {
            Role::Admin => &mut self.admins,
            Role::PlatformWallet => &mut self.platform_wallets,
        }
    }

    /// Whether `principal` holds `role`.
    pub fn has_role(&self, principal: &Principal, role: Role) -> bool {
        self.set(role).contains(principal)
    }

    /// Whether `principal` is an administrator.
    pub fn is_admin(&self, principal: &Principal) -> bool {
        self.has_role(principal, Role::Admin)
    }

    /// Whether `principal` is a platform wallet.
    pub fn is_platform_wallet(&self, principal: &Principal) -> bool {
        self.has_role(principal, Role::PlatformWallet)
    }

    /// Members of `role` in sorted order.
    pub fn members(&self, role: Role) -> impl Iterator<Item = &Principal> {
        self.set(role).iter()
    }

    /// Number of members of `role`.
    pub fn count(&self, role: Role) -> usize {
        self.set(role).len()
    }

    /// Validate adding `target` to `role`.
    pub fn check_add(&self, role: Role, target: &Principal) -> Result<(), RegistryError> {
        if self.has_role(target, role) {
            return Err(RegistryError::DuplicateMembership {
                role,
                member: target.clone(),
            });
        }
        Ok(())
    }

    /// Validate removing `target` from `role` on behalf of `caller`.
    ///
    /// Membership is checked before self-removal, so an admin naming a
    /// principal that is not an admin gets `MissingMembership` even when the
    /// name is its own (impossible for an authorized admin, but the order is
    /// fixed regardless).
    pub fn check_remove(
        &self,
        role: Role,
        caller: &Principal,
        target: &Principal,
    ) -> Result<(), RegistryError> {
        if !self.has_role(target, role) {
            return Err(RegistryError::MissingMembership {
                role,
                member: target.clone(),
            });
        }
        if role == Role::Admin && caller == target {
            return Err(RegistryError::SelfRemoval {
                admin: caller.clone(),
            });
        }
        Ok(())
    }

    /// Add `member` to `role`. Returns whether it was newly inserted.
    pub fn insert(&mut self, role: Role, member: Principal) -> bool {
        self.set_mut(role).insert(member)
    }

    /// Remove `member` from `role`. Returns whether it was present.
    pub fn remove(&mut self, role: Role, member: &Principal) -> bool {
        self.set_mut(role).remove(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn with_admin(a: &str) -> RoleStore {
        let mut s = RoleStore::new();
        s.insert(Role::Admin, p(a));
        s
    }

    #[test]
    fn empty_store_has_no_members() {
        let s = RoleStore::new();
        assert!(!s.is_admin(&p("a0")));
        assert!(!s.is_platform_wallet(&p("a0")));
        assert_eq!(s.count(Role::Admin), 0);
    }

    #[test]
    fn duplicate_add_rejected() {
        let s = with_admin("a0");
        assert_eq!(
            s.check_add(Role::Admin, &p("a0")),
            Err(RegistryError::DuplicateMembership {
                role: Role::Admin,
                member: p("a0"),
            })
        );
        assert!(s.check_add(Role::PlatformWallet, &p("a0")).is_ok());
    }

    #[test]
    fn admin_cannot_remove_self() {
        let mut s = with_admin("a0");
        s.insert(Role::Admin, p("a1"));
        assert_eq!(
            s.check_remove(Role::Admin, &p("a0"), &p("a0")),
            Err(RegistryError::SelfRemoval { admin: p("a0") })
        );
        assert!(s.check_remove(Role::Admin, &p("a0"), &p("a1")).is_ok());
    }

    #[test]
    fn remove_missing_member_rejected() {
        let s = with_admin("a0");
        let err = s
            .check_remove(Role::PlatformWallet, &p("a0"), &p("w1"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::MissingMembership { .. }));
    }

    #[test]
    fn platform_wallet_removal_has_no_self_guard() {
        let mut s = with_admin("a0");
        s.insert(Role::PlatformWallet, p("a0"));
        assert!(s.check_remove(Role::PlatformWallet, &p("a0"), &p("a0")).is_ok());
    }

    #[test]
    fn insert_and_remove_report_change() {
        let mut s = RoleStore::new();
        assert!(s.insert(Role::PlatformWallet, p("w1")));
        assert!(!s.insert(Role::PlatformWallet, p("w1")));
        assert!(s.remove(Role::PlatformWallet, &p("w1")));
        assert!(!s.remove(Role::PlatformWallet, &p("w1")));
    }

    #[test]
    fn members_are_sorted() {
        let mut s = RoleStore::new();
        s.insert(Role::Admin, p("b"));
        s.insert(Role::Admin, p("a"));
        let names: Vec<&str> = s.members(Role::Admin).map(Principal::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
