//! Role → permission resolution.
//!
//! - No IO
//! - No panics
//! - Unknown input resolves to "nothing" instead of failing

use std::collections::BTreeSet;

use crate::{Catalog, Identity, Permission, Role, RoleTier};

/// Answers permission and role-level questions against one catalog.
#[derive(Debug, Clone, Copy)]
pub struct PermissionResolver {
    catalog: &'static Catalog,
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::new(Catalog::extended())
    }
}

impl PermissionResolver {
    pub fn new(catalog: &'static Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    /// Permissions granted by `role`; empty for roles the catalog doesn't list.
    pub fn permissions_for_role(&self, role: &Role) -> BTreeSet<Permission> {
        self.catalog
            .entry(role)
            .map(|entry| entry.permissions.clone())
            .unwrap_or_default()
    }

    /// Union of the permissions of every role; duplicates collapse.
    pub fn permissions_for_roles<'a, I>(&self, roles: I) -> BTreeSet<Permission>
    where
        I: IntoIterator<Item = &'a Role>,
    {
        roles
            .into_iter()
            .filter_map(|role| self.catalog.entry(role))
            .flat_map(|entry| entry.permissions.iter().copied())
            .collect()
    }

    pub fn permissions_for_identity(&self, identity: &Identity) -> BTreeSet<Permission> {
        self.permissions_for_roles(&identity.roles)
    }

    pub fn has_permission(&self, identity: &Identity, permission: Permission) -> bool {
        identity
            .roles
            .iter()
            .filter_map(|role| self.catalog.entry(role))
            .any(|entry| entry.permissions.contains(&permission))
    }

    pub fn has_all_permissions(&self, identity: &Identity, permissions: &[Permission]) -> bool {
        let granted = self.permissions_for_identity(identity);
        permissions.iter().all(|p| granted.contains(p))
    }

    /// Ordering level of `role`; 0 for roles the catalog doesn't list.
    pub fn role_level(&self, role: &Role) -> u8 {
        self.catalog.entry(role).map_or(0, |entry| entry.level)
    }

    /// True iff any held role is at or above `required`'s level.
    pub fn has_role_level(&self, identity: &Identity, required: &Role) -> bool {
        let required_level = self.role_level(required);
        identity
            .roles
            .iter()
            .any(|role| self.role_level(role) >= required_level)
    }

    /// Highest administrative tier among the identity's roles.
    pub fn tier(&self, identity: &Identity) -> RoleTier {
        identity
            .roles
            .iter()
            .filter_map(|role| self.catalog.entry(role))
            .map(|entry| entry.tier)
            .max()
            .unwrap_or(RoleTier::Plain)
    }
}
