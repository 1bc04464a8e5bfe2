//! Resource-instance authorization.
//!
//! Two rule sets are offered as separate policies; the integrating service
//! picks one.

use serde::{Deserialize, Serialize};

use crate::{Identity, Permission, PermissionResolver, ResourceType, RoleTier};

/// The action being attempted on one resource instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionContext {
    pub action: Permission,
    pub resource_type: ResourceType,
    pub resource_id: Option<String>,
    pub owner_id: Option<String>,
}

impl PermissionContext {
    /// Context for `action` on its own resource type.
    pub fn new(action: Permission) -> Self {
        Self {
            action,
            resource_type: action.resource_type(),
            resource_id: None,
            owner_id: None,
        }
    }

    pub fn on(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = resource_type;
        self
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn owned_by(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowReason {
    Owner,
    TopAdmin,
    ManagedUser,
    ReadOnlyAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "permission")]
pub enum DenyReason {
    /// The base permission gate failed.
    MissingPermission(Permission),
    /// Permission held, but no ownership or administrative rule applied.
    NotPermitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum Decision {
    Allow(AllowReason),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

/// A rule set for resource-level access.
pub trait ResourcePolicy {
    fn name(&self) -> &'static str;

    fn evaluate(&self, identity: &Identity, ctx: &PermissionContext) -> Decision;

    fn can_access_resource(&self, identity: &Identity, ctx: &PermissionContext) -> bool {
        self.evaluate(identity, ctx).is_allowed()
    }
}

/// Permission gate, then owner, then top admin; mid admins reach their
/// managed users and any read-only action.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagedHierarchyPolicy {
    resolver: PermissionResolver,
}

impl ManagedHierarchyPolicy {
    pub fn new(resolver: PermissionResolver) -> Self {
        Self { resolver }
    }
}

impl ResourcePolicy for ManagedHierarchyPolicy {
    fn name(&self) -> &'static str {
        "managed-hierarchy"
    }

    fn evaluate(&self, identity: &Identity, ctx: &PermissionContext) -> Decision {
        if let Some(decision) = gate_and_ownership(&self.resolver, identity, ctx) {
            return decision;
        }

        match self.resolver.tier(identity) {
            RoleTier::TopAdmin => Decision::Allow(AllowReason::TopAdmin),
            RoleTier::MidAdmin => {
                if ctx.resource_id.as_deref().is_some_and(|id| identity.manages(id)) {
                    Decision::Allow(AllowReason::ManagedUser)
                } else if ctx.action.is_read_only() {
                    Decision::Allow(AllowReason::ReadOnlyAccess)
                } else {
                    Decision::Deny(DenyReason::NotPermitted)
                }
            }
            RoleTier::Plain => Decision::Deny(DenyReason::NotPermitted),
        }
    }
}

/// Permission gate, then owner, then top admin. Nothing else is allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipPolicy {
    resolver: PermissionResolver,
}

impl OwnershipPolicy {
    pub fn new(resolver: PermissionResolver) -> Self {
        Self { resolver }
    }
}

impl ResourcePolicy for OwnershipPolicy {
    fn name(&self) -> &'static str {
        "ownership"
    }

    fn evaluate(&self, identity: &Identity, ctx: &PermissionContext) -> Decision {
        if let Some(decision) = gate_and_ownership(&self.resolver, identity, ctx) {
            return decision;
        }

        match self.resolver.tier(identity) {
            RoleTier::TopAdmin => Decision::Allow(AllowReason::TopAdmin),
            RoleTier::MidAdmin | RoleTier::Plain => Decision::Deny(DenyReason::NotPermitted),
        }
    }
}

/// Steps shared by every policy. `None` means "keep evaluating".
fn gate_and_ownership(
    resolver: &PermissionResolver,
    identity: &Identity,
    ctx: &PermissionContext,
) -> Option<Decision> {
    if !resolver.has_permission(identity, ctx.action) {
        return Some(Decision::Deny(DenyReason::MissingPermission(ctx.action)));
    }
    if ctx.owner_id.as_deref().is_some_and(|owner| identity.is_self(owner)) {
        return Some(Decision::Allow(AllowReason::Owner));
    }
    None
}

/// Whether `identity` may administer the user `target_user_id`.
///
/// Plain identities manage only their own internal user id; one without a
/// user id (a machine client) manages nobody.
pub fn can_manage_user(resolver: &PermissionResolver, identity: &Identity, target_user_id: &str) -> bool {
    match resolver.tier(identity) {
        RoleTier::TopAdmin => true,
        RoleTier::MidAdmin => identity.manages(target_user_id),
        RoleTier::Plain => identity.user_id.as_ref().is_some_and(|user_id| user_id == target_user_id),
    }
}
