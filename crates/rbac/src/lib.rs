//! `gatekit-rbac` — role-based access control over verified identities.
//!
//! Everything here is a pure function of its inputs and an immutable role
//! catalog: no IO, no shared mutable state, nothing async. Transport and
//! storage concerns live with the caller.

pub mod catalog;
pub mod explain;
pub mod guard;
pub mod identity;
pub mod permissions;
pub mod registry;
pub mod resolver;
pub mod resource;
pub mod roles;
pub mod tier;

pub use catalog::{Catalog, CatalogError, RoleEntry};
pub use explain::{Explanation, explain};
pub use guard::{AuthzError, authorize_resource, require_any_role, require_permissions, require_role_level};
pub use identity::{Email, Identity};
pub use permissions::{Permission, ResourceType, UnknownPermission};
pub use registry::CatalogRegistry;
pub use resolver::PermissionResolver;
pub use resource::{
    AllowReason, Decision, DenyReason, ManagedHierarchyPolicy, OwnershipPolicy, PermissionContext,
    ResourcePolicy, can_manage_user,
};
pub use roles::Role;
pub use tier::RoleTier;
