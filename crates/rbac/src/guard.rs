//! Request guards.
//!
//! These run at the edge of a handler with whatever identity the
//! authentication layer attached (possibly none). No identity always means
//! deny.

use thiserror::Error;

use gatekit_core::{DomainError, SubjectId};

use crate::resource::{AllowReason, Decision, DenyReason, PermissionContext, ResourcePolicy};
use crate::roles::join_roles;
use crate::{Identity, Permission, PermissionResolver, ResourceType, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no authenticated identity")]
    MissingIdentity,

    #[error("forbidden: {subject} holds none of the roles [{}]", join_roles(.required))]
    MissingRole { subject: SubjectId, required: Vec<Role> },

    #[error("forbidden: {subject} is missing permission '{permission}'")]
    MissingPermission { subject: SubjectId, permission: Permission },

    #[error("forbidden: {subject} is below the level of role '{required}'")]
    InsufficientRoleLevel { subject: SubjectId, required: Role },

    #[error("forbidden: {subject} may not {action} on {resource_type}")]
    ResourceDenied {
        subject: SubjectId,
        action: Permission,
        resource_type: ResourceType,
        reason: DenyReason,
    },
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::MissingIdentity => DomainError::permission_denied("any", "anonymous"),
            AuthzError::MissingRole { subject, required } => {
                DomainError::permission_denied(format!("role:{}", join_roles(&required)), subject)
            }
            AuthzError::MissingPermission { subject, permission } => {
                DomainError::permission_denied(permission.as_str(), subject)
            }
            AuthzError::InsufficientRoleLevel { subject, required } => {
                DomainError::permission_denied(format!("role-level:{required}"), subject)
            }
            AuthzError::ResourceDenied { subject, action, .. } => {
                DomainError::permission_denied(action.as_str(), subject)
            }
        }
    }
}

fn present(identity: Option<&Identity>) -> Result<&Identity, AuthzError> {
    identity.ok_or_else(|| {
        tracing::debug!("authorization denied: no identity attached");
        AuthzError::MissingIdentity
    })
}

/// Allow if the identity holds at least one of `required`.
///
/// An empty requirement list matches no role, so it denies every caller.
pub fn require_any_role(identity: Option<&Identity>, required: &[Role]) -> Result<(), AuthzError> {
    let identity = present(identity)?;
    if required.iter().any(|role| identity.has_role(role)) {
        return Ok(());
    }

    tracing::debug!(subject = %identity.subject, required = %join_roles(required), "role check denied");
    Err(AuthzError::MissingRole {
        subject: identity.subject.clone(),
        required: required.to_vec(),
    })
}

/// Allow if the identity holds every permission in `required`.
///
/// An empty requirement list allows any identity, but never an anonymous
/// caller.
pub fn require_permissions(
    resolver: &PermissionResolver,
    identity: Option<&Identity>,
    required: &[Permission],
) -> Result<(), AuthzError> {
    let identity = present(identity)?;
    let granted = resolver.permissions_for_identity(identity);
    match required.iter().find(|p| !granted.contains(*p)) {
        None => Ok(()),
        Some(missing) => {
            tracing::debug!(subject = %identity.subject, permission = %missing, "permission check denied");
            Err(AuthzError::MissingPermission {
                subject: identity.subject.clone(),
                permission: *missing,
            })
        }
    }
}

pub fn require_role_level(
    resolver: &PermissionResolver,
    identity: Option<&Identity>,
    required: &Role,
) -> Result<(), AuthzError> {
    let identity = present(identity)?;
    if resolver.has_role_level(identity, required) {
        return Ok(());
    }

    tracing::debug!(subject = %identity.subject, required = %required, "role level check denied");
    Err(AuthzError::InsufficientRoleLevel {
        subject: identity.subject.clone(),
        required: required.clone(),
    })
}

/// Evaluate `policy` and turn a deny into an error carrying the reason.
pub fn authorize_resource<P: ResourcePolicy + ?Sized>(
    policy: &P,
    identity: Option<&Identity>,
    ctx: &PermissionContext,
) -> Result<AllowReason, AuthzError> {
    let identity = present(identity)?;
    match policy.evaluate(identity, ctx) {
        Decision::Allow(reason) => Ok(reason),
        Decision::Deny(reason) => {
            tracing::debug!(
                subject = %identity.subject,
                policy = policy.name(),
                action = %ctx.action,
                resource_type = %ctx.resource_type,
                ?reason,
                "resource access denied"
            );
            Err(AuthzError::ResourceDenied {
                subject: identity.subject.clone(),
                action: ctx.action,
                resource_type: ctx.resource_type,
                reason,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManagedHierarchyPolicy;

    fn user() -> Identity {
        Identity::human("auth0|u1").with_user_id("u1").with_roles([Role::USER])
    }

    #[test]
    fn missing_identity_is_denied() {
        let resolver = PermissionResolver::default();

        assert_eq!(require_any_role(None, &[Role::USER]), Err(AuthzError::MissingIdentity));
        assert_eq!(
            require_permissions(&resolver, None, &[Permission::ReadProfile]),
            Err(AuthzError::MissingIdentity)
        );
        assert_eq!(
            require_role_level(&resolver, None, &Role::USER),
            Err(AuthzError::MissingIdentity)
        );
        assert_eq!(
            authorize_resource(
                &ManagedHierarchyPolicy::default(),
                None,
                &PermissionContext::new(Permission::ReadProfile)
            ),
            Err(AuthzError::MissingIdentity)
        );
    }

    #[test]
    fn empty_requirements_never_admit_anonymous_callers() {
        let resolver = PermissionResolver::default();
        let identity = user();

        assert_eq!(require_any_role(None, &[]), Err(AuthzError::MissingIdentity));
        assert_eq!(require_permissions(&resolver, None, &[]), Err(AuthzError::MissingIdentity));

        assert_eq!(
            require_any_role(Some(&identity), &[]),
            Err(AuthzError::MissingRole {
                subject: SubjectId::new("auth0|u1"),
                required: Vec::new(),
            })
        );
        assert_eq!(require_permissions(&resolver, Some(&identity), &[]), Ok(()));
    }

    #[test]
    fn any_role_semantics() {
        let identity = user();
        assert_eq!(require_any_role(Some(&identity), &[Role::ADMIN, Role::USER]), Ok(()));

        let err = require_any_role(Some(&identity), &[Role::ADMIN, Role::SYSTEM_ADMIN]).unwrap_err();
        assert_eq!(err.to_string(), "forbidden: auth0|u1 holds none of the roles [admin, system_admin]");
    }

    #[test]
    fn all_permissions_semantics() {
        let resolver = PermissionResolver::default();
        let identity = user();

        assert_eq!(
            require_permissions(&resolver, Some(&identity), &[Permission::ReadProfile, Permission::UpdateProfile]),
            Ok(())
        );
        assert_eq!(
            require_permissions(&resolver, Some(&identity), &[Permission::ReadProfile, Permission::ListUsers]),
            Err(AuthzError::MissingPermission {
                subject: SubjectId::new("auth0|u1"),
                permission: Permission::ListUsers,
            })
        );
    }

    #[test]
    fn resource_denial_carries_reason_and_maps_to_forbidden() {
        let ctx = PermissionContext::new(Permission::UpdateProfile).owned_by("u2");
        let err = authorize_resource(&ManagedHierarchyPolicy::default(), Some(&user()), &ctx).unwrap_err();

        assert!(matches!(
            err,
            AuthzError::ResourceDenied { reason: DenyReason::NotPermitted, .. }
        ));

        let domain: DomainError = err.into();
        assert_eq!(domain.status_code(), 403);
        assert_eq!(domain.code(), "USER_PERMISSION_DENIED");
    }

    #[test]
    fn resource_allow_returns_reason() {
        let ctx = PermissionContext::new(Permission::UpdateProfile).owned_by("u1");
        assert_eq!(
            authorize_resource(&ManagedHierarchyPolicy::default(), Some(&user()), &ctx),
            Ok(AllowReason::Owner)
        );
    }

    #[test]
    fn missing_identity_maps_to_forbidden_not_unauthenticated() {
        let domain: DomainError = AuthzError::MissingIdentity.into();
        assert_eq!(domain.status_code(), 403);
    }
}
