use serde::Serialize;

use gatekit_core::SubjectId;

use crate::{Identity, Permission, PermissionResolver};

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of a permission check.
///
/// Answers "why was this allowed/denied?" for logs, admin screens and support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub required_permission: Permission,
    pub granted: bool,
    /// Human-readable reason for the decision.
    pub reason: String,
    pub subject: SubjectId,
    pub catalog_version: &'static str,
    pub roles: Vec<String>,
    /// Roles the catalog doesn't know (they grant nothing).
    pub unknown_roles: Vec<String>,
    pub effective_permissions: Vec<Permission>,
    /// Catalog roles that would grant the permission, lowest level first.
    pub granting_roles: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Explain whether `identity` holds `required` and how it could get it.
pub fn explain(resolver: &PermissionResolver, identity: &Identity, required: Permission) -> Explanation {
    let catalog = resolver.catalog();
    let effective = resolver.permissions_for_identity(identity);
    let granted = effective.contains(&required);

    let unknown_roles: Vec<String> = identity
        .roles
        .iter()
        .filter(|role| catalog.entry(role).is_none())
        .map(|role| role.to_string())
        .collect();

    let mut granting: Vec<_> = catalog
        .entries()
        .iter()
        .filter(|entry| entry.permissions.contains(&required))
        .collect();
    granting.sort_by_key(|entry| entry.level);
    let granting_roles: Vec<String> = granting.iter().map(|entry| entry.role.to_string()).collect();

    let (reason, suggestions) = if granted {
        let via: Vec<String> = identity
            .roles
            .iter()
            .filter(|role| granting_roles.iter().any(|g| g == role.as_str()))
            .map(|role| role.to_string())
            .collect();
        (format!("Permission '{required}' granted by role(s) [{}]", via.join(", ")), Vec::new())
    } else {
        let mut suggestions = Vec::new();
        match granting_roles.first() {
            Some(lowest) => suggestions.push(format!(
                "Assign the '{lowest}' role (lowest role granting '{required}')"
            )),
            None => suggestions.push(format!(
                "No role in catalog '{}' grants '{required}'; the catalog must change",
                catalog.version()
            )),
        }
        if !unknown_roles.is_empty() {
            suggestions.push(format!(
                "Roles [{}] are not defined in catalog '{}' and grant nothing",
                unknown_roles.join(", "),
                catalog.version()
            ));
        }
        (
            format!(
                "Permission '{required}' is not granted by any held role. Current permissions: [{}]",
                effective.iter().map(Permission::as_str).collect::<Vec<_>>().join(", ")
            ),
            suggestions,
        )
    };

    Explanation {
        required_permission: required,
        granted,
        reason,
        subject: identity.subject.clone(),
        catalog_version: catalog.version(),
        roles: identity.roles.iter().map(|r| r.to_string()).collect(),
        unknown_roles,
        effective_permissions: effective.into_iter().collect(),
        granting_roles,
        suggestions,
    }
}
