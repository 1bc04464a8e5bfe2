use serde::Serialize;

use crate::{Catalog, Permission, RoleTier};

/// Role definition with its granted permissions (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    pub name: String,
    pub level: u8,
    pub tier: RoleTier,
    pub description: String,
    pub permissions: Vec<Permission>,
}

/// Permission definition (for audit/display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionDefinition {
    pub name: Permission,
    pub description: String,
    pub category: String,
    pub read_only: bool,
}

/// Complete, serializable view of one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRegistry {
    pub version: &'static str,
    /// Highest level first.
    pub roles: Vec<RoleDefinition>,
    /// Every permission granted by at least one role, in declaration order.
    pub permissions: Vec<PermissionDefinition>,
}

impl CatalogRegistry {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut roles: Vec<RoleDefinition> = catalog
            .entries()
            .iter()
            .map(|entry| RoleDefinition {
                name: entry.role.to_string(),
                level: entry.level,
                tier: entry.tier,
                description: entry.description.to_string(),
                permissions: entry.permissions.iter().copied().collect(),
            })
            .collect();
        roles.sort_by(|a, b| b.level.cmp(&a.level));

        let permissions = Permission::ALL
            .into_iter()
            .filter(|p| catalog.entries().iter().any(|e| e.permissions.contains(p)))
            .map(|p| PermissionDefinition {
                name: p,
                description: p.description(),
                category: p.category().to_string(),
                read_only: p.is_read_only(),
            })
            .collect();

        Self {
            version: catalog.version(),
            roles,
            permissions,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_roles_highest_first() {
        let registry = CatalogRegistry::from_catalog(Catalog::extended());
        let names: Vec<_> = registry.roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["system_admin", "admin", "user"]);
        assert_eq!(registry.permissions.len(), Permission::ALL.len());
    }

    #[test]
    fn json_view_carries_categories() {
        let json = CatalogRegistry::from_catalog(Catalog::basic()).to_json();
        assert_eq!(json["version"], "basic/v1");
        assert_eq!(json["roles"][0]["tier"], "top_admin");

        let audit = json["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["name"] == "audit:read")
            .unwrap();
        assert_eq!(audit["category"], "audit");
        assert_eq!(audit["read_only"], true);
    }
}
