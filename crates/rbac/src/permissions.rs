use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of resource a permission gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    User,
    Profile,
    Address,
    System,
    Audit,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::User => "user",
            ResourceType::Profile => "profile",
            ResourceType::Address => "address",
            ResourceType::System => "system",
            ResourceType::Audit => "audit",
        }
    }
}

impl core::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission identifier.
///
/// Permissions are atomic and namespaced by resource (`"users:create"`).
/// There are no wildcards: a role holds exactly the permissions its catalog
/// entry lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "users:create")]
    CreateUser,
    #[serde(rename = "users:read")]
    ReadUser,
    #[serde(rename = "users:update")]
    UpdateUser,
    #[serde(rename = "users:delete")]
    DeleteUser,
    #[serde(rename = "users:list")]
    ListUsers,

    #[serde(rename = "profile:read")]
    ReadProfile,
    #[serde(rename = "profile:update")]
    UpdateProfile,

    #[serde(rename = "system:manage")]
    ManageSystem,
    #[serde(rename = "audit:read")]
    ViewAuditLogs,

    #[serde(rename = "addresses:create")]
    CreateAddress,
    #[serde(rename = "addresses:read")]
    ReadAddress,
    #[serde(rename = "addresses:update")]
    UpdateAddress,
    #[serde(rename = "addresses:delete")]
    DeleteAddress,
    #[serde(rename = "addresses:list")]
    ListAddresses,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermission(pub String);

impl Permission {
    pub const ALL: [Permission; 14] = [
        Permission::CreateUser,
        Permission::ReadUser,
        Permission::UpdateUser,
        Permission::DeleteUser,
        Permission::ListUsers,
        Permission::ReadProfile,
        Permission::UpdateProfile,
        Permission::ManageSystem,
        Permission::ViewAuditLogs,
        Permission::CreateAddress,
        Permission::ReadAddress,
        Permission::UpdateAddress,
        Permission::DeleteAddress,
        Permission::ListAddresses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateUser => "users:create",
            Permission::ReadUser => "users:read",
            Permission::UpdateUser => "users:update",
            Permission::DeleteUser => "users:delete",
            Permission::ListUsers => "users:list",
            Permission::ReadProfile => "profile:read",
            Permission::UpdateProfile => "profile:update",
            Permission::ManageSystem => "system:manage",
            Permission::ViewAuditLogs => "audit:read",
            Permission::CreateAddress => "addresses:create",
            Permission::ReadAddress => "addresses:read",
            Permission::UpdateAddress => "addresses:update",
            Permission::DeleteAddress => "addresses:delete",
            Permission::ListAddresses => "addresses:list",
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            Permission::CreateUser
            | Permission::ReadUser
            | Permission::UpdateUser
            | Permission::DeleteUser
            | Permission::ListUsers => ResourceType::User,
            Permission::ReadProfile | Permission::UpdateProfile => ResourceType::Profile,
            Permission::ManageSystem => ResourceType::System,
            Permission::ViewAuditLogs => ResourceType::Audit,
            Permission::CreateAddress
            | Permission::ReadAddress
            | Permission::UpdateAddress
            | Permission::DeleteAddress
            | Permission::ListAddresses => ResourceType::Address,
        }
    }

    /// The part after the namespace separator (`"create"` for `users:create`).
    pub fn action(&self) -> &'static str {
        let s = self.as_str();
        s.split_once(':').map_or(s, |(_, action)| action)
    }

    /// The namespace prefix (`"users"` for `users:create`).
    pub fn category(&self) -> &'static str {
        let s = self.as_str();
        s.split_once(':').map_or(s, |(category, _)| category)
    }

    /// Reads and listings that a mid-tier administrator may perform on
    /// resources outside its managed set.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Permission::ReadUser
                | Permission::ReadProfile
                | Permission::ReadAddress
                | Permission::ListUsers
                | Permission::ListAddresses
                | Permission::ViewAuditLogs
        )
    }

    pub fn description(&self) -> String {
        let verb = match self.action() {
            "read" => "View",
            "list" => "List all",
            "create" => "Create new",
            "update" => "Update",
            "delete" => "Delete",
            "manage" => "Manage",
            other => other,
        };
        format!("{} {} resources", verb, self.resource_type())
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for permission in Permission::ALL {
            assert_eq!(permission.as_str().parse::<Permission>(), Ok(permission));
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Permission::ViewAuditLogs).unwrap();
        assert_eq!(json, "\"audit:read\"");
        let parsed: Permission = serde_json::from_str("\"addresses:list\"").unwrap();
        assert_eq!(parsed, Permission::ListAddresses);
    }

    #[test]
    fn unknown_and_wildcard_strings_are_rejected() {
        assert!("users:*".parse::<Permission>().is_err());
        assert!("*".parse::<Permission>().is_err());
        assert_eq!(
            "users:archive".parse::<Permission>(),
            Err(UnknownPermission("users:archive".to_string()))
        );
    }

    #[test]
    fn read_only_set_is_reads_lists_and_audit() {
        let read_only: Vec<_> = Permission::ALL.into_iter().filter(Permission::is_read_only).collect();
        assert_eq!(
            read_only,
            vec![
                Permission::ReadUser,
                Permission::ListUsers,
                Permission::ReadProfile,
                Permission::ViewAuditLogs,
                Permission::ReadAddress,
                Permission::ListAddresses,
            ]
        );
    }

    #[test]
    fn resource_and_category_follow_namespace() {
        assert_eq!(Permission::DeleteAddress.resource_type(), ResourceType::Address);
        assert_eq!(Permission::DeleteAddress.category(), "addresses");
        assert_eq!(Permission::DeleteAddress.action(), "delete");
        assert_eq!(Permission::ViewAuditLogs.resource_type(), ResourceType::Audit);
        assert_eq!(Permission::ListUsers.description(), "List all user resources");
    }
}
