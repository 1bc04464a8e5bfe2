//! Role → permission tables.
//!
//! Two catalogs ship with the crate and are kept apart on purpose: services
//! that have a system-administrator tier use [`Catalog::extended`], services
//! with only admin/user use [`Catalog::basic`]. Both are built once and never
//! mutated.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use thiserror::Error;

use crate::{Permission, Role, RoleTier};

/// One role's row in a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEntry {
    pub role: Role,
    /// Ordering level; higher levels must hold a superset of lower levels'
    /// permissions. Level 0 is reserved for unknown roles.
    pub level: u8,
    pub tier: RoleTier,
    pub description: &'static str,
    pub permissions: BTreeSet<Permission>,
}

impl RoleEntry {
    pub fn new(
        role: Role,
        level: u8,
        tier: RoleTier,
        description: &'static str,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Self {
        Self {
            role,
            level,
            tier,
            description,
            permissions: permissions.into_iter().collect(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("role '{0}' is listed more than once")]
    DuplicateRole(String),

    #[error("role '{0}' uses level 0, which is reserved for unknown roles")]
    ZeroLevel(String),

    #[error("roles '{first}' and '{second}' share level {level}")]
    DuplicateLevel {
        first: String,
        second: String,
        level: u8,
    },

    #[error("role '{higher}' is missing permissions held by lower role '{lower}': {}", .missing.join(", "))]
    NotMonotonic {
        higher: String,
        lower: String,
        missing: Vec<String>,
    },

    #[error("role '{higher}' has a lower administrative tier than lower-level role '{lower}'")]
    TierInversion { higher: String, lower: String },
}

/// Immutable, versioned role → permission table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    version: &'static str,
    entries: Vec<RoleEntry>,
}

static EXTENDED: LazyLock<Catalog> = LazyLock::new(|| checked(build_extended()));
static BASIC: LazyLock<Catalog> = LazyLock::new(|| checked(build_basic()));

fn checked(catalog: Catalog) -> Catalog {
    if let Err(error) = catalog.validate() {
        tracing::error!(version = catalog.version, %error, "role catalog failed validation");
    }
    catalog
}

impl Catalog {
    pub fn new(version: &'static str, entries: Vec<RoleEntry>) -> Self {
        Self { version, entries }
    }

    /// `system_admin` > `admin` > `user`, with address management.
    pub fn extended() -> &'static Catalog {
        &EXTENDED
    }

    /// `admin` > `user`; `admin` is the top administrative tier.
    pub fn basic() -> &'static Catalog {
        &BASIC
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn entries(&self) -> &[RoleEntry] {
        &self.entries
    }

    pub fn entry(&self, role: &Role) -> Option<&RoleEntry> {
        self.entries.iter().find(|e| &e.role == role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.entries.iter().map(|e| &e.role)
    }

    /// Check the structural invariants: unique roles, unique non-zero levels,
    /// and permission sets (and tiers) that never shrink as levels rise.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.level == 0 {
                return Err(CatalogError::ZeroLevel(entry.role.to_string()));
            }

            for other in &self.entries[i + 1..] {
                if other.role == entry.role {
                    return Err(CatalogError::DuplicateRole(entry.role.to_string()));
                }
                if other.level == entry.level {
                    return Err(CatalogError::DuplicateLevel {
                        first: entry.role.to_string(),
                        second: other.role.to_string(),
                        level: entry.level,
                    });
                }
            }
        }

        for higher in &self.entries {
            for lower in self.entries.iter().filter(|e| e.level < higher.level) {
                let missing: Vec<String> = lower
                    .permissions
                    .difference(&higher.permissions)
                    .map(|p| p.as_str().to_string())
                    .collect();

                if !missing.is_empty() {
                    return Err(CatalogError::NotMonotonic {
                        higher: higher.role.to_string(),
                        lower: lower.role.to_string(),
                        missing,
                    });
                }
                if higher.tier < lower.tier {
                    return Err(CatalogError::TierInversion {
                        higher: higher.role.to_string(),
                        lower: lower.role.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

const SELF_SERVICE: [Permission; 4] = [
    Permission::ReadProfile,
    Permission::UpdateProfile,
    Permission::ReadAddress,
    Permission::UpdateAddress,
];

fn build_extended() -> Catalog {
    Catalog::new(
        "extended/v1",
        vec![
            RoleEntry::new(
                Role::SYSTEM_ADMIN,
                3,
                RoleTier::TopAdmin,
                "System administrator with every permission",
                Permission::ALL,
            ),
            RoleEntry::new(
                Role::ADMIN,
                2,
                RoleTier::MidAdmin,
                "Administrator of managed users and address records",
                [
                    Permission::CreateUser,
                    Permission::ReadUser,
                    Permission::UpdateUser,
                    Permission::ListUsers,
                    Permission::ReadProfile,
                    Permission::UpdateProfile,
                    Permission::CreateAddress,
                    Permission::ReadAddress,
                    Permission::UpdateAddress,
                    Permission::DeleteAddress,
                    Permission::ListAddresses,
                ],
            ),
            RoleEntry::new(
                Role::USER,
                1,
                RoleTier::Plain,
                "Regular user managing its own profile",
                SELF_SERVICE,
            ),
        ],
    )
}

fn build_basic() -> Catalog {
    Catalog::new(
        "basic/v1",
        vec![
            RoleEntry::new(
                Role::ADMIN,
                2,
                RoleTier::TopAdmin,
                "Administrator with every permission",
                Permission::ALL,
            ),
            RoleEntry::new(
                Role::USER,
                1,
                RoleTier::Plain,
                "Regular user managing its own profile",
                SELF_SERVICE,
            ),
        ],
    )
}
