use serde::{Deserialize, Serialize};

/// Administrative tier of a role.
///
/// Resource rules only ever ask "which tier is this identity in", so the
/// special-casing of administrator roles lives in the catalog, not in each
/// rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
    /// No administrative reach beyond the identity itself.
    Plain,
    /// Administers the users listed in the identity's managed-user set.
    MidAdmin,
    /// Administers everything.
    TopAdmin,
}
