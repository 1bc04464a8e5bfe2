//! Typed accessors for the provider's namespaced custom claims.

use crate::VerifiedClaims;

/// Custom claims live under `<namespace>/<name>`. Each accessor reads one
/// specific claim with its expected type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimNamespace {
    prefix: String,
    email: String,
    roles: String,
    managed_users: String,
    user_id: String,
}

impl ClaimNamespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim_end_matches('/').to_string();
        Self {
            email: format!("{prefix}/email"),
            roles: format!("{prefix}/roles"),
            managed_users: format!("{prefix}/managed_users"),
            user_id: format!("{prefix}/user_id"),
            prefix,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn user_id_claim(&self) -> &str {
        &self.user_id
    }

    pub fn email<'c>(&self, claims: &'c VerifiedClaims) -> Option<&'c str> {
        claims.string(&self.email)
    }

    pub fn roles(&self, claims: &VerifiedClaims) -> Vec<String> {
        claims.string_array(&self.roles)
    }

    pub fn managed_users(&self, claims: &VerifiedClaims) -> Vec<String> {
        claims.string_array(&self.managed_users)
    }

    pub fn user_id<'c>(&self, claims: &'c VerifiedClaims) -> Option<&'c str> {
        claims.string(&self.user_id)
    }
}
