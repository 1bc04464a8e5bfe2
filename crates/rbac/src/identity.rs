//! Normalized per-request identity.

use serde::{Deserialize, Serialize};

use gatekit_core::{SubjectId, UserId};

use crate::Role;

/// Email resolved from a token.
///
/// `NoEmail` is an explicit marker: the token was inspected and carried no
/// email anywhere we look.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Email {
    Address(String),
    NoEmail,
}

impl Email {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Email::Address(address) => Some(address),
            Email::NoEmail => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Email::Address(_))
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Email::Address(address) => f.write_str(address),
            Email::NoEmail => f.write_str("<no email>"),
        }
    }
}

/// Who is making the call, derived from an already verified credential.
///
/// Built once per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable external subject (`sub` claim).
    pub subject: SubjectId,
    /// Internal user id; absent for machine clients.
    pub user_id: Option<UserId>,
    pub email: Email,
    pub roles: Vec<Role>,
    /// Other users this identity may administer (supplied by the directory).
    pub managed_users: Vec<UserId>,
    /// OAuth scopes; only machine-to-machine tokens carry them.
    pub scopes: Vec<String>,
    pub is_m2m: bool,
}

impl Identity {
    /// A human identity with no roles yet.
    pub fn human(subject: impl Into<SubjectId>) -> Self {
        Self {
            subject: subject.into(),
            user_id: None,
            email: Email::NoEmail,
            roles: Vec::new(),
            managed_users: Vec::new(),
            scopes: Vec::new(),
            is_m2m: false,
        }
    }

    /// A machine-to-machine identity with no roles yet.
    pub fn machine(subject: impl Into<SubjectId>) -> Self {
        Self {
            is_m2m: true,
            ..Self::human(subject)
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_email(mut self, email: Email) -> Self {
        self.email = email;
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn with_managed_users<I, U>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        self.managed_users = users.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// Whether `user_id` is in this identity's managed-user set.
    pub fn manages(&self, user_id: &str) -> bool {
        self.managed_users.iter().any(|u| u == user_id)
    }

    /// Whether `id` refers to this identity.
    ///
    /// Matches the internal user id; identities without one (machine
    /// clients) match on their subject instead.
    pub fn is_self(&self, id: &str) -> bool {
        match &self.user_id {
            Some(user_id) => user_id == id,
            None => self.subject == id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_match_prefers_user_id() {
        let human = Identity::human("auth0|abc").with_user_id("u1");
        assert!(human.is_self("u1"));
        assert!(!human.is_self("auth0|abc"));

        let machine = Identity::machine("client@clients");
        assert!(machine.is_self("client@clients"));
        assert!(machine.is_m2m);
    }

    #[test]
    fn managed_user_lookup() {
        let admin = Identity::human("auth0|admin")
            .with_roles([Role::ADMIN])
            .with_managed_users(["u1", "u2"]);

        assert!(admin.manages("u2"));
        assert!(!admin.manages("u3"));
        assert!(admin.has_role(&Role::ADMIN));
    }

    #[test]
    fn email_marker_serializes_distinctly() {
        let missing = serde_json::to_value(Email::NoEmail).unwrap();
        let present = serde_json::to_value(Email::Address("a@example.com".into())).unwrap();

        assert_eq!(missing, serde_json::json!("no_email"));
        assert_eq!(present, serde_json::json!({ "address": "a@example.com" }));
        assert_eq!(Email::NoEmail.as_str(), None);
    }
}
