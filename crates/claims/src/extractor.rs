//! Verified claims → [`Identity`].

use gatekit_core::{SubjectId, UserId};
use gatekit_rbac::{Email, Identity, Role};

use crate::{AuthConfig, ClaimNamespace, ClaimsError, VerifiedClaims};

/// Grant type the identity provider stamps on client-credentials tokens.
pub const CLIENT_CREDENTIALS: &str = "client-credentials";

/// Scopes that make a machine client a user administrator.
pub const USER_ADMIN_SCOPES: [&str; 2] = ["read:users", "write:users"];

/// Which branch a claim set takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Machine,
    Human,
}

impl TokenKind {
    pub fn of(claims: &VerifiedClaims) -> Self {
        if claims.grant_type() == Some(CLIENT_CREDENTIALS) {
            TokenKind::Machine
        } else {
            TokenKind::Human
        }
    }
}

/// Maps a verified claim set into the identity used by authorization.
///
/// Missing optional claims never fail extraction; they become empty lists or
/// explicit absence markers. Only a claim set without a subject is an error.
#[derive(Debug, Clone)]
pub struct ClaimsExtractor {
    namespace: ClaimNamespace,
    expected_audiences: Vec<String>,
    expected_issuer: String,
}

impl ClaimsExtractor {
    pub fn new(config: &AuthConfig) -> Self {
        tracing::info!(
            audiences = ?config.expected_audiences(),
            issuer = %config.issuer_url,
            namespace = %config.namespace,
            "claims extractor configured"
        );
        Self {
            namespace: ClaimNamespace::new(config.namespace.as_str()),
            expected_audiences: config.expected_audiences(),
            expected_issuer: config.issuer_url.clone(),
        }
    }

    pub fn namespace(&self) -> &ClaimNamespace {
        &self.namespace
    }

    pub fn extract(&self, claims: &VerifiedClaims) -> Result<Identity, ClaimsError> {
        let subject = claims.subject().ok_or(ClaimsError::MissingSubject)?;
        self.report_mismatches(claims);

        let identity = match TokenKind::of(claims) {
            TokenKind::Machine => machine_identity(subject, claims),
            TokenKind::Human => self.human_identity(subject, claims),
        };
        Ok(identity)
    }

    fn human_identity(&self, subject: &str, claims: &VerifiedClaims) -> Identity {
        let email = claims
            .email()
            .or_else(|| self.namespace.email(claims))
            .map_or(Email::NoEmail, |address| Email::Address(address.to_string()));
        let roles = self.namespace.roles(claims).into_iter().map(Role::from);
        let managed_users = self.namespace.managed_users(claims).into_iter().map(UserId::from);

        let mut identity = Identity::human(subject)
            .with_email(email)
            .with_roles(roles)
            .with_managed_users(managed_users);

        match self.namespace.user_id(claims) {
            Some(user_id) => identity.user_id = Some(UserId::from(user_id)),
            None => tracing::warn!(
                subject,
                expected_claim = self.namespace.user_id_claim(),
                available = %claims.names().collect::<Vec<_>>().join(", "),
                "user id claim missing from token"
            ),
        }

        tracing::debug!(
            subject,
            email = %identity.email,
            roles = identity.roles.len(),
            "user token accepted"
        );
        identity
    }

    /// Verification already happened upstream; a mismatch here means the
    /// configuration and the verifier disagree, which is worth a warning.
    fn report_mismatches(&self, claims: &VerifiedClaims) {
        let audiences = claims.audiences();
        if !audiences.is_empty()
            && !self.expected_audiences.iter().any(|expected| audiences.contains(&expected.as_str()))
        {
            tracing::warn!(
                expected = ?self.expected_audiences,
                received = ?audiences,
                "token audience does not match configuration"
            );
        }

        if let Some(issuer) = claims.issuer() {
            if issuer != self.expected_issuer {
                tracing::warn!(expected = %self.expected_issuer, received = issuer, "token issuer does not match configuration");
            }
        }
    }
}

fn machine_identity(subject: &str, claims: &VerifiedClaims) -> Identity {
    let mut scopes: Vec<&str> = Vec::new();
    for scope in claims.scope().unwrap_or_default().split_whitespace() {
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }
    }

    let roles = if scopes.iter().any(|s| USER_ADMIN_SCOPES.contains(s)) {
        vec![Role::ADMIN]
    } else {
        Vec::new()
    };
    let email = claims
        .email()
        .map_or(Email::NoEmail, |address| Email::Address(address.to_string()));

    tracing::debug!(client = subject, scopes = scopes.len(), "machine token accepted");

    Identity::machine(SubjectId::from(subject))
        .with_email(email)
        .with_roles(roles)
        .with_scopes(scopes)
}
