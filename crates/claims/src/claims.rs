use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use gatekit_core::DomainError;

/// Claim set of a token whose signature, issuer and audience were already
/// verified upstream.
///
/// Stored as the raw JSON object so that absent or oddly typed optional
/// claims read as "absent" instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifiedClaims(Map<String, Value>);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("claim set is not a JSON object")]
    NotAnObject,

    /// No `sub` claim, or one that is not a string or is only whitespace.
    #[error("claim set has no subject")]
    MissingSubject,
}

impl From<ClaimsError> for DomainError {
    fn from(value: ClaimsError) -> Self {
        DomainError::unauthenticated(value.to_string())
    }
}

impl VerifiedClaims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    pub fn from_json(value: Value) -> Result<Self, ClaimsError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ClaimsError::NotAnObject),
        }
    }

    /// Set a claim (mostly useful for building claim sets in tests).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The claim if it is a string.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// The claim as a list of strings; anything but an array reads as empty.
    /// Non-string entries are stringified.
    pub fn string_array(&self, name: &str) -> Vec<String> {
        match self.0.get(name) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Subject (`sub`).
    ///
    /// A whitespace-only subject identifies nobody, so it reads as absent
    /// and extraction fails the same way as for a missing claim.
    pub fn subject(&self) -> Option<&str> {
        self.string("sub").filter(|s| !s.trim().is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        self.string("email")
    }

    /// Space-delimited OAuth scope string (`scope`).
    pub fn scope(&self) -> Option<&str> {
        self.string("scope")
    }

    /// Grant type (`gty`), set by the identity provider for M2M tokens.
    pub fn grant_type(&self) -> Option<&str> {
        self.string("gty")
    }

    pub fn issuer(&self) -> Option<&str> {
        self.string("iss")
    }

    pub fn authorized_party(&self) -> Option<&str> {
        self.string("azp")
    }

    /// Audiences (`aud`), which may be a single string or an array.
    pub fn audiences(&self) -> Vec<&str> {
        match self.0.get("aud") {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("iat")
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("exp")
    }

    fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.0
            .get(name)
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

impl From<TokenValidationError> for DomainError {
    fn from(value: TokenValidationError) -> Self {
        DomainError::unauthenticated(value.to_string())
    }
}

/// Deterministically validate the `iat`/`exp` window of a claim set.
///
/// Note: this validates the *claims* only. Signature verification / decoding is
/// intentionally outside this crate. Absent timestamps are not checked.
pub fn validate_time_window(claims: &VerifiedClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let issued_at = claims.issued_at();
    let expires_at = claims.expires_at();

    if let (Some(iat), Some(exp)) = (issued_at, expires_at) {
        if exp <= iat {
            return Err(TokenValidationError::InvalidTimeWindow);
        }
    }
    if issued_at.is_some_and(|iat| now < iat) {
        return Err(TokenValidationError::NotYetValid);
    }
    if expires_at.is_some_and(|exp| now >= exp) {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn from_json_requires_an_object() {
        assert_eq!(VerifiedClaims::from_json(json!(["sub"])), Err(ClaimsError::NotAnObject));
        assert!(VerifiedClaims::from_json(json!({})).is_ok());
    }

    #[test]
    fn mistyped_claims_read_as_absent() {
        let claims = VerifiedClaims::from_json(json!({
            "sub": 42,
            "email": ["a@example.com"],
            "scope": null,
            "roles": "admin",
        }))
        .unwrap();

        assert_eq!(claims.subject(), None);
        assert_eq!(claims.email(), None);
        assert_eq!(claims.scope(), None);
        assert!(claims.string_array("roles").is_empty());
    }

    #[test]
    fn array_entries_are_stringified() {
        let claims = VerifiedClaims::default().with("ids", json!(["u1", 2, true]));
        assert_eq!(claims.string_array("ids"), vec!["u1", "2", "true"]);
    }

    #[test]
    fn audience_accepts_string_or_array() {
        let single = VerifiedClaims::default().with("aud", "https://api");
        let many = VerifiedClaims::default().with("aud", json!(["https://api", "https://idp/userinfo"]));

        assert_eq!(single.audiences(), vec!["https://api"]);
        assert_eq!(many.audiences(), vec!["https://api", "https://idp/userinfo"]);
        assert!(VerifiedClaims::default().audiences().is_empty());
    }

    #[test]
    fn blank_subject_is_absent() {
        assert_eq!(VerifiedClaims::default().with("sub", "  ").subject(), None);
    }

    #[test]
    fn claim_failures_map_to_unauthenticated() {
        let missing: DomainError = ClaimsError::MissingSubject.into();
        assert_eq!(missing.status_code(), 401);
        assert_eq!(missing, DomainError::unauthenticated("claim set has no subject"));

        let expired: DomainError = TokenValidationError::Expired.into();
        assert_eq!(expired.code(), "UNAUTHENTICATED");
    }

    #[test]
    fn time_window_checks() {
        let claims = VerifiedClaims::default().with("iat", 1_000).with("exp", 2_000);

        assert_eq!(validate_time_window(&claims, at(1_500)), Ok(()));
        assert_eq!(validate_time_window(&claims, at(999)), Err(TokenValidationError::NotYetValid));
        assert_eq!(validate_time_window(&claims, at(2_000)), Err(TokenValidationError::Expired));

        let inverted = VerifiedClaims::default().with("iat", 2_000).with("exp", 2_000);
        assert_eq!(
            validate_time_window(&inverted, at(1_500)),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn missing_timestamps_are_not_checked() {
        let now = Utc::now();
        assert_eq!(validate_time_window(&VerifiedClaims::default(), now), Ok(()));

        let expired = VerifiedClaims::default().with("exp", (now - Duration::minutes(1)).timestamp());
        assert_eq!(validate_time_window(&expired, now), Err(TokenValidationError::Expired));
    }
}
