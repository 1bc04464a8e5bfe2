//! Authentication settings shared by every service.

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_AUDIENCE: &str = "https://api.ori-packaging.com";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must not be empty")]
    Empty { name: &'static str },

    #[error("AUTH0_ISSUER_URL must end with '/': {0}")]
    IssuerWithoutTrailingSlash(String),
}

/// Identity provider settings.
///
/// The client secret is deliberately absent: nothing in these crates calls the
/// provider's management API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub domain: String,
    pub audience: String,
    pub issuer_url: String,
    pub client_id: String,
    /// Prefix of the custom claims. Defaults to the fixed API identifier,
    /// not to the configured audience.
    pub namespace: String,
    pub service_audience: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            issuer_url: "https://localhost/".to_string(),
            client_id: "client-id".to_string(),
            namespace: DEFAULT_AUDIENCE.to_string(),
            service_audience: None,
        }
    }
}

impl AuthConfig {
    /// Read `AUTH0_*` variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), with a per-service audience of
    /// `<audience>/<service_name>`.
    pub fn from_env_for_service(service_name: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_env()?.for_service(service_name))
    }

    pub fn for_service(mut self, service_name: &str) -> Self {
        self.service_audience = Some(format!("{}/{}", self.audience.trim_end_matches('/'), service_name));
        self
    }

    /// Build from any key lookup (environment, a map in tests, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let audience = lookup("AUTH0_AUDIENCE").unwrap_or(defaults.audience);
        let config = Self {
            domain: lookup("AUTH0_DOMAIN").unwrap_or(defaults.domain),
            issuer_url: lookup("AUTH0_ISSUER_URL").unwrap_or(defaults.issuer_url),
            client_id: lookup("AUTH0_CLIENT_ID").unwrap_or(defaults.client_id),
            namespace: lookup("AUTH0_NAMESPACE").unwrap_or(defaults.namespace),
            audience,
            service_audience: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("AUTH0_DOMAIN", &self.domain),
            ("AUTH0_AUDIENCE", &self.audience),
            ("AUTH0_ISSUER_URL", &self.issuer_url),
            ("AUTH0_NAMESPACE", &self.namespace),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { name });
            }
        }
        if !self.issuer_url.ends_with('/') {
            return Err(ConfigError::IssuerWithoutTrailingSlash(self.issuer_url.clone()));
        }
        Ok(())
    }

    /// Tokens may carry either the API audience or the provider's userinfo
    /// endpoint; one match is enough.
    pub fn expected_audiences(&self) -> Vec<String> {
        vec![self.audience.clone(), format!("{}userinfo", self.issuer_url)]
    }

    pub fn jwks_uri(&self) -> String {
        format!("{}.well-known/jwks.json", self.issuer_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AuthConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AuthConfig::default());
        assert_eq!(config.namespace, DEFAULT_AUDIENCE);
    }

    #[test]
    fn namespace_ignores_a_custom_audience() {
        let config = AuthConfig::from_lookup(lookup(&[("AUTH0_AUDIENCE", "https://api.test")])).unwrap();
        assert_eq!(config.audience, "https://api.test");
        assert_eq!(config.namespace, DEFAULT_AUDIENCE);

        let config = AuthConfig::from_lookup(lookup(&[
            ("AUTH0_AUDIENCE", "https://api.test"),
            ("AUTH0_NAMESPACE", "https://claims.test"),
        ]))
        .unwrap();
        assert_eq!(config.namespace, "https://claims.test");
    }

    #[test]
    fn service_audience_extends_the_api_audience() {
        let config = AuthConfig::from_lookup(lookup(&[("AUTH0_AUDIENCE", "https://api.test/")]))
            .unwrap()
            .for_service("billing");

        assert_eq!(config.service_audience.as_deref(), Some("https://api.test/billing"));
        assert_eq!(AuthConfig::default().service_audience, None);
    }

    #[test]
    fn derived_urls() {
        let config = AuthConfig::from_lookup(lookup(&[("AUTH0_ISSUER_URL", "https://tenant.idp.test/")])).unwrap();
        assert_eq!(
            config.expected_audiences(),
            vec![DEFAULT_AUDIENCE.to_string(), "https://tenant.idp.test/userinfo".to_string()]
        );
        assert_eq!(config.jwks_uri(), "https://tenant.idp.test/.well-known/jwks.json");
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(
            AuthConfig::from_lookup(lookup(&[("AUTH0_ISSUER_URL", "https://idp.test")])),
            Err(ConfigError::IssuerWithoutTrailingSlash("https://idp.test".to_string()))
        );
        assert_eq!(
            AuthConfig::from_lookup(lookup(&[("AUTH0_DOMAIN", " ")])),
            Err(ConfigError::Empty { name: "AUTH0_DOMAIN" })
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: AuthConfig = serde_json::from_value(serde_json::json!({ "domain": "idp.test" })).unwrap();
        assert_eq!(config.domain, "idp.test");
        assert_eq!(config.audience, DEFAULT_AUDIENCE);
    }
}
