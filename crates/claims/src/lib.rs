//! `gatekit-claims` — from verified token claims to an [`Identity`].
//!
//! Token signature, issuer and audience verification happen before this crate
//! is involved; everything here trusts its input.
//!
//! [`Identity`]: gatekit_rbac::Identity

pub mod bearer;
pub mod claims;
pub mod config;
pub mod extractor;
pub mod namespace;

pub use bearer::{build_auth_header, extract_bearer_token};
pub use claims::{ClaimsError, TokenValidationError, VerifiedClaims, validate_time_window};
pub use config::{AuthConfig, ConfigError};
pub use extractor::{CLIENT_CREDENTIALS, ClaimsExtractor, TokenKind};
pub use namespace::ClaimNamespace;
