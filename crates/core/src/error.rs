//! Domain error model.
//!
//! Every variant carries a stable machine-readable code, an HTTP-style status
//! and a message that is safe to show to end users. Translating these into a
//! transport response is the caller's job.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the gatekit crates.
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("user with id {user_id} not found")]
    UserNotFound { user_id: String },

    #[error("user with {field} {identifier} already exists")]
    UserAlreadyExists { field: String, identifier: String },

    #[error("invalid {field}: {reason}")]
    InvalidUserData { field: String, reason: String },

    /// Authorization failure (authenticated, but not allowed).
    #[error("permission denied for action {action} by {subject}")]
    PermissionDenied { action: String, subject: String },

    /// No usable identity was presented.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// An identifier was invalid (e.g. blank).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn user_not_found(user_id: impl Into<String>) -> Self {
        Self::UserNotFound { user_id: user_id.into() }
    }

    pub fn user_already_exists(field: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::UserAlreadyExists {
            field: field.into(),
            identifier: identifier.into(),
        }
    }

    pub fn invalid_user_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUserData {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn permission_denied(action: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::PermissionDenied {
            action: action.into(),
            subject: subject.into(),
        }
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Stable error code (never localized, safe to match on).
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound { .. } => "USER_NOT_FOUND",
            Self::UserAlreadyExists { .. } => "USER_ALREADY_EXISTS",
            Self::InvalidUserData { .. } => "INVALID_USER_DATA",
            Self::PermissionDenied { .. } => "USER_PERMISSION_DENIED",
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::InvalidId(_) => "INVALID_ID",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::UserNotFound { .. } => 404,
            Self::UserAlreadyExists { .. } => 409,
            Self::InvalidUserData { .. } | Self::InvalidId(_) => 400,
            Self::PermissionDenied { .. } => 403,
            Self::Unauthenticated(_) => 401,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::UserNotFound { .. } => "The user could not be found".to_string(),
            Self::UserAlreadyExists { .. } => "This user is already registered".to_string(),
            Self::InvalidUserData { field, reason } => {
                format!("The value of {field} is not valid: {reason}")
            }
            Self::PermissionDenied { .. } => {
                "You do not have permission to perform this operation".to_string()
            }
            Self::Unauthenticated(_) => "Authentication is required".to_string(),
            Self::InvalidId(_) => "The identifier is not valid".to_string(),
        }
    }

    fn details(&self) -> serde_json::Value {
        match self {
            Self::UserNotFound { user_id } => serde_json::json!({ "userId": user_id }),
            Self::UserAlreadyExists { field, identifier } => {
                let mut map = serde_json::Map::new();
                map.insert(field.clone(), serde_json::Value::String(identifier.clone()));
                serde_json::Value::Object(map)
            }
            Self::InvalidUserData { field, reason } => {
                serde_json::json!({ "field": field, "reason": reason })
            }
            Self::PermissionDenied { action, subject } => {
                serde_json::json!({ "action": action, "subject": subject })
            }
            Self::Unauthenticated(_) | Self::InvalidId(_) => serde_json::Value::Null,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
            user_message: self.user_message(),
            status_code: self.status_code(),
            details: self.details(),
        }
    }
}

/// Serializable error payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub user_message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}
