//! `gatekit-core` — shared building blocks for the gatekit crates.
//!
//! This crate contains identifiers and the error taxonomy only (no policy,
//! no transport, no storage).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult, ErrorBody};
pub use id::{SubjectId, UserId};
