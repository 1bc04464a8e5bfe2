//! Process-wide tracing setup shared by services embedding the gatekit crates.

pub use crate::tracing::{LogFormat, ObsConfig};

/// Install the default subscriber (JSON, `RUST_LOG` or `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Install a subscriber built from `config`.
///
/// Fails if the filter does not parse or a global subscriber is already set.
pub fn init_with(config: &ObsConfig) -> anyhow::Result<()> {
    tracing::init_with(config)
}

/// Subscriber configuration (filters, output format).
pub mod tracing;
