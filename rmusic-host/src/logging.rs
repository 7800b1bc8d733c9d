//! Logging bootstrap.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies.

use tracing_subscriber::EnvFilter;

use crate::error::{HostError, Result};

/// Install a global fmt subscriber filtered at `level`.
///
/// # Errors
/// Returns [`HostError::Logging`] if `level` is not a valid filter or a
/// global subscriber is already installed.
pub fn init(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| HostError::Logging(e.to_string()))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| HostError::Logging(e.to_string()))
}

/// Like [`init`], but ignores an already-installed subscriber.
pub fn init_once(level: &str) {
    if let Err(e) = init(level) {
        tracing::debug!(error = %e, "Logging already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_instead_of_panicking() {
        init_once("info");
        init_once("debug");
        assert!(init("info").is_err());
    }
}
