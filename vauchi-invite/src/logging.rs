// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logging
//!
//! The library only emits `tracing` events. Hosts that do not install their
//! own subscriber can call `init_logging` once at startup.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "vauchi_invite=info";

/// Logging setup errors.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Installs a fmt subscriber honouring `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
pub fn init_logging() -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?;
    install(filter)
}

/// Installs a fmt subscriber with an explicit filter directive.
pub fn init_logging_with_filter(directive: &str) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidFilter(e.to_string()))?;
    install(filter)
}

fn install(filter: EnvFilter) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let _ = init_logging_with_filter("vauchi_invite=debug");
        assert!(matches!(
            init_logging(),
            Err(LoggingError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn test_invalid_filter_rejected() {
        assert!(matches!(
            init_logging_with_filter("vauchi_invite=loud"),
            Err(LoggingError::InvalidFilter(_))
        ));
    }
}
