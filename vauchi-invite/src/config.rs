// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Invitation Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::invitation::InvitationError;

/// Default time allowed for a transport to produce an invitation connection.
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 15_000;

/// Default time a connector waits for the local human to compare codes.
pub const DEFAULT_CONFIRMATION_TIMEOUT_MS: u64 = 60_000;

/// Timeouts for one invitation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvitationConfig {
    /// Connection establishment timeout in milliseconds (per transport).
    pub connection_timeout_ms: u64,

    /// Local confirmation timeout in milliseconds. When it expires without a
    /// decision the connector proceeds as if the codes did not match.
    pub confirmation_timeout_ms: u64,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        InvitationConfig {
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            confirmation_timeout_ms: DEFAULT_CONFIRMATION_TIMEOUT_MS,
        }
    }
}

impl InvitationConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, InvitationError> {
        let config: InvitationConfig = serde_json::from_str(json)
            .map_err(|e| InvitationError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the connection timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the confirmation timeout.
    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Connection timeout as a `Duration`.
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    /// Confirmation timeout as a `Duration`.
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    /// Rejects configurations that could never complete an attempt.
    pub fn validate(&self) -> Result<(), InvitationError> {
        if self.connection_timeout_ms == 0 {
            return Err(InvitationError::Configuration(
                "connection_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.confirmation_timeout_ms == 0 {
            return Err(InvitationError::Configuration(
                "confirmation_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
