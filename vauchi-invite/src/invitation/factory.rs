// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Invitation Task Factory

use std::sync::Arc;

use tracing::debug;

use super::{
    ConnectorGroup, ContactExchange, InvitationCode, InvitationError, InvitationResult,
    InvitationTask,
};
use crate::config::InvitationConfig;
use crate::crypto::CryptoComponent;
use crate::identity::LocalIdentity;
use crate::transport::InvitationTransport;

/// Builds invitation tasks sharing one set of collaborators.
pub struct InvitationTaskFactory {
    crypto: Arc<dyn CryptoComponent>,
    transports: Vec<Arc<dyn InvitationTransport>>,
    exchange: Arc<dyn ContactExchange>,
    identity: LocalIdentity,
    config: InvitationConfig,
}

impl InvitationTaskFactory {
    /// Creates a factory with default timeouts.
    pub fn new(
        crypto: Arc<dyn CryptoComponent>,
        transports: Vec<Arc<dyn InvitationTransport>>,
        exchange: Arc<dyn ContactExchange>,
        identity: LocalIdentity,
    ) -> Self {
        InvitationTaskFactory {
            crypto,
            transports,
            exchange,
            identity,
            config: InvitationConfig::default(),
        }
    }

    /// Replaces the timeouts used by subsequently created tasks.
    pub fn with_config(mut self, config: InvitationConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configured timeouts.
    pub fn config(&self) -> &InvitationConfig {
        &self.config
    }

    /// Creates the connector group for one pair of codes.
    ///
    /// Identical codes are rejected: neither side could claim a role.
    pub fn create_group(
        &self,
        local: InvitationCode,
        remote: InvitationCode,
    ) -> InvitationResult<Arc<ConnectorGroup>> {
        if local == remote {
            return Err(InvitationError::IdenticalCodes);
        }
        self.config.validate()?;
        debug!(
            %local,
            %remote,
            transports = self.transports.len(),
            "Creating invitation task"
        );
        Ok(ConnectorGroup::new(
            Arc::clone(&self.crypto),
            self.transports.clone(),
            Arc::clone(&self.exchange),
            self.identity.clone(),
            self.config.clone(),
            local,
            remote,
        ))
    }

    /// Creates a task for one pair of codes. Call `connect` to start it.
    pub fn create_task(
        &self,
        local: InvitationCode,
        remote: InvitationCode,
    ) -> InvitationResult<Arc<dyn InvitationTask>> {
        let group: Arc<dyn InvitationTask> = self.create_group(local, remote)?;
        Ok(group)
    }
}
