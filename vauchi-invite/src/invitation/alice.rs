// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Alice Connector
//!
//! Alice claims the group's connection flag as soon as her transport
//! connects, then speaks first at every step.

use tracing::info;

use super::connector::{Connector, ConnectorCore, ConnectorState};
use super::InvitationResult;
use crate::crypto::MasterSecret;
use crate::transport::DuplexConnection;

pub(crate) struct AliceConnector {
    core: ConnectorCore,
}

impl AliceConnector {
    pub(crate) fn new(core: ConnectorCore) -> Self {
        AliceConnector { core }
    }

    fn agree(&mut self, connection: &mut dyn DuplexConnection) -> InvitationResult<MasterSecret> {
        let core = &mut self.core;
        core.send_public_key_hash(connection)?;
        let hash = core.receive_public_key_hash(connection)?;
        core.transition(ConnectorState::Committed);
        core.send_public_key(connection)?;
        let key = core.receive_public_key(connection)?;
        core.derive_master_secret(&hash, &key)
    }

    fn exchange_confirmations(
        &self,
        connection: &mut dyn DuplexConnection,
        local_matched: bool,
    ) -> InvitationResult<bool> {
        self.core.send_confirmation(connection, local_matched)?;
        self.core.receive_confirmation(connection)
    }
}

impl Connector for AliceConnector {
    fn run(mut self: Box<Self>) -> InvitationResult<ConnectorState> {
        let Some(mut connection) = self.core.create_invitation_connection() else {
            return Ok(self.core.transition(ConnectorState::Failed));
        };
        info!(transport = %self.core.transport_id(), "Alice connected");

        if self.core.group.get_and_set_connected() {
            info!(transport = %self.core.transport_id(), "Redundant connection");
            self.core.try_to_close(connection.as_mut(), false);
            return Ok(self.core.transition(ConnectorState::Redundant));
        }
        self.core.group.connection_succeeded();

        let secret = match self.agree(connection.as_mut()) {
            Ok(secret) => secret,
            Err(e) => return Ok(self.core.key_agreement_failed(connection, e)),
        };
        self.core.publish_confirmation_codes(&secret);

        self.core.transition(ConnectorState::AwaitingLocalConfirmation);
        let local_matched = match self.core.group.wait_for_local_confirmation() {
            Ok(matched) => matched,
            // Poisoned gate only; nothing panics while holding its lock
            Err(e) => return self.core.interrupted(connection, e),
        };

        self.core.transition(ConnectorState::AwaitingRemoteConfirmation);
        match self.exchange_confirmations(connection.as_mut(), local_matched) {
            Ok(remote_matched) => Ok(self
                .core
                .finish(connection, secret, local_matched, remote_matched)),
            Err(e) => Ok(self.core.confirmation_exchange_failed(connection, e)),
        }
    }
}
