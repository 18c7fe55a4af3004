// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bob Connector
//!
//! Bob waits for Alice's commitment before claiming the group's connection
//! flag. Only Alice's winning connector ever sends a commitment, so both
//! peers settle on the same transport. Until then a connection that closes
//! or fails to read is dropped without reporting anything; a malformed
//! commitment is reported as a failed key agreement.

use tracing::{debug, info, warn};

use super::connector::{Connector, ConnectorCore, ConnectorState};
use super::InvitationResult;
use crate::crypto::MasterSecret;
use crate::transport::DuplexConnection;

pub(crate) struct BobConnector {
    core: ConnectorCore,
}

impl BobConnector {
    pub(crate) fn new(core: ConnectorCore) -> Self {
        BobConnector { core }
    }

    fn agree(
        &mut self,
        connection: &mut dyn DuplexConnection,
        hash: &[u8],
    ) -> InvitationResult<MasterSecret> {
        let core = &mut self.core;
        core.send_public_key_hash(connection)?;
        core.transition(ConnectorState::Committed);
        let key = core.receive_public_key(connection)?;
        core.send_public_key(connection)?;
        core.derive_master_secret(hash, &key)
    }
}

impl Connector for BobConnector {
    fn run(mut self: Box<Self>) -> InvitationResult<ConnectorState> {
        let Some(mut connection) = self.core.create_invitation_connection() else {
            return Ok(self.core.transition(ConnectorState::Failed));
        };
        info!(transport = %self.core.transport_id(), "Bob connected");

        let hash = match self.core.receive_public_key_hash(connection.as_mut()) {
            Ok(hash) => hash,
            Err(e) if e.is_security_failure() => {
                // A bad commitment on a socket nobody else claimed is this attempt failing
                if self.core.group.get_and_set_connected() {
                    warn!(transport = %self.core.transport_id(), error = %e, "Invalid commitment on redundant connection");
                    self.core.try_to_close(connection.as_mut(), true);
                    return Ok(self.core.transition(ConnectorState::Redundant));
                }
                self.core.group.connection_succeeded();
                return Ok(self.core.key_agreement_failed(connection, e));
            }
            Err(e) => {
                debug!(transport = %self.core.transport_id(), error = %e, "No commitment from Alice");
                self.core.try_to_close(connection.as_mut(), true);
                return Ok(self.core.transition(ConnectorState::Failed));
            }
        };

        if self.core.group.get_and_set_connected() {
            info!(transport = %self.core.transport_id(), "Redundant connection");
            self.core.try_to_close(connection.as_mut(), false);
            return Ok(self.core.transition(ConnectorState::Redundant));
        }
        self.core.group.connection_succeeded();

        let secret = match self.agree(connection.as_mut(), &hash) {
            Ok(secret) => secret,
            Err(e) => return Ok(self.core.key_agreement_failed(connection, e)),
        };
        self.core.publish_confirmation_codes(&secret);

        self.core.transition(ConnectorState::AwaitingRemoteConfirmation);
        let remote_matched = match self.core.receive_confirmation(connection.as_mut()) {
            Ok(matched) => matched,
            Err(e) => return Ok(self.core.confirmation_exchange_failed(connection, e)),
        };

        self.core.transition(ConnectorState::AwaitingLocalConfirmation);
        let local_matched = match self.core.group.wait_for_local_confirmation() {
            Ok(matched) => matched,
            // Poisoned gate only; nothing panics while holding its lock
            Err(e) => return self.core.interrupted(connection, e),
        };

        if let Err(e) = self.core.send_confirmation(connection.as_mut(), local_matched) {
            return Ok(self.core.confirmation_exchange_failed(connection, e));
        }
        Ok(self
            .core
            .finish(connection, secret, local_matched, remote_matched))
    }
}
