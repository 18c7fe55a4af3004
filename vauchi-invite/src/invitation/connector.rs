// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connector
//!
//! Runs one key-agreement attempt over one transport on its own worker.
//! The protocol steps are shared here; [`AliceConnector`](super::alice) and
//! [`BobConnector`](super::bob) only fix the order in which they happen.
//!
//! Wire exchange (Alice's view, Bob mirrors it):
//!
//! ```text
//! Alice -> Bob : raw(hash(COMMIT_LABEL, alice_pub))
//! Bob -> Alice : raw(hash(COMMIT_LABEL, bob_pub))
//! Alice -> Bob : raw(alice_pub)
//! Bob -> Alice : raw(bob_pub)
//! Alice -> Bob : bool(alice_matched)
//! Bob -> Alice : bool(bob_matched)
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{
    ConfirmationCode, ConnectorGroup, ContactExchange, ContactExchangeListener, InvitationError,
    InvitationResult, Role,
};
use crate::codec::{CodecError, RecordReadExt, RecordWriteExt};
use crate::config::InvitationConfig;
use crate::crypto::{
    AgreementKeyPair, CryptoComponent, CryptoError, MasterSecret, PseudoRandom, HASH_LENGTH,
};
use crate::identity::LocalIdentity;
use crate::transport::{DuplexConnection, InvitationTransport, TransportId};

/// Upper bound accepted for a revealed public key before parsing.
pub const MAX_PUBLIC_KEY_LENGTH: usize = 64;

/// Progress of one connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorState {
    /// Waiting for the transport to produce a connection.
    Connecting,
    /// Commitments exchanged.
    Committed,
    /// Public keys exchanged and the peer's commitment checked.
    Verified,
    /// Master secret derived and confirmation codes published.
    SecretDerived,
    /// Waiting for the local human to compare codes.
    AwaitingLocalConfirmation,
    /// Exchanging confirmation results with the peer.
    AwaitingRemoteConfirmation,
    /// Both sides matched; the connection went to the contact exchange.
    Succeeded,
    /// Another transport already won; this connection was closed.
    Redundant,
    /// The attempt over this transport ended without success.
    Failed,
}

impl ConnectorState {
    /// Whether the connector has finished.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ConnectorState::Succeeded | ConnectorState::Redundant | ConnectorState::Failed
        )
    }
}

/// A role-specific connector, run to completion on its own worker.
pub(crate) trait Connector: Send {
    /// Runs the attempt and returns the terminal state.
    ///
    /// Only an interruption is returned as an error; every other failure has
    /// already been reported to the group's listeners.
    fn run(self: Box<Self>) -> InvitationResult<ConnectorState>;
}

/// State and steps shared by both roles.
pub(crate) struct ConnectorCore {
    pub(crate) group: Arc<ConnectorGroup>,
    crypto: Arc<dyn CryptoComponent>,
    exchange: Arc<dyn ContactExchange>,
    transport: Arc<dyn InvitationTransport>,
    transport_id: TransportId,
    identity: LocalIdentity,
    config: InvitationConfig,
    random: PseudoRandom,
    key_pair: AgreementKeyPair,
    role: Role,
    state: ConnectorState,
}

impl ConnectorCore {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        group: Arc<ConnectorGroup>,
        crypto: Arc<dyn CryptoComponent>,
        exchange: Arc<dyn ContactExchange>,
        transport: Arc<dyn InvitationTransport>,
        identity: LocalIdentity,
        config: InvitationConfig,
        random: PseudoRandom,
        role: Role,
    ) -> Self {
        let key_pair = crypto.generate_agreement_key_pair();
        let transport_id = transport.id();
        ConnectorCore {
            group,
            crypto,
            exchange,
            transport,
            transport_id,
            identity,
            config,
            random,
            key_pair,
            role,
            state: ConnectorState::Connecting,
        }
    }

    pub(crate) fn transport_id(&self) -> &TransportId {
        &self.transport_id
    }

    /// Records a state change and returns the new state.
    pub(crate) fn transition(&mut self, next: ConnectorState) -> ConnectorState {
        debug!(
            transport = %self.transport_id,
            role = %self.role,
            from = ?self.state,
            to = ?next,
            "Connector state change"
        );
        self.state = next;
        next
    }

    pub(crate) fn create_invitation_connection(&mut self) -> Option<Box<dyn DuplexConnection>> {
        debug!(transport = %self.transport_id, role = %self.role, "Creating invitation connection");
        let connection = self.transport.create_invitation_connection(
            &mut self.random,
            self.config.connection_timeout(),
            self.role.is_alice(),
        );
        if connection.is_none() {
            info!(transport = %self.transport_id, "No invitation connection");
        }
        connection
    }

    pub(crate) fn send_public_key_hash(
        &self,
        connection: &mut dyn DuplexConnection,
    ) -> InvitationResult<()> {
        let commitment = self
            .crypto
            .commitment(self.key_pair.public_key().as_bytes());
        let writer = connection.writer();
        writer.write_raw(&commitment)?;
        writer.flush()?;
        debug!(transport = %self.transport_id, "Sent commitment");
        Ok(())
    }

    pub(crate) fn receive_public_key_hash(
        &self,
        connection: &mut dyn DuplexConnection,
    ) -> InvitationResult<Vec<u8>> {
        let hash = connection
            .reader()
            .read_raw(HASH_LENGTH)
            .map_err(|e| match e {
                CodecError::TooLong { length, .. } => InvitationError::InvalidCommitment(length),
                other => other.into(),
            })?;
        if hash.len() != HASH_LENGTH {
            return Err(InvitationError::InvalidCommitment(hash.len()));
        }
        debug!(transport = %self.transport_id, "Received commitment");
        Ok(hash)
    }

    pub(crate) fn send_public_key(
        &self,
        connection: &mut dyn DuplexConnection,
    ) -> InvitationResult<()> {
        let writer = connection.writer();
        writer.write_raw(self.key_pair.public_key().as_bytes())?;
        writer.flush()?;
        debug!(transport = %self.transport_id, "Sent public key");
        Ok(())
    }

    pub(crate) fn receive_public_key(
        &self,
        connection: &mut dyn DuplexConnection,
    ) -> InvitationResult<Vec<u8>> {
        let key = connection
            .reader()
            .read_raw(MAX_PUBLIC_KEY_LENGTH)
            .map_err(|e| match e {
                CodecError::TooLong { length, .. } => {
                    InvitationError::Security(CryptoError::MalformedPublicKey { length })
                }
                other => other.into(),
            })?;
        self.crypto.agreement_key_parser().parse(&key)?;
        debug!(transport = %self.transport_id, "Received public key");
        Ok(key)
    }

    /// Checks the revealed key against its commitment, then derives the
    /// master secret. No secret exists unless the commitment matched.
    pub(crate) fn derive_master_secret(
        &mut self,
        hash: &[u8],
        key: &[u8],
    ) -> InvitationResult<MasterSecret> {
        self.crypto.verify_commitment(hash, key)?;
        self.transition(ConnectorState::Verified);
        let secret = self
            .crypto
            .derive_master_secret(key, &self.key_pair, self.role.is_alice())?;
        self.transition(ConnectorState::SecretDerived);
        Ok(secret)
    }

    pub(crate) fn send_confirmation(
        &self,
        connection: &mut dyn DuplexConnection,
        matched: bool,
    ) -> InvitationResult<()> {
        let writer = connection.writer();
        writer.write_bool(matched)?;
        writer.flush()?;
        debug!(transport = %self.transport_id, matched, "Sent confirmation");
        Ok(())
    }

    pub(crate) fn receive_confirmation(
        &self,
        connection: &mut dyn DuplexConnection,
    ) -> InvitationResult<bool> {
        let matched = connection.reader().read_bool()?;
        debug!(transport = %self.transport_id, matched, "Received confirmation");
        Ok(matched)
    }

    /// Derives both confirmation codes and publishes ours first.
    pub(crate) fn publish_confirmation_codes(&self, secret: &MasterSecret) {
        let alice_code = ConfirmationCode::new(self.crypto.derive_confirmation_code(secret, true));
        let bob_code = ConfirmationCode::new(self.crypto.derive_confirmation_code(secret, false));
        let (local, remote) = match self.role {
            Role::Alice => (alice_code, bob_code),
            Role::Bob => (bob_code, alice_code),
        };
        self.group.key_agreement_succeeded(local, remote);
    }

    /// Reports a failed key agreement and closes the connection.
    pub(crate) fn key_agreement_failed(
        &mut self,
        mut connection: Box<dyn DuplexConnection>,
        error: InvitationError,
    ) -> ConnectorState {
        if error.is_security_failure() {
            warn!(transport = %self.transport_id, %error, "Key agreement failed, possible tampering");
        } else {
            warn!(transport = %self.transport_id, %error, "Key agreement failed");
        }
        self.group.key_agreement_failed();
        self.try_to_close(connection.as_mut(), true);
        self.transition(ConnectorState::Failed)
    }

    /// Reports an I/O failure while exchanging confirmation results.
    pub(crate) fn confirmation_exchange_failed(
        &mut self,
        mut connection: Box<dyn DuplexConnection>,
        error: InvitationError,
    ) -> ConnectorState {
        warn!(transport = %self.transport_id, %error, "Confirmation exchange failed");
        self.group.remote_confirmation_failed();
        self.try_to_close(connection.as_mut(), true);
        self.transition(ConnectorState::Failed)
    }

    /// Closes the connection after an interruption and hands the error back.
    ///
    /// Only reached through a poisoned confirmation gate; no code panics
    /// while holding the gate's lock.
    pub(crate) fn interrupted(
        &mut self,
        mut connection: Box<dyn DuplexConnection>,
        error: InvitationError,
    ) -> InvitationResult<ConnectorState> {
        warn!(transport = %self.transport_id, "Interrupted while waiting for confirmation");
        self.try_to_close(connection.as_mut(), true);
        self.transition(ConnectorState::Failed);
        Err(error)
    }

    /// Publishes the peer's result and, if both sides matched, hands the
    /// connection to the contact exchange.
    pub(crate) fn finish(
        &mut self,
        mut connection: Box<dyn DuplexConnection>,
        secret: MasterSecret,
        local_matched: bool,
        remote_matched: bool,
    ) -> ConnectorState {
        if remote_matched {
            self.group.remote_confirmation_succeeded();
        } else {
            self.group.remote_confirmation_failed();
        }

        if !(local_matched && remote_matched) {
            info!(
                transport = %self.transport_id,
                local_matched,
                remote_matched,
                "Confirmation failed"
            );
            self.try_to_close(connection.as_mut(), false);
            return self.transition(ConnectorState::Failed);
        }

        info!(transport = %self.transport_id, "Confirmation succeeded");
        let listener: Arc<dyn ContactExchangeListener> = self.group.clone();
        self.exchange.start_exchange(
            listener,
            self.identity.clone(),
            secret,
            connection,
            self.transport_id.clone(),
            self.role.is_alice(),
        );
        self.transition(ConnectorState::Succeeded)
    }

    pub(crate) fn try_to_close(&self, connection: &mut dyn DuplexConnection, exception: bool) {
        debug!(transport = %self.transport_id, exception, "Closing invitation connection");
        connection.close(exception);
    }
}
