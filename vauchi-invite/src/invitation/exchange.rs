// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact Exchange Hand-off
//!
//! Once both humans confirmed matching codes, the winning connection and the
//! master secret are handed to the contact exchange, which swaps identities
//! over the now-trusted channel and reports back through
//! [`ContactExchangeListener`].

use std::sync::Arc;

use crate::crypto::MasterSecret;
use crate::identity::LocalIdentity;
use crate::transport::{DuplexConnection, TransportId};

/// Receives the outcome of the pseudonym exchange.
pub trait ContactExchangeListener: Send + Sync {
    /// The peer's identity was received and verified.
    fn pseudonym_exchange_succeeded(&self, remote_name: &str);

    /// The exchange failed.
    fn pseudonym_exchange_failed(&self);
}

/// Runs the contact exchange after a successful invitation.
pub trait ContactExchange: Send + Sync {
    /// Starts the exchange. Takes ownership of the connection; the master
    /// secret is not retained by the invitation core afterwards.
    ///
    /// Called on the winning connector's worker thread. Long-running
    /// implementations should spawn their own worker.
    fn start_exchange(
        &self,
        listener: Arc<dyn ContactExchangeListener>,
        identity: LocalIdentity,
        master_secret: MasterSecret,
        connection: Box<dyn DuplexConnection>,
        transport_id: TransportId,
        alice: bool,
    );
}
