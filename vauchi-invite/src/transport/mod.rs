// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Invitation Transports
//!
//! Platform-agnostic abstraction over the short-range transports (Bluetooth,
//! LAN, ...) an invitation can be raced over.
//!
//! # Synchronous Interface
//!
//! Like the relay transport, these traits are blocking. Each connector owns a
//! dedicated worker thread, so blocking connects and reads are expected.

#[cfg(feature = "testing")]
pub mod memory;
#[cfg(not(feature = "testing"))]
mod memory;

use std::fmt;
use std::io::{Read, Write};
use std::time::Duration;

use crate::crypto::PseudoRandom;

pub use memory::{MemoryConnection, MemoryRendezvous, MemoryTransport};

/// Identifies a transport implementation (e.g. `"bluetooth"`, `"lan"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransportId(String);

impl TransportId {
    /// Creates a transport ID.
    pub fn new(id: impl Into<String>) -> Self {
        TransportId(id.into())
    }

    /// Returns the ID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bidirectional byte stream produced by a transport.
pub trait DuplexConnection: Send {
    /// Returns the incoming half.
    fn reader(&mut self) -> &mut dyn Read;

    /// Returns the outgoing half.
    fn writer(&mut self) -> &mut dyn Write;

    /// Closes both halves. `exception` is true when closing because of an
    /// error rather than an orderly shutdown.
    fn close(&mut self, exception: bool);
}

/// A transport that can create invitation connections.
pub trait InvitationTransport: Send + Sync {
    /// Returns the transport ID.
    fn id(&self) -> TransportId;

    /// Whether this transport can carry invitations at all.
    fn supports_invitations(&self) -> bool {
        true
    }

    /// Creates an invitation connection to the peer.
    ///
    /// `random` is seeded identically on both peers, so both can derive the
    /// same rendezvous parameters from it. `alice` selects the side of the
    /// rendezvous when the transport needs one to listen and one to dial.
    /// Returns `None` if no connection was made within `timeout`.
    fn create_invitation_connection(
        &self,
        random: &mut PseudoRandom,
        timeout: Duration,
        alice: bool,
    ) -> Option<Box<dyn DuplexConnection>>;
}
