// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Vauchi Invitation Library
//!
//! Pairs two devices that can both see a pair of short invitation codes.
//! Every short-range transport is raced in parallel; the first one to connect
//! runs a commit-then-reveal X25519 key agreement, after which both humans
//! compare confirmation codes on screen before the contact exchange starts.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod identity;
pub mod invitation;
pub mod logging;
pub mod transport;

pub use codec::{CodecError, RecordReadExt, RecordWriteExt};
pub use config::InvitationConfig;
pub use crypto::{
    AgreementKeyPair, AgreementPublicKey, CryptoComponent, CryptoError, DefaultCryptoComponent,
    MasterSecret, PseudoRandom,
};
pub use identity::LocalIdentity;
pub use invitation::{
    CallbackListener, ConfirmationCode, ConnectorGroup, ConnectorState, ContactExchange,
    ContactExchangeListener, InvitationCode, InvitationError, InvitationEvent, InvitationListener,
    InvitationResult, InvitationState, InvitationTask, InvitationTaskFactory, Role,
};
pub use logging::{init_logging, init_logging_with_filter, LoggingError};
pub use transport::{
    DuplexConnection, InvitationTransport, MemoryConnection, MemoryRendezvous, MemoryTransport,
    TransportId,
};
