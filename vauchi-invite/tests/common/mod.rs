// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Recording listeners, a name-swapping contact exchange and peer builders
//! shared by the invitation integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use vauchi_invite::{
    ConfirmationCode, ConnectorGroup, ContactExchange, ContactExchangeListener,
    DefaultCryptoComponent, DuplexConnection, InvitationCode, InvitationConfig, InvitationEvent,
    InvitationListener, InvitationTask, InvitationTaskFactory, InvitationTransport, LocalIdentity,
    MasterSecret, RecordReadExt, RecordWriteExt, TransportId,
};

/// Generous upper bound for anything the tests wait on.
pub const WAIT: Duration = Duration::from_secs(10);

pub fn code(value: u32) -> InvitationCode {
    InvitationCode::new(value).unwrap()
}

/// Short timeouts so failure paths finish quickly.
pub fn fast_config() -> InvitationConfig {
    InvitationConfig::default()
        .with_connection_timeout(Duration::from_secs(2))
        .with_confirmation_timeout(Duration::from_secs(5))
}

// ============================================================
// Listener
// ============================================================

/// Records every event and lets tests block until one shows up.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<InvitationEvent>>,
    changed: Condvar,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<InvitationEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&InvitationEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| matches(e)).count()
    }

    /// Blocks until an event satisfying `matches` has been recorded.
    pub fn wait_for(
        &self,
        matches: impl Fn(&InvitationEvent) -> bool,
    ) -> Option<InvitationEvent> {
        let deadline = Instant::now() + WAIT;
        let mut events = self.events.lock().unwrap();
        loop {
            if let Some(event) = events.iter().find(|e| matches(e)) {
                return Some(event.clone());
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            events = self.changed.wait_timeout(events, deadline - now).unwrap().0;
        }
    }

    /// Waits for key agreement and returns `(local, remote)` codes.
    pub fn wait_for_codes(&self) -> (ConfirmationCode, ConfirmationCode) {
        match self.wait_for(|e| matches!(e, InvitationEvent::KeyAgreementSucceeded { .. })) {
            Some(InvitationEvent::KeyAgreementSucceeded {
                local_code,
                remote_code,
            }) => (local_code, remote_code),
            other => panic!("key agreement did not succeed: {other:?}"),
        }
    }
}

impl InvitationListener for RecordingListener {
    fn on_event(&self, event: InvitationEvent) {
        self.events.lock().unwrap().push(event);
        self.changed.notify_all();
    }
}

// ============================================================
// Contact Exchange
// ============================================================

/// What the contact exchange was handed.
pub struct ExchangeStart {
    pub transport_id: TransportId,
    pub alice: bool,
    pub master_secret: MasterSecret,
}

/// Swaps display names over the connection it is handed.
#[derive(Default)]
pub struct NameExchange {
    starts: Mutex<Vec<ExchangeStart>>,
}

impl NameExchange {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn start_count(&self) -> usize {
        self.starts.lock().unwrap().len()
    }

    /// Returns `(transport, alice, secret bytes)` of the first start.
    pub fn first_start(&self) -> Option<(TransportId, bool, [u8; 32])> {
        self.starts
            .lock()
            .unwrap()
            .first()
            .map(|s| (s.transport_id.clone(), s.alice, *s.master_secret.as_bytes()))
    }
}

impl ContactExchange for NameExchange {
    fn start_exchange(
        &self,
        listener: Arc<dyn ContactExchangeListener>,
        identity: LocalIdentity,
        master_secret: MasterSecret,
        mut connection: Box<dyn DuplexConnection>,
        transport_id: TransportId,
        alice: bool,
    ) {
        self.starts.lock().unwrap().push(ExchangeStart {
            transport_id,
            alice,
            master_secret,
        });

        let sent = connection.writer().write_raw(identity.name().as_bytes());
        let received = sent.and_then(|_| connection.reader().read_raw(256));
        match received.map(String::from_utf8) {
            Ok(Ok(name)) => listener.pseudonym_exchange_succeeded(&name),
            _ => listener.pseudonym_exchange_failed(),
        }
        connection.close(false);
    }
}

// ============================================================
// Peers
// ============================================================

/// One side of an invitation, with its observers.
pub struct Peer {
    pub group: Arc<ConnectorGroup>,
    pub listener: Arc<RecordingListener>,
    pub exchange: Arc<NameExchange>,
}

impl Peer {
    pub fn new(
        name: &str,
        local: u32,
        remote: u32,
        transports: Vec<Arc<dyn InvitationTransport>>,
        config: InvitationConfig,
    ) -> Peer {
        let exchange = NameExchange::new();
        let identity = LocalIdentity::new([name.len() as u8; 32], name);
        let factory = InvitationTaskFactory::new(
            Arc::new(DefaultCryptoComponent::new()),
            transports,
            exchange.clone(),
            identity,
        )
        .with_config(config);

        let group = factory.create_group(code(local), code(remote)).unwrap();
        let listener = RecordingListener::new();
        group.add_listener(listener.clone());

        Peer {
            group,
            listener,
            exchange,
        }
    }

    pub fn connect(&self) {
        self.group.connect().unwrap();
    }

    pub fn join(&self) {
        self.group.join();
    }
}
