// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Connector Group
//!
//! Owns one invitation attempt: races a connector per transport, makes sure
//! exactly one of them proceeds, and relays progress to listeners.
//!
//! # Concurrency
//!
//! State and listeners share one mutex. Every update changes the state and
//! snapshots the listeners under that lock, then notifies outside it, so a
//! listener added with [`InvitationTask::add_listener`] sees each event either
//! in its returned snapshot or as a callback, never both and never neither.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};

use super::alice::AliceConnector;
use super::bob::BobConnector;
use super::connector::{Connector, ConnectorCore};
use super::events::{dispatch, ListenerRegistry};
use super::{
    ConfirmationCode, ConfirmationGate, ContactExchange, ContactExchangeListener, InvitationCode,
    InvitationError, InvitationEvent, InvitationListener, InvitationResult, InvitationState, Role,
};
use crate::config::InvitationConfig;
use crate::crypto::CryptoComponent;
use crate::identity::LocalIdentity;
use crate::transport::InvitationTransport;

/// Control surface of one invitation attempt.
pub trait InvitationTask: Send + Sync {
    /// Starts racing the transports in the background. Calling it again has
    /// no effect.
    fn connect(&self) -> InvitationResult<()>;

    /// Registers a listener and returns the state as of registration.
    fn add_listener(&self, listener: Arc<dyn InvitationListener>) -> InvitationState;

    /// Unregisters a listener (compared by address).
    fn remove_listener(&self, listener: &Arc<dyn InvitationListener>);

    /// The local human saw matching codes.
    fn local_confirmation_succeeded(&self);

    /// The local human saw different codes.
    fn local_confirmation_failed(&self);

    /// Returns a snapshot of the current state.
    fn state(&self) -> InvitationState;

    /// Blocks until every connector has finished.
    fn join(&self);
}

struct GroupState {
    state: InvitationState,
    listeners: ListenerRegistry,
}

/// Races connectors over every transport for one pair of invitation codes.
pub struct ConnectorGroup {
    this: Weak<ConnectorGroup>,
    crypto: Arc<dyn CryptoComponent>,
    transports: Vec<Arc<dyn InvitationTransport>>,
    exchange: Arc<dyn ContactExchange>,
    identity: LocalIdentity,
    config: InvitationConfig,
    local_code: InvitationCode,
    remote_code: InvitationCode,
    role: Role,
    started: AtomicBool,
    connected: AtomicBool,
    confirmation: ConfirmationGate,
    inner: Mutex<GroupState>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectorGroup {
    pub(crate) fn new(
        crypto: Arc<dyn CryptoComponent>,
        transports: Vec<Arc<dyn InvitationTransport>>,
        exchange: Arc<dyn ContactExchange>,
        identity: LocalIdentity,
        config: InvitationConfig,
        local_code: InvitationCode,
        remote_code: InvitationCode,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| ConnectorGroup {
            this: this.clone(),
            crypto,
            transports,
            exchange,
            identity,
            config,
            local_code,
            remote_code,
            role: Role::from_codes(local_code, remote_code),
            started: AtomicBool::new(false),
            connected: AtomicBool::new(false),
            confirmation: ConfirmationGate::new(),
            inner: Mutex::new(GroupState {
                state: InvitationState::new(local_code, remote_code),
                listeners: ListenerRegistry::default(),
            }),
            worker: Mutex::new(None),
        })
    }

    /// Our role, fixed by the code ordering.
    pub fn role(&self) -> Role {
        self.role
    }

    fn lock(&self) -> MutexGuard<'_, GroupState> {
        // The state is plain data; a panicked listener leaves it consistent
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `update` and emits `event` to the listeners registered at
    /// that moment.
    fn update(&self, update: impl FnOnce(&mut InvitationState), event: InvitationEvent) {
        let listeners = {
            let mut inner = self.lock();
            update(&mut inner.state);
            inner.listeners.snapshot()
        };
        debug!(?event, listeners = listeners.len(), "Invitation event");
        dispatch(&listeners, event);
    }

    fn run(self: Arc<Self>) {
        info!(
            role = %self.role,
            local = %self.local_code,
            remote = %self.remote_code,
            identity = %self.identity.fingerprint(),
            "Starting invitation"
        );

        let (alice_code, bob_code) = self
            .role
            .alice_first(self.local_code.value(), self.remote_code.value());

        let mut workers = Vec::new();
        for transport in &self.transports {
            let id = transport.id();
            if !transport.supports_invitations() {
                debug!(transport = %id, "Transport does not support invitations");
                continue;
            }
            let core = ConnectorCore::new(
                Arc::clone(&self),
                Arc::clone(&self.crypto),
                Arc::clone(&self.exchange),
                Arc::clone(transport),
                self.identity.clone(),
                self.config.clone(),
                self.crypto.pseudo_random(alice_code, bob_code),
                self.role,
            );
            let connector: Box<dyn Connector> = match self.role {
                Role::Alice => Box::new(AliceConnector::new(core)),
                Role::Bob => Box::new(BobConnector::new(core)),
            };
            match thread::Builder::new()
                .name(format!("invitation-{id}"))
                .spawn(move || connector.run())
            {
                Ok(handle) => workers.push((id, handle)),
                Err(e) => warn!(transport = %id, error = %e, "Failed to spawn connector"),
            }
        }

        for (id, handle) in workers {
            match handle.join() {
                Ok(Ok(state)) => {
                    debug_assert!(state.is_terminal());
                    debug!(transport = %id, ?state, "Connector finished");
                }
                Ok(Err(e)) => warn!(transport = %id, error = %e, "Connector stopped"),
                Err(_) => error!(transport = %id, "Connector panicked"),
            }
        }

        if !self.connected.load(Ordering::SeqCst) {
            info!("No transport connected");
            self.update(
                |s| s.connection_failed = true,
                InvitationEvent::ConnectionFailed,
            );
        }
    }

    /// Sets the connection flag and returns its previous value. Exactly one
    /// caller ever sees `false`.
    pub(crate) fn get_and_set_connected(&self) -> bool {
        self.connected.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn connection_succeeded(&self) {
        self.update(
            |s| s.connected = true,
            InvitationEvent::ConnectionSucceeded,
        );
    }

    pub(crate) fn key_agreement_succeeded(&self, local: ConfirmationCode, remote: ConfirmationCode) {
        self.update(
            |s| {
                s.local_confirmation_code = Some(local);
                s.remote_confirmation_code = Some(remote);
            },
            InvitationEvent::KeyAgreementSucceeded {
                local_code: local,
                remote_code: remote,
            },
        );
    }

    pub(crate) fn key_agreement_failed(&self) {
        self.update(|_| {}, InvitationEvent::KeyAgreementFailed);
    }

    pub(crate) fn remote_confirmation_succeeded(&self) {
        self.update(
            |s| {
                s.remote_compared = true;
                s.remote_matched = true;
            },
            InvitationEvent::RemoteConfirmationSucceeded,
        );
    }

    pub(crate) fn remote_confirmation_failed(&self) {
        self.update(
            |s| {
                s.remote_compared = true;
                s.remote_matched = false;
            },
            InvitationEvent::RemoteConfirmationFailed,
        );
    }

    /// Blocks until the local human decides, failing closed on timeout.
    pub(crate) fn wait_for_local_confirmation(&self) -> InvitationResult<bool> {
        let matched = self.confirmation.wait(self.config.confirmation_timeout())?;
        if self.confirmation.decision().is_none() {
            info!("Timed out waiting for local confirmation");
        }
        Ok(matched)
    }

    fn set_local_confirmation(&self, matched: bool) {
        let mut inner = self.lock();
        match self.confirmation.release(matched) {
            Ok(true) => {
                inner.state.local_compared = true;
                inner.state.local_matched = matched;
                debug!(matched, "Local confirmation recorded");
            }
            Ok(false) => warn!(matched, "Local confirmation already given, ignoring"),
            Err(e) => error!(error = %e, "Failed to record local confirmation"),
        }
    }
}

impl InvitationTask for ConnectorGroup {
    fn connect(&self) -> InvitationResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Invitation already started");
            return Ok(());
        }
        let group = self.this.upgrade().ok_or(InvitationError::Interrupted)?;
        let handle = thread::Builder::new()
            .name("invitation-group".into())
            .spawn(move || group.run())?;
        let mut worker = self.worker.lock().map_err(|_| InvitationError::Interrupted)?;
        *worker = Some(handle);
        Ok(())
    }

    fn add_listener(&self, listener: Arc<dyn InvitationListener>) -> InvitationState {
        let mut inner = self.lock();
        inner.listeners.add(listener);
        debug!(listeners = inner.listeners.len(), "Listener added");
        inner.state.clone()
    }

    fn remove_listener(&self, listener: &Arc<dyn InvitationListener>) {
        self.lock().listeners.remove(listener);
    }

    fn local_confirmation_succeeded(&self) {
        self.set_local_confirmation(true);
    }

    fn local_confirmation_failed(&self) {
        self.set_local_confirmation(false);
    }

    fn state(&self) -> InvitationState {
        self.lock().state.clone()
    }

    fn join(&self) {
        let handle = match self.worker.lock() {
            Ok(mut worker) => worker.take(),
            Err(_) => return,
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("Invitation worker panicked");
            }
        }
    }
}

impl ContactExchangeListener for ConnectorGroup {
    fn pseudonym_exchange_succeeded(&self, remote_name: &str) {
        let name = remote_name.to_string();
        self.update(
            |s| s.remote_name = Some(name.clone()),
            InvitationEvent::PseudonymExchangeSucceeded { remote_name: name.clone() },
        );
    }

    fn pseudonym_exchange_failed(&self) {
        self.update(|_| {}, InvitationEvent::PseudonymExchangeFailed);
    }
}
