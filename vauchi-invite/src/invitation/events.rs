// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Invitation Events
//!
//! Callbacks fired while an invitation attempt progresses.

use std::sync::Arc;

use super::ConfirmationCode;

/// Milestones of an invitation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationEvent {
    /// A transport connection won the race.
    ConnectionSucceeded,
    /// No transport produced a connection.
    ConnectionFailed,
    /// Key agreement finished; show `local_code` and ask the user to compare
    /// it with the peer's screen.
    KeyAgreementSucceeded {
        local_code: ConfirmationCode,
        remote_code: ConfirmationCode,
    },
    /// Key agreement failed (I/O error or possible tampering).
    KeyAgreementFailed,
    /// The peer's human reported matching codes.
    RemoteConfirmationSucceeded,
    /// The peer's human reported a mismatch, timed out, or the connection
    /// dropped while exchanging results.
    RemoteConfirmationFailed,
    /// The contact exchange learned the peer's name.
    PseudonymExchangeSucceeded { remote_name: String },
    /// The contact exchange failed.
    PseudonymExchangeFailed,
}

/// Receives invitation events.
///
/// Called from worker threads, outside the group's lock. Implementations
/// must not call back into the group synchronously from `on_event`.
pub trait InvitationListener: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: InvitationEvent);
}

/// Closure-based listener.
pub struct CallbackListener<F>
where
    F: Fn(InvitationEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackListener<F>
where
    F: Fn(InvitationEvent) + Send + Sync,
{
    /// Wraps a closure.
    pub fn new(callback: F) -> Self {
        CallbackListener { callback }
    }

    /// Wraps a closure ready for `add_listener`.
    pub fn shared(callback: F) -> Arc<Self> {
        Arc::new(Self::new(callback))
    }
}

impl<F> InvitationListener for CallbackListener<F>
where
    F: Fn(InvitationEvent) + Send + Sync,
{
    fn on_event(&self, event: InvitationEvent) {
        (self.callback)(event);
    }
}

/// Registered listeners. Lives inside the group's locked state.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: Vec<Arc<dyn InvitationListener>>,
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, listener: Arc<dyn InvitationListener>) {
        self.listeners.push(listener);
    }

    /// Removes every registration of `listener` (compared by address).
    pub(crate) fn remove(&mut self, listener: &Arc<dyn InvitationListener>) {
        let target = Arc::as_ptr(listener) as *const ();
        self.listeners
            .retain(|l| Arc::as_ptr(l) as *const () != target);
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Copy of the current registrations, to notify after unlocking.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn InvitationListener>> {
        self.listeners.clone()
    }
}

/// Delivers one event to a snapshot of listeners.
pub(crate) fn dispatch(listeners: &[Arc<dyn InvitationListener>], event: InvitationEvent) {
    for listener in listeners {
        listener.on_event(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_remove_by_identity() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_a = Arc::clone(&seen);
        let seen_b = Arc::clone(&seen);

        let a: Arc<dyn InvitationListener> =
            CallbackListener::shared(move |e| seen_a.lock().unwrap().push(("a", e)));
        let b: Arc<dyn InvitationListener> =
            CallbackListener::shared(move |e| seen_b.lock().unwrap().push(("b", e)));

        let mut registry = ListenerRegistry::default();
        registry.add(Arc::clone(&a));
        registry.add(Arc::clone(&b));
        registry.remove(&a);
        assert_eq!(registry.len(), 1);

        dispatch(&registry.snapshot(), InvitationEvent::ConnectionSucceeded);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("b", InvitationEvent::ConnectionSucceeded)]
        );
    }
}
