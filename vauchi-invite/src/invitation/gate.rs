// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Confirmation Gate
//!
//! Single-shot wait condition released by the local human's decision.
//! Waiters that time out read "not matched".

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use super::InvitationError;

/// One-time-settable boolean with a fail-closed timeout.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    decision: Mutex<Option<bool>>,
    released: Condvar,
}

impl ConfirmationGate {
    /// Creates an unreleased gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settles the gate. Returns false if it was already settled, in which
    /// case the earlier decision stands.
    pub fn release(&self, matched: bool) -> Result<bool, InvitationError> {
        let mut decision = self
            .decision
            .lock()
            .map_err(|_| InvitationError::Interrupted)?;
        if decision.is_some() {
            return Ok(false);
        }
        *decision = Some(matched);
        self.released.notify_all();
        Ok(true)
    }

    /// Returns the decision if it has been made.
    pub fn decision(&self) -> Option<bool> {
        self.decision.lock().ok().and_then(|d| *d)
    }

    /// Blocks until released or `timeout` elapses.
    ///
    /// An expired wait yields `false`. A poisoned lock means another worker
    /// panicked mid-decision and is reported as an interruption.
    pub fn wait(&self, timeout: Duration) -> Result<bool, InvitationError> {
        let deadline = Instant::now() + timeout;
        let mut decision = self
            .decision
            .lock()
            .map_err(|_| InvitationError::Interrupted)?;

        while decision.is_none() {
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            let (guard, _) = self
                .released
                .wait_timeout(decision, deadline - now)
                .map_err(|_| InvitationError::Interrupted)?;
            decision = guard;
        }

        Ok(decision.unwrap_or(false))
    }
}
