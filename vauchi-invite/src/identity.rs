// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local Identity
//!
//! The identity handed to the contact exchange once a pairing succeeds.
//! Long-term keys live elsewhere; the invitation core only passes this along.

/// Identity of the local user for one invitation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    id: [u8; 32],
    name: String,
}

impl LocalIdentity {
    /// Creates a local identity.
    pub fn new(id: [u8; 32], name: impl Into<String>) -> Self {
        LocalIdentity {
            id,
            name: name.into(),
        }
    }

    /// Returns the identity ID.
    pub fn id(&self) -> &[u8; 32] {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a short hex fingerprint of the ID, safe to log.
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.id[..4])
    }
}
