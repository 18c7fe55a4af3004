// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Invitation State Snapshot

use super::{ConfirmationCode, InvitationCode};

/// Group-wide progress of one invitation attempt.
///
/// A value copy taken under the group's lock; it never changes after it is
/// handed out. Call `ConnectorGroup::state` again for a fresh view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationState {
    /// Code shown on this device.
    pub local_invitation_code: InvitationCode,
    /// Code entered for (or discovered from) the peer.
    pub remote_invitation_code: InvitationCode,
    /// Our confirmation code, once key agreement succeeded.
    pub local_confirmation_code: Option<ConfirmationCode>,
    /// The peer's confirmation code, once key agreement succeeded.
    pub remote_confirmation_code: Option<ConfirmationCode>,
    /// A transport connection won the race.
    pub connected: bool,
    /// Every transport gave up without connecting.
    pub connection_failed: bool,
    /// The local human has compared the codes.
    pub local_compared: bool,
    /// The peer's human has compared the codes.
    pub remote_compared: bool,
    /// The local human reported a match.
    pub local_matched: bool,
    /// The peer's human reported a match.
    pub remote_matched: bool,
    /// The peer's name, once the pseudonym exchange succeeded.
    pub remote_name: Option<String>,
}

impl InvitationState {
    /// Fresh state for a new attempt.
    pub fn new(local: InvitationCode, remote: InvitationCode) -> Self {
        InvitationState {
            local_invitation_code: local,
            remote_invitation_code: remote,
            local_confirmation_code: None,
            remote_confirmation_code: None,
            connected: false,
            connection_failed: false,
            local_compared: false,
            remote_compared: false,
            local_matched: false,
            remote_matched: false,
            remote_name: None,
        }
    }

    /// Whether both humans reported matching codes.
    pub fn both_matched(&self) -> bool {
        self.local_matched && self.remote_matched
    }
}
