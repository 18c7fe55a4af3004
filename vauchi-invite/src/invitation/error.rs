// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Invitation Error Types

use std::io;

use thiserror::Error;

use crate::codec::CodecError;
use crate::crypto::CryptoError;

/// Errors that can end an invitation attempt or reject its setup.
#[derive(Error, Debug)]
pub enum InvitationError {
    /// Connection-level I/O failed.
    #[error("Transport error: {0}")]
    Transport(#[from] io::Error),

    /// A record could not be read or written.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Key parsing, agreement or commitment verification failed.
    #[error("Security failure: {0}")]
    Security(#[from] CryptoError),

    /// A received commitment had the wrong size.
    #[error("Invalid commitment length: {0} bytes")]
    InvalidCommitment(usize),

    /// The worker was interrupted while blocked.
    #[error("Interrupted while waiting for confirmation")]
    Interrupted,

    #[error("Invalid invitation code: {0}")]
    InvalidCode(String),

    /// Both sides hold the same code, so neither can take a role.
    #[error("Local and remote invitation codes are identical")]
    IdenticalCodes,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl InvitationError {
    /// True for failures that indicate possible tampering rather than a
    /// flaky transport.
    pub fn is_security_failure(&self) -> bool {
        matches!(
            self,
            InvitationError::Security(_) | InvitationError::InvalidCommitment(_)
        )
    }
}

/// Result type for invitation operations.
pub type InvitationResult<T> = Result<T, InvitationError>;
