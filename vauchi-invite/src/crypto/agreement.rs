// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! X25519 Agreement Keys
//!
//! One fresh keypair is generated per connector and dropped with it.

use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};

use super::CryptoError;

/// Length of an encoded X25519 public key.
pub const AGREEMENT_PUBLIC_KEY_LENGTH: usize = 32;

/// Ephemeral X25519 keypair for one invitation attempt.
pub struct AgreementKeyPair {
    secret: StaticSecret,
    public: AgreementPublicKey,
}

impl std::fmt::Debug for AgreementKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgreementKeyPair")
            .field("secret", &"[REDACTED]")
            .field("public", &self.public)
            .finish()
    }
}

impl AgreementKeyPair {
    /// Generates a new random keypair.
    pub fn generate() -> Self {
        Self::from_secret(StaticSecret::random_from_rng(OsRng))
    }

    /// Creates a keypair from a fixed 32-byte scalar (tests and vectors).
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self::from_secret(StaticSecret::from(bytes))
    }

    fn from_secret(secret: StaticSecret) -> Self {
        let public = AgreementPublicKey(*PublicKey::from(&secret).as_bytes());
        AgreementKeyPair { secret, public }
    }

    /// Returns the public half.
    pub fn public_key(&self) -> &AgreementPublicKey {
        &self.public
    }

    /// Performs X25519 with the peer's key.
    ///
    /// Fails if the result is all zeros, which happens when the peer sent a
    /// low-order point to force a known shared secret.
    pub fn agree(&self, their_public: &AgreementPublicKey) -> Result<[u8; 32], CryptoError> {
        let shared = self.secret.diffie_hellman(&PublicKey::from(their_public.0));
        if !shared.was_contributory() {
            return Err(CryptoError::NonContributory);
        }
        Ok(*shared.as_bytes())
    }
}

/// An encoded X25519 public key received from or sent to the peer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AgreementPublicKey([u8; AGREEMENT_PUBLIC_KEY_LENGTH]);

impl std::fmt::Debug for AgreementPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AgreementPublicKey({})", hex::encode(&self.0[..8]))
    }
}

impl AgreementPublicKey {
    /// Wraps raw key bytes without validation.
    pub fn from_bytes(bytes: [u8; AGREEMENT_PUBLIC_KEY_LENGTH]) -> Self {
        AgreementPublicKey(bytes)
    }

    /// Returns the encoded key.
    pub fn as_bytes(&self) -> &[u8; AGREEMENT_PUBLIC_KEY_LENGTH] {
        &self.0
    }
}

/// Parses public keys arriving off the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgreementKeyParser;

impl AgreementKeyParser {
    /// Parses an encoded public key, rejecting anything of the wrong size.
    pub fn parse(&self, encoded: &[u8]) -> Result<AgreementPublicKey, CryptoError> {
        let bytes: [u8; AGREEMENT_PUBLIC_KEY_LENGTH] =
            encoded
                .try_into()
                .map_err(|_| CryptoError::MalformedPublicKey {
                    length: encoded.len(),
                })?;
        Ok(AgreementPublicKey(bytes))
    }
}
