// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cryptographic Provider
//!
//! The invitation protocol only depends on the `CryptoComponent` trait.
//! `DefaultCryptoComponent` implements it with X25519 (`x25519-dalek`),
//! SHA-256 and HKDF-SHA256 (`ring`).

pub mod agreement;
pub mod kdf;
pub mod pseudo_random;

use ring::digest;
use thiserror::Error;
use zeroize::Zeroize;

pub use agreement::{
    AgreementKeyPair, AgreementKeyParser, AgreementPublicKey, AGREEMENT_PUBLIC_KEY_LENGTH,
};
pub use kdf::HKDF;
pub use pseudo_random::PseudoRandom;

/// Length of a commitment hash.
pub const HASH_LENGTH: usize = 32;

/// Length of the master secret.
pub const MASTER_SECRET_LENGTH: usize = 32;

/// Invitation and confirmation codes are taken modulo this (six digits).
pub const CODE_MODULUS: u32 = 1_000_000;

/// Domain separation labels.
pub const COMMIT_LABEL: &[u8] = b"Vauchi_Invitation_Commitment";
const MASTER_SECRET_LABEL: &[u8] = b"Vauchi_Invitation_Master_Secret";
const ALICE_CODE_LABEL: &[u8] = b"Vauchi_Invitation_Alice_Code";
const BOB_CODE_LABEL: &[u8] = b"Vauchi_Invitation_Bob_Code";

/// Cryptographic error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Malformed public key ({length} bytes)")]
    MalformedPublicKey { length: usize },

    #[error("Key agreement produced a non-contributory secret")]
    NonContributory,

    #[error("Public key does not match commitment")]
    CommitmentMismatch,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Shared secret agreed by one successful connector.
///
/// Handed to the contact exchange and never retained by the invitation core.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterSecret([u8; MASTER_SECRET_LENGTH]);

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterSecret([REDACTED])")
    }
}

impl Drop for MasterSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl MasterSecret {
    /// Wraps raw secret bytes.
    pub fn from_bytes(bytes: [u8; MASTER_SECRET_LENGTH]) -> Self {
        MasterSecret(bytes)
    }

    /// Returns the secret bytes.
    pub fn as_bytes(&self) -> &[u8; MASTER_SECRET_LENGTH] {
        &self.0
    }
}

/// Primitives consumed by the invitation protocol.
pub trait CryptoComponent: Send + Sync {
    /// Generates a fresh agreement keypair.
    fn generate_agreement_key_pair(&self) -> AgreementKeyPair;

    /// Returns the parser for agreement public keys received from a peer.
    fn agreement_key_parser(&self) -> AgreementKeyParser;

    /// Hashes `input` under a domain-separation label.
    fn hash(&self, label: &[u8], input: &[u8]) -> [u8; HASH_LENGTH];

    /// Combines the peer's public key with our keypair.
    ///
    /// `alice` is our role, used to put both public keys in the same order
    /// on both sides.
    fn derive_master_secret(
        &self,
        their_public_key: &[u8],
        our_key_pair: &AgreementKeyPair,
        alice: bool,
    ) -> Result<MasterSecret, CryptoError>;

    /// Derives Alice's (`for_alice`) or Bob's confirmation code.
    fn derive_confirmation_code(&self, master_secret: &MasterSecret, for_alice: bool) -> u32;

    /// Returns a stream seeded from two invitation codes.
    fn pseudo_random(&self, seed1: u32, seed2: u32) -> PseudoRandom;

    /// Commitment sent before a public key is revealed.
    fn commitment(&self, public_key: &[u8]) -> [u8; HASH_LENGTH] {
        self.hash(COMMIT_LABEL, public_key)
    }

    /// Checks a revealed public key against the commitment received earlier.
    fn verify_commitment(&self, commitment: &[u8], public_key: &[u8]) -> Result<(), CryptoError> {
        let expected = self.commitment(public_key);
        if commitment.len() != HASH_LENGTH || expected.as_slice() != commitment {
            return Err(CryptoError::CommitmentMismatch);
        }
        Ok(())
    }
}

/// X25519 + SHA-256 + HKDF-SHA256 implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCryptoComponent;

impl DefaultCryptoComponent {
    /// Creates the default provider.
    pub fn new() -> Self {
        DefaultCryptoComponent
    }
}

impl CryptoComponent for DefaultCryptoComponent {
    fn generate_agreement_key_pair(&self) -> AgreementKeyPair {
        AgreementKeyPair::generate()
    }

    fn agreement_key_parser(&self) -> AgreementKeyParser {
        AgreementKeyParser
    }

    fn hash(&self, label: &[u8], input: &[u8]) -> [u8; HASH_LENGTH] {
        // Length-prefix the label so (label, input) splits are unambiguous
        let mut ctx = digest::Context::new(&digest::SHA256);
        ctx.update(&(label.len() as u32).to_be_bytes());
        ctx.update(label);
        ctx.update(input);

        let mut out = [0u8; HASH_LENGTH];
        out.copy_from_slice(ctx.finish().as_ref());
        out
    }

    fn derive_master_secret(
        &self,
        their_public_key: &[u8],
        our_key_pair: &AgreementKeyPair,
        alice: bool,
    ) -> Result<MasterSecret, CryptoError> {
        let theirs = self.agreement_key_parser().parse(their_public_key)?;
        let mut shared = our_key_pair.agree(&theirs)?;

        let ours = our_key_pair.public_key();
        let (alice_key, bob_key) = if alice {
            (ours.as_bytes(), theirs.as_bytes())
        } else {
            (theirs.as_bytes(), ours.as_bytes())
        };

        let mut ikm = Vec::with_capacity(shared.len() + 2 * AGREEMENT_PUBLIC_KEY_LENGTH);
        ikm.extend_from_slice(&shared);
        ikm.extend_from_slice(alice_key);
        ikm.extend_from_slice(bob_key);

        let derived = HKDF::derive_key(Some(MASTER_SECRET_LABEL), &ikm, MASTER_SECRET_LABEL);
        shared.zeroize();
        ikm.zeroize();

        Ok(MasterSecret(derived?))
    }

    fn derive_confirmation_code(&self, master_secret: &MasterSecret, for_alice: bool) -> u32 {
        let label = if for_alice {
            ALICE_CODE_LABEL
        } else {
            BOB_CODE_LABEL
        };
        let prk = HKDF::extract(None, master_secret.as_bytes());
        // Four bytes are always within HKDF's output limit
        let okm = HKDF::expand(&prk, label, 4).unwrap_or_else(|_| vec![0u8; 4]);
        u32::from_be_bytes([okm[0], okm[1], okm[2], okm[3]]) % CODE_MODULUS
    }

    fn pseudo_random(&self, seed1: u32, seed2: u32) -> PseudoRandom {
        PseudoRandom::new(seed1, seed2)
    }
}
