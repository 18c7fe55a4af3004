// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! HKDF Key Derivation Function
//!
//! HKDF-SHA256 (RFC 5869) over `ring::hmac`. Used to turn the raw X25519
//! output into the master secret and to expand confirmation codes from it.

use ring::hmac;

use super::CryptoError;

const HASH_LEN: usize = 32;
const MAX_OUTPUT: usize = 255 * HASH_LEN;

/// HKDF-SHA256 key derivation.
pub struct HKDF;

impl HKDF {
    /// PRK = HMAC-SHA256(salt, IKM). A missing salt is HashLen zero bytes.
    pub fn extract(salt: Option<&[u8]>, ikm: &[u8]) -> [u8; HASH_LEN] {
        let zero_salt = [0u8; HASH_LEN];
        let key = hmac::Key::new(hmac::HMAC_SHA256, salt.unwrap_or(&zero_salt));
        let mut prk = [0u8; HASH_LEN];
        prk.copy_from_slice(hmac::sign(&key, ikm).as_ref());
        prk
    }

    /// OKM = T(1) || T(2) || ..., T(i) = HMAC(PRK, T(i-1) || info || i).
    pub fn expand(prk: &[u8; HASH_LEN], info: &[u8], length: usize) -> Result<Vec<u8>, CryptoError> {
        if length > MAX_OUTPUT {
            return Err(CryptoError::KeyDerivation(format!(
                "output length {length} exceeds {MAX_OUTPUT}"
            )));
        }

        let key = hmac::Key::new(hmac::HMAC_SHA256, prk);
        let mut okm = Vec::with_capacity(length.div_ceil(HASH_LEN) * HASH_LEN);
        let mut previous: Vec<u8> = Vec::new();
        let mut counter: u8 = 1;

        while okm.len() < length {
            let mut ctx = hmac::Context::with_key(&key);
            ctx.update(&previous);
            ctx.update(info);
            ctx.update(&[counter]);
            previous = ctx.sign().as_ref().to_vec();
            okm.extend_from_slice(&previous);
            counter = counter.wrapping_add(1);
        }

        okm.truncate(length);
        Ok(okm)
    }

    /// Extract-then-expand into a 32-byte key.
    pub fn derive_key(salt: Option<&[u8]>, ikm: &[u8], info: &[u8]) -> Result<[u8; HASH_LEN], CryptoError> {
        let prk = Self::extract(salt, ikm);
        let okm = Self::expand(&prk, info, HASH_LEN)?;
        let mut key = [0u8; HASH_LEN];
        key.copy_from_slice(&okm);
        Ok(key)
    }
}
