// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deterministic Pseudo-Random Stream
//!
//! Both peers seed this from the same pair of invitation codes so transports
//! can derive matching rendezvous parameters (service names, ports, tokens)
//! without talking first. It is not a secret: the codes are public.

use ring::{digest, hmac};
use zeroize::Zeroize;

const SEED_LABEL: &[u8] = b"Vauchi_Invitation_Rendezvous";

/// HMAC-SHA256 counter-mode stream keyed by the invitation codes.
pub struct PseudoRandom {
    key: hmac::Key,
    seed: [u8; 32],
    counter: u64,
    buffer: Vec<u8>,
}

impl std::fmt::Debug for PseudoRandom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PseudoRandom")
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

impl Drop for PseudoRandom {
    fn drop(&mut self) {
        self.seed.zeroize();
        self.buffer.zeroize();
    }
}

impl PseudoRandom {
    /// Seeds a stream from two invitation codes.
    ///
    /// Order matters: callers pass `(alice_code, bob_code)` so that both
    /// peers end up with the same stream.
    pub fn new(seed1: u32, seed2: u32) -> Self {
        let mut ctx = digest::Context::new(&digest::SHA256);
        ctx.update(SEED_LABEL);
        ctx.update(&seed1.to_be_bytes());
        ctx.update(&seed2.to_be_bytes());

        let mut seed = [0u8; 32];
        seed.copy_from_slice(ctx.finish().as_ref());

        PseudoRandom {
            key: hmac::Key::new(hmac::HMAC_SHA256, &seed),
            seed,
            counter: 0,
            buffer: Vec::new(),
        }
    }

    /// Returns the next `length` bytes of the stream.
    pub fn next_bytes(&mut self, length: usize) -> Vec<u8> {
        while self.buffer.len() < length {
            let block = hmac::sign(&self.key, &self.counter.to_be_bytes());
            self.buffer.extend_from_slice(block.as_ref());
            self.counter += 1;
        }
        self.buffer.drain(..length).collect()
    }

    /// Returns the next 32-bit value of the stream.
    pub fn next_u32(&mut self) -> u32 {
        let bytes = self.next_bytes(4);
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = PseudoRandom::new(123456, 654321);
        let mut b = PseudoRandom::new(123456, 654321);

        assert_eq!(a.next_bytes(10), b.next_bytes(10));
        assert_eq!(a.next_bytes(50), b.next_bytes(50));
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_seed_order_matters() {
        let mut a = PseudoRandom::new(1, 2);
        let mut b = PseudoRandom::new(2, 1);
        assert_ne!(a.next_bytes(16), b.next_bytes(16));
    }

    #[test]
    fn test_chunking_does_not_change_stream() {
        let mut whole = PseudoRandom::new(7, 9);
        let mut pieces = PseudoRandom::new(7, 9);

        let expected = whole.next_bytes(70);
        let mut actual = pieces.next_bytes(3);
        actual.extend(pieces.next_bytes(33));
        actual.extend(pieces.next_bytes(34));
        assert_eq!(expected, actual);
    }
}
