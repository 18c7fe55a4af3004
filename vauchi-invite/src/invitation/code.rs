// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Invitation and Confirmation Codes
//!
//! Both kinds of code are shown to humans as six digits.
//! Invitation codes are public and only pick roles and rendezvous
//! parameters; confirmation codes are derived from the master secret.

use std::fmt;
use std::str::FromStr;

use ring::rand::{SecureRandom, SystemRandom};

use super::InvitationError;
use crate::crypto::CODE_MODULUS;

/// Largest valid code value.
pub const MAX_CODE: u32 = CODE_MODULUS - 1;

/// A code shown on one device and typed or discovered on the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvitationCode(u32);

impl InvitationCode {
    /// Wraps a code value, rejecting anything above [`MAX_CODE`].
    pub fn new(value: u32) -> Result<Self, InvitationError> {
        if value > MAX_CODE {
            return Err(InvitationError::InvalidCode(format!(
                "{value} exceeds {MAX_CODE}"
            )));
        }
        Ok(InvitationCode(value))
    }

    /// Generates a random code.
    pub fn generate() -> Result<Self, InvitationError> {
        let rng = SystemRandom::new();
        let mut bytes = [0u8; 4];
        rng.fill(&mut bytes)
            .map_err(|_| InvitationError::InvalidCode("system RNG failed".into()))?;
        Ok(InvitationCode(u32::from_be_bytes(bytes) % CODE_MODULUS))
    }

    /// Returns the numeric value.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for InvitationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

impl FromStr for InvitationCode {
    type Err = InvitationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvitationError::InvalidCode(format!(
                "'{trimmed}' is not a number"
            )));
        }
        let value: u32 = trimmed
            .parse()
            .map_err(|_| InvitationError::InvalidCode(format!("'{trimmed}' is out of range")))?;
        InvitationCode::new(value)
    }
}

/// A code derived from the master secret for human comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfirmationCode(u32);

impl ConfirmationCode {
    /// Wraps a derived code value.
    pub fn new(value: u32) -> Self {
        ConfirmationCode(value % CODE_MODULUS)
    }

    /// Returns the numeric value.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// Which side of the protocol we play. Alice sends first at every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Alice,
    Bob,
}

impl Role {
    /// The side with the numerically smaller invitation code is Alice.
    pub fn from_codes(local: InvitationCode, remote: InvitationCode) -> Role {
        if local < remote {
            Role::Alice
        } else {
            Role::Bob
        }
    }

    /// Whether this is Alice.
    pub fn is_alice(self) -> bool {
        self == Role::Alice
    }

    /// Orders `(local, remote)` as `(alice, bob)`.
    pub fn alice_first<T>(self, local: T, remote: T) -> (T, T) {
        match self {
            Role::Alice => (local, remote),
            Role::Bob => (remote, local),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Alice => f.write_str("Alice"),
            Role::Bob => f.write_str("Bob"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_in_range() {
        for _ in 0..100 {
            assert!(InvitationCode::generate().unwrap().value() <= MAX_CODE);
        }
    }

    #[test]
    fn test_display_is_six_digits() {
        assert_eq!(InvitationCode::new(42).unwrap().to_string(), "000042");
        assert_eq!(ConfirmationCode::new(123456).to_string(), "123456");
    }

    #[test]
    fn test_parse() {
        assert_eq!("000042".parse::<InvitationCode>().unwrap().value(), 42);
        assert_eq!(" 999999 ".parse::<InvitationCode>().unwrap().value(), MAX_CODE);
        assert!("1000000".parse::<InvitationCode>().is_err());
        assert!("-1".parse::<InvitationCode>().is_err());
        assert!("12a456".parse::<InvitationCode>().is_err());
        assert!("".parse::<InvitationCode>().is_err());
        assert!("99999999999".parse::<InvitationCode>().is_err());
    }

    #[test]
    fn test_role_from_codes() {
        let low = InvitationCode::new(123456).unwrap();
        let high = InvitationCode::new(654321).unwrap();

        assert_eq!(Role::from_codes(low, high), Role::Alice);
        assert_eq!(Role::from_codes(high, low), Role::Bob);
    }

    #[test]
    fn test_alice_first() {
        assert_eq!(Role::Alice.alice_first(1, 2), (1, 2));
        assert_eq!(Role::Bob.alice_first(1, 2), (2, 1));
    }
}
