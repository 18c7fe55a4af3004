// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Property-Based Tests
//!
//! Properties of the key agreement, code derivation and record codec that
//! should hold for all inputs.

use proptest::prelude::*;

use vauchi_invite::invitation::MAX_CODE;
use vauchi_invite::{
    AgreementKeyPair, CryptoComponent, DefaultCryptoComponent, InvitationCode, PseudoRandom,
    RecordReadExt, RecordWriteExt, Role,
};

fn bytes32_strategy() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

fn distinct_codes_strategy() -> impl Strategy<Value = (u32, u32)> {
    (0..=MAX_CODE, 0..=MAX_CODE).prop_filter("distinct", |(a, b)| a != b)
}

// ============================================================
// Key Agreement
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: both roles derive the same secret and the same pair of codes
    #[test]
    fn prop_both_roles_agree(alice_seed in bytes32_strategy(), bob_seed in bytes32_strategy()) {
        prop_assume!(alice_seed != bob_seed);
        let crypto = DefaultCryptoComponent::new();
        let alice = AgreementKeyPair::from_bytes(alice_seed);
        let bob = AgreementKeyPair::from_bytes(bob_seed);

        let alice_secret = crypto
            .derive_master_secret(bob.public_key().as_bytes(), &alice, true)
            .unwrap();
        let bob_secret = crypto
            .derive_master_secret(alice.public_key().as_bytes(), &bob, false)
            .unwrap();
        prop_assert_eq!(&alice_secret, &bob_secret);

        for for_alice in [true, false] {
            let code = crypto.derive_confirmation_code(&alice_secret, for_alice);
            prop_assert!(code <= MAX_CODE);
            prop_assert_eq!(code, crypto.derive_confirmation_code(&bob_secret, for_alice));
        }
    }

    /// Property: a commitment only opens to the key it was made for
    #[test]
    fn prop_commitment_binds_key(a in bytes32_strategy(), b in bytes32_strategy()) {
        let crypto = DefaultCryptoComponent::new();
        let commitment = crypto.commitment(&a);

        prop_assert!(crypto.verify_commitment(&commitment, &a).is_ok());
        if a != b {
            prop_assert!(crypto.verify_commitment(&commitment, &b).is_err());
        }
    }
}

// ============================================================
// Roles and Rendezvous
// ============================================================

proptest! {
    /// Property: two distinct codes always yield one Alice and one Bob
    #[test]
    fn prop_roles_are_complementary((a, b) in distinct_codes_strategy()) {
        let a = InvitationCode::new(a).unwrap();
        let b = InvitationCode::new(b).unwrap();

        let ours = Role::from_codes(a, b);
        let theirs = Role::from_codes(b, a);
        prop_assert_ne!(ours, theirs);
        prop_assert_eq!(
            ours.alice_first(a.value(), b.value()),
            theirs.alice_first(b.value(), a.value())
        );
    }

    /// Property: peers seeding from the same ordered codes draw the same stream
    #[test]
    fn prop_pseudo_random_is_deterministic((a, b) in distinct_codes_strategy()) {
        let mut ours = PseudoRandom::new(a, b);
        let mut theirs = PseudoRandom::new(a, b);
        let mut swapped = PseudoRandom::new(b, a);

        let first = ours.next_bytes(40);
        prop_assert_eq!(&first, &theirs.next_bytes(40));
        prop_assert_ne!(first, swapped.next_bytes(40));
    }

    /// Property: displayed codes parse back to the same value
    #[test]
    fn prop_invitation_code_display_parses(value in 0..=MAX_CODE) {
        let code = InvitationCode::new(value).unwrap();
        let shown = code.to_string();

        prop_assert_eq!(shown.len(), 6);
        prop_assert_eq!(shown.parse::<InvitationCode>().unwrap(), code);
    }
}

// ============================================================
// Record Codec
// ============================================================

proptest! {
    /// Property: readers never accept a raw record longer than their bound
    #[test]
    fn prop_read_raw_enforces_bound(payload in prop::collection::vec(any::<u8>(), 0..128), max in 0usize..128) {
        let mut buf = Vec::new();
        buf.write_raw(&payload).unwrap();

        let result = buf.as_slice().read_raw(max);
        if payload.len() <= max {
            prop_assert_eq!(result.unwrap(), payload);
        } else {
            prop_assert!(result.is_err());
        }
    }
}
