// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Performance Benchmarks for Invitation Key Agreement
//!
//! Run with: cargo bench -p vauchi-invite

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vauchi_invite::{AgreementKeyPair, CryptoComponent, DefaultCryptoComponent, PseudoRandom};

// =============================================================================
// KEY AGREEMENT BENCHMARKS
// =============================================================================

fn bench_key_agreement(c: &mut Criterion) {
    let crypto = DefaultCryptoComponent::new();
    let alice = AgreementKeyPair::generate();
    let bob = AgreementKeyPair::generate();
    let bob_public = *bob.public_key().as_bytes();

    let mut group = c.benchmark_group("key_agreement");

    group.bench_function("generate_key_pair", |b| {
        b.iter(|| crypto.generate_agreement_key_pair())
    });

    group.bench_function("commitment", |b| {
        b.iter(|| crypto.commitment(black_box(&bob_public)))
    });

    let commitment = crypto.commitment(&bob_public);
    group.bench_function("verify_commitment", |b| {
        b.iter(|| crypto.verify_commitment(black_box(&commitment), black_box(&bob_public)))
    });

    group.bench_function("derive_master_secret", |b| {
        b.iter(|| crypto.derive_master_secret(black_box(&bob_public), &alice, true))
    });

    group.finish();
}

// =============================================================================
// CODE DERIVATION BENCHMARKS
// =============================================================================

fn bench_codes(c: &mut Criterion) {
    let crypto = DefaultCryptoComponent::new();
    let alice = AgreementKeyPair::generate();
    let bob = AgreementKeyPair::generate();
    let secret = crypto
        .derive_master_secret(bob.public_key().as_bytes(), &alice, true)
        .expect("agreement");

    let mut group = c.benchmark_group("codes");

    group.bench_function("confirmation_code", |b| {
        b.iter(|| crypto.derive_confirmation_code(black_box(&secret), true))
    });

    group.bench_function("rendezvous_token", |b| {
        b.iter(|| PseudoRandom::new(black_box(123456), black_box(654321)).next_bytes(16))
    });

    group.finish();
}

criterion_group!(benches, bench_key_agreement, bench_codes);
criterion_main!(benches);
