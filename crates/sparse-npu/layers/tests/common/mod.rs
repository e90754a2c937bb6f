// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for layer integration tests

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sparse_npu_neural::Synapse;

/// Random synapses with weights in [-1.0, 1.0) Q16, small enough that no
/// accumulator can saturate for fan-in below ~16k.
pub fn random_synapses(n_in: u32, n_out: u32, count: usize, seed: u64) -> Vec<Synapse> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Synapse::new(
                rng.gen_range(-65_536i32..65_536),
                rng.gen_range(0..n_in),
                rng.gen_range(0..n_out),
            )
        })
        .collect()
}

/// Fan-in concentrated on the first few outputs
pub fn skewed_synapses(n_in: u32, n_out: u32, count: usize, seed: u64) -> Vec<Synapse> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let dst = if i % 10 < 8 { (i % 3) as u32 % n_out } else { rng.gen_range(0..n_out) };
            Synapse::new(rng.gen_range(-8_192i32..8_192), rng.gen_range(0..n_in), dst)
        })
        .collect()
}

/// Activations in the symmetric range -127..=127
pub fn random_input(n_in: u32, seed: u64) -> Vec<i8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_in).map(|_| rng.gen_range(-127i8..=127)).collect()
}

pub fn shuffled(synapses: &[Synapse], seed: u64) -> Vec<Synapse> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut copy = synapses.to_vec();
    copy.shuffle(&mut rng);
    copy
}
