// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Seeded synthetic layers for benchmarking and cross-strategy checks

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::neural::Synapse;

/// Shape and density of a synthetic layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadSpec {
    pub n_in: u32,
    pub n_out: u32,
    /// Average synapses per output neuron
    pub fan_in: u32,
    /// Percentage (0..=100) of synapses redirected to output 0
    pub hotspot_percent: u8,
    /// Weights are drawn from `-max_weight..=max_weight` (Q16 raw)
    pub max_weight: i32,
    pub seed: u64,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            n_in: 1_024,
            n_out: 1_024,
            fan_in: 64,
            hotspot_percent: 0,
            max_weight: 1 << 14,
            seed: 42,
        }
    }
}

impl WorkloadSpec {
    pub fn synapse_count(&self) -> usize {
        self.n_out as usize * self.fan_in as usize
    }
}

/// A deterministic synapse list for `spec`.
///
/// Empty when either side of the layer is empty.
pub fn random_synapses(spec: &WorkloadSpec) -> Vec<Synapse> {
    if spec.n_in == 0 || spec.n_out == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let max_weight = spec.max_weight.saturating_abs();

    (0..spec.synapse_count())
        .map(|_| {
            let dst = if rng.gen_range(0..100u8) < spec.hotspot_percent {
                0
            } else {
                rng.gen_range(0..spec.n_out)
            };
            Synapse::new(
                rng.gen_range(-max_weight..=max_weight),
                rng.gen_range(0..spec.n_in),
                dst,
            )
        })
        .collect()
}

/// A deterministic input vector in -127..=127
pub fn random_input(n_in: u32, seed: u64) -> Vec<i8> {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
    (0..n_in).map(|_| rng.gen_range(-127i8..=127)).collect()
}
