// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Activation compression
//!
//! Maps a Q16 accumulator to a Q7 output activation in -127..=127. Layers treat
//! the function as an injected collaborator; any `Fn(i32) -> i8 + Send + Sync`
//! closure qualifies. Two stock implementations are provided:
//!
//! - [`HardSigmoid`]: `clamp(acc >> 9, -127, 127)`, exact Q16 → Q7 with saturation
//! - [`TanhLut`]: smooth `tanh` curve sampled into a 256-entry table
//!
//! Contract: monotonic non-decreasing, output in -127..=127, deterministic.

use crate::synapse::{ACTIVATION_MAX, INPUT_FRAC_BITS, WEIGHT_FRAC_BITS};

/// Compress a Q16 accumulator into an output activation.
pub trait Activation: Send + Sync {
    fn compress(&self, accumulator: i32) -> i8;

    /// Name for logging/debugging
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> Activation for F
where
    F: Fn(i32) -> i8 + Send + Sync,
{
    #[inline(always)]
    fn compress(&self, accumulator: i32) -> i8 {
        self(accumulator)
    }
}

/// Pin a value into the symmetric output range (-128 becomes -127).
#[inline(always)]
pub fn clamp_output(value: i8) -> i8 {
    value.max(-ACTIVATION_MAX)
}

/// Piecewise-linear saturating sigmoid: Q16 → Q7, clamped to ±127.
///
/// `1.0` (65536) and anything above maps to 127; `0` maps to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HardSigmoid;

impl Activation for HardSigmoid {
    #[inline(always)]
    fn compress(&self, accumulator: i32) -> i8 {
        let q7 = accumulator >> (WEIGHT_FRAC_BITS - INPUT_FRAC_BITS);
        q7.clamp(-(ACTIVATION_MAX as i32), ACTIVATION_MAX as i32) as i8
    }

    fn name(&self) -> &'static str {
        "hard_sigmoid"
    }
}

/// Table index resolution: Q16 >> 11 gives steps of 1/32
const LUT_SHIFT: u32 = 11;
const LUT_STEPS_PER_UNIT: f64 = 32.0;

/// `tanh` sampled into 256 entries covering accumulators in [-4.0, 4.0).
///
/// `table[i + 128] = round(tanh(gain * i / 32) * 127)` for `i` in -128..=127.
/// Accumulators outside the covered range clamp to the end entries. Built once
/// at construction; lookups are a shift, a clamp and an index.
#[derive(Debug, Clone)]
pub struct TanhLut {
    gain: f64,
    table: [i8; 256],
}

impl TanhLut {
    /// Build the table. `gain` must be positive for the curve to be increasing.
    pub fn new(gain: f64) -> Self {
        let mut table = [0i8; 256];
        for (slot, value) in table.iter_mut().enumerate() {
            let x = (slot as f64 - 128.0) / LUT_STEPS_PER_UNIT;
            let y = (gain * x).tanh() * ACTIVATION_MAX as f64;
            *value = y.round().clamp(-(ACTIVATION_MAX as f64), ACTIVATION_MAX as f64) as i8;
        }
        Self { gain, table }
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn table(&self) -> &[i8; 256] {
        &self.table
    }
}

impl Default for TanhLut {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Activation for TanhLut {
    #[inline(always)]
    fn compress(&self, accumulator: i32) -> i8 {
        let idx = (accumulator >> LUT_SHIFT).clamp(-128, 127) + 128;
        self.table[idx as usize]
    }

    fn name(&self) -> &'static str {
        "tanh_lut"
    }
}
