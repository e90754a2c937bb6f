// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Synaptic contribution calculation
//!
//! The per-synapse arithmetic both strategies share:
//! `contrib = (weight × input) >> 7`
//!
//! Where:
//! - `weight`: Q16 (16 fractional bits)
//! - `input`: Q7 activation in -127..=127
//! - the product carries 23 fractional bits; the arithmetic shift floors it
//!   back to Q16 (`-1 >> 7 == -1`, not 0)

use core::fmt;
use core::str::FromStr;

/// Fractional bits of a weight and of the accumulator
pub const WEIGHT_FRAC_BITS: u32 = 16;
/// Fractional bits of an input/output activation
pub const INPUT_FRAC_BITS: u32 = 7;
/// Fractional bits of `weight × input`
pub const PRODUCT_FRAC_BITS: u32 = WEIGHT_FRAC_BITS + INPUT_FRAC_BITS;
/// Shift that brings a product back into accumulator space
pub const CONTRIB_SHIFT: u32 = PRODUCT_FRAC_BITS - WEIGHT_FRAC_BITS;
/// Largest magnitude of an activation (symmetric range, -128 is never produced)
pub const ACTIVATION_MAX: i8 = 127;

/// What happens when a value leaves the 32-bit accumulator range.
///
/// `Saturating` pins at `i32::MIN`/`i32::MAX`. Saturation is not associative,
/// so once an accumulator saturates its final value depends on summation order.
///
/// `Wrapping` uses two's-complement arithmetic. Wrapping addition is
/// associative and commutative, so every strategy yields bit-identical
/// accumulators even under overflow, at the price of sign flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OverflowPolicy {
    #[default]
    Saturating,
    Wrapping,
}

impl OverflowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverflowPolicy::Saturating => "saturating",
            OverflowPolicy::Wrapping => "wrapping",
        }
    }

    /// Narrow a 64-bit intermediate to the accumulator width.
    #[inline(always)]
    pub fn narrow(self, value: i64) -> i32 {
        match self {
            OverflowPolicy::Saturating => value.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            OverflowPolicy::Wrapping => value as i32,
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saturating" | "saturate" => Ok(OverflowPolicy::Saturating),
            "wrapping" | "wrap" => Ok(OverflowPolicy::Wrapping),
            other => Err(format!(
                "unknown overflow policy '{}' (expected 'saturating' or 'wrapping')",
                other
            )),
        }
    }
}

/// Calculate the Q16 contribution of one synapse
///
/// The product is formed in 64 bits so it never overflows; only the final
/// narrowing to 32 bits honours `policy`. With inputs in -127..=127 the shifted
/// product always fits; `input == -128` with `weight == i32::MIN` is the one
/// case that needs narrowing.
///
/// # Example
/// ```
/// use sparse_npu_neural::synapse::{compute_contribution, OverflowPolicy};
///
/// // 1.0 × (127/128) in Q16
/// assert_eq!(compute_contribution(65536, 127, OverflowPolicy::Saturating), 65024);
/// // Arithmetic shift floors toward negative infinity
/// assert_eq!(compute_contribution(-1, 1, OverflowPolicy::Saturating), -1);
/// ```
#[inline(always)]
pub fn compute_contribution(weight: i32, input: i8, policy: OverflowPolicy) -> i32 {
    let product = weight as i64 * input as i64;
    policy.narrow(product >> CONTRIB_SHIFT)
}

/// Add a contribution into an accumulator under `policy`
///
/// # Example
/// ```
/// use sparse_npu_neural::synapse::{accumulate, OverflowPolicy};
///
/// assert_eq!(accumulate(i32::MAX, 1, OverflowPolicy::Saturating), i32::MAX);
/// assert_eq!(accumulate(i32::MAX, 1, OverflowPolicy::Wrapping), i32::MIN);
/// ```
#[inline(always)]
pub fn accumulate(acc: i32, contribution: i32, policy: OverflowPolicy) -> i32 {
    match policy {
        OverflowPolicy::Saturating => acc.saturating_add(contribution),
        OverflowPolicy::Wrapping => acc.wrapping_add(contribution),
    }
}
