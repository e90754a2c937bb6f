// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Q16 weight conversion
//!
//! Pure functions for moving between `f32` and the Q16 weight format.

use super::contribution::WEIGHT_FRAC_BITS;

/// Raw Q16 representation of `1.0`
pub const Q16_ONE: i32 = 1 << WEIGHT_FRAC_BITS;

/// Convert a float to raw Q16 (round to nearest, saturating at the i32 range)
///
/// # Example
/// ```
/// use sparse_npu_neural::synapse::q16_from_f32;
///
/// assert_eq!(q16_from_f32(1.0), 65536);
/// assert_eq!(q16_from_f32(-0.25), -16384);
/// assert_eq!(q16_from_f32(1.0e12), i32::MAX); // Saturated
/// ```
#[inline]
pub fn q16_from_f32(value: f32) -> i32 {
    // `as` saturates on overflow and maps NaN to 0
    (value * Q16_ONE as f32).round() as i32
}

/// Convert raw Q16 back to a float
///
/// # Example
/// ```
/// use sparse_npu_neural::synapse::q16_to_f32;
///
/// assert_eq!(q16_to_f32(32768), 0.5);
/// ```
#[inline]
pub fn q16_to_f32(raw: i32) -> f32 {
    raw as f32 / Q16_ONE as f32
}
