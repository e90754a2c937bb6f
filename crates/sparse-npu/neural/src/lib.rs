// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Sparse NPU Neural Primitives
//!
//! Everything a sparse layer needs before any parallelism enters the picture:
//! - **Types**: `Synapse`, `Q16` weights, error taxonomy
//! - **Synapse**: fixed-point contribution and accumulation arithmetic
//! - **Activation**: the compression contract from a Q16 accumulator to `i8`
//!
//! ## Numeric format
//! ```text
//! weight      Q16   (16 fractional bits, i32)
//! input       Q7    (-127..=127, i8)
//! product     Q23   (formed in i64)
//! contrib     Q16   (product >> 7, arithmetic shift, floor)
//! accumulator Q16   (i32, saturating or wrapping)
//! output      Q7    (activation(accumulator), -127..=127)
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod activation;
pub mod synapse;
pub mod types;

pub use activation::{clamp_output, Activation, HardSigmoid, TanhLut};
pub use synapse::{
    accumulate, compute_contribution, q16_from_f32, q16_to_f32, OverflowPolicy, ACTIVATION_MAX,
    CONTRIB_SHIFT, INPUT_FRAC_BITS, PRODUCT_FRAC_BITS, Q16_ONE, WEIGHT_FRAC_BITS,
};
pub use types::{validate_synapses, LayerError, Result, StrategyKind, Synapse, Q16};
