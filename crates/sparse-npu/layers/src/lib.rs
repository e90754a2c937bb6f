// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Sparse Layer Engine
//!
//! Quantized forward pass over a fixed weighted graph between N input and M
//! output neurons. Activations are Q7 `i8`, weights and accumulators Q16.
//!
//! ## Strategies
//! | Strategy | Parallel over | Accumulator | Synchronisation |
//! |----------|---------------|-------------|-----------------|
//! | [`ScatterAccumulateLayer`] | synapses | shared `AtomicI32` per output | atomic add + join between phases |
//! | [`ClusteredAccumulateLayer`] | outputs | private `i32` per task | final join only |
//! | [`SequentialLayer`] | nothing | `Vec<i32>` | none |
//!
//! All three produce identical output for the same synapses and input as long
//! as no accumulator saturates; with `OverflowPolicy::Wrapping` they are
//! identical unconditionally.
//!
//! ## Usage
//! ```
//! use sparse_npu_layers::{create_layer, Layer, StrategyKind};
//! use sparse_npu_neural::{Synapse, Q16};
//!
//! let synapses = vec![
//!     Synapse::new(Q16::from_float(0.5), 0, 0),
//!     Synapse::new(Q16::from_float(0.5), 1, 0),
//! ];
//! let layer = create_layer(StrategyKind::Clustered, 2, 1, synapses).unwrap();
//!
//! let mut output = [0i8; 1];
//! layer.execute(&[64, 64], &mut output).unwrap();
//! assert_eq!(output, [64]);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod clustered;
pub mod factory;
pub mod grouping;
pub mod layer;
pub mod scatter;
pub mod sequential;
pub mod trace;

pub use clustered::ClusteredAccumulateLayer;
pub use factory::{create_layer, LayerFactory};
#[cfg(feature = "config")]
pub use factory::activation_from_kind;
pub use grouping::DestinationGroups;
pub use layer::{
    build_thread_pool, check_buffers, ExecutionProfile, Layer, LayerOptions, LayerPtr, LayerStats,
};
pub use scatter::ScatterAccumulateLayer;
pub use sequential::SequentialLayer;
pub use trace::{synapse_trace_cfg, SynapseTraceCfg, TRACE_TARGET};

pub use sparse_npu_neural::{LayerError, OverflowPolicy, Result, StrategyKind};
