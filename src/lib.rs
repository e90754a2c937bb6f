// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # sparse-npu
//!
//! Quantized forward pass for one layer of a sparsely connected neural
//! network: N input neurons, M output neurons, and an explicit list of
//! weighted synapses between them.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! sparse-npu = "0.1"  # Default: config + observability
//! ```
//!
//! ```rust
//! use sparse_npu::prelude::*;
//!
//! let synapses = vec![
//!     Synapse::new(Q16::ONE, 0, 0),
//!     Synapse::new(Q16::from_float(-0.5), 1, 0),
//! ];
//! let layer = create_layer(StrategyKind::ScatterAtomic, 2, 1, synapses)?;
//!
//! let mut output = [0i8; 1];
//! layer.execute(&[64, 64], &mut output)?;
//! assert_eq!(output, [32]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//! - **`config`** (default): TOML + environment configuration, `LayerFactory::from_config`
//! - **`observability`** (default): `tracing-subscriber` initialisation and per-crate debug flags
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: sparse-npu-neural                          │
//! │  (Synapse, Q16, contribution math, Activation)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: sparse-npu-layers                          │
//! │  (scatter / clustered / sequential strategies)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Infrastructure: sparse-npu-config, -observability      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use sparse_npu_neural as neural;

// Re-export algorithms
pub use sparse_npu_layers as layers;

// Re-export infrastructure
#[cfg(feature = "config")]
pub use sparse_npu_config as config;

#[cfg(feature = "observability")]
pub use sparse_npu_observability as observability;

pub mod workload;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::neural::{
        Activation, HardSigmoid, LayerError, OverflowPolicy, StrategyKind, Synapse, TanhLut, Q16,
    };

    pub use crate::layers::{
        create_layer, ClusteredAccumulateLayer, Layer, LayerFactory, LayerOptions, LayerPtr,
        ScatterAccumulateLayer, SequentialLayer,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{load_config, LayerEngineConfig};
}
