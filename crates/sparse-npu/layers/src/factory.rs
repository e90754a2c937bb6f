// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Strategy selection at construction time
//!
//! ```
//! use sparse_npu_layers::{Layer, LayerFactory, StrategyKind};
//! use sparse_npu_neural::{Synapse, Q16};
//!
//! let factory = LayerFactory::new(StrategyKind::ScatterAtomic);
//! let layer = factory.build(2, 1, vec![Synapse::new(Q16::ONE, 0, 0)]).unwrap();
//!
//! let mut output = [0i8; 1];
//! layer.execute(&[127, 0], &mut output).unwrap();
//! assert_eq!(output, [127]);
//! ```

use std::sync::Arc;

use sparse_npu_neural::{Activation, OverflowPolicy, Result, StrategyKind, Synapse};

use crate::clustered::ClusteredAccumulateLayer;
use crate::layer::{LayerOptions, LayerPtr};
use crate::scatter::ScatterAccumulateLayer;
use crate::sequential::SequentialLayer;

/// Builds layers of one strategy with shared options
#[derive(Debug, Clone, Default)]
pub struct LayerFactory {
    strategy: StrategyKind,
    options: LayerOptions,
}

impl LayerFactory {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            options: LayerOptions::default(),
        }
    }

    pub fn with_options(strategy: StrategyKind, options: LayerOptions) -> Self {
        Self { strategy, options }
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.options = self.options.with_overflow(overflow);
        self
    }

    pub fn with_activation(mut self, activation: Arc<dyn Activation>) -> Self {
        self.options = self.options.with_activation(activation);
        self
    }

    pub fn with_thread_pool(mut self, pool: Arc<rayon::ThreadPool>) -> Self {
        self.options = self.options.with_thread_pool(pool);
        self
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn options(&self) -> &LayerOptions {
        &self.options
    }

    /// Build a layer of `n_in` inputs and `n_out` outputs from `synapses`
    ///
    /// # Errors
    /// `SourceOutOfRange` / `DestinationOutOfRange` for synapses outside the shape.
    pub fn build(&self, n_in: u32, n_out: u32, synapses: Vec<Synapse>) -> Result<LayerPtr> {
        let options = self.options.clone();
        let layer: LayerPtr = match self.strategy {
            StrategyKind::ScatterAtomic => Arc::new(ScatterAccumulateLayer::with_options(
                n_in, n_out, synapses, options,
            )?),
            StrategyKind::Clustered => Arc::new(ClusteredAccumulateLayer::with_options(
                n_in, n_out, synapses, options,
            )?),
            StrategyKind::Sequential => {
                Arc::new(SequentialLayer::with_options(n_in, n_out, synapses, options)?)
            }
        };
        Ok(layer)
    }
}

/// Build a layer with default options
pub fn create_layer(
    strategy: StrategyKind,
    n_in: u32,
    n_out: u32,
    synapses: Vec<Synapse>,
) -> Result<LayerPtr> {
    LayerFactory::new(strategy).build(n_in, n_out, synapses)
}

#[cfg(feature = "config")]
mod from_config {
    use std::sync::Arc;

    use sparse_npu_config::{ActivationKind, LayerEngineConfig};
    use sparse_npu_neural::{Activation, HardSigmoid, Result, TanhLut};

    use super::LayerFactory;
    use crate::layer::LayerOptions;

    /// Instantiate the configured activation function
    pub fn activation_from_kind(kind: ActivationKind, tanh_gain: f64) -> Arc<dyn Activation> {
        match kind {
            ActivationKind::HardSigmoid => Arc::new(HardSigmoid),
            ActivationKind::TanhLut => Arc::new(TanhLut::new(tanh_gain)),
        }
    }

    impl LayerFactory {
        /// Build a factory from a loaded configuration
        ///
        /// # Errors
        /// `ThreadPool` if `engine.threads > 0` and the pool cannot be created.
        pub fn from_config(config: &LayerEngineConfig) -> Result<Self> {
            let engine = &config.engine;
            let options = LayerOptions::default()
                .with_overflow(engine.overflow)
                .with_activation(activation_from_kind(engine.activation, engine.tanh_gain))
                .with_threads(engine.threads)?;

            tracing::debug!(
                strategy = %engine.strategy,
                overflow = %engine.overflow,
                activation = %engine.activation,
                threads = engine.threads,
                "layer factory configured"
            );

            Ok(LayerFactory::with_options(engine.strategy, options))
        }
    }
}

#[cfg(feature = "config")]
pub use from_config::activation_from_kind;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use sparse_npu_neural::{LayerError, Q16};

    #[test]
    fn test_factory_builds_each_strategy() {
        for strategy in StrategyKind::ALL {
            let layer = LayerFactory::new(strategy)
                .build(3, 2, vec![Synapse::new(Q16::ONE, 2, 1)])
                .unwrap();
            assert_eq!(layer.name(), strategy.as_str());
            assert_eq!(layer.input_size(), 3);
            assert_eq!(layer.output_size(), 2);
            assert_eq!(layer.synapse_count(), 1);
        }
    }

    #[test]
    fn test_factory_propagates_configuration_errors() {
        for strategy in StrategyKind::ALL {
            let err = create_layer(strategy, 1, 1, vec![Synapse::new(1, 0, 5)]).err();
            assert!(matches!(err, Some(LayerError::DestinationOutOfRange { dst: 5, .. })));
        }
    }

    #[test]
    fn test_factory_overflow_reaches_layers() {
        let factory = LayerFactory::new(StrategyKind::Clustered).with_overflow(OverflowPolicy::Wrapping);
        assert_eq!(factory.options().overflow, OverflowPolicy::Wrapping);
        let layer = factory
            .build(1, 1, vec![Synapse::new(i32::MAX, 0, 0), Synapse::new(i32::MAX, 0, 0)])
            .unwrap();
        let mut output = [0i8; 1];
        layer.execute(&[127], &mut output).unwrap();
        assert_eq!(output, [-127]);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_config() {
        use sparse_npu_config::{ActivationKind, LayerEngineConfig};

        let mut config = LayerEngineConfig::default();
        config.engine.strategy = StrategyKind::ScatterAtomic;
        config.engine.activation = ActivationKind::TanhLut;
        config.engine.threads = 2;

        let factory = LayerFactory::from_config(&config).unwrap();
        assert_eq!(factory.strategy(), StrategyKind::ScatterAtomic);
        assert_eq!(factory.options().activation.name(), "tanh_lut");
        assert_eq!(
            factory.options().thread_pool.as_ref().map(|p| p.current_num_threads()),
            Some(2)
        );

        let layer = factory.build(1, 1, vec![Synapse::new(Q16::ONE, 0, 0)]).unwrap();
        let mut output = [0i8; 1];
        layer.execute(&[127], &mut output).unwrap();
        // tanh(0.99) * 127 -> table entry 31/32
        assert_eq!(output, [factory.options().activation.compress(65_024)]);
        assert_eq!(layer.last_profile().map(|p| p.rayon_threads), Some(2));
    }
}
