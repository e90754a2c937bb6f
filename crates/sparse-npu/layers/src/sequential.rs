// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Single-threaded reference layer
//!
//! Walks the synapse list in order into one accumulator buffer, then
//! compresses. No rayon; used as the oracle the parallel strategies are
//! checked against and as a baseline in benchmarks.

use std::time::Instant;

use sparse_npu_neural::{accumulate, validate_synapses, OverflowPolicy, Result, Synapse};
use tracing::debug;

use crate::layer::{
    check_buffers, elapsed_ms, ExecutionContext, ExecutionProfile, Layer, LayerOptions, LayerStats,
};
use crate::trace::{synapse_trace_cfg, trace_contribution, SynapseTraceCfg};

pub struct SequentialLayer {
    n_in: u32,
    n_out: u32,
    synapses: Vec<Synapse>,
    ctx: ExecutionContext,
}

impl SequentialLayer {
    pub const NAME: &'static str = "sequential";

    pub fn new(n_in: u32, n_out: u32, synapses: Vec<Synapse>) -> Result<Self> {
        Self::with_options(n_in, n_out, synapses, LayerOptions::default())
    }

    /// The thread pool in `options` is ignored
    pub fn with_options(
        n_in: u32,
        n_out: u32,
        synapses: Vec<Synapse>,
        options: LayerOptions,
    ) -> Result<Self> {
        validate_synapses(n_in, n_out, &synapses)?;
        debug!(strategy = Self::NAME, n_in, n_out, synapses = synapses.len(), "layer constructed");
        Ok(Self {
            n_in,
            n_out,
            synapses,
            ctx: ExecutionContext::new(LayerOptions {
                thread_pool: None,
                ..options
            }),
        })
    }

    pub fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }
}

/// Walk `synapses` in list order into `acc`
fn accumulate_in_order(
    synapses: &[Synapse],
    input: &[i8],
    policy: OverflowPolicy,
    trace_cfg: &SynapseTraceCfg,
    acc: &mut [i32],
) {
    for synapse in synapses {
        let contribution = synapse.contribution(input, policy);
        if trace_cfg.allows(synapse) {
            trace_contribution(
                SequentialLayer::NAME,
                synapse,
                input[synapse.src() as usize],
                contribution,
            );
        }
        let slot = &mut acc[synapse.dst() as usize];
        *slot = accumulate(*slot, contribution, policy);
    }
}

impl Layer for SequentialLayer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn input_size(&self) -> u32 {
        self.n_in
    }

    fn output_size(&self) -> u32 {
        self.n_out
    }

    fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    fn execute(&self, input: &[i8], output: &mut [i8]) -> Result<()> {
        check_buffers(self.n_in, self.n_out, input, output)?;

        let total_start = Instant::now();
        let policy = self.ctx.overflow;
        let mut acc = vec![0i32; output.len()];

        let start = Instant::now();
        accumulate_in_order(&self.synapses, input, policy, synapse_trace_cfg(), &mut acc);
        let accumulate_ms = elapsed_ms(start);

        let start = Instant::now();
        for (out, value) in output.iter_mut().zip(&acc) {
            *out = self.ctx.compress(*value);
        }
        let compress_ms = elapsed_ms(start);

        self.ctx.record(
            ExecutionProfile {
                strategy: Self::NAME,
                synapses: self.synapses.len(),
                outputs: output.len(),
                accumulate_ms,
                compress_ms,
                total_ms: 0.0,
                rayon_threads: 1,
            },
            total_start,
        );
        Ok(())
    }

    fn stats(&self) -> LayerStats {
        self.ctx.stats()
    }

    fn last_profile(&self) -> Option<ExecutionProfile> {
        self.ctx.last_profile()
    }
}
