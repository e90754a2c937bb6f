// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Scatter-Accumulate Layer
//!
//! Parallel over synapses, shared atomic accumulators.
//!
//! ## Phases
//! 1. **Scatter**: every synapse computes `(weight × input[src]) >> 7` and
//!    atomically adds it into `acc[dst]` (no ordering, no partition)
//! 2. **Barrier**: rayon joins all scatter tasks
//! 3. **Compress**: every output applies the activation to its accumulator
//!
//! Handles arbitrarily skewed fan-in without any precomputation, at the cost
//! of contention on popular destinations.

use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use sparse_npu_neural::{accumulate, validate_synapses, OverflowPolicy, Result, Synapse};
use tracing::debug;

use crate::layer::{
    check_buffers, elapsed_ms, ExecutionContext, ExecutionProfile, Layer, LayerOptions, LayerStats,
};
use crate::trace::{synapse_trace_cfg, trace_contribution};

pub struct ScatterAccumulateLayer {
    n_in: u32,
    n_out: u32,
    synapses: Vec<Synapse>,
    ctx: ExecutionContext,
}

impl ScatterAccumulateLayer {
    pub const NAME: &'static str = "scatter_atomic";

    /// Build with default options (saturating, hard sigmoid, global pool)
    pub fn new(n_in: u32, n_out: u32, synapses: Vec<Synapse>) -> Result<Self> {
        Self::with_options(n_in, n_out, synapses, LayerOptions::default())
    }

    pub fn with_options(
        n_in: u32,
        n_out: u32,
        synapses: Vec<Synapse>,
        options: LayerOptions,
    ) -> Result<Self> {
        validate_synapses(n_in, n_out, &synapses)?;

        let ctx = ExecutionContext::new(options);
        debug!(
            strategy = Self::NAME,
            n_in,
            n_out,
            synapses = synapses.len(),
            overflow = %ctx.overflow,
            activation = ctx.activation_name(),
            "layer constructed"
        );

        Ok(Self {
            n_in,
            n_out,
            synapses,
            ctx,
        })
    }

    /// Synapses in construction order
    pub fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.ctx.overflow
    }
}

/// Add `contribution` into a shared slot.
///
/// Wrapping maps onto a single `fetch_add` (two's-complement wrap). Saturating
/// needs a compare-and-swap loop. Relaxed ordering suffices: the rayon join
/// that ends the scatter phase orders every add before the compress phase.
#[inline(always)]
fn atomic_accumulate(slot: &AtomicI32, contribution: i32, policy: OverflowPolicy) {
    if contribution == 0 {
        return;
    }
    match policy {
        OverflowPolicy::Wrapping => {
            slot.fetch_add(contribution, Ordering::Relaxed);
        }
        OverflowPolicy::Saturating => {
            // Closure never returns None, so this cannot fail
            let _ = slot.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(accumulate(current, contribution, policy))
            });
        }
    }
}

impl Layer for ScatterAccumulateLayer {
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
        let trace_cfg = synapse_trace_cfg();

        let (accumulate_ms, compress_ms, rayon_threads) = self.ctx.run(|| {
            let acc: Vec<AtomicI32> = (0..output.len()).map(|_| AtomicI32::new(0)).collect();

            // PHASE 1: SCATTER
            let scatter_start = Instant::now();
            self.synapses.par_iter().for_each(|synapse| {
                let contribution = synapse.contribution(input, policy);
                if trace_cfg.allows(synapse) {
                    trace_contribution(
                        Self::NAME,
                        synapse,
                        input[synapse.src() as usize],
                        contribution,
                    );
                }
                atomic_accumulate(&acc[synapse.dst() as usize], contribution, policy);
            });
            let accumulate_ms = elapsed_ms(scatter_start);

            // PHASE 2: COMPRESS (after the join above)
            let compress_start = Instant::now();
            output
                .par_iter_mut()
                .zip(acc.par_iter())
                .for_each(|(out, slot)| *out = self.ctx.compress(slot.load(Ordering::Relaxed)));
            let compress_ms = elapsed_ms(compress_start);

            (accumulate_ms, compress_ms, rayon::current_num_threads())
        });

        self.ctx.record(
            ExecutionProfile {
                strategy: Self::NAME,
                synapses: self.synapses.len(),
                outputs: output.len(),
                accumulate_ms,
                compress_ms,
                total_ms: 0.0,
                rayon_threads,
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
