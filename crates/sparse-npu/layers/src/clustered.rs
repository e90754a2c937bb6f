// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Clustered-Accumulate Layer
//!
//! Parallel over output neurons, private accumulators.
//!
//! Construction partitions the synapse list by destination once
//! ([`DestinationGroups`]). Each `execute` then gives every output neuron its
//! own task: walk its group in source order, accumulate into a local `i32`,
//! compress, write. No atomics, no second pass; the only synchronisation is
//! the final rayon join.
//!
//! Per-output summation order is fixed, so results are deterministic even
//! when an accumulator saturates. Heavily skewed fan-in leaves some tasks
//! with far more work than others; rayon's work stealing absorbs part of that.

use std::time::Instant;

use rayon::prelude::*;
use sparse_npu_neural::{accumulate, validate_synapses, OverflowPolicy, Result, Synapse};
use tracing::debug;

use crate::grouping::DestinationGroups;
use crate::layer::{
    check_buffers, elapsed_ms, ExecutionContext, ExecutionProfile, Layer, LayerOptions, LayerStats,
};
use crate::trace::{synapse_trace_cfg, trace_contribution, SynapseTraceCfg};

pub struct ClusteredAccumulateLayer {
    n_in: u32,
    n_out: u32,
    groups: DestinationGroups,
    ctx: ExecutionContext,
}

impl ClusteredAccumulateLayer {
    pub const NAME: &'static str = "clustered";

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
        let groups = DestinationGroups::build(n_out, &synapses)?;

        let ctx = ExecutionContext::new(options);
        debug!(
            strategy = Self::NAME,
            n_in,
            n_out,
            synapses = groups.total_synapses(),
            max_fan_in = groups.max_fan_in(),
            overflow = %ctx.overflow,
            activation = ctx.activation_name(),
            "layer constructed"
        );

        Ok(Self {
            n_in,
            n_out,
            groups,
            ctx,
        })
    }

    /// Per-destination synapse groups built at construction
    pub fn groups(&self) -> &DestinationGroups {
        &self.groups
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.ctx.overflow
    }
}

/// Sum one destination group into a private accumulator
#[inline(always)]
fn accumulate_group(
    group: &[Synapse],
    input: &[i8],
    policy: OverflowPolicy,
    trace_cfg: &SynapseTraceCfg,
) -> i32 {
    group.iter().fold(0i32, |acc, synapse| {
        let contribution = synapse.contribution(input, policy);
        if trace_cfg.allows(synapse) {
            trace_contribution(
                ClusteredAccumulateLayer::NAME,
                synapse,
                input[synapse.src() as usize],
                contribution,
            );
        }
        accumulate(acc, contribution, policy)
    })
}

impl Layer for ClusteredAccumulateLayer {
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
        self.groups.total_synapses()
    }

    fn execute(&self, input: &[i8], output: &mut [i8]) -> Result<()> {
        check_buffers(self.n_in, self.n_out, input, output)?;

        let total_start = Instant::now();
        let policy = self.ctx.overflow;
        let trace_cfg = synapse_trace_cfg();

        let (accumulate_ms, rayon_threads) = self.ctx.run(|| {
            let start = Instant::now();
            output.par_iter_mut().enumerate().for_each(|(dst, out)| {
                let acc = accumulate_group(self.groups.group(dst), input, policy, trace_cfg);
                *out = self.ctx.compress(acc);
            });
            (elapsed_ms(start), rayon::current_num_threads())
        });

        self.ctx.record(
            ExecutionProfile {
                strategy: Self::NAME,
                synapses: self.groups.total_synapses(),
                outputs: output.len(),
                accumulate_ms,
                compress_ms: 0.0,
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
