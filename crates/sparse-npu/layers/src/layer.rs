// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Layer contract and the execution context shared by every strategy
//!
//! ## Design
//!
//! - **One trait, several strategies**: callers hold a `LayerPtr` and never
//!   know which accumulation strategy sits behind it
//! - **Immutable layers**: `execute` takes `&self`; the only per-call state is
//!   the accumulator buffer, allocated inside the call
//! - **Fork-join**: every parallel phase runs on rayon and `execute` returns
//!   only after all of its tasks have joined

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use sparse_npu_neural::{clamp_output, Activation, HardSigmoid, LayerError, OverflowPolicy, Result};

/// Forward-pass contract implemented by every accumulation strategy
pub trait Layer: Send + Sync {
    /// Strategy name for logging/debugging
    fn name(&self) -> &'static str;

    /// Number of input neurons (N)
    fn input_size(&self) -> u32;

    /// Number of output neurons (M)
    fn output_size(&self) -> u32;

    /// Number of synapses the layer was built from
    fn synapse_count(&self) -> usize;

    /// Compute the forward pass.
    ///
    /// `input` must hold exactly `input_size()` activations and `output`
    /// exactly `output_size()` slots; anything else is rejected before a
    /// single element is touched. Blocks until all parallel work is done.
    fn execute(&self, input: &[i8], output: &mut [i8]) -> Result<()>;

    /// Cumulative execution counters
    fn stats(&self) -> LayerStats;

    /// Timing of the most recent successful `execute`
    fn last_profile(&self) -> Option<ExecutionProfile>;
}

/// Shared handle to any layer strategy
pub type LayerPtr = Arc<dyn Layer>;

/// Cumulative counters for one layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    pub executions: u64,
    pub synapses_processed: u64,
}

/// Fine-grained profile of one `execute` call.
///
/// Strategies that fuse accumulation and compression into one pass report
/// the whole pass as `accumulate_ms` and leave `compress_ms` at zero.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionProfile {
    pub strategy: &'static str,
    pub synapses: usize,
    pub outputs: usize,
    pub accumulate_ms: f64,
    pub compress_ms: f64,
    pub total_ms: f64,
    pub rayon_threads: usize,
}

/// Construction-time options shared by all strategies
#[derive(Clone)]
pub struct LayerOptions {
    /// Accumulator overflow behaviour
    pub overflow: OverflowPolicy,
    /// Activation compression function
    pub activation: Arc<dyn Activation>,
    /// Dedicated pool; `None` runs on the global rayon pool
    pub thread_pool: Option<Arc<rayon::ThreadPool>>,
}

impl LayerOptions {
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_activation(mut self, activation: Arc<dyn Activation>) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_thread_pool(mut self, pool: Arc<rayon::ThreadPool>) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    /// Build a dedicated pool of `threads` workers (0 keeps the global pool)
    pub fn with_threads(mut self, threads: usize) -> Result<Self> {
        self.thread_pool = build_thread_pool(threads)?;
        Ok(self)
    }
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            overflow: OverflowPolicy::default(),
            activation: Arc::new(HardSigmoid),
            thread_pool: None,
        }
    }
}

impl fmt::Debug for LayerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerOptions")
            .field("overflow", &self.overflow)
            .field("activation", &self.activation.name())
            .field(
                "thread_pool",
                &self.thread_pool.as_ref().map(|p| p.current_num_threads()),
            )
            .finish()
    }
}

/// Build a named rayon pool, or `None` for `threads == 0`
pub fn build_thread_pool(threads: usize) -> Result<Option<Arc<rayon::ThreadPool>>> {
    if threads == 0 {
        return Ok(None);
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("sparse-npu-{}", i))
        .build()
        .map(|pool| Some(Arc::new(pool)))
        .map_err(|e| LayerError::ThreadPool(e.to_string()))
}

/// Reject buffers whose lengths do not match the layer shape
#[inline]
pub fn check_buffers(n_in: u32, n_out: u32, input: &[i8], output: &[i8]) -> Result<()> {
    if input.len() != n_in as usize {
        return Err(LayerError::InputLengthMismatch {
            expected: n_in as usize,
            actual: input.len(),
        });
    }
    if output.len() != n_out as usize {
        return Err(LayerError::OutputLengthMismatch {
            expected: n_out as usize,
            actual: output.len(),
        });
    }
    Ok(())
}

/// Options plus telemetry, owned by each strategy
pub(crate) struct ExecutionContext {
    pub(crate) overflow: OverflowPolicy,
    activation: Arc<dyn Activation>,
    thread_pool: Option<Arc<rayon::ThreadPool>>,
    executions: AtomicU64,
    synapses_processed: AtomicU64,
    last_profile: Mutex<Option<ExecutionProfile>>,
}

impl ExecutionContext {
    pub(crate) fn new(options: LayerOptions) -> Self {
        Self {
            overflow: options.overflow,
            activation: options.activation,
            thread_pool: options.thread_pool,
            executions: AtomicU64::new(0),
            synapses_processed: AtomicU64::new(0),
            last_profile: Mutex::new(None),
        }
    }

    /// Run `op` inside the dedicated pool, if any
    pub(crate) fn run<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.thread_pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    #[inline(always)]
    pub(crate) fn compress(&self, accumulator: i32) -> i8 {
        clamp_output(self.activation.compress(accumulator))
    }

    pub(crate) fn activation_name(&self) -> &'static str {
        self.activation.name()
    }

    pub(crate) fn record(&self, profile: ExecutionProfile, started: Instant) {
        let mut profile = profile;
        profile.total_ms = started.elapsed().as_secs_f64() * 1000.0;

        self.executions.fetch_add(1, Ordering::Relaxed);
        self.synapses_processed
            .fetch_add(profile.synapses as u64, Ordering::Relaxed);

        tracing::trace!(
            strategy = profile.strategy,
            synapses = profile.synapses,
            outputs = profile.outputs,
            accumulate_ms = profile.accumulate_ms,
            compress_ms = profile.compress_ms,
            total_ms = profile.total_ms,
            rayon_threads = profile.rayon_threads,
            "layer executed"
        );

        *self.last_profile.lock() = Some(profile);
    }

    pub(crate) fn stats(&self) -> LayerStats {
        LayerStats {
            executions: self.executions.load(Ordering::Relaxed),
            synapses_processed: self.synapses_processed.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn last_profile(&self) -> Option<ExecutionProfile> {
        self.last_profile.lock().clone()
    }
}

#[inline]
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
