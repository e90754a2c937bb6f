// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Run one synthetic layer through every strategy.
//!
//! Checks that all strategies agree on the output and reports per-phase
//! timings. Exit code 1 if any strategy disagrees with the sequential result.

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use sparse_npu::config::load_config;
use sparse_npu::layers::{ExecutionProfile, LayerFactory, LayerPtr};
use sparse_npu::neural::StrategyKind;
use sparse_npu::observability::{init_logging, parse_debug_flags};
use sparse_npu::workload::{random_input, random_synapses, WorkloadSpec};
use tracing::{info, warn};

struct Args {
    spec: WorkloadSpec,
    iterations: u32,
    config: Option<PathBuf>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: layer_bench [--n-in <n>] [--n-out <n>] [--fan-in <n>] [--hotspot <pct>]\n\
         \x20                  [--seed <n>] [--iterations <n>] [--config <path>] [--debug-<crate>]\n\n\
         Defaults: 1024 x 1024, fan-in 64, no hotspot, seed 42, 20 iterations.\n\
         Overflow, activation and thread count come from sparse_npu.toml / SPARSE_NPU_* env.\n"
    );
    process::exit(2);
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T> {
    let value = value.with_context(|| format!("{flag} requires a value"))?;
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid value for {flag}: {value}"))
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        spec: WorkloadSpec::default(),
        iterations: 20,
        config: None,
    };

    let mut argv = env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--n-in" => args.spec.n_in = parse_value(&arg, argv.next())?,
            "--n-out" => args.spec.n_out = parse_value(&arg, argv.next())?,
            "--fan-in" => args.spec.fan_in = parse_value(&arg, argv.next())?,
            "--hotspot" => args.spec.hotspot_percent = parse_value(&arg, argv.next())?,
            "--seed" => args.spec.seed = parse_value(&arg, argv.next())?,
            "--iterations" => args.iterations = parse_value(&arg, argv.next())?,
            "--config" => args.config = Some(parse_value(&arg, argv.next())?),
            "-h" | "--help" => usage_and_exit(),
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }

    if args.spec.hotspot_percent > 100 {
        bail!("--hotspot must be within 0..=100");
    }
    if args.iterations == 0 {
        bail!("--iterations must be at least 1");
    }
    Ok(args)
}

fn mean(profiles: &[ExecutionProfile], field: fn(&ExecutionProfile) -> f64) -> f64 {
    if profiles.is_empty() {
        return 0.0;
    }
    profiles.iter().map(field).sum::<f64>() / profiles.len() as f64
}

fn run_strategy(layer: &LayerPtr, input: &[i8], iterations: u32) -> Result<(Vec<i8>, Vec<ExecutionProfile>)> {
    let mut output = vec![0i8; layer.output_size() as usize];
    let mut profiles = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        layer.execute(input, &mut output)?;
        if let Some(profile) = layer.last_profile() {
            profiles.push(profile);
        }
    }
    Ok((output, profiles))
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let config = load_config(args.config.as_deref()).context("failed to load configuration")?;

    let flags = parse_debug_flags();
    init_logging(&flags, &config.logging.level)?;

    let spec = args.spec;
    let synapses = random_synapses(&spec);
    let input = random_input(spec.n_in, spec.seed);
    info!(
        n_in = spec.n_in,
        n_out = spec.n_out,
        synapses = synapses.len(),
        hotspot_percent = spec.hotspot_percent,
        overflow = %config.engine.overflow,
        activation = %config.engine.activation,
        "generated workload"
    );

    let base = LayerFactory::from_config(&config)?;
    let mut reference: Option<Vec<i8>> = None;
    let mut mismatches = 0usize;

    println!(
        "{:<16} {:>12} {:>12} {:>12} {:>8}",
        "strategy", "accum_ms", "compress_ms", "total_ms", "threads"
    );

    // Sequential first so it becomes the reference
    let order = [
        StrategyKind::Sequential,
        StrategyKind::ScatterAtomic,
        StrategyKind::Clustered,
    ];
    for strategy in order {
        let factory = LayerFactory::with_options(strategy, base.options().clone());
        let layer = factory.build(spec.n_in, spec.n_out, synapses.clone())?;
        let (output, profiles) = run_strategy(&layer, &input, args.iterations)?;

        println!(
            "{:<16} {:>12.3} {:>12.3} {:>12.3} {:>8}",
            strategy.as_str(),
            mean(&profiles, |p| p.accumulate_ms),
            mean(&profiles, |p| p.compress_ms),
            mean(&profiles, |p| p.total_ms),
            profiles.last().map(|p| p.rayon_threads).unwrap_or(0),
        );

        match &reference {
            None => reference = Some(output),
            Some(expected) => {
                let differing = expected.iter().zip(&output).filter(|(a, b)| a != b).count();
                if differing > 0 {
                    warn!(strategy = %strategy, differing, "output differs from sequential reference");
                    mismatches += differing;
                }
            }
        }
    }

    if mismatches > 0 {
        eprintln!("{mismatches} output values differ between strategies");
        process::exit(1);
    }
    Ok(())
}
