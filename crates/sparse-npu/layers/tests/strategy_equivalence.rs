// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cross-strategy behaviour: equivalence, determinism, bounds

mod common;

use std::sync::Arc;

use common::{random_input, random_synapses, shuffled, skewed_synapses};
use sparse_npu_layers::{
    ClusteredAccumulateLayer, Layer, LayerFactory, LayerOptions, LayerPtr, OverflowPolicy,
    StrategyKind,
};
use sparse_npu_neural::{Activation, HardSigmoid, Synapse, TanhLut, Q16};

fn build_all(n_in: u32, n_out: u32, synapses: &[Synapse], options: LayerOptions) -> Vec<LayerPtr> {
    StrategyKind::ALL
        .iter()
        .map(|&strategy| {
            LayerFactory::with_options(strategy, options.clone())
                .build(n_in, n_out, synapses.to_vec())
                .expect("valid layer")
        })
        .collect()
}

fn run(layer: &dyn Layer, input: &[i8]) -> Vec<i8> {
    let mut output = vec![0i8; layer.output_size() as usize];
    layer.execute(input, &mut output).expect("valid buffers");
    output
}

#[test]
fn test_strategies_agree_on_random_layers() {
    for seed in 0..8u64 {
        let (n_in, n_out) = (64 + seed as u32 * 7, 32 + seed as u32 * 3);
        let synapses = random_synapses(n_in, n_out, 2_000, seed);
        let input = random_input(n_in, seed + 100);

        let layers = build_all(n_in, n_out, &synapses, LayerOptions::default());
        let reference = run(layers[0].as_ref(), &input);
        for layer in &layers[1..] {
            assert_eq!(run(layer.as_ref(), &input), reference, "strategy {}", layer.name());
        }
    }
}

#[test]
fn test_strategies_agree_with_smooth_activation() {
    let synapses = random_synapses(100, 40, 3_000, 7);
    let input = random_input(100, 8);
    let options = LayerOptions::default().with_activation(Arc::new(TanhLut::new(1.5)));

    let outputs: Vec<Vec<i8>> = build_all(100, 40, &synapses, options)
        .iter()
        .map(|layer| run(layer.as_ref(), &input))
        .collect();
    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[1], outputs[2]);
}

#[test]
fn test_strategies_agree_on_skewed_fan_in() {
    let synapses = skewed_synapses(50, 20, 5_000, 3);
    let input = random_input(50, 4);

    let outputs: Vec<Vec<i8>> = build_all(50, 20, &synapses, LayerOptions::default())
        .iter()
        .map(|layer| run(layer.as_ref(), &input))
        .collect();
    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[1], outputs[2]);
}

#[test]
fn test_wrapping_strategies_agree_even_when_overflowing() {
    // Fan-in of 400 near-MAX weights overflows i32 many times over
    let synapses: Vec<Synapse> = (0..400u32)
        .map(|i| {
            let weight = if i % 3 == 0 { -(i32::MAX - i as i32) } else { i32::MAX - i as i32 };
            Synapse::new(weight, i % 4, i % 2)
        })
        .collect();
    let input = vec![127i8, -90, 55, 127];
    let options = LayerOptions::default().with_overflow(OverflowPolicy::Wrapping);

    let outputs: Vec<Vec<i8>> = build_all(4, 2, &synapses, options)
        .iter()
        .map(|layer| run(layer.as_ref(), &input))
        .collect();
    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[1], outputs[2]);
}

#[test]
fn test_repeated_execution_is_deterministic() {
    let synapses = skewed_synapses(32, 8, 4_000, 11);
    let input = random_input(32, 12);

    for layer in build_all(32, 8, &synapses, LayerOptions::default()) {
        let first = run(layer.as_ref(), &input);
        for _ in 0..10 {
            assert_eq!(run(layer.as_ref(), &input), first, "strategy {}", layer.name());
        }
        assert_eq!(layer.stats().executions, 11);
    }
}

#[test]
fn test_outputs_stay_in_symmetric_range() {
    // Large weights drive accumulators to both extremes
    let synapses = random_synapses(16, 64, 1_000, 21)
        .into_iter()
        .map(|s| Synapse::new(s.weight().raw().saturating_mul(4_000), s.src(), s.dst()))
        .collect::<Vec<_>>();
    let input: Vec<i8> = (0..16).map(|i| if i % 2 == 0 { 127 } else { -128 }).collect();

    for layer in build_all(16, 64, &synapses, LayerOptions::default()) {
        let output = run(layer.as_ref(), &input);
        assert_eq!(output.len(), 64);
        assert!(output.iter().all(|v| (-127..=127).contains(v)), "strategy {}", layer.name());
    }
}

#[test]
fn test_zero_synapse_layer_outputs_activation_of_zero() {
    let bias = |acc: i32| -> i8 { if acc == 0 { 42 } else { 0 } };
    let options = LayerOptions::default().with_activation(Arc::new(bias));

    for layer in build_all(5, 7, &[], options) {
        assert_eq!(run(layer.as_ref(), &[1, 2, 3, 4, 5]), vec![42; 7], "strategy {}", layer.name());
    }
    for layer in build_all(5, 7, &[], LayerOptions::default()) {
        assert_eq!(run(layer.as_ref(), &[9; 5]), vec![HardSigmoid.compress(0); 7]);
    }
}

#[test]
fn test_single_synapse_saturates_high() {
    let synapses = [Synapse::new(Q16(65_536), 0, 0)];
    for layer in build_all(2, 1, &synapses, LayerOptions::default()) {
        assert_eq!(run(layer.as_ref(), &[127, 0]), vec![127], "strategy {}", layer.name());
    }
}

#[test]
fn test_permutation_invariance_of_clustered_layer() {
    let synapses = random_synapses(40, 25, 1_500, 31);
    let input = random_input(40, 32);

    let reference = ClusteredAccumulateLayer::new(40, 25, synapses.clone()).expect("valid");
    let expected = run(&reference, &input);

    for seed in 0..5 {
        let permuted = ClusteredAccumulateLayer::new(40, 25, shuffled(&synapses, seed)).expect("valid");
        assert_eq!(run(&permuted, &input), expected);
    }
}

#[test]
fn test_concurrent_execution_with_distinct_buffers() {
    let synapses = random_synapses(128, 64, 8_000, 41);
    let layers = build_all(128, 64, &synapses, LayerOptions::default());

    for layer in layers {
        let inputs: Vec<Vec<i8>> = (0..4).map(|i| random_input(128, 50 + i)).collect();
        let expected: Vec<Vec<i8>> = inputs.iter().map(|input| run(layer.as_ref(), input)).collect();

        let handles: Vec<_> = inputs
            .into_iter()
            .zip(expected)
            .map(|(input, expected)| {
                let layer = Arc::clone(&layer);
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        assert_eq!(run(layer.as_ref(), &input), expected);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker thread panicked");
        }
    }
}

#[test]
fn test_dedicated_pool_matches_global_pool() {
    let synapses = random_synapses(60, 30, 2_500, 61);
    let input = random_input(60, 62);
    let pooled = LayerOptions::default().with_threads(2).expect("pool");

    let global = build_all(60, 30, &synapses, LayerOptions::default());
    let dedicated = build_all(60, 30, &synapses, pooled);
    for (a, b) in global.iter().zip(&dedicated) {
        assert_eq!(run(a.as_ref(), &input), run(b.as_ref(), &input));
    }
    let profile = dedicated[0].last_profile().expect("profile");
    assert_eq!(profile.rayon_threads, 2);
}
