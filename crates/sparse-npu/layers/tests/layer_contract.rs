// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Call-boundary errors and accessors, for every strategy

mod common;

use common::random_synapses;
use sparse_npu_layers::{create_layer, DestinationGroups, LayerError, StrategyKind};
use sparse_npu_neural::Synapse;

#[test]
fn test_accessors() {
    for strategy in StrategyKind::ALL {
        let layer = create_layer(strategy, 10, 4, random_synapses(10, 4, 33, 1)).unwrap();
        assert_eq!(layer.input_size(), 10);
        assert_eq!(layer.output_size(), 4);
        assert_eq!(layer.synapse_count(), 33);
        assert_eq!(layer.name(), strategy.as_str());
    }
}

#[test]
fn test_source_out_of_range_rejected() {
    for strategy in StrategyKind::ALL {
        let synapses = vec![Synapse::new(1, 0, 0), Synapse::new(1, 3, 0)];
        let err = create_layer(strategy, 3, 1, synapses).err().expect("must fail");
        assert_eq!(err, LayerError::SourceOutOfRange { index: 1, src: 3, n_in: 3 });
        assert!(err.is_configuration_error());
    }
}

#[test]
fn test_destination_out_of_range_rejected() {
    for strategy in StrategyKind::ALL {
        let err = create_layer(strategy, 3, 2, vec![Synapse::new(1, 0, 2)])
            .err()
            .expect("must fail");
        assert_eq!(err, LayerError::DestinationOutOfRange { index: 0, dst: 2, n_out: 2 });
    }
}

#[test]
fn test_wrong_buffer_lengths_rejected_without_writing() {
    for strategy in StrategyKind::ALL {
        let layer = create_layer(strategy, 3, 2, random_synapses(3, 2, 10, 2)).unwrap();

        let mut output = [99i8; 2];
        let err = layer.execute(&[1, 2], &mut output).unwrap_err();
        assert_eq!(err, LayerError::InputLengthMismatch { expected: 3, actual: 2 });
        assert!(err.is_contract_violation());
        assert_eq!(output, [99, 99]);

        let mut long = [99i8; 3];
        let err = layer.execute(&[1, 2, 3], &mut long).unwrap_err();
        assert_eq!(err, LayerError::OutputLengthMismatch { expected: 2, actual: 3 });
        assert_eq!(long, [99, 99, 99]);

        assert_eq!(layer.stats().executions, 0);
        assert!(layer.last_profile().is_none());
    }
}

#[test]
fn test_empty_shapes() {
    for strategy in StrategyKind::ALL {
        let layer = create_layer(strategy, 0, 0, Vec::new()).unwrap();
        let mut output: [i8; 0] = [];
        layer.execute(&[], &mut output).unwrap();
        assert_eq!(layer.stats().executions, 1);
    }
}

#[test]
fn test_grouping_partition_for_random_layer() {
    let synapses = random_synapses(20, 9, 500, 5);
    let groups = DestinationGroups::build(9, &synapses).unwrap();
    assert_eq!(groups.len(), 9);
    assert_eq!(groups.group_sizes().sum::<usize>(), synapses.len());

    // Each group is the order-preserving subsequence of the source list
    for (dst, group) in groups.iter() {
        let expected: Vec<Synapse> = synapses.iter().copied().filter(|s| s.dst() == dst).collect();
        assert_eq!(group, expected.as_slice());
    }
}
