// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Destination grouping: `dst -> [Synapse]` in compressed (CSR) form
//!
//! Built once in O(E + M) with a stable counting sort, so synapses sharing a
//! destination keep their relative order from the source list. The groups
//! partition the input: every synapse lands in exactly one group.

use sparse_npu_neural::{LayerError, Result, Synapse, Q16};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationGroups {
    /// `offsets[d]..offsets[d + 1]` indexes the group of destination `d`
    offsets: Vec<usize>,
    /// Synapses ordered by destination, stable within a destination
    synapses: Vec<Synapse>,
}

impl DestinationGroups {
    /// Partition `synapses` into `n_out` destination groups.
    ///
    /// # Errors
    /// `DestinationOutOfRange` if any synapse targets `dst >= n_out`.
    pub fn build(n_out: u32, synapses: &[Synapse]) -> Result<Self> {
        let n_out_usize = n_out as usize;
        let mut offsets = vec![0usize; n_out_usize + 1];

        // Count fan-in per destination
        for (index, synapse) in synapses.iter().enumerate() {
            if synapse.dst() >= n_out {
                return Err(LayerError::DestinationOutOfRange {
                    index,
                    dst: synapse.dst(),
                    n_out,
                });
            }
            offsets[synapse.dst() as usize + 1] += 1;
        }

        // Exclusive prefix sum
        for d in 0..n_out_usize {
            offsets[d + 1] += offsets[d];
        }

        // Scatter in source order
        let mut cursor = offsets[..n_out_usize].to_vec();
        let mut grouped = vec![Synapse::new(Q16::ZERO, 0, 0); synapses.len()];
        for synapse in synapses {
            let slot = &mut cursor[synapse.dst() as usize];
            grouped[*slot] = *synapse;
            *slot += 1;
        }

        Ok(Self {
            offsets,
            synapses: grouped,
        })
    }

    /// Number of groups (one per output neuron, empty groups included)
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Synapses targeting `dst`, in source-list order
    ///
    /// # Panics
    /// If `dst >= len()`.
    #[inline(always)]
    pub fn group(&self, dst: usize) -> &[Synapse] {
        &self.synapses[self.offsets[dst]..self.offsets[dst + 1]]
    }

    /// Sum of all group sizes
    #[inline]
    pub fn total_synapses(&self) -> usize {
        self.synapses.len()
    }

    /// Fan-in of every destination
    pub fn group_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.offsets.windows(2).map(|w| w[1] - w[0])
    }

    /// Largest fan-in (0 for a layer without synapses)
    pub fn max_fan_in(&self) -> usize {
        self.group_sizes().max().unwrap_or(0)
    }

    /// `(dst, group)` pairs in destination order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Synapse])> + '_ {
        (0..self.len()).map(move |dst| (dst as u32, self.group(dst)))
    }

    /// All groups concatenated in destination order
    pub fn as_flat(&self) -> &[Synapse] {
        &self.synapses
    }
}
