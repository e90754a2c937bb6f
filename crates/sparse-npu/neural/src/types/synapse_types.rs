// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapse type definitions

use super::error::{LayerError, Result};
use crate::synapse::{compute_contribution, OverflowPolicy, WEIGHT_FRAC_BITS};

/// Signed fixed-point value with 16 fractional bits (`1.0 == 65536`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Q16(pub i32);

impl Q16 {
    pub const ZERO: Q16 = Q16(0);
    pub const ONE: Q16 = Q16(1 << WEIGHT_FRAC_BITS);

    #[inline(always)]
    pub fn raw(self) -> i32 {
        self.0
    }

    #[inline(always)]
    pub fn to_float(self) -> f32 {
        crate::synapse::q16_to_f32(self.0)
    }

    #[inline(always)]
    pub fn from_float(value: f32) -> Self {
        Self(crate::synapse::q16_from_f32(value))
    }
}

impl From<i32> for Q16 {
    fn from(raw: i32) -> Self {
        Q16(raw)
    }
}

/// A weighted edge from input neuron `src` to output neuron `dst`.
///
/// Fields are private: a synapse cannot change after construction.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Synapse {
    weight: Q16,
    src: u32,
    dst: u32,
}

impl Synapse {
    #[inline]
    pub fn new(weight: impl Into<Q16>, src: u32, dst: u32) -> Self {
        Self {
            weight: weight.into(),
            src,
            dst,
        }
    }

    #[inline(always)]
    pub fn weight(&self) -> Q16 {
        self.weight
    }

    #[inline(always)]
    pub fn src(&self) -> u32 {
        self.src
    }

    #[inline(always)]
    pub fn dst(&self) -> u32 {
        self.dst
    }

    /// Q16 contribution of this synapse for the given input activation buffer.
    ///
    /// Caller guarantees `src < input.len()` (checked at layer construction).
    #[inline(always)]
    pub fn contribution(&self, input: &[i8], policy: OverflowPolicy) -> i32 {
        compute_contribution(self.weight.0, input[self.src as usize], policy)
    }
}

/// Check that every synapse fits a layer of `n_in` inputs and `n_out` outputs.
///
/// Reports the first offending synapse by position in `synapses`.
pub fn validate_synapses(n_in: u32, n_out: u32, synapses: &[Synapse]) -> Result<()> {
    for (index, synapse) in synapses.iter().enumerate() {
        if synapse.src >= n_in {
            return Err(LayerError::SourceOutOfRange {
                index,
                src: synapse.src,
                n_in,
            });
        }
        if synapse.dst >= n_out {
            return Err(LayerError::DestinationOutOfRange {
                index,
                dst: synapse.dst,
                n_out,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q16_constants() {
        assert_eq!(Q16::ONE.raw(), 65536);
        assert_eq!(Q16::ONE.to_float(), 1.0);
        assert_eq!(Q16::from_float(-0.5), Q16(-32768));
    }

    #[test]
    fn test_synapse_accessors() {
        let s = Synapse::new(Q16::ONE, 3, 1);
        assert_eq!(s.weight(), Q16(65536));
        assert_eq!(s.src(), 3);
        assert_eq!(s.dst(), 1);
    }

    #[test]
    fn test_synapse_contribution_reads_source() {
        let s = Synapse::new(65536, 1, 0);
        let input = [0i8, 127];
        assert_eq!(s.contribution(&input, OverflowPolicy::Saturating), 65024);
    }

    #[test]
    fn test_validate_accepts_in_range() {
        let synapses = [Synapse::new(1, 0, 0), Synapse::new(1, 1, 2)];
        assert!(validate_synapses(2, 3, &synapses).is_ok());
        assert!(validate_synapses(0, 0, &[]).is_ok());
    }

    #[test]
    fn test_validate_rejects_source() {
        let synapses = [Synapse::new(1, 0, 0), Synapse::new(1, 2, 0)];
        assert_eq!(
            validate_synapses(2, 1, &synapses),
            Err(LayerError::SourceOutOfRange { index: 1, src: 2, n_in: 2 })
        );
    }

    #[test]
    fn test_validate_rejects_destination() {
        let synapses = [Synapse::new(1, 0, 1)];
        assert_eq!(
            validate_synapses(1, 1, &synapses),
            Err(LayerError::DestinationOutOfRange { index: 0, dst: 1, n_out: 1 })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_synapse_serde_shape() {
        let s = Synapse::new(65536, 0, 4);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"weight":65536,"src":0,"dst":4}"#);
        let back: Synapse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
