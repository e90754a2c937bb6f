// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Runtime-gated per-synapse tracing.
//!
//! Enable with:
//! - SPARSE_NPU_TRACE_SYNAPSE=1
//!   Optional filters:
//! - SPARSE_NPU_TRACE_SRC=<u32 input neuron>
//! - SPARSE_NPU_TRACE_DST=<u32 output neuron>
//!
//! Events go to the `sparse-npu-trace` target at TRACE level, so a subscriber
//! filter must also admit them.

use std::sync::OnceLock;

use sparse_npu_neural::Synapse;

pub const TRACE_TARGET: &str = "sparse-npu-trace";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynapseTraceCfg {
    pub enabled: bool,
    pub src_filter: Option<u32>,
    pub dst_filter: Option<u32>,
}

impl SynapseTraceCfg {
    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup("SPARSE_NPU_TRACE_SYNAPSE")
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let src_filter = lookup("SPARSE_NPU_TRACE_SRC").and_then(|v| v.trim().parse().ok());
        let dst_filter = lookup("SPARSE_NPU_TRACE_DST").and_then(|v| v.trim().parse().ok());

        Self {
            enabled,
            src_filter,
            dst_filter,
        }
    }

    #[inline(always)]
    pub fn allows(&self, synapse: &Synapse) -> bool {
        self.enabled
            && self.src_filter.map(|id| id == synapse.src()).unwrap_or(true)
            && self.dst_filter.map(|id| id == synapse.dst()).unwrap_or(true)
    }
}

/// Process-wide trace config, read from the environment once
pub fn synapse_trace_cfg() -> &'static SynapseTraceCfg {
    static CFG: OnceLock<SynapseTraceCfg> = OnceLock::new();
    CFG.get_or_init(|| SynapseTraceCfg::from_lookup(|key| std::env::var(key).ok()))
}

#[inline]
pub(crate) fn trace_contribution(
    strategy: &'static str,
    synapse: &Synapse,
    input: i8,
    contribution: i32,
) {
    tracing::trace!(
        target: TRACE_TARGET,
        "[SYNAPSE] strategy={} src={} dst={} weight={} input={} contrib={}",
        strategy,
        synapse.src(),
        synapse.dst(),
        synapse.weight().raw(),
        input,
        contribution
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_matches_filter_directive() {
        // Subscribers enable tracing with `RUST_LOG=sparse-npu-trace=trace`
        assert_eq!(TRACE_TARGET, "sparse-npu-trace");
    }

    #[test]
    fn test_disabled_by_default() {
        let cfg = SynapseTraceCfg::from_lookup(|_| None);
        assert!(!cfg.allows(&Synapse::new(1, 0, 0)));
    }

    #[test]
    fn test_filters() {
        let cfg = SynapseTraceCfg::from_lookup(|key| match key {
            "SPARSE_NPU_TRACE_SYNAPSE" => Some("TRUE".to_string()),
            "SPARSE_NPU_TRACE_DST" => Some("3".to_string()),
            _ => None,
        });
        assert!(cfg.enabled);
        assert_eq!(cfg.src_filter, None);
        assert!(cfg.allows(&Synapse::new(1, 9, 3)));
        assert!(!cfg.allows(&Synapse::new(1, 9, 4)));
    }
}
