// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Accumulation strategy selector

use core::fmt;
use core::str::FromStr;

/// Which accumulation strategy a layer is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StrategyKind {
    /// Parallel over synapses, shared atomic accumulators, second pass to compress
    ScatterAtomic,
    /// Parallel over outputs, per-destination synapse groups, private accumulators
    #[default]
    Clustered,
    /// Single-threaded reference
    Sequential,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::ScatterAtomic,
        StrategyKind::Clustered,
        StrategyKind::Sequential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::ScatterAtomic => "scatter_atomic",
            StrategyKind::Clustered => "clustered",
            StrategyKind::Sequential => "sequential",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scatter_atomic" | "scatter" | "atomic" => Ok(StrategyKind::ScatterAtomic),
            "clustered" | "par_for_clustered" => Ok(StrategyKind::Clustered),
            "sequential" | "reference" => Ok(StrategyKind::Sequential),
            other => Err(format!(
                "unknown strategy '{}' (expected 'scatter_atomic', 'clustered' or 'sequential')",
                other
            )),
        }
    }
}
