// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Mirrors the layout of `sparse_npu.toml`:
//!
//! ```toml
//! [engine]
//! strategy = "clustered"      # scatter_atomic | clustered | sequential
//! overflow = "saturating"     # saturating | wrapping
//! activation = "hard_sigmoid" # hard_sigmoid | tanh_lut
//! tanh_gain = 1.0
//! threads = 0                 # 0 = shared global rayon pool
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use sparse_npu_neural::{OverflowPolicy, StrategyKind};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerEngineConfig {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Layer construction and execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Accumulation strategy used by the layer factory
    pub strategy: StrategyKind,

    /// Accumulator overflow behaviour
    pub overflow: OverflowPolicy,

    /// Activation compression function
    pub activation: ActivationKind,

    /// Curve steepness for `tanh_lut`
    pub tanh_gain: f64,

    /// Size of a dedicated rayon pool (0 = use the global pool)
    pub threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            overflow: OverflowPolicy::default(),
            activation: ActivationKind::default(),
            tanh_gain: 1.0,
            threads: 0,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Stock activation compression functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    #[default]
    HardSigmoid,
    TanhLut,
}

impl ActivationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationKind::HardSigmoid => "hard_sigmoid",
            ActivationKind::TanhLut => "tanh_lut",
        }
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard_sigmoid" | "hard" => Ok(ActivationKind::HardSigmoid),
            "tanh_lut" | "tanh" => Ok(ActivationKind::TanhLut),
            other => Err(format!(
                "unknown activation '{}' (expected 'hard_sigmoid' or 'tanh_lut')",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayerEngineConfig::default();
        assert_eq!(config.engine.strategy, StrategyKind::Clustered);
        assert_eq!(config.engine.overflow, OverflowPolicy::Saturating);
        assert_eq!(config.engine.activation, ActivationKind::HardSigmoid);
        assert_eq!(config.engine.threads, 0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LayerEngineConfig = toml::from_str(
            r#"
            [engine]
            strategy = "scatter_atomic"
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.strategy, StrategyKind::ScatterAtomic);
        assert_eq!(config.engine.tanh_gain, 1.0);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(LayerEngineConfig::default()).unwrap();
        assert_eq!(json["engine"]["overflow"], "saturating");
        assert_eq!(json["engine"]["activation"], "hard_sigmoid");
    }
}
