// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Sparse NPU Configuration System
//!
//! Type-safe configuration for layer engines with support for:
//! - TOML file parsing
//! - Environment variable overrides
//! - Validation of value ranges
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sparse_npu_config::load_config;
//!
//! // Load configuration with automatic file discovery and overrides
//! let config = load_config(None).expect("Failed to load config");
//!
//! println!("Strategy: {}", config.engine.strategy);
//! println!("Overflow: {}", config.engine.overflow);
//! ```
//!
//! Every section has defaults, so an empty file (or `LayerEngineConfig::default()`)
//! is a valid configuration.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_environment_overrides, apply_overrides_from, find_config_file, load_config,
    load_config_from_str, CONFIG_FILE_NAME, CONFIG_PATH_ENV,
};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Re-export for convenience
pub use serde;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
