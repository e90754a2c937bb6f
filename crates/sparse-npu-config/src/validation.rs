// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are within valid ranges before a layer
//! factory is built from them.

use crate::{ConfigError, ConfigResult, LayerEngineConfig};

/// Upper bound on a dedicated thread pool
pub const MAX_THREADS: usize = 1024;

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Required fields
/// - Valid value ranges
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &LayerEngineConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(config, &mut errors);
    validate_value_ranges(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_required_fields(config: &LayerEngineConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.logging.level.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "logging.level".to_string(),
        });
    }
}

fn validate_value_ranges(config: &LayerEngineConfig, errors: &mut Vec<ConfigValidationError>) {
    let gain = config.engine.tanh_gain;
    if !gain.is_finite() || gain <= 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "engine.tanh_gain".to_string(),
            reason: "must be a finite positive number".to_string(),
        });
    }

    if config.engine.threads > MAX_THREADS {
        errors.push(ConfigValidationError::InvalidValue {
            field: "engine.threads".to_string(),
            reason: format!("must be at most {}", MAX_THREADS),
        });
    }

    let level = config.logging.level.trim();
    if !level.is_empty() && !LOG_LEVELS.contains(&level) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&LayerEngineConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_tanh_gain() {
        let mut config = LayerEngineConfig::default();
        config.engine.tanh_gain = f64::NAN;

        let result = validate_config(&config);
        match result {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("engine.tanh_gain")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_too_many_threads() {
        let mut config = LayerEngineConfig::default();
        config.engine.threads = MAX_THREADS + 1;

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("engine.threads")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_log_level_checks() {
        let mut config = LayerEngineConfig::default();
        config.logging.level = String::new();
        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("Missing required configuration: logging.level"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        config.logging.level = "verbose".to_string();
        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("must be one of")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_errors_are_collected() {
        let mut config = LayerEngineConfig::default();
        config.engine.tanh_gain = 0.0;
        config.engine.threads = usize::MAX;

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("engine.tanh_gain"));
                assert!(msg.contains("engine.threads"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
