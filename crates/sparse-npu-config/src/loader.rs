// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Two tiers, applied in order:
//! 1. TOML file (base values; missing sections keep their defaults)
//! 2. Environment variables (runtime overrides)

use crate::{validate_config, ConfigError, ConfigResult, LayerEngineConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SPARSE_NPU_CONFIG_PATH";

/// File name searched for in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = "sparse_npu.toml";

/// Find the configuration file
///
/// Search order:
/// 1. `SPARSE_NPU_CONFIG_PATH` environment variable
/// 2. Current working directory: `./sparse_npu.toml`
/// 3. Up to 5 parent directories
///
/// Returns `Ok(None)` when no file exists anywhere; built-in defaults apply then.
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if `SPARSE_NPU_CONFIG_PATH` points at a missing file
pub fn find_config_file() -> ConfigResult<Option<PathBuf>> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let Ok(cwd) = env::current_dir() else {
        return Ok(None);
    };

    Ok(cwd
        .ancestors()
        .take(6)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.exists()))
}

/// Load configuration
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, the file is searched for
///   and defaults are used when none is found.
///
/// # Errors
///
/// Returns error if an explicit file is missing, contains invalid TOML, an
/// environment override cannot be parsed, or the result fails validation
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<LayerEngineConfig> {
    let config_file = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file()?,
    };

    let mut config = match config_file {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        }
        None => LayerEngineConfig::default(),
    };

    apply_environment_overrides(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// Parse and validate configuration from a TOML string (no environment overrides)
pub fn load_config_from_str(content: &str) -> ConfigResult<LayerEngineConfig> {
    let config: LayerEngineConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPARSE_NPU_STRATEGY` -> `engine.strategy`
/// - `SPARSE_NPU_OVERFLOW` -> `engine.overflow`
/// - `SPARSE_NPU_ACTIVATION` -> `engine.activation`
/// - `SPARSE_NPU_THREADS` -> `engine.threads`
/// - `SPARSE_NPU_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut LayerEngineConfig) -> ConfigResult<()> {
    apply_overrides_from(config, |key| env::var(key).ok())
}

/// Apply overrides from an arbitrary key lookup (environment, CLI map, tests)
pub fn apply_overrides_from<F>(config: &mut LayerEngineConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("SPARSE_NPU_STRATEGY") {
        config.engine.strategy = value.parse().map_err(ConfigError::InvalidValue)?;
    }
    if let Some(value) = lookup("SPARSE_NPU_OVERFLOW") {
        config.engine.overflow = value.parse().map_err(ConfigError::InvalidValue)?;
    }
    if let Some(value) = lookup("SPARSE_NPU_ACTIVATION") {
        config.engine.activation = value.parse().map_err(ConfigError::InvalidValue)?;
    }
    if let Some(value) = lookup("SPARSE_NPU_THREADS") {
        config.engine.threads = value.trim().parse().map_err(|_| {
            ConfigError::InvalidValue(format!("SPARSE_NPU_THREADS must be an integer, got '{}'", value))
        })?;
    }
    if let Some(value) = lookup("SPARSE_NPU_LOG_LEVEL") {
        config.logging.level = value.trim().to_ascii_lowercase();
    }
    Ok(())
}
