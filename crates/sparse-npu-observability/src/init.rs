// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::CrateDebugFlags;

/// Install a console subscriber filtered by `debug_flags` and `default_level`.
///
/// `RUST_LOG`, when set, takes precedence over the computed filter. Returns
/// `Ok(false)` when a global subscriber was already installed (tests, embedding
/// applications), `Ok(true)` when this call installed it.
pub fn init_logging(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<bool> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => directives,
        _ => debug_flags.to_filter_string(default_level),
    };
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_names(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(filter = %filter, "logging initialized");
    }
    Ok(installed)
}

/// Initialize logging at `info` with flags from arguments and environment
pub fn init_logging_default() -> Result<bool> {
    init_logging(&crate::cli::parse_debug_flags(), "info")
}
