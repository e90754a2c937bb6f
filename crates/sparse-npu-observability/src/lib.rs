// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # sparse-npu-observability
//!
//! Logging setup shared by binaries and tests that embed sparse-npu crates.
//! Library crates only emit `tracing` events; this crate installs the subscriber.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known crate targets for debug flags (tracing targets use underscores)
pub const KNOWN_CRATES: &[&str] = &[
    "sparse-npu",
    "sparse-npu-neural",
    "sparse-npu-layers",
    "sparse-npu-config",
];
