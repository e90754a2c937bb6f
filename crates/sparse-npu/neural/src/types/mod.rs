// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neural Types Module
//!
//! Core type definitions shared by every accumulation strategy.

pub mod error;
pub mod strategy;
pub mod synapse_types;

pub use error::{LayerError, Result};
pub use strategy::StrategyKind;
pub use synapse_types::{validate_synapses, Synapse, Q16};
