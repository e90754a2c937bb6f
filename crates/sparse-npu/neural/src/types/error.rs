// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for layer construction and execution

/// Errors raised at layer call boundaries.
///
/// Construction errors (`SourceOutOfRange`, `DestinationOutOfRange`) reject a
/// synapse list that does not fit the declared layer shape. Execution errors
/// (`InputLengthMismatch`, `OutputLengthMismatch`) reject buffers of the wrong
/// length before any element is read or written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("Synapse {index}: source neuron {src} out of range (layer has {n_in} inputs)")]
    SourceOutOfRange { index: usize, src: u32, n_in: u32 },

    #[error("Synapse {index}: destination neuron {dst} out of range (layer has {n_out} outputs)")]
    DestinationOutOfRange { index: usize, dst: u32, n_out: u32 },

    #[error("Input buffer length mismatch: expected {expected}, got {actual}")]
    InputLengthMismatch { expected: usize, actual: usize },

    #[error("Output buffer length mismatch: expected {expected}, got {actual}")]
    OutputLengthMismatch { expected: usize, actual: usize },

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
}

impl LayerError {
    /// True for errors detected while building a layer.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            LayerError::SourceOutOfRange { .. } | LayerError::DestinationOutOfRange { .. }
        )
    }

    /// True for errors caused by misuse of `execute`.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            LayerError::InputLengthMismatch { .. } | LayerError::OutputLengthMismatch { .. }
        )
    }
}

pub type Result<T> = core::result::Result<T, LayerError>;
