// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for layer construction and configuration.

/// Errors raised while preparing layers. Kernels themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// A tensor could not be built or re-shaped.
    #[error("tensor error: {0}")]
    Tensor(#[from] tensor_core::TensorError),

    /// Packed weights do not match the layout the layer expects.
    #[error("invalid weights for {layer}: {detail}")]
    InvalidWeights { layer: &'static str, detail: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
