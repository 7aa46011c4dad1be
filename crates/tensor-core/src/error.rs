// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor construction.
//!
//! Kernels themselves do not return errors: shape agreement between operands
//! is a caller precondition. Errors are only produced where a [`crate::Tensor`]
//! or [`crate::Shape`] is built or re-shaped.

use crate::Shape;

/// Errors that can occur when building or re-shaping tensors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TensorError {
    /// The requested rank exceeds [`crate::MAX_RANK`].
    #[error("rank {rank} exceeds the maximum supported rank {max}")]
    RankTooLarge { rank: usize, max: usize },

    /// The backing buffer holds fewer elements than the shape requires.
    #[error("buffer too small: shape needs {expected} elements, buffer holds {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    /// Two shapes are incompatible for the requested operation.
    #[error("incompatible shapes for {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// An axis index is out of range for a tensor of the given rank.
    #[error("axis {axis} is out of range for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },
}
