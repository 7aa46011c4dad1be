// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Fixed-rank, row-major `f32` tensors and the arithmetic every inference
//! kernel is built on.
//!
//! This crate provides:
//! - [`Tensor`] / [`TensorView`]: an owned buffer and a borrowed view, both
//!   carrying a [`Shape`] of rank at most [`MAX_RANK`].
//! - [`index`]: conversion between linear offsets and per-axis subscripts,
//!   plus the full-gather axis permutation.
//! - [`matmul`] / [`affine_matmul`]: matrix products over flat buffers.
//! - [`dot`]: arbitrary-axis tensor contraction, optionally in cosine mode.
//!
//! # Design Goals
//! - No heap allocation in hot paths: outputs and scratch space are owned
//!   by the caller.
//! - Shape agreement between operands is a caller precondition; only
//!   construction of tensors and shapes is validated (via `thiserror`).
//! - Single-threaded and free of global state.

mod error;
pub mod index;
mod ops;
mod shape;
mod tensor;

pub use error::TensorError;
pub use ops::{affine_matmul, dot, dot_output_shape, dot_scratch_len, matmul};
pub use shape::{Shape, MAX_RANK};
pub use tensor::{Tensor, TensorView};
