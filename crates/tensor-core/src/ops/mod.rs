// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor arithmetic operations.
//!
//! Each operation writes into a caller-allocated output buffer and never
//! allocates, so the inference hot path stays free of heap traffic.

mod dot_op;
mod matmul_op;

pub use dot_op::{dot, dot_output_shape, dot_scratch_len};
pub use matmul_op::{affine_matmul, matmul};
