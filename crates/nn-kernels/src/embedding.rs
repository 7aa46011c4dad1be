// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Embedding lookup.

use tensor_core::{Tensor, TensorView};

/// Replaces every index in `input` with its row of the `[vocab, dim]`
/// `kernel`.
///
/// Indices are stored as floats and truncated toward zero. `output` holds
/// `input.numel() * dim` values. An index past the vocabulary panics.
pub fn embedding(output: &mut Tensor, input: &TensorView, kernel: &TensorView) {
    let dim = kernel.shape().dims()[1];
    let table = kernel.as_slice();
    let out = output.as_mut_slice();
    for (dst, &idx) in out.chunks_exact_mut(dim).zip(input.as_slice()) {
        let row = idx as usize;
        dst.copy_from_slice(&table[row * dim..(row + 1) * dim]);
    }
}
