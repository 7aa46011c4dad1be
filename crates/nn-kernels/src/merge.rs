// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Merge layers combining several same-shaped tensors.
//!
//! The elementwise merges write the first `output.numel()` values and read
//! that many from every input.

use tensor_core::index::{index_to_sub, sub_to_index};
use tensor_core::{Tensor, TensorView, MAX_RANK};

fn fold(output: &mut Tensor, inputs: &[TensorView], f: impl Fn(f32, f32) -> f32) {
    let out = output.as_mut_slice();
    let Some((first, rest)) = inputs.split_first() else {
        return;
    };
    out.copy_from_slice(&first.as_slice()[..out.len()]);
    for input in rest {
        for (o, &x) in out.iter_mut().zip(input.as_slice()) {
            *o = f(*o, x);
        }
    }
}

/// Elementwise sum.
pub fn add(output: &mut Tensor, inputs: &[TensorView]) {
    fold(output, inputs, |a, b| a + b);
}

/// Elementwise `a - b`.
pub fn subtract(output: &mut Tensor, a: &TensorView, b: &TensorView) {
    for ((o, &x), &y) in output.as_mut_slice().iter_mut().zip(a.as_slice()).zip(b.as_slice()) {
        *o = x - y;
    }
}

/// Elementwise product.
pub fn multiply(output: &mut Tensor, inputs: &[TensorView]) {
    fold(output, inputs, |a, b| a * b);
}

/// Elementwise mean.
pub fn average(output: &mut Tensor, inputs: &[TensorView]) {
    let inv = 1.0 / inputs.len() as f32;
    output.fill(0.0);
    for input in inputs {
        for (o, &x) in output.as_mut_slice().iter_mut().zip(input.as_slice()) {
            *o += x * inv;
        }
    }
}

/// Elementwise maximum.
pub fn maximum(output: &mut Tensor, inputs: &[TensorView]) {
    fold(output, inputs, |a, b| if a < b { b } else { a });
}

/// Elementwise minimum.
pub fn minimum(output: &mut Tensor, inputs: &[TensorView]) {
    fold(output, inputs, |a, b| if a > b { b } else { a });
}

/// Joins `inputs` along `axis`.
///
/// Every input must match `output` on all other axes; `output`'s extent
/// along `axis` is the sum of the inputs'. Each input lands after the
/// ones before it along that axis.
pub fn concatenate(output: &mut Tensor, axis: usize, inputs: &[TensorView]) {
    let out_shape = *output.shape();
    let out_dims = out_shape.dims();
    debug_assert!(axis < out_dims.len());
    debug_assert_eq!(
        inputs.iter().map(|t| t.shape().dims()[axis]).sum::<usize>(),
        out_dims[axis]
    );

    let out = output.as_mut_slice();
    let mut sub = [0usize; MAX_RANK];
    let mut offset = 0;
    for input in inputs {
        let in_dims = input.shape().dims();
        for (j, &x) in input.as_slice().iter().enumerate() {
            index_to_sub(j, in_dims, &mut sub);
            sub[axis] += offset;
            out[sub_to_index(&sub, out_dims)] = x;
        }
        offset += in_dims[axis];
    }
}
