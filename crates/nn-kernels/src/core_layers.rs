// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dense layer and data-movement kernels.
//!
//! All kernels write into a caller-sized output tensor. Only the
//! reshaping kernels, which set a new shape on the output, can fail.

use crate::activation::Activate;
use tensor_core::{affine_matmul, dot, index, Shape, Tensor, TensorError, TensorView};

/// Fully connected layer: `output = act(input · kernel + bias)`.
///
/// `kernel` is `[in_features, out_features]`. Inputs of rank 1 or 2 go
/// through a single affine matmul; higher ranks contract the last input
/// axis against the kernel's first axis with [`dot`], which needs
/// `fwork.len() >= input.numel() + kernel.numel()`.
pub fn dense(
    output: &mut Tensor,
    input: &TensorView,
    kernel: &TensorView,
    bias: &[f32],
    activation: &dyn Activate,
    fwork: &mut [f32],
) {
    let kdims = kernel.shape().dims();
    let (innerdim, outcols) = (kdims[0], kdims[1]);

    if input.rank() <= 2 {
        let outrows = if input.rank() > 1 {
            input.shape().dims()[0]
        } else {
            1
        };
        let outsize = outrows * outcols;
        let out = output.as_mut_slice();
        affine_matmul(
            out,
            input.as_slice(),
            kernel.as_slice(),
            bias,
            outrows,
            outcols,
            innerdim,
        );
        activation.apply(&mut out[..outsize]);
    } else {
        dot(output, input, kernel, &[input.rank() - 1], &[0], false, fwork);
        bias_add(output, bias);
        activation.apply(output.as_mut_slice());
    }
}

/// Adds `bias` to every run of `bias.len()` values, i.e. broadcasts it over
/// the last axis.
pub fn bias_add(tensor: &mut Tensor, bias: &[f32]) {
    if bias.is_empty() {
        return;
    }
    for chunk in tensor.as_mut_slice().chunks_exact_mut(bias.len()) {
        for (x, &b) in chunk.iter_mut().zip(bias) {
            *x += b;
        }
    }
}

/// Copies `input` into `output` as a rank-1 tensor.
///
/// # Errors
/// Returns [`TensorError::BufferTooSmall`] if `output` cannot hold the input.
pub fn flatten(output: &mut Tensor, input: &TensorView) -> Result<(), TensorError> {
    output.set_shape(Shape::vector(input.numel()))?;
    output.as_mut_slice().copy_from_slice(input.as_slice());
    Ok(())
}

/// Copies `input` into `output` under a new shape with the same number of
/// elements.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] if the element counts differ, or a
/// construction error for an invalid `new_dims`.
pub fn reshape(output: &mut Tensor, input: &TensorView, new_dims: &[usize]) -> Result<(), TensorError> {
    let shape = Shape::new(new_dims)?;
    if shape.num_elements() != input.numel() {
        return Err(TensorError::ShapeMismatch {
            op: "reshape",
            lhs: *input.shape(),
            rhs: shape,
        });
    }
    output.set_shape(shape)?;
    output.as_mut_slice().copy_from_slice(input.as_slice());
    Ok(())
}

/// Reorders the axes of `input` so output axis `i` is input axis `perm[i]`.
///
/// `output` must already carry the permuted shape.
pub fn permute_dims(output: &mut Tensor, input: &TensorView, perm: &[usize]) {
    debug_assert_eq!(*output.shape(), input.shape().permuted(perm));
    index::permute_into(
        output.as_mut_slice(),
        input.as_slice(),
        input.shape().dims(),
        perm,
    );
}

/// Writes `n` copies of the vector `input` as the rows of `output`.
pub fn repeat_vector(output: &mut Tensor, input: &TensorView, n: usize) {
    let src = input.as_slice();
    let width = src.len();
    let out = output.as_mut_slice();
    for row in out[..n * width].chunks_exact_mut(width.max(1)) {
        row.copy_from_slice(src);
    }
}

/// Reverses `tensor` in place along `axis`.
pub fn flip(tensor: &mut Tensor, axis: usize) {
    let dims = tensor.shape().dims();
    debug_assert!(axis < dims.len());
    let extent = dims[axis];
    let inner: usize = dims[axis + 1..].iter().product();
    let block = extent * inner;
    if block == 0 {
        return;
    }

    for chunk in tensor.as_mut_slice().chunks_exact_mut(block) {
        for r in 0..extent / 2 {
            let (head, tail) = chunk.split_at_mut((extent - 1 - r) * inner);
            head[r * inner..(r + 1) * inner].swap_with_slice(&mut tail[..inner]);
        }
    }
}
