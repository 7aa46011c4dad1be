// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Inference-time batch normalization.

use tensor_core::{Tensor, TensorView};

/// Per-channel statistics and affine parameters, each indexed by the
/// subscript along the normalized axis.
#[derive(Debug, Clone, Copy)]
pub struct BatchNormParams<'a> {
    pub mean: &'a [f32],
    pub stdev: &'a [f32],
    pub gamma: &'a [f32],
    pub beta: &'a [f32],
}

/// `y = (x - mean[c]) / stdev[c] * gamma[c] + beta[c]`, where `c` is each
/// element's subscript along `axis`.
///
/// `stdev` is the already-computed `sqrt(variance + epsilon)`.
pub fn batch_norm(output: &mut Tensor, input: &TensorView, params: &BatchNormParams, axis: usize) {
    let dims = input.shape().dims();
    debug_assert!(axis < dims.len());
    let inner: usize = dims[axis + 1..].iter().product();
    let extent = dims[axis];

    let out = output.as_mut_slice();
    for (i, (o, &x)) in out.iter_mut().zip(input.as_slice()).enumerate() {
        let c = (i / inner) % extent;
        *o = (x - params.mean[c]) / params.stdev[c] * params.gamma[c] + params.beta[c];
    }
}
