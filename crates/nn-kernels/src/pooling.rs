// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pooling over channels-last tensors.
//!
//! 1-D inputs are `[steps, channels]`, 2-D inputs `[rows, cols, channels]`.
//! The window count comes from the output shape. Inputs padded for `same`
//! pooling carry [`PAD_VALUE`] in the padded positions; max pooling never
//! picks it and average pooling leaves it out of the mean.

use tensor_core::{Tensor, TensorView};

/// Fill value for padded pooling inputs.
pub const PAD_VALUE: f32 = f32::MIN;

#[derive(Clone, Copy)]
enum Reduce {
    Max,
    Avg,
}

/// Shared window walk: `input` viewed as `[in_rows, in_cols, channels]`.
#[allow(clippy::too_many_arguments)]
fn pool(
    out: &mut [f32],
    input: &[f32],
    in_cols: usize,
    channels: usize,
    out_dims: [usize; 2],
    pool_size: [usize; 2],
    stride: [usize; 2],
    reduce: Reduce,
) {
    let [out_rows, out_cols] = out_dims;
    for orow in 0..out_rows {
        for ocol in 0..out_cols {
            let base = (orow * stride[0] * in_cols + ocol * stride[1]) * channels;
            for c in 0..channels {
                let window = (0..pool_size[0]).flat_map(|pr| {
                    (0..pool_size[1]).map(move |pc| input[base + (pr * in_cols + pc) * channels + c])
                });
                let value = match reduce {
                    Reduce::Max => window.fold(f32::NEG_INFINITY, f32::max),
                    Reduce::Avg => {
                        let (sum, count) = window
                            .filter(|&x| x > PAD_VALUE)
                            .fold((0.0f32, 0usize), |(s, n), x| (s + x, n + 1));
                        sum / count as f32
                    }
                };
                out[(orow * out_cols + ocol) * channels + c] = value;
            }
        }
    }
}

/// Maximum over every position, per channel.
pub fn global_max_pooling(output: &mut Tensor, input: &TensorView) {
    let channels = input.shape().last_dim();
    let out = &mut output.as_mut_slice()[..channels];
    out.fill(f32::NEG_INFINITY);
    for row in input.as_slice().chunks_exact(channels) {
        for (o, &x) in out.iter_mut().zip(row) {
            if *o < x {
                *o = x;
            }
        }
    }
}

/// Mean over every position, per channel.
pub fn global_avg_pooling(output: &mut Tensor, input: &TensorView) {
    let channels = input.shape().last_dim();
    let inv = 1.0 / (input.numel() / channels) as f32;
    let out = &mut output.as_mut_slice()[..channels];
    out.fill(0.0);
    for row in input.as_slice().chunks_exact(channels) {
        for (o, &x) in out.iter_mut().zip(row) {
            *o += x * inv;
        }
    }
}

fn pool1d(output: &mut Tensor, input: &TensorView, pool_size: usize, stride: usize, reduce: Reduce) {
    let channels = input.shape().dims()[1];
    let out_steps = output.shape().dims()[0];
    pool(
        output.as_mut_slice(),
        input.as_slice(),
        input.shape().dims()[0],
        channels,
        [1, out_steps],
        [1, pool_size],
        [1, stride],
        reduce,
    );
}

fn pool2d(
    output: &mut Tensor,
    input: &TensorView,
    pool_size: [usize; 2],
    stride: [usize; 2],
    reduce: Reduce,
) {
    let in_dims = input.shape().dims();
    let out_dims = output.shape().dims();
    let out_rc = [out_dims[0], out_dims[1]];
    pool(
        output.as_mut_slice(),
        input.as_slice(),
        in_dims[1],
        in_dims[2],
        out_rc,
        pool_size,
        stride,
        reduce,
    );
}

/// 1-D max pooling over `[steps, channels]`.
pub fn max_pool1d(output: &mut Tensor, input: &TensorView, pool_size: usize, stride: usize) {
    pool1d(output, input, pool_size, stride, Reduce::Max);
}

/// 1-D average pooling over `[steps, channels]`, skipping padding.
pub fn avg_pool1d(output: &mut Tensor, input: &TensorView, pool_size: usize, stride: usize) {
    pool1d(output, input, pool_size, stride, Reduce::Avg);
}

/// 2-D max pooling over `[rows, cols, channels]`.
pub fn max_pool2d(output: &mut Tensor, input: &TensorView, pool_size: [usize; 2], stride: [usize; 2]) {
    pool2d(output, input, pool_size, stride, Reduce::Max);
}

/// 2-D average pooling over `[rows, cols, channels]`, skipping padding.
pub fn avg_pool2d(output: &mut Tensor, input: &TensorView, pool_size: [usize; 2], stride: [usize; 2]) {
    pool2d(output, input, pool_size, stride, Reduce::Avg);
}
