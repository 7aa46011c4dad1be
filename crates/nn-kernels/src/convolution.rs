// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Convolution, padding, cropping and upsampling over channels-last tensors.
//!
//! | kernel    | input                      | weights                          |
//! |-----------|----------------------------|----------------------------------|
//! | 1-D       | `[steps, channels]`        | `[width, in_ch, out_ch]`         |
//! | 2-D       | `[rows, cols, channels]`   | `[height, width, in_ch, out_ch]` |
//! | 3-D       | `[depth, rows, cols, channels]` | `[d, h, w, in_ch, out_ch]`  |
//!
//! Pad and crop amounts are given as `[before, after]` per spatial axis.
//! Output extents are read from the caller-shaped output tensor.

use crate::activation::Activate;
use crate::core_layers::bias_add;
use tensor_core::{Tensor, TensorView};

/// Pads the time axis of `[steps, channels]` with `fill`.
pub fn pad1d(output: &mut Tensor, input: &TensorView, fill: f32, pad: [usize; 2]) {
    let channels = input.shape().dims()[1];
    let offset = pad[0] * channels;
    let out = output.as_mut_slice();
    out.fill(fill);
    out[offset..offset + input.numel()].copy_from_slice(input.as_slice());
}

/// Pads rows and columns of `[rows, cols, channels]` with `fill`.
///
/// `pad` is `[top, bottom, left, right]`.
pub fn pad2d(output: &mut Tensor, input: &TensorView, fill: f32, pad: [usize; 4]) {
    let dims = input.shape().dims();
    let (rows, cols, channels) = (dims[0], dims[1], dims[2]);
    let [top, _, left, right] = pad;

    let row_len = cols * channels;
    let out_row_len = (left + cols + right) * channels;
    let out = output.as_mut_slice();
    out.fill(fill);
    for (r, src) in input.as_slice().chunks_exact(row_len).enumerate().take(rows) {
        let start = (top + r) * out_row_len + left * channels;
        out[start..start + row_len].copy_from_slice(src);
    }
}

/// Pads the three spatial axes of `[depth, rows, cols, channels]` with `fill`.
///
/// `pad` is `[before, after]` for depth, then rows, then columns.
pub fn pad3d(output: &mut Tensor, input: &TensorView, fill: f32, pad: [usize; 6]) {
    let dims = input.shape().dims();
    let (depth, rows, cols, channels) = (dims[0], dims[1], dims[2], dims[3]);
    let out_rows = pad[2] + rows + pad[3];
    let out_cols = pad[4] + cols + pad[5];

    let row_len = cols * channels;
    let x = input.as_slice();
    let out = output.as_mut_slice();
    out.fill(fill);
    for d in 0..depth {
        for r in 0..rows {
            let src = (d * rows + r) * row_len;
            let dst = (((pad[0] + d) * out_rows + pad[2] + r) * out_cols + pad[4]) * channels;
            out[dst..dst + row_len].copy_from_slice(&x[src..src + row_len]);
        }
    }
}

/// 1-D convolution with stride and dilation, then bias and activation.
#[allow(clippy::too_many_arguments)]
pub fn conv1d(
    output: &mut Tensor,
    input: &TensorView,
    kernel: &TensorView,
    bias: &[f32],
    stride: usize,
    dilation: usize,
    activation: &dyn Activate,
) {
    let kdims = kernel.shape().dims();
    let (width, in_ch, out_ch) = (kdims[0], kdims[1], kdims[2]);
    let out_steps = output.shape().dims()[0];
    let x = input.as_slice();
    let w = kernel.as_slice();

    let out = output.as_mut_slice();
    out.fill(0.0);
    for t in 0..out_steps {
        let acc = &mut out[t * out_ch..(t + 1) * out_ch];
        for z in 0..width {
            let src = (t * stride + z * dilation) * in_ch;
            for q in 0..in_ch {
                let xv = x[src + q];
                let w_row = &w[(z * in_ch + q) * out_ch..(z * in_ch + q + 1) * out_ch];
                for (a, &wv) in acc.iter_mut().zip(w_row) {
                    *a += wv * xv;
                }
            }
        }
    }
    bias_add(output, bias);
    activation.apply(output.as_mut_slice());
}

/// 2-D convolution with per-axis stride and dilation, then bias and
/// activation.
#[allow(clippy::too_many_arguments)]
pub fn conv2d(
    output: &mut Tensor,
    input: &TensorView,
    kernel: &TensorView,
    bias: &[f32],
    stride: [usize; 2],
    dilation: [usize; 2],
    activation: &dyn Activate,
) {
    let kdims = kernel.shape().dims();
    let (kh, kw, in_ch, out_ch) = (kdims[0], kdims[1], kdims[2], kdims[3]);
    let in_cols = input.shape().dims()[1];
    let odims = output.shape().dims();
    let (out_rows, out_cols) = (odims[0], odims[1]);
    let x = input.as_slice();
    let w = kernel.as_slice();

    let out = output.as_mut_slice();
    out.fill(0.0);
    for r in 0..out_rows {
        for c in 0..out_cols {
            let o = (r * out_cols + c) * out_ch;
            let acc = &mut out[o..o + out_ch];
            for z0 in 0..kh {
                let ir = r * stride[0] + z0 * dilation[0];
                for z1 in 0..kw {
                    let ic = c * stride[1] + z1 * dilation[1];
                    let src = (ir * in_cols + ic) * in_ch;
                    for q in 0..in_ch {
                        let xv = x[src + q];
                        let k = ((z0 * kw + z1) * in_ch + q) * out_ch;
                        for (a, &wv) in acc.iter_mut().zip(&w[k..k + out_ch]) {
                            *a += wv * xv;
                        }
                    }
                }
            }
        }
    }
    bias_add(output, bias);
    activation.apply(output.as_mut_slice());
}

/// 3-D convolution with per-axis stride and dilation, then bias and
/// activation.
#[allow(clippy::too_many_arguments)]
pub fn conv3d(
    output: &mut Tensor,
    input: &TensorView,
    kernel: &TensorView,
    bias: &[f32],
    stride: [usize; 3],
    dilation: [usize; 3],
    activation: &dyn Activate,
) {
    let kdims = kernel.shape().dims();
    let (kd, kh, kw, in_ch, out_ch) = (kdims[0], kdims[1], kdims[2], kdims[3], kdims[4]);
    let idims = input.shape().dims();
    let (in_rows, in_cols) = (idims[1], idims[2]);
    let odims = output.shape().dims();
    let (out_depth, out_rows, out_cols) = (odims[0], odims[1], odims[2]);
    let x = input.as_slice();
    let w = kernel.as_slice();

    let out = output.as_mut_slice();
    out.fill(0.0);
    for d in 0..out_depth {
        for r in 0..out_rows {
            for c in 0..out_cols {
                let o = ((d * out_rows + r) * out_cols + c) * out_ch;
                let acc = &mut out[o..o + out_ch];
                for z0 in 0..kd {
                    let id = d * stride[0] + z0 * dilation[0];
                    for z1 in 0..kh {
                        let ir = r * stride[1] + z1 * dilation[1];
                        for z2 in 0..kw {
                            let ic = c * stride[2] + z2 * dilation[2];
                            let src = ((id * in_rows + ir) * in_cols + ic) * in_ch;
                            for q in 0..in_ch {
                                let xv = x[src + q];
                                let k = (((z0 * kh + z1) * kw + z2) * in_ch + q) * out_ch;
                                for (a, &wv) in acc.iter_mut().zip(&w[k..k + out_ch]) {
                                    *a += wv * xv;
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    bias_add(output, bias);
    activation.apply(output.as_mut_slice());
}

/// Drops `crop[0]` leading and `crop[1]` trailing steps of `[steps, channels]`.
pub fn crop1d(output: &mut Tensor, input: &TensorView, crop: [usize; 2]) {
    let channels = input.shape().dims()[1];
    let offset = crop[0] * channels;
    let out = output.as_mut_slice();
    let n = out.len();
    out.copy_from_slice(&input.as_slice()[offset..offset + n]);
}

/// Crops rows and columns of `[rows, cols, channels]`.
///
/// `crop` is `[top, bottom, left, right]`.
pub fn crop2d(output: &mut Tensor, input: &TensorView, crop: [usize; 4]) {
    let dims = input.shape().dims();
    let (cols, channels) = (dims[1], dims[2]);
    let [top, _, left, right] = crop;
    let out_rows = output.shape().dims()[0];

    let row_len = (cols - left - right) * channels;
    let in_row_len = cols * channels;
    let x = input.as_slice();
    let out = output.as_mut_slice();
    for (r, dst) in out.chunks_exact_mut(row_len.max(1)).enumerate().take(out_rows) {
        let start = (top + r) * in_row_len + left * channels;
        dst.copy_from_slice(&x[start..start + row_len]);
    }
}

/// Crops the three spatial axes of `[depth, rows, cols, channels]`.
///
/// `crop` is `[before, after]` for depth, then rows, then columns.
pub fn crop3d(output: &mut Tensor, input: &TensorView, crop: [usize; 6]) {
    let dims = input.shape().dims();
    let (rows, cols, channels) = (dims[1], dims[2], dims[3]);
    let odims = output.shape().dims();
    let (out_depth, out_rows, out_cols) = (odims[0], odims[1], odims[2]);

    let row_len = out_cols * channels;
    let x = input.as_slice();
    let out = output.as_mut_slice();
    for d in 0..out_depth {
        for r in 0..out_rows {
            let src = (((crop[0] + d) * rows + crop[2] + r) * cols + crop[4]) * channels;
            let dst = (d * out_rows + r) * row_len;
            out[dst..dst + row_len].copy_from_slice(&x[src..src + row_len]);
        }
    }
}

/// Repeats each step of `[steps, channels]` `size` times.
pub fn upsampling1d(output: &mut Tensor, input: &TensorView, size: usize) {
    let channels = input.shape().dims()[1];
    let out = output.as_mut_slice();
    for (i, src) in input.as_slice().chunks_exact(channels).enumerate() {
        for j in 0..size {
            let start = (i * size + j) * channels;
            out[start..start + channels].copy_from_slice(src);
        }
    }
}

/// Repeats rows `size[0]` times and columns `size[1]` times.
pub fn upsampling2d(output: &mut Tensor, input: &TensorView, size: [usize; 2]) {
    let in_dims = input.shape().dims();
    let (in_cols, channels) = (in_dims[1], in_dims[2]);
    let odims = output.shape().dims();
    let (out_rows, out_cols) = (odims[0], odims[1]);
    let x = input.as_slice();

    let out = output.as_mut_slice();
    for r in 0..out_rows {
        for c in 0..out_cols {
            let src = ((r / size[0]) * in_cols + c / size[1]) * channels;
            let dst = (r * out_cols + c) * channels;
            out[dst..dst + channels].copy_from_slice(&x[src..src + channels]);
        }
    }
}

/// Repeats depth slices `size[0]` times, rows `size[1]` times and columns
/// `size[2]` times.
pub fn upsampling3d(output: &mut Tensor, input: &TensorView, size: [usize; 3]) {
    let in_dims = input.shape().dims();
    let (in_rows, in_cols, channels) = (in_dims[1], in_dims[2], in_dims[3]);
    let odims = output.shape().dims();
    let (out_depth, out_rows, out_cols) = (odims[0], odims[1], odims[2]);
    let x = input.as_slice();

    let out = output.as_mut_slice();
    for d in 0..out_depth {
        for r in 0..out_rows {
            for c in 0..out_cols {
                let src =
                    (((d / size[0]) * in_rows + r / size[1]) * in_cols + c / size[2]) * channels;
                let dst = ((d * out_rows + r) * out_cols + c) * channels;
                out[dst..dst + channels].copy_from_slice(&x[src..src + channels]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Activation;
    use tensor_core::Shape;

    fn tensor(dims: &[usize], data: &[f32]) -> Tensor {
        Tensor::from_f32(Shape::new(dims).unwrap(), data).unwrap()
    }

    #[test]
    fn test_pad1d() {
        let input = tensor(&[2, 1], &[1.0, 2.0]);
        let mut out = Tensor::zeros(Shape::matrix(5, 1));
        pad1d(&mut out, &input.view(), -1.0, [1, 2]);
        assert_eq!(out.as_slice(), &[-1.0, 1.0, 2.0, -1.0, -1.0]);
    }

    #[test]
    fn test_pad2d() {
        let input = tensor(&[1, 2, 1], &[1.0, 2.0]);
        let mut out = Tensor::zeros(Shape::new(&[3, 3, 1]).unwrap());
        pad2d(&mut out, &input.view(), 0.0, [1, 1, 1, 0]);
        assert_eq!(
            out.as_slice(),
            &[0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_conv1d_moving_sum() {
        // Width-2 kernel of ones over one channel: pairwise sums.
        let input = tensor(&[4, 1], &[1.0, 2.0, 3.0, 4.0]);
        let kernel = tensor(&[2, 1, 1], &[1.0, 1.0]);
        let mut out = Tensor::zeros(Shape::matrix(3, 1));
        conv1d(&mut out, &input.view(), &kernel.view(), &[0.5], 1, 1, &Activation::Linear);
        assert_eq!(out.as_slice(), &[3.5, 5.5, 7.5]);
    }

    #[test]
    fn test_conv1d_stride_dilation_channels() {
        // 5 steps, 2 channels; out channel 0 reads ch0, out channel 1 reads ch1 * 2.
        let input = tensor(&[5, 2], &[1.0, 0.0, 2.0, 1.0, 3.0, 0.0, 4.0, 1.0, 5.0, 0.0]);
        #[rustfmt::skip]
        let kernel = tensor(&[2, 2, 2], &[
            1.0, 0.0, 0.0, 2.0, // tap 0
            1.0, 0.0, 0.0, 2.0, // tap 1
        ]);
        let mut out = Tensor::zeros(Shape::matrix(2, 2));
        // stride 2, dilation 2: windows {0, 2} and {2, 4}
        conv1d(&mut out, &input.view(), &kernel.view(), &[0.0, 0.0], 2, 2, &Activation::Linear);
        assert_eq!(out.as_slice(), &[4.0, 0.0, 8.0, 0.0]);
    }

    #[test]
    fn test_conv2d_box_filter() {
        let data: Vec<f32> = (1..=9).map(|x| x as f32).collect();
        let input = tensor(&[3, 3, 1], &data);
        let kernel = tensor(&[2, 2, 1, 1], &[1.0, 1.0, 1.0, 1.0]);
        let mut out = Tensor::zeros(Shape::new(&[2, 2, 1]).unwrap());
        conv2d(
            &mut out,
            &input.view(),
            &kernel.view(),
            &[-12.0],
            [1, 1],
            [1, 1],
            &Activation::Relu,
        );
        // box sums 12, 16, 24, 28 minus 12
        assert_eq!(out.as_slice(), &[0.0, 4.0, 12.0, 16.0]);
    }

    #[test]
    fn test_conv2d_matches_conv1d_on_single_row() {
        let input = tensor(&[1, 4, 1], &[1.0, -2.0, 3.0, 0.5]);
        let kernel = tensor(&[1, 2, 1, 1], &[0.25, 2.0]);
        let mut out2 = Tensor::zeros(Shape::new(&[1, 3, 1]).unwrap());
        conv2d(&mut out2, &input.view(), &kernel.view(), &[0.0], [1, 1], [1, 1], &Activation::Linear);

        let input1 = tensor(&[4, 1], &[1.0, -2.0, 3.0, 0.5]);
        let kernel1 = tensor(&[2, 1, 1], &[0.25, 2.0]);
        let mut out1 = Tensor::zeros(Shape::matrix(3, 1));
        conv1d(&mut out1, &input1.view(), &kernel1.view(), &[0.0], 1, 1, &Activation::Linear);

        assert_eq!(out1.as_slice(), out2.as_slice());
    }

    #[test]
    fn test_crop1d() {
        let input = tensor(&[4, 1], &[1.0, 2.0, 3.0, 4.0]);
        let mut out = Tensor::zeros(Shape::matrix(2, 1));
        crop1d(&mut out, &input.view(), [1, 1]);
        assert_eq!(out.as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn test_crop2d_inverts_pad2d() {
        let data: Vec<f32> = (0..6).map(|x| x as f32).collect();
        let input = tensor(&[2, 3, 1], &data);
        let pad = [1, 2, 0, 1];
        let mut padded = Tensor::zeros(Shape::new(&[5, 4, 1]).unwrap());
        pad2d(&mut padded, &input.view(), 9.0, pad);

        let mut cropped = Tensor::zeros(Shape::new(&[2, 3, 1]).unwrap());
        crop2d(&mut cropped, &padded.view(), pad);
        assert_eq!(cropped.as_slice(), &data[..]);
    }

    #[test]
    fn test_upsampling() {
        let input = tensor(&[2, 1], &[1.0, 2.0]);
        let mut out = Tensor::zeros(Shape::matrix(4, 1));
        upsampling1d(&mut out, &input.view(), 2);
        assert_eq!(out.as_slice(), &[1.0, 1.0, 2.0, 2.0]);

        let input = tensor(&[1, 2, 1], &[1.0, 2.0]);
        let mut out = Tensor::zeros(Shape::new(&[2, 4, 1]).unwrap());
        upsampling2d(&mut out, &input.view(), [2, 2]);
        assert_eq!(out.as_slice(), &[1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_pad3d() {
        let input = tensor(&[1, 1, 2, 1], &[1.0, 2.0]);
        let mut out = Tensor::zeros(Shape::new(&[2, 2, 3, 1]).unwrap());
        pad3d(&mut out, &input.view(), 0.0, [1, 0, 0, 1, 1, 0]);
        #[rustfmt::skip]
        let expected = [
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // depth 0
            0.0, 1.0, 2.0, 0.0, 0.0, 0.0, // depth 1
        ];
        assert_eq!(out.as_slice(), &expected);
    }

    #[test]
    fn test_pad3d_matches_pad2d_on_single_slice() {
        let data: Vec<f32> = (0..6).map(|x| x as f32).collect();
        let mut out2 = Tensor::zeros(Shape::new(&[4, 4, 1]).unwrap());
        pad2d(&mut out2, &tensor(&[2, 3, 1], &data).view(), -1.0, [1, 1, 0, 1]);

        let mut out3 = Tensor::zeros(Shape::new(&[1, 4, 4, 1]).unwrap());
        pad3d(&mut out3, &tensor(&[1, 2, 3, 1], &data).view(), -1.0, [0, 0, 1, 1, 0, 1]);
        assert_eq!(out2.as_slice(), out3.as_slice());
    }

    #[test]
    fn test_conv3d_matches_conv2d_on_single_slice() {
        let data: Vec<f32> = (0..18).map(|x| (x as f32 * 0.7).sin()).collect();
        let weights: Vec<f32> = (0..8).map(|x| x as f32 * 0.25 - 1.0).collect();

        // 3x3 image, 2 input channels, 2x2 window, 1 output channel.
        let mut out2 = Tensor::zeros(Shape::new(&[2, 2, 1]).unwrap());
        conv2d(
            &mut out2,
            &tensor(&[3, 3, 2], &data).view(),
            &tensor(&[2, 2, 2, 1], &weights).view(),
            &[0.1],
            [1, 1],
            [1, 1],
            &Activation::Tanh,
        );

        let mut out3 = Tensor::zeros(Shape::new(&[1, 2, 2, 1]).unwrap());
        conv3d(
            &mut out3,
            &tensor(&[1, 3, 3, 2], &data).view(),
            &tensor(&[1, 2, 2, 2, 1], &weights).view(),
            &[0.1],
            [1, 1, 1],
            [1, 1, 1],
            &Activation::Tanh,
        );
        assert_eq!(out2.as_slice(), out3.as_slice());
    }

    #[test]
    fn test_conv3d_depth_stride_dilation() {
        // Depth 5, 1x1 spatial, one channel; taps at d and d + 2, stride 2.
        let input = tensor(&[5, 1, 1, 1], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let kernel = tensor(&[2, 1, 1, 1, 1], &[1.0, 10.0]);
        let mut out = Tensor::zeros(Shape::new(&[1, 1, 1, 1]).unwrap());
        conv3d(&mut out, &input.view(), &kernel.view(), &[0.0], [2, 1, 1], [2, 1, 1], &Activation::Linear);
        assert_eq!(out.as_slice(), &[31.0]);

        let mut out = Tensor::zeros(Shape::new(&[2, 1, 1, 1]).unwrap());
        conv3d(&mut out, &input.view(), &kernel.view(), &[0.0], [2, 1, 1], [2, 1, 1], &Activation::Linear);
        // windows {0, 2} and {2, 4}
        assert_eq!(out.as_slice(), &[31.0, 53.0]);
    }

    #[test]
    fn test_crop3d_inverts_pad3d() {
        let data: Vec<f32> = (0..12).map(|x| x as f32).collect();
        let input = tensor(&[2, 3, 2, 1], &data);
        let pad = [1, 0, 2, 1, 0, 2];
        let mut padded = Tensor::zeros(Shape::new(&[3, 6, 4, 1]).unwrap());
        pad3d(&mut padded, &input.view(), 9.0, pad);

        let mut cropped = Tensor::zeros(Shape::new(&[2, 3, 2, 1]).unwrap());
        crop3d(&mut cropped, &padded.view(), pad);
        assert_eq!(cropped.as_slice(), &data[..]);
    }

    #[test]
    fn test_upsampling3d() {
        let input = tensor(&[2, 1, 1, 2], &[1.0, -1.0, 2.0, -2.0]);
        let mut out = Tensor::zeros(Shape::new(&[2, 2, 1, 2]).unwrap());
        upsampling3d(&mut out, &input.view(), [1, 2, 1]);
        assert_eq!(out.as_slice(), &[1.0, -1.0, 1.0, -1.0, 2.0, -2.0, 2.0, -2.0]);

        let input = tensor(&[1, 1, 2, 1], &[3.0, 4.0]);
        let mut out = Tensor::zeros(Shape::new(&[2, 1, 4, 1]).unwrap());
        upsampling3d(&mut out, &input.view(), [2, 1, 2]);
        assert_eq!(out.as_slice(), &[3.0, 3.0, 4.0, 4.0, 3.0, 3.0, 4.0, 4.0]);
    }
}
