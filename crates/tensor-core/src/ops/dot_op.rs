// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Generalized tensor contraction (tensordot).
//!
//! Contracting `A` and `B` over paired axes is reduced to one plain matrix
//! multiply:
//!
//! ```text
//! A  --permute (free.., contracted..)-->  A' : [free_a, inner]
//! B  --permute (contracted.., free..)-->  B' : [inner,  free_b]
//! C  = A' · B'                             C  : [free_a, free_b]
//! ```
//!
//! Both permuted copies are gathered into the caller's scratch buffer:
//! `A'` in the first `numel(A)` slots, `B'` right after it.

use super::matmul;
use crate::index::permute_into;
use crate::{Shape, Tensor, TensorError, TensorView, MAX_RANK};

/// Contracts `a` and `b` over `axes_a[i] <-> axes_b[i]`, writing the
/// `[free_a, free_b]` result into `c`.
///
/// The free axes of `a` come first in the output, followed by the free axes
/// of `b`, each in their original order (see [`dot_output_shape`]).
///
/// When `normalize` is set, each free row of `a` and each free column of `b`
/// is L2-normalized over the contracted dimension before the multiply, so the
/// result is a batch of cosine similarities. A zero-norm vector yields
/// non-finite output.
///
/// # Preconditions
/// - `axes_a.len() == axes_b.len()` and paired axes have equal extents.
/// - `fwork.len() >= a.numel() + b.numel()` (see [`dot_scratch_len`]).
/// - `c` holds at least `free_a * free_b` elements.
pub fn dot(
    c: &mut Tensor,
    a: &TensorView<'_>,
    b: &TensorView<'_>,
    axes_a: &[usize],
    axes_b: &[usize],
    normalize: bool,
    fwork: &mut [f32],
) {
    debug_assert_eq!(axes_a.len(), axes_b.len(), "axis lists must pair up");
    let naxes = axes_a.len();
    let dims_a = a.shape().dims();
    let dims_b = b.shape().dims();
    let rank_a = dims_a.len();
    let rank_b = dims_b.len();

    // A: free axes first, contracted last. B: contracted first, free last.
    let mut perm_a = [0usize; MAX_RANK];
    let mut perm_b = [0usize; MAX_RANK];
    let mut n = 0;
    for axis in (0..rank_a).filter(|i| !axes_a.contains(i)) {
        perm_a[n] = axis;
        n += 1;
    }
    perm_a[n..n + naxes].copy_from_slice(axes_a);
    perm_b[..naxes].copy_from_slice(axes_b);
    let mut n = naxes;
    for axis in (0..rank_b).filter(|i| !axes_b.contains(i)) {
        perm_b[n] = axis;
        n += 1;
    }

    let inner_a: usize = axes_a.iter().map(|&ax| dims_a[ax]).product();
    let inner_b: usize = axes_b.iter().map(|&ax| dims_b[ax]).product();
    debug_assert_eq!(inner_a, inner_b, "contracted extents must agree");
    if inner_a == 0 {
        // Empty sum over the contracted axes.
        c.fill(0.0);
        return;
    }
    let free_a = a.numel() / inner_a;
    let free_b = b.numel() / inner_b;

    tracing::trace!(
        a = %a.shape(),
        b = %b.shape(),
        free_a,
        free_b,
        inner = inner_a,
        normalize,
        "dot: contracting as matmul"
    );

    let (reshaped_a, rest) = fwork.split_at_mut(a.numel());
    let reshaped_b = &mut rest[..b.numel()];
    permute_into(reshaped_a, a.as_slice(), dims_a, &perm_a[..rank_a]);
    permute_into(reshaped_b, b.as_slice(), dims_b, &perm_b[..rank_b]);

    if normalize {
        normalize_rows(reshaped_a, free_a, inner_a);
        normalize_columns(reshaped_b, inner_b, free_b);
    }

    matmul(c.as_mut_slice(), reshaped_a, reshaped_b, free_a, free_b, inner_a);
}

/// Scratch elements [`dot`] needs for operands of these shapes.
pub fn dot_scratch_len(a: &Shape, b: &Shape) -> usize {
    a.num_elements() + b.num_elements()
}

/// Computes the shape [`dot`] produces and checks the axis lists.
///
/// This is the validation a caller runs once, at plan time, before invoking
/// the unchecked kernel.
///
/// # Errors
/// - [`TensorError::InvalidAxis`] for an axis past either rank.
/// - [`TensorError::ShapeMismatch`] when the lists differ in length or a
///   paired extent disagrees, or when the output rank exceeds [`MAX_RANK`].
pub fn dot_output_shape(
    a: &Shape,
    b: &Shape,
    axes_a: &[usize],
    axes_b: &[usize],
) -> Result<Shape, TensorError> {
    let mismatch = || TensorError::ShapeMismatch {
        op: "dot",
        lhs: *a,
        rhs: *b,
    };
    if axes_a.len() != axes_b.len() {
        return Err(mismatch());
    }
    for (&ax_a, &ax_b) in axes_a.iter().zip(axes_b) {
        if ax_a >= a.rank() {
            return Err(TensorError::InvalidAxis {
                axis: ax_a,
                rank: a.rank(),
            });
        }
        if ax_b >= b.rank() {
            return Err(TensorError::InvalidAxis {
                axis: ax_b,
                rank: b.rank(),
            });
        }
        if a.dims()[ax_a] != b.dims()[ax_b] {
            return Err(mismatch());
        }
    }

    let free_a = (0..a.rank())
        .filter(|i| !axes_a.contains(i))
        .map(|i| a.dims()[i]);
    let free_b = (0..b.rank())
        .filter(|i| !axes_b.contains(i))
        .map(|i| b.dims()[i]);
    let dims: Vec<usize> = free_a.chain(free_b).collect();
    Shape::new(&dims).map_err(|_| mismatch())
}

/// L2-normalizes each contiguous row of a `[rows, cols]` buffer.
fn normalize_rows(buf: &mut [f32], rows: usize, cols: usize) {
    for row in buf[..rows * cols].chunks_exact_mut(cols) {
        let sum: f32 = row.iter().map(|x| x * x).sum();
        let inorm = 1.0 / sum.sqrt();
        row.iter_mut().for_each(|x| *x *= inorm);
    }
}

/// L2-normalizes each column of a `[rows, cols]` buffer (stride `cols`).
fn normalize_columns(buf: &mut [f32], rows: usize, cols: usize) {
    for j in 0..cols {
        let sum: f32 = (0..rows).map(|i| buf[i * cols + j] * buf[i * cols + j]).sum();
        let inorm = 1.0 / sum.sqrt();
        for i in 0..rows {
            buf[i * cols + j] *= inorm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_rank2_contraction_is_matmul() {
        let a = Tensor::from_f32(Shape::matrix(2, 3), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Tensor::from_f32(Shape::matrix(3, 2), &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
        let mut c = Tensor::zeros(Shape::matrix(2, 2));
        let mut fwork = vec![0.0; dot_scratch_len(a.shape(), b.shape())];

        dot(&mut c, &a.view(), &b.view(), &[1], &[0], false, &mut fwork);

        let mut expected = [0.0f32; 4];
        matmul(&mut expected, a.as_slice(), b.as_slice(), 2, 2, 3);
        assert_eq!(c.as_slice(), &expected);
        assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_contract_first_axes_is_transposed_product() {
        // Contracting axis 0 of both: C = Aᵀ · B.
        let a = Tensor::from_f32(Shape::matrix(2, 2), &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Tensor::from_f32(Shape::matrix(2, 2), &[5.0, 6.0, 7.0, 8.0]).unwrap();
        let mut c = Tensor::zeros(Shape::matrix(2, 2));
        let mut fwork = vec![0.0; 8];

        dot(&mut c, &a.view(), &b.view(), &[0], &[0], false, &mut fwork);

        // Aᵀ = [[1, 3], [2, 4]]
        assert_eq!(c.as_slice(), &[26.0, 30.0, 38.0, 44.0]);
    }

    #[test]
    fn test_multi_axis_contraction() {
        // A: [2, 3, 4], B: [4, 3]; contract (2 <-> 0) and (1 <-> 1) -> [2].
        let a_vals: Vec<f32> = (0..24).map(|x| x as f32).collect();
        let b_vals: Vec<f32> = (0..12).map(|x| (x % 5) as f32).collect();
        let a = Tensor::from_vec(Shape::new(&[2, 3, 4]).unwrap(), a_vals.clone()).unwrap();
        let b = Tensor::from_vec(Shape::matrix(4, 3), b_vals.clone()).unwrap();
        let out_shape = dot_output_shape(a.shape(), b.shape(), &[2, 1], &[0, 1]).unwrap();
        assert_eq!(out_shape.dims(), &[2]);

        let mut c = Tensor::zeros(out_shape);
        let mut fwork = vec![0.0; 36];
        dot(&mut c, &a.view(), &b.view(), &[2, 1], &[0, 1], false, &mut fwork);

        for i in 0..2 {
            let mut expected = 0.0;
            for j in 0..3 {
                for k in 0..4 {
                    expected += a_vals[i * 12 + j * 4 + k] * b_vals[k * 3 + j];
                }
            }
            assert_eq!(c.as_slice()[i], expected);
        }
    }

    #[test]
    fn test_batched_free_axes_order() {
        // A: [2, 2, 3] contracted on its last axis with B: [3, 2].
        let a_vals: Vec<f32> = (1..=12).map(|x| x as f32).collect();
        let b_vals = [1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let a = Tensor::from_vec(Shape::new(&[2, 2, 3]).unwrap(), a_vals.clone()).unwrap();
        let b = Tensor::from_f32(Shape::matrix(3, 2), &b_vals).unwrap();
        let mut c = Tensor::zeros(Shape::new(&[2, 2, 2]).unwrap());
        let mut fwork = vec![0.0; 18];

        dot(&mut c, &a.view(), &b.view(), &[2], &[0], false, &mut fwork);

        for row in 0..4 {
            let x = &a_vals[row * 3..row * 3 + 3];
            assert_eq!(c.as_slice()[row * 2], x[0] + x[2]);
            assert_eq!(c.as_slice()[row * 2 + 1], x[1] + x[2]);
        }
    }

    #[test]
    fn test_cosine_self_similarity_is_one() {
        let v = Tensor::from_f32(Shape::matrix(1, 3), &[3.0, -4.0, 12.0]).unwrap();
        let w = Tensor::from_f32(Shape::matrix(3, 1), &[3.0, -4.0, 12.0]).unwrap();
        let mut c = Tensor::zeros(Shape::matrix(1, 1));
        let mut fwork = vec![0.0; 6];

        dot(&mut c, &v.view(), &w.view(), &[1], &[0], true, &mut fwork);
        assert!(approx_eq(c.as_slice()[0], 1.0, 1e-6));
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        let a = Tensor::from_f32(Shape::vector(2), &[1.0, 0.0]).unwrap();
        let b = Tensor::from_f32(Shape::vector(2), &[0.0, 1.0]).unwrap();
        let mut c = Tensor::zeros(Shape::scalar());
        let mut fwork = vec![0.0; 4];

        dot(&mut c, &a.view(), &b.view(), &[0], &[0], true, &mut fwork);
        assert_eq!(c.as_slice()[0], 0.0);
    }

    #[test]
    fn test_cosine_batched_columns() {
        // B columns are normalized with stride free_b: each column of B is a
        // separate vector.
        let a = Tensor::from_f32(Shape::matrix(1, 2), &[2.0, 0.0]).unwrap();
        let b = Tensor::from_f32(Shape::matrix(2, 2), &[5.0, 1.0, 0.0, 1.0]).unwrap();
        let mut c = Tensor::zeros(Shape::matrix(1, 2));
        let mut fwork = vec![0.0; 6];

        dot(&mut c, &a.view(), &b.view(), &[1], &[0], true, &mut fwork);
        assert!(approx_eq(c.as_slice()[0], 1.0, 1e-6));
        assert!(approx_eq(c.as_slice()[1], std::f32::consts::FRAC_1_SQRT_2, 1e-6));
    }

    #[test]
    fn test_cosine_zero_vector_propagates_nan() {
        let a = Tensor::from_f32(Shape::vector(2), &[0.0, 0.0]).unwrap();
        let b = Tensor::from_f32(Shape::vector(2), &[1.0, 1.0]).unwrap();
        let mut c = Tensor::zeros(Shape::scalar());
        let mut fwork = vec![0.0; 4];

        dot(&mut c, &a.view(), &b.view(), &[0], &[0], true, &mut fwork);
        assert!(c.as_slice()[0].is_nan());
    }

    #[test]
    fn test_zero_extent_contraction_is_zero() {
        let a = Tensor::zeros(Shape::matrix(2, 0));
        let b = Tensor::zeros(Shape::matrix(0, 3));
        let shape = dot_output_shape(a.shape(), b.shape(), &[1], &[0]).unwrap();
        let mut c = Tensor::from_vec(shape, vec![7.0; 6]).unwrap();
        let mut fwork = vec![0.0; dot_scratch_len(a.shape(), b.shape())];

        dot(&mut c, &a.view(), &b.view(), &[1], &[0], false, &mut fwork);
        assert_eq!(c.shape().dims(), &[2, 3]);
        assert_eq!(c.as_slice(), &[0.0; 6]);
    }

    #[test]
    fn test_output_shape_validation() {
        let a = Shape::new(&[2, 3, 4]).unwrap();
        let b = Shape::matrix(4, 5);
        assert_eq!(
            dot_output_shape(&a, &b, &[2], &[0]).unwrap().dims(),
            &[2, 3, 5]
        );
        assert!(matches!(
            dot_output_shape(&a, &b, &[1], &[0]),
            Err(TensorError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            dot_output_shape(&a, &b, &[3], &[0]),
            Err(TensorError::InvalidAxis { axis: 3, rank: 3 })
        ));
        assert!(dot_output_shape(&a, &b, &[2], &[0, 1]).is_err());
    }
}
