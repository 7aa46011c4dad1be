// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Matrix multiplication primitives over flat row-major buffers.
//!
//! These are the building blocks for dense layers, contraction and every
//! recurrent gate. They take plain slices plus explicit dimensions and do
//! no shape validation beyond `debug_assert!`: an undersized slice panics on
//! indexing.

/// Computes `c = a · b`.
///
/// `a` is `[outrows, innerdim]`, `b` is `[innerdim, outcols]` and `c` is
/// `[outrows, outcols]`, all row-major. `c` is zeroed first.
///
/// Accumulation runs in (row, inner, col) order so the inner loop is a saxpy
/// on a contiguous row of `c`. The order only affects rounding.
pub fn matmul(
    c: &mut [f32],
    a: &[f32],
    b: &[f32],
    outrows: usize,
    outcols: usize,
    innerdim: usize,
) {
    debug_assert!(a.len() >= outrows * innerdim);
    debug_assert!(b.len() >= innerdim * outcols);
    debug_assert!(c.len() >= outrows * outcols);

    c[..outrows * outcols].iter_mut().for_each(|x| *x = 0.0);

    for i in 0..outrows {
        let a_row = &a[i * innerdim..(i + 1) * innerdim];
        let c_row = &mut c[i * outcols..(i + 1) * outcols];
        for (k, &a_ik) in a_row.iter().enumerate() {
            let b_row = &b[k * outcols..(k + 1) * outcols];
            for (c_ij, &b_kj) in c_row.iter_mut().zip(b_row) {
                *c_ij += a_ik * b_kj;
            }
        }
    }
}

/// Computes `c = a · b + d`, broadcasting the bias `d` (length `outcols`)
/// across every output row.
///
/// `c` is zeroed first. Each output element accumulates its full inner sum
/// and then receives its bias term, in (row, col, inner) order.
pub fn affine_matmul(
    c: &mut [f32],
    a: &[f32],
    b: &[f32],
    d: &[f32],
    outrows: usize,
    outcols: usize,
    innerdim: usize,
) {
    debug_assert!(a.len() >= outrows * innerdim);
    debug_assert!(b.len() >= innerdim * outcols);
    debug_assert!(c.len() >= outrows * outcols);
    debug_assert!(d.len() >= outcols);

    c[..outrows * outcols].iter_mut().for_each(|x| *x = 0.0);

    for i in 0..outrows {
        let a_row = &a[i * innerdim..(i + 1) * innerdim];
        let c_row = &mut c[i * outcols..(i + 1) * outcols];
        for (j, c_ij) in c_row.iter_mut().enumerate() {
            for (k, &a_ik) in a_row.iter().enumerate() {
                *c_ij += a_ik * b[k * outcols + j];
            }
            *c_ij += d[j];
        }
    }
}
