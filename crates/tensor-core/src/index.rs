// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Row-major index algebra.
//!
//! Converts between a linear offset into a flat buffer and a per-axis
//! subscript. The rank is the length of the `dims` slice. No bounds checking
//! is performed: a subscript outside `dims` yields a meaningless offset.

use crate::MAX_RANK;

/// Converts a subscript to a linear offset in row-major order.
///
/// Axis `i` contributes `sub[i] * prod(dims[i+1..])`.
///
/// # Examples
/// ```
/// use tensor_core::index::sub_to_index;
/// assert_eq!(sub_to_index(&[1, 2, 3], &[2, 3, 4]), 1 * 12 + 2 * 4 + 3);
/// ```
#[inline]
pub fn sub_to_index(sub: &[usize], dims: &[usize]) -> usize {
    debug_assert!(sub.len() >= dims.len());
    let mut idx = 0;
    let mut stride = 1;
    for i in (0..dims.len()).rev() {
        idx += sub[i] * stride;
        stride *= dims[i];
    }
    idx
}

/// Converts a linear offset to a subscript in row-major order, writing the
/// first `dims.len()` slots of `sub`.
#[inline]
pub fn index_to_sub(index: usize, dims: &[usize], sub: &mut [usize]) {
    debug_assert!(sub.len() >= dims.len());
    let mut rem = index;
    for i in (0..dims.len()).rev() {
        sub[i] = rem % dims[i];
        rem /= dims[i];
    }
}

/// Gathers `src` (shape `dims`) into `dst` with axes reordered so that
/// output axis `i` is input axis `perm[i]`.
///
/// Walks every source element once, converting offset → subscript →
/// permuted subscript → destination offset. `dst` must hold at least
/// `prod(dims)` elements.
pub fn permute_into(dst: &mut [f32], src: &[f32], dims: &[usize], perm: &[usize]) {
    let rank = dims.len();
    debug_assert_eq!(perm.len(), rank);

    let mut new_dims = [1usize; MAX_RANK];
    for (slot, &p) in new_dims.iter_mut().zip(perm) {
        *slot = dims[p];
    }
    let new_dims = &new_dims[..rank];

    let numel: usize = dims.iter().product();
    let mut src_sub = [0usize; MAX_RANK];
    let mut dst_sub = [0usize; MAX_RANK];
    for (i, &value) in src[..numel].iter().enumerate() {
        index_to_sub(i, dims, &mut src_sub);
        for (slot, &p) in dst_sub.iter_mut().zip(perm) {
            *slot = src_sub[p];
        }
        dst[sub_to_index(&dst_sub, new_dims)] = value;
    }
}
