// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-capacity shape descriptors.

use crate::TensorError;
use std::fmt;

/// Largest rank a [`crate::Tensor`] can have.
pub const MAX_RANK: usize = 5;

/// Describes the dimensionality of a [`crate::Tensor`].
///
/// Extents live in a fixed `[usize; MAX_RANK]` array so a shape is `Copy`
/// and never allocates. Slots past [`rank`](Shape::rank) are held at `1` and
/// ignored by every operation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Shape {
    dims: [usize; MAX_RANK],
    rank: usize,
}

impl Shape {
    /// Creates a shape from the given extents.
    ///
    /// # Errors
    /// Returns [`TensorError::RankTooLarge`] if `dims.len() > MAX_RANK`.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Shape;
    /// let s = Shape::new(&[2, 3, 4]).unwrap();
    /// assert_eq!(s.rank(), 3);
    /// assert_eq!(s.num_elements(), 24);
    /// ```
    pub fn new(dims: &[usize]) -> Result<Self, TensorError> {
        if dims.len() > MAX_RANK {
            return Err(TensorError::RankTooLarge {
                rank: dims.len(),
                max: MAX_RANK,
            });
        }
        let mut packed = [1usize; MAX_RANK];
        packed[..dims.len()].copy_from_slice(dims);
        Ok(Self {
            dims: packed,
            rank: dims.len(),
        })
    }

    /// Creates a scalar shape (rank 0).
    pub fn scalar() -> Self {
        Self {
            dims: [1; MAX_RANK],
            rank: 0,
        }
    }

    /// Creates a 1-D shape.
    pub fn vector(len: usize) -> Self {
        let mut dims = [1; MAX_RANK];
        dims[0] = len;
        Self { dims, rank: 1 }
    }

    /// Creates a 2-D shape (matrix).
    pub fn matrix(rows: usize, cols: usize) -> Self {
        let mut dims = [1; MAX_RANK];
        dims[0] = rows;
        dims[1] = cols;
        Self { dims, rank: 2 }
    }

    /// Returns the number of dimensions (rank).
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns the total number of elements.
    ///
    /// For a scalar shape (rank 0), returns 1.
    pub fn num_elements(&self) -> usize {
        self.dims().iter().product()
    }

    /// Returns the active extents as a slice of length [`rank`](Shape::rank).
    pub fn dims(&self) -> &[usize] {
        &self.dims[..self.rank]
    }

    /// Returns the size of a specific dimension, or `None` if out of bounds.
    pub fn dim(&self, index: usize) -> Option<usize> {
        self.dims().get(index).copied()
    }

    /// Returns the extent of the last axis (1 for a scalar).
    pub fn last_dim(&self) -> usize {
        self.dims().last().copied().unwrap_or(1)
    }

    /// Returns a copy of this shape with `axis` set to `extent`.
    ///
    /// # Errors
    /// Returns [`TensorError::InvalidAxis`] if `axis >= rank`.
    pub fn with_dim(mut self, axis: usize, extent: usize) -> Result<Self, TensorError> {
        if axis >= self.rank {
            return Err(TensorError::InvalidAxis {
                axis,
                rank: self.rank,
            });
        }
        self.dims[axis] = extent;
        Ok(self)
    }

    /// Returns the shape obtained by reordering axes: `out[i] = self[perm[i]]`.
    pub fn permuted(&self, perm: &[usize]) -> Self {
        debug_assert_eq!(perm.len(), self.rank, "permutation length must equal rank");
        let mut dims = [1; MAX_RANK];
        for (slot, &p) in dims.iter_mut().zip(perm) {
            *slot = self.dims[p];
        }
        Self {
            dims,
            rank: self.rank,
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape{self}")
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

impl TryFrom<&[usize]> for Shape {
    type Error = TensorError;

    fn try_from(dims: &[usize]) -> Result<Self, Self::Error> {
        Self::new(dims)
    }
}

impl TryFrom<Vec<usize>> for Shape {
    type Error = TensorError;

    fn try_from(dims: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(&dims)
    }
}

impl From<Shape> for Vec<usize> {
    fn from(shape: Shape) -> Self {
        shape.dims().to_vec()
    }
}
