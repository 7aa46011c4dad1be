// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type and view abstractions.

use crate::{Shape, TensorError};

/// An owned, n-dimensional `f32` tensor stored in contiguous memory.
///
/// `Tensor` is the primary data carrier between kernels. The caller sizes the
/// buffer up front; kernels write into it but never grow or shrink it.
///
/// # Memory Layout
/// Data is stored in row-major (C) order. The buffer may be longer than
/// [`numel`](Tensor::numel) so that a shape-changing kernel (flatten,
/// reshape) can reuse the same storage; only the first `numel` values are
/// exposed through [`as_slice`](Tensor::as_slice).
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Shape, Tensor};
    /// let t = Tensor::zeros(Shape::matrix(2, 3));
    /// assert_eq!(t.numel(), 6);
    /// ```
    pub fn zeros(shape: Shape) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.num_elements()],
        }
    }

    /// Creates a zero-filled tensor whose buffer holds `capacity` elements.
    ///
    /// # Errors
    /// Returns [`TensorError::BufferTooSmall`] if `capacity < shape.num_elements()`.
    pub fn with_capacity(shape: Shape, capacity: usize) -> Result<Self, TensorError> {
        Self::from_vec(shape, vec![0.0; capacity])
    }

    /// Wraps an existing buffer.
    ///
    /// # Errors
    /// Returns [`TensorError::BufferTooSmall`] if `data` holds fewer than
    /// `shape.num_elements()` values.
    pub fn from_vec(shape: Shape, data: Vec<f32>) -> Result<Self, TensorError> {
        let expected = shape.num_elements();
        if data.len() < expected {
            return Err(TensorError::BufferTooSmall {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Creates a tensor from a slice of `f32` values.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Shape, Tensor};
    /// let t = Tensor::from_f32(Shape::vector(3), &[1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0]);
    /// ```
    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self, TensorError> {
        Self::from_vec(shape, values.to_vec())
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's rank.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Returns the number of live elements.
    pub fn numel(&self) -> usize {
        self.shape.num_elements()
    }

    /// Returns the number of elements the backing buffer can hold.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Replaces the shape without touching the data.
    ///
    /// # Errors
    /// Returns [`TensorError::BufferTooSmall`] if the new shape needs more
    /// elements than the buffer holds.
    pub fn set_shape(&mut self, shape: Shape) -> Result<(), TensorError> {
        let expected = shape.num_elements();
        if expected > self.data.len() {
            return Err(TensorError::BufferTooSmall {
                expected,
                actual: self.data.len(),
            });
        }
        self.shape = shape;
        Ok(())
    }

    /// Returns an immutable view over this tensor's data.
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            shape: self.shape,
            data: &self.data[..self.numel()],
        }
    }

    /// Returns the live elements.
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..self.numel()]
    }

    /// Returns the live elements mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        let n = self.numel();
        &mut self.data[..n]
    }

    /// Fills the live elements with a constant.
    pub fn fill(&mut self, value: f32) {
        self.as_mut_slice().iter_mut().for_each(|x| *x = value);
    }
}

/// A borrowed, read-only view over row-major `f32` data.
///
/// Views are zero-copy and tied to the lifetime of the source buffer,
/// enforced by the borrow checker. Every kernel takes its inputs as views,
/// so callers can hand in slices of a larger pool without copying.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a> {
    shape: Shape,
    data: &'a [f32],
}

impl<'a> TensorView<'a> {
    /// Creates a view over `data` with the given shape.
    ///
    /// # Errors
    /// Returns [`TensorError::BufferTooSmall`] if `data` is shorter than the shape.
    pub fn new(shape: Shape, data: &'a [f32]) -> Result<Self, TensorError> {
        let expected = shape.num_elements();
        if data.len() < expected {
            return Err(TensorError::BufferTooSmall {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape,
            data: &data[..expected],
        })
    }

    /// Returns the shape of the viewed data.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the rank of the viewed data.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Returns the number of elements in the view.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns the viewed elements.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns row `i` along the leading axis.
    ///
    /// # Panics
    /// Panics if the view is a scalar or `i` is past the leading extent.
    pub fn row(&self, i: usize) -> &'a [f32] {
        let rows = self.shape.dims()[0];
        let width = self.data.len() / rows.max(1);
        &self.data[i * width..(i + 1) * width]
    }
}
