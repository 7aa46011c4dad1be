// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Packed recurrent weights and per-gate slice views.
//!
//! A recurrent layer with `G` gates stores all of its weights in three
//! row-major buffers:
//!
//! ```text
//! kernel            [G * input_width, units]   gate g = rows g*input_width ..
//! recurrent_kernel  [G * units,       units]   gate g = rows g*units ..
//! bias              [G * units]                gate g = g*units ..
//!                   [2 * G * units]            input biases, then recurrent biases
//! ```
//!
//! Gates are addressed through [`SliceView`] offset/length pairs rather than
//! split into separate tensors.

use crate::LayerError;
use tensor_core::Tensor;

/// Gate count of the only layout that carries recurrent biases (GRU).
const GRU_GATES: usize = 3;

/// An `(offset, len)` window into a flat buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceView {
    offset: usize,
    len: usize,
}

impl SliceView {
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrows the window out of `data`.
    ///
    /// # Panics
    /// Panics if the window runs past the end of `data`.
    #[inline]
    pub fn of<'a>(&self, data: &'a [f32]) -> &'a [f32] {
        &data[self.offset..self.offset + self.len]
    }

    /// Mutably borrows the window out of `data`.
    #[inline]
    pub fn of_mut<'a>(&self, data: &'a mut [f32]) -> &'a mut [f32] {
        &mut data[self.offset..self.offset + self.len]
    }
}

/// Kernel, recurrent kernel and bias of one recurrent layer, packed per gate.
///
/// Built once when the layer is prepared; the shape checks here are the only
/// ones the recurrent engine performs.
#[derive(Debug, Clone)]
pub struct PackedWeights {
    kernel: Tensor,
    recurrent_kernel: Tensor,
    bias: Tensor,
    gates: usize,
    units: usize,
    input_width: usize,
    has_recurrent_bias: bool,
}

impl PackedWeights {
    /// Validates and wraps packed weights for a layer with `gates` gates.
    ///
    /// `units` is taken from the recurrent kernel's second axis and
    /// `input_width` from the kernel's first axis divided by `gates`.
    ///
    /// # Errors
    /// Returns [`LayerError::InvalidWeights`] if any buffer disagrees with
    /// the packed layout.
    pub fn new(
        layer: &'static str,
        gates: usize,
        kernel: Tensor,
        recurrent_kernel: Tensor,
        bias: Tensor,
    ) -> Result<Self, LayerError> {
        let invalid = |detail: String| LayerError::InvalidWeights { layer, detail };

        if gates == 0 {
            return Err(invalid("gate count must be at least 1".into()));
        }
        if kernel.rank() != 2 || recurrent_kernel.rank() != 2 {
            return Err(invalid(format!(
                "kernel {} and recurrent kernel {} must both be rank 2",
                kernel.shape(),
                recurrent_kernel.shape()
            )));
        }

        let rk = recurrent_kernel.shape().dims();
        let units = rk[1];
        if units == 0 || rk[0] != gates * units {
            return Err(invalid(format!(
                "recurrent kernel {} is not [{gates} * units, units]",
                recurrent_kernel.shape()
            )));
        }

        let k = kernel.shape().dims();
        if k[1] != units || k[0] % gates != 0 {
            return Err(invalid(format!(
                "kernel {} is not [{gates} * input_width, {units}]",
                kernel.shape()
            )));
        }
        let input_width = k[0] / gates;

        // Only the three-gate (GRU) layout reads recurrent biases.
        let takes_recurrent_bias = gates == GRU_GATES;
        let has_recurrent_bias = match bias.numel() {
            n if n == gates * units => false,
            n if n == 2 * gates * units && takes_recurrent_bias => true,
            n if takes_recurrent_bias => {
                return Err(invalid(format!(
                    "bias has {n} values, expected {} or {}",
                    gates * units,
                    2 * gates * units
                )))
            }
            n => {
                return Err(invalid(format!(
                    "bias has {n} values, expected {}",
                    gates * units
                )))
            }
        };

        tracing::debug!(
            layer,
            gates,
            units,
            input_width,
            has_recurrent_bias,
            "packed recurrent weights"
        );

        Ok(Self {
            kernel,
            recurrent_kernel,
            bias,
            gates,
            units,
            input_width,
            has_recurrent_bias,
        })
    }

    /// Number of gates packed into each buffer.
    pub fn gates(&self) -> usize {
        self.gates
    }

    /// Hidden state width.
    pub fn units(&self) -> usize {
        self.units
    }

    /// Width of one input timestep.
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Whether the bias carries a second, recurrent set of gate biases.
    pub fn has_recurrent_bias(&self) -> bool {
        self.has_recurrent_bias
    }

    /// Total number of stored parameters.
    pub fn num_parameters(&self) -> usize {
        self.kernel.numel() + self.recurrent_kernel.numel() + self.bias.numel()
    }

    /// Input-to-hidden weights of `gate`, `[input_width, units]`.
    #[inline]
    pub fn kernel_gate(&self, gate: usize) -> &[f32] {
        let len = self.input_width * self.units;
        SliceView::new(gate * len, len).of(self.kernel.as_slice())
    }

    /// Hidden-to-hidden weights of `gate`, `[units, units]`.
    #[inline]
    pub fn recurrent_gate(&self, gate: usize) -> &[f32] {
        let len = self.units * self.units;
        SliceView::new(gate * len, len).of(self.recurrent_kernel.as_slice())
    }

    /// Input bias of `gate`, `[units]`.
    #[inline]
    pub fn bias_gate(&self, gate: usize) -> &[f32] {
        SliceView::new(gate * self.units, self.units).of(self.bias.as_slice())
    }

    /// Recurrent bias of `gate`, when the layer carries one.
    #[inline]
    pub fn recurrent_bias_gate(&self, gate: usize) -> Option<&[f32]> {
        self.has_recurrent_bias.then(|| {
            SliceView::new((self.gates + gate) * self.units, self.units)
                .of(self.bias.as_slice())
        })
    }
}
