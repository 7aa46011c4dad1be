// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fully connected recurrent cell: `h' = act(x·W + b + h·U)`.

use super::{PackedWeights, RecurrentCell};
use crate::activation::Activate;
use tensor_core::affine_matmul;

/// SimpleRNN cell over single-gate packed weights.
pub struct SimpleRnn<'a> {
    weights: &'a PackedWeights,
    activation: &'a dyn Activate,
}

/// Working buffers for one [`SimpleRnn`] step.
#[derive(Debug, Clone)]
pub struct SimpleRnnScratch {
    /// `x·W + b`.
    input_proj: Vec<f32>,
    /// `h·U + input_proj`, activated in place.
    pre_activation: Vec<f32>,
}

impl SimpleRnnScratch {
    /// Number of `f32` values held.
    pub fn num_floats(&self) -> usize {
        self.input_proj.len() + self.pre_activation.len()
    }
}

impl<'a> SimpleRnn<'a> {
    pub fn new(weights: &'a PackedWeights, activation: &'a dyn Activate) -> Self {
        debug_assert_eq!(weights.gates(), 1, "simple rnn expects one gate");
        Self {
            weights,
            activation,
        }
    }
}

impl RecurrentCell for SimpleRnn<'_> {
    type Scratch = SimpleRnnScratch;

    fn name(&self) -> &'static str {
        "simple_rnn"
    }

    fn units(&self) -> usize {
        self.weights.units()
    }

    fn input_width(&self) -> usize {
        self.weights.input_width()
    }

    fn scratch(&self) -> SimpleRnnScratch {
        let units = self.units();
        SimpleRnnScratch {
            input_proj: vec![0.0; units],
            pre_activation: vec![0.0; units],
        }
    }

    fn step(&self, state: &mut [f32], input: &[f32], scratch: &mut SimpleRnnScratch) {
        let w = self.weights;
        let units = w.units();
        let h = &mut state[..units];

        affine_matmul(
            &mut scratch.input_proj,
            input,
            w.kernel_gate(0),
            w.bias_gate(0),
            1,
            units,
            w.input_width(),
        );
        affine_matmul(
            &mut scratch.pre_activation,
            h,
            w.recurrent_gate(0),
            &scratch.input_proj,
            1,
            units,
            units,
        );
        self.activation.apply(&mut scratch.pre_activation);
        h.copy_from_slice(&scratch.pre_activation);
    }
}
