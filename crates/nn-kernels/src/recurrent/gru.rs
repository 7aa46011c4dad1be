// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Gated recurrent unit.
//!
//! Gates are packed in the order update, reset, candidate. The bias holds
//! `3 * units` input biases, optionally followed by `3 * units` recurrent
//! biases.
//!
//! ```text
//! z  = ract(x·Wz + bz + h·Uz + rbz)
//! r  = ract(x·Wr + br + h·Ur + rbr)
//! reset_after:   rh = r * (h·Uh + rbh)
//! otherwise:     rh = (r*h)·Uh
//! h~ = act(x·Wh + bh + rh)
//! h' = z*h + (1 - z)*h~
//! ```

use super::{PackedWeights, RecurrentCell};
use crate::activation::Activate;
use tensor_core::{affine_matmul, matmul};

const UPDATE: usize = 0;
const RESET: usize = 1;
const CANDIDATE: usize = 2;
const GATES: usize = 3;

/// GRU cell over three-gate packed weights.
pub struct Gru<'a> {
    weights: &'a PackedWeights,
    recurrent_activation: &'a dyn Activate,
    output_activation: &'a dyn Activate,
    reset_after: bool,
}

/// Working buffers for one [`Gru`] step.
#[derive(Debug, Clone)]
pub struct GruScratch {
    /// `x·W_g + b_g` per gate.
    input_proj: [Vec<f32>; GATES],
    /// Activated update and reset gates.
    gate: [Vec<f32>; 2],
    /// Recurrent term of the candidate, `rh`.
    recurrent_h: Vec<f32>,
    /// `r*h`, only read when the reset gate is applied first.
    gated_state: Vec<f32>,
    /// Candidate state `h~`.
    candidate: Vec<f32>,
}

impl GruScratch {
    /// Number of `f32` values held.
    pub fn num_floats(&self) -> usize {
        let per_gate: usize = self.input_proj.iter().chain(&self.gate).map(Vec::len).sum();
        per_gate + self.recurrent_h.len() + self.gated_state.len() + self.candidate.len()
    }
}

impl<'a> Gru<'a> {
    pub fn new(
        weights: &'a PackedWeights,
        recurrent_activation: &'a dyn Activate,
        output_activation: &'a dyn Activate,
        reset_after: bool,
    ) -> Self {
        debug_assert_eq!(weights.gates(), GATES, "gru expects three gates");
        Self {
            weights,
            recurrent_activation,
            output_activation,
            reset_after,
        }
    }

    /// `out = h·U_g (+ rb_g)`.
    fn recurrent_term(&self, out: &mut [f32], h: &[f32], gate: usize) {
        let w = self.weights;
        let units = w.units();
        match w.recurrent_bias_gate(gate) {
            Some(rb) => affine_matmul(out, h, w.recurrent_gate(gate), rb, 1, units, units),
            None => matmul(out, h, w.recurrent_gate(gate), 1, units, units),
        }
    }
}

impl RecurrentCell for Gru<'_> {
    type Scratch = GruScratch;

    fn name(&self) -> &'static str {
        "gru"
    }

    fn units(&self) -> usize {
        self.weights.units()
    }

    fn input_width(&self) -> usize {
        self.weights.input_width()
    }

    fn scratch(&self) -> GruScratch {
        let units = self.units();
        GruScratch {
            input_proj: std::array::from_fn(|_| vec![0.0; units]),
            gate: std::array::from_fn(|_| vec![0.0; units]),
            recurrent_h: vec![0.0; units],
            gated_state: vec![0.0; units],
            candidate: vec![0.0; units],
        }
    }

    fn step(&self, state: &mut [f32], input: &[f32], scratch: &mut GruScratch) {
        let w = self.weights;
        let units = w.units();
        let h = &mut state[..units];

        for g in 0..GATES {
            affine_matmul(
                &mut scratch.input_proj[g],
                input,
                w.kernel_gate(g),
                w.bias_gate(g),
                1,
                units,
                w.input_width(),
            );
        }

        for g in [UPDATE, RESET] {
            let gate = &mut scratch.gate[g];
            self.recurrent_term(gate, h, g);
            for (v, &x) in gate.iter_mut().zip(&scratch.input_proj[g]) {
                *v += x;
            }
            self.recurrent_activation.apply(gate);
        }

        let r = &scratch.gate[RESET];
        if self.reset_after {
            self.recurrent_term(&mut scratch.recurrent_h, h, CANDIDATE);
            for (v, &r_j) in scratch.recurrent_h.iter_mut().zip(r) {
                *v *= r_j;
            }
        } else {
            // The candidate has no recurrent bias when the reset gate is
            // applied to the state first.
            for ((g, &r_j), &h_j) in scratch.gated_state.iter_mut().zip(r).zip(h.iter()) {
                *g = r_j * h_j;
            }
            matmul(
                &mut scratch.recurrent_h,
                &scratch.gated_state,
                w.recurrent_gate(CANDIDATE),
                1,
                units,
                units,
            );
        }

        for ((c, &x), &rh) in scratch
            .candidate
            .iter_mut()
            .zip(&scratch.input_proj[CANDIDATE])
            .zip(&scratch.recurrent_h)
        {
            *c = x + rh;
        }
        self.output_activation.apply(&mut scratch.candidate);

        let z = &scratch.gate[UPDATE];
        for ((h_j, &z_j), &c_j) in h.iter_mut().zip(z).zip(&scratch.candidate) {
            *h_j = z_j * *h_j + (1.0 - z_j) * c_j;
        }
    }
}
