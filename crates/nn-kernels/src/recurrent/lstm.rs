// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Long short-term memory cell.
//!
//! Gates are packed in the order input, forget, cell candidate, output. The
//! state buffer is `[h; c]`: hidden state first, cell memory second.
//!
//! ```text
//! i  = ract(x·Wi + bi + h·Ui)
//! f  = ract(x·Wf + bf + h·Uf)
//! c~ =  act(x·Wc + bc + h·Uc)
//! o  = ract(x·Wo + bo + h·Uo)
//! c' = f*c + i*c~
//! h' = o * act(c')
//! ```

use super::{PackedWeights, RecurrentCell};
use crate::activation::Activate;
use tensor_core::affine_matmul;

const INPUT: usize = 0;
const FORGET: usize = 1;
const CANDIDATE: usize = 2;
const OUTPUT: usize = 3;
const GATES: usize = 4;

/// LSTM cell over four-gate packed weights.
pub struct Lstm<'a> {
    weights: &'a PackedWeights,
    recurrent_activation: &'a dyn Activate,
    output_activation: &'a dyn Activate,
}

/// Working buffers for one [`Lstm`] step.
#[derive(Debug, Clone)]
pub struct LstmScratch {
    /// `x·W_g + b_g` per gate.
    input_proj: [Vec<f32>; GATES],
    /// Activated gate values per gate.
    gate: [Vec<f32>; GATES],
    /// `act(c')`, the activated cell memory.
    readout: Vec<f32>,
}

impl LstmScratch {
    /// Number of `f32` values held.
    pub fn num_floats(&self) -> usize {
        let per_gate: usize = self.input_proj.iter().chain(&self.gate).map(Vec::len).sum();
        per_gate + self.readout.len()
    }
}

impl<'a> Lstm<'a> {
    pub fn new(
        weights: &'a PackedWeights,
        recurrent_activation: &'a dyn Activate,
        output_activation: &'a dyn Activate,
    ) -> Self {
        debug_assert_eq!(weights.gates(), GATES, "lstm expects four gates");
        Self {
            weights,
            recurrent_activation,
            output_activation,
        }
    }
}

impl RecurrentCell for Lstm<'_> {
    type Scratch = LstmScratch;

    fn name(&self) -> &'static str {
        "lstm"
    }

    fn units(&self) -> usize {
        self.weights.units()
    }

    fn input_width(&self) -> usize {
        self.weights.input_width()
    }

    fn state_len(&self) -> usize {
        2 * self.units()
    }

    fn scratch(&self) -> LstmScratch {
        let units = self.units();
        LstmScratch {
            input_proj: std::array::from_fn(|_| vec![0.0; units]),
            gate: std::array::from_fn(|_| vec![0.0; units]),
            readout: vec![0.0; units],
        }
    }

    fn step(&self, state: &mut [f32], input: &[f32], scratch: &mut LstmScratch) {
        let w = self.weights;
        let units = w.units();
        let (h, c) = state[..2 * units].split_at_mut(units);

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
            affine_matmul(
                &mut scratch.gate[g],
                h,
                w.recurrent_gate(g),
                &scratch.input_proj[g],
                1,
                units,
                units,
            );
            let act = if g == CANDIDATE {
                self.output_activation
            } else {
                self.recurrent_activation
            };
            act.apply(&mut scratch.gate[g]);
        }

        let (i, f, cand) = (
            &scratch.gate[INPUT],
            &scratch.gate[FORGET],
            &scratch.gate[CANDIDATE],
        );
        for (j, c_j) in c.iter_mut().enumerate() {
            *c_j = f[j] * *c_j + i[j] * cand[j];
        }

        scratch.readout.copy_from_slice(c);
        self.output_activation.apply(&mut scratch.readout);

        let o = &scratch.gate[OUTPUT];
        for ((h_j, &o_j), &r_j) in h.iter_mut().zip(o).zip(&scratch.readout) {
            *h_j = o_j * r_j;
        }
    }
}
