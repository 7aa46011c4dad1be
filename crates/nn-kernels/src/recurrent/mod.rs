// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Recurrent cells and the sequence driver that runs them over time.
//!
//! A [`RecurrentCell`] advances a flat state buffer by one timestep. The
//! driver [`run_sequence`] walks the leading (time) axis of an input view,
//! forward or backward, and writes either every intermediate hidden state or
//! only the final one.
//!
//! Cells borrow their [`PackedWeights`] and activations, and keep all
//! per-step temporaries in an associated scratch type built once with
//! [`RecurrentCell::scratch`]. Nothing allocates inside a step.
//!
//! # Example
//! ```
//! use nn_kernels::{recurrent, Activation, PackedWeights};
//! use tensor_core::{Shape, Tensor};
//!
//! // One unit, one input feature, identity weights.
//! let weights = PackedWeights::new(
//!     "simple_rnn",
//!     1,
//!     Tensor::from_f32(Shape::matrix(1, 1), &[1.0]).unwrap(),
//!     Tensor::from_f32(Shape::matrix(1, 1), &[1.0]).unwrap(),
//!     Tensor::from_f32(Shape::vector(1), &[0.0]).unwrap(),
//! )
//! .unwrap();
//!
//! let input = Tensor::from_f32(Shape::matrix(3, 1), &[1.0, 2.0, 3.0]).unwrap();
//! let mut output = Tensor::zeros(Shape::vector(1));
//! let mut state = [0.0f32];
//! recurrent::simple_rnn(
//!     &mut output,
//!     &input.view(),
//!     &mut state,
//!     &weights,
//!     &Activation::Linear,
//!     recurrent::SequenceOptions::default(),
//! );
//! assert_eq!(output.as_slice(), &[6.0]);
//! ```

mod gru;
mod lstm;
mod simple_rnn;
mod weights;

pub use gru::{Gru, GruScratch};
pub use lstm::{Lstm, LstmScratch};
pub use simple_rnn::{SimpleRnn, SimpleRnnScratch};
pub use weights::{PackedWeights, SliceView};

use crate::activation::Activate;
use serde::{Deserialize, Serialize};
use tensor_core::{Tensor, TensorView};

/// One recurrent cell: a state update applied once per timestep.
pub trait RecurrentCell {
    /// Per-step working buffers.
    type Scratch;

    /// Short lowercase name used in logs.
    fn name(&self) -> &'static str;

    /// Width of the hidden state the cell emits.
    fn units(&self) -> usize;

    /// Width of one input timestep.
    fn input_width(&self) -> usize;

    /// Length of the state buffer. Defaults to the hidden width; cells with
    /// auxiliary memory (LSTM) store it after the hidden state.
    fn state_len(&self) -> usize {
        self.units()
    }

    /// Allocates scratch sized for this cell.
    fn scratch(&self) -> Self::Scratch;

    /// Advances `state` by one timestep of `input`.
    ///
    /// `state` must hold [`state_len`](Self::state_len) values and `input`
    /// [`input_width`](Self::input_width). Mismatched buffers panic on slice
    /// indexing.
    fn step(&self, state: &mut [f32], input: &[f32], scratch: &mut Self::Scratch);
}

/// Direction and output mode of a sequence run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOptions {
    /// Consume timesteps from last to first.
    #[serde(default)]
    pub go_backwards: bool,
    /// Emit the hidden state after every step instead of only the last.
    #[serde(default)]
    pub return_sequences: bool,
}

impl SequenceOptions {
    /// Number of output values a run over `timesteps` steps produces.
    pub fn output_len(&self, timesteps: usize, units: usize) -> usize {
        if self.return_sequences {
            timesteps * units
        } else {
            units
        }
    }
}

/// Runs `cell` over the leading axis of `input`.
///
/// With `return_sequences`, output row `k` holds the hidden state after
/// `k + 1` processed steps, counted from whichever end the run started at.
/// Otherwise only the final hidden state is written to the first `units`
/// values of `output`. `state` carries the initial state in and the final
/// state out.
///
/// # Panics
/// Panics if `output`, `state` or the input rows are shorter than the cell
/// requires.
pub fn run_sequence<C: RecurrentCell>(
    cell: &C,
    output: &mut Tensor,
    input: &TensorView,
    state: &mut [f32],
    scratch: &mut C::Scratch,
    options: SequenceOptions,
) {
    let units = cell.units();
    let timesteps = input.shape().dims().first().copied().unwrap_or(0);
    debug_assert!(state.len() >= cell.state_len());
    debug_assert!(output.numel() >= options.output_len(timesteps, units));

    tracing::trace!(
        cell = cell.name(),
        timesteps,
        units,
        go_backwards = options.go_backwards,
        return_sequences = options.return_sequences,
        "recurrent sequence"
    );

    let out = output.as_mut_slice();
    for step in 0..timesteps {
        let t = if options.go_backwards {
            timesteps - 1 - step
        } else {
            step
        };
        cell.step(state, input.row(t), scratch);
        if options.return_sequences {
            out[step * units..(step + 1) * units].copy_from_slice(&state[..units]);
        }
    }
    if !options.return_sequences {
        out[..units].copy_from_slice(&state[..units]);
    }
}

/// Runs a SimpleRNN layer over `input`.
///
/// The `simple_rnn`, `lstm` and `gru` entry points build a fresh scratch on
/// every call. Callers that run a layer repeatedly and must not allocate
/// build the cell once and call [`run_sequence`] with a reused scratch.
pub fn simple_rnn(
    output: &mut Tensor,
    input: &TensorView,
    state: &mut [f32],
    weights: &PackedWeights,
    activation: &dyn Activate,
    options: SequenceOptions,
) {
    let cell = SimpleRnn::new(weights, activation);
    let mut scratch = cell.scratch();
    run_sequence(&cell, output, input, state, &mut scratch, options);
}

/// Runs an LSTM layer over `input`. `state` is `[h; c]`, `2 * units` long.
/// Allocates its scratch, see [`simple_rnn`].
pub fn lstm(
    output: &mut Tensor,
    input: &TensorView,
    state: &mut [f32],
    weights: &PackedWeights,
    recurrent_activation: &dyn Activate,
    output_activation: &dyn Activate,
    options: SequenceOptions,
) {
    let cell = Lstm::new(weights, recurrent_activation, output_activation);
    let mut scratch = cell.scratch();
    run_sequence(&cell, output, input, state, &mut scratch, options);
}

/// Runs a GRU layer over `input`. Allocates its scratch, see [`simple_rnn`].
#[allow(clippy::too_many_arguments)]
pub fn gru(
    output: &mut Tensor,
    input: &TensorView,
    state: &mut [f32],
    weights: &PackedWeights,
    recurrent_activation: &dyn Activate,
    output_activation: &dyn Activate,
    reset_after: bool,
    options: SequenceOptions,
) {
    let cell = Gru::new(weights, recurrent_activation, output_activation, reset_after);
    let mut scratch = cell.scratch();
    run_sequence(&cell, output, input, state, &mut scratch, options);
}
