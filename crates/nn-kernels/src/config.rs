// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Recurrent layer configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! kind = "gru"
//! units = 16
//! input_width = 8
//! timesteps = 32
//! activation = "tanh"
//! recurrent_activation = "hard_sigmoid"
//! go_backwards = false
//! return_sequences = true
//! reset_after = true
//! ```

use crate::recurrent::SequenceOptions;
use crate::{Activation, LayerError};
use std::fmt;
use std::path::Path;

/// Which recurrent cell a layer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    SimpleRnn,
    #[default]
    Lstm,
    Gru,
}

impl CellKind {
    /// Number of gates packed into the layer's weights.
    pub fn gates(self) -> usize {
        match self {
            CellKind::SimpleRnn => 1,
            CellKind::Lstm => 4,
            CellKind::Gru => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CellKind::SimpleRnn => "simple_rnn",
            CellKind::Lstm => "lstm",
            CellKind::Gru => "gru",
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration of one recurrent layer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RecurrentConfig {
    /// Cell variant.
    pub kind: CellKind,
    /// Hidden state width.
    pub units: usize,
    /// Width of one input timestep.
    pub input_width: usize,
    /// Sequence length the layer is run over.
    pub timesteps: usize,
    /// Output activation (candidate and cell readout).
    pub activation: Activation,
    /// Gate activation. Ignored by SimpleRNN.
    pub recurrent_activation: Activation,
    /// Consume timesteps from last to first.
    pub go_backwards: bool,
    /// Emit every hidden state instead of only the last.
    pub return_sequences: bool,
    /// GRU only: apply the reset gate after the recurrent matmul.
    pub reset_after: bool,
}

impl Default for RecurrentConfig {
    fn default() -> Self {
        Self {
            kind: CellKind::Lstm,
            units: 8,
            input_width: 4,
            timesteps: 10,
            activation: Activation::Tanh,
            recurrent_activation: Activation::Sigmoid,
            go_backwards: false,
            return_sequences: false,
            reset_after: true,
        }
    }
}

impl RecurrentConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, LayerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LayerError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, LayerError> {
        toml::from_str(toml_str).map_err(|e| LayerError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, LayerError> {
        toml::to_string_pretty(self)
            .map_err(|e| LayerError::Config(format!("TOML serialise error: {e}")))
    }

    /// Checks sizes and activation parameters.
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.units == 0 {
            return Err(LayerError::Config("units must be at least 1".into()));
        }
        if self.input_width == 0 {
            return Err(LayerError::Config("input_width must be at least 1".into()));
        }
        if self.timesteps == 0 {
            return Err(LayerError::Config("timesteps must be at least 1".into()));
        }
        for act in [&self.activation, &self.recurrent_activation] {
            act.validate()?;
            // Both activations run over `units` values per step.
            if let Activation::Prelu { alpha } = act {
                if alpha.len() != self.units {
                    return Err(LayerError::Config(format!(
                        "prelu alpha has {} values, expected units = {}",
                        alpha.len(),
                        self.units
                    )));
                }
            }
        }
        Ok(())
    }

    /// Direction and output mode for the sequence driver.
    pub fn sequence_options(&self) -> SequenceOptions {
        SequenceOptions {
            go_backwards: self.go_backwards,
            return_sequences: self.return_sequences,
        }
    }

    pub fn gates(&self) -> usize {
        self.kind.gates()
    }

    /// Length of the state buffer: `2 * units` for LSTM, `units` otherwise.
    pub fn state_len(&self) -> usize {
        match self.kind {
            CellKind::Lstm => 2 * self.units,
            _ => self.units,
        }
    }

    /// Number of bias values. A reset-after GRU carries recurrent biases too.
    pub fn bias_len(&self) -> usize {
        let input = self.gates() * self.units;
        if self.kind == CellKind::Gru && self.reset_after {
            2 * input
        } else {
            input
        }
    }

    /// Number of output values one run produces.
    pub fn output_len(&self) -> usize {
        self.sequence_options().output_len(self.timesteps, self.units)
    }

    /// Total parameter count of kernel, recurrent kernel and bias.
    pub fn num_parameters(&self) -> usize {
        let g = self.gates();
        g * self.input_width * self.units + g * self.units * self.units + self.bias_len()
    }
}
