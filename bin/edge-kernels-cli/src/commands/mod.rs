// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and the helpers they share.

pub mod bench;
pub mod run;
pub mod sizes;

use std::path::Path;

use anyhow::Context;
use nn_kernels::{PackedWeights, RecurrentConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tensor_core::{Shape, Tensor};

use crate::LayerArgs;

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Reads the layer configuration from `path` (or the defaults) and applies
/// command-line overrides on top.
pub fn load_config(path: Option<&Path>, args: &LayerArgs) -> anyhow::Result<RecurrentConfig> {
    let mut config = match path {
        Some(p) => RecurrentConfig::from_file(p)
            .with_context(|| format!("failed to load layer config '{}'", p.display()))?,
        None => RecurrentConfig::default(),
    };

    if let Some(kind) = args.kind {
        config.kind = kind.into();
    }
    if let Some(units) = args.units {
        config.units = units;
    }
    if let Some(width) = args.input_width {
        config.input_width = width;
    }
    if let Some(timesteps) = args.timesteps {
        config.timesteps = timesteps;
    }

    config.validate()?;
    tracing::info!(
        kind = %config.kind,
        units = config.units,
        input_width = config.input_width,
        timesteps = config.timesteps,
        "layer configuration"
    );
    Ok(config)
}

/// Deterministic pseudo-random values in `[-scale, scale)`.
fn synthetic(len: usize, seed: u64, scale: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-scale..scale)).collect()
}

/// Builds packed weights of the right layout for `config`.
pub fn synthetic_weights(config: &RecurrentConfig) -> anyhow::Result<PackedWeights> {
    let (gates, units, width) = (config.gates(), config.units, config.input_width);
    let scale = 1.0 / (units as f32).sqrt();

    let kernel = Tensor::from_vec(
        Shape::matrix(gates * width, units),
        synthetic(gates * width * units, 1, scale),
    )?;
    let recurrent = Tensor::from_vec(
        Shape::matrix(gates * units, units),
        synthetic(gates * units * units, 2, scale),
    )?;
    let bias_len = config.bias_len();
    let bias = Tensor::from_vec(Shape::vector(bias_len), synthetic(bias_len, 3, 0.1))?;

    Ok(PackedWeights::new(
        config.kind.name(),
        gates,
        kernel,
        recurrent,
        bias,
    )?)
}

/// Builds a `[timesteps, input_width]` input sequence.
pub fn synthetic_input(config: &RecurrentConfig) -> anyhow::Result<Tensor> {
    let shape = Shape::matrix(config.timesteps, config.input_width);
    let data = synthetic(shape.num_elements(), 4, 1.0);
    Ok(Tensor::from_vec(shape, data)?)
}
