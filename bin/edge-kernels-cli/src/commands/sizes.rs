// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-kernels sizes` command: print every buffer a layer needs.

use nn_kernels::recurrent::{Gru, Lstm, RecurrentCell, SimpleRnn};
use nn_kernels::{CellKind, RecurrentConfig};

pub fn execute(config: &RecurrentConfig) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             edge-kernels · Layer Sizes               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let weights = super::synthetic_weights(config)?;
    let scratch = scratch_floats(config, &weights);

    println!("  Cell: {} ({} gates)", config.kind, config.gates());
    println!();

    // ── Buffers ────────────────────────────────────────────────
    println!("  {:<22} {:>10} {:>12}", "Buffer", "f32s", "Bytes");
    println!("  {}", "-".repeat(46));
    let rows = [
        ("kernel", config.gates() * config.input_width * config.units),
        ("recurrent kernel", config.gates() * config.units * config.units),
        ("bias", config.bias_len()),
        ("state", config.state_len()),
        ("scratch", scratch),
        ("input", config.timesteps * config.input_width),
        ("output", config.output_len()),
    ];
    for (name, floats) in rows {
        println!("  {:<22} {:>10} {:>12}", name, floats, floats * 4);
    }
    println!();

    // ── Summary ────────────────────────────────────────────────
    let working = config.state_len() + scratch + config.output_len();
    println!("  Summary:");
    println!("    Parameters:     {}", weights.num_parameters());
    println!(
        "    Weight memory:  {:.2} KB",
        (weights.num_parameters() * 4) as f64 / 1024.0,
    );
    println!("    Working memory: {:.2} KB", (working * 4) as f64 / 1024.0);

    Ok(())
}

/// Scratch length of the cell `config` describes.
fn scratch_floats(config: &RecurrentConfig, weights: &nn_kernels::PackedWeights) -> usize {
    match config.kind {
        CellKind::SimpleRnn => SimpleRnn::new(weights, &config.activation)
            .scratch()
            .num_floats(),
        CellKind::Lstm => Lstm::new(weights, &config.recurrent_activation, &config.activation)
            .scratch()
            .num_floats(),
        CellKind::Gru => Gru::new(
            weights,
            &config.recurrent_activation,
            &config.activation,
            config.reset_after,
        )
        .scratch()
        .num_floats(),
    }
}
