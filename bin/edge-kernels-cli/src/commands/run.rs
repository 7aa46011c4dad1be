// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-kernels run` command: run one recurrent layer and print its output.

use std::time::Instant;

use nn_kernels::{recurrent, CellKind, PackedWeights, RecurrentConfig};
use tensor_core::{Shape, Tensor};

pub fn execute(config: &RecurrentConfig) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             edge-kernels · Layer Runner              ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let weights = super::synthetic_weights(config)?;
    let input = super::synthetic_input(config)?;

    println!("  Cell:        {}", config.kind);
    println!("  Units:       {}", config.units);
    println!(
        "  Input:       [{}, {}]",
        config.timesteps, config.input_width
    );
    println!("  Direction:   {}", if config.go_backwards { "backward" } else { "forward" });
    println!("  Parameters:  {}", weights.num_parameters());
    println!();

    let start = Instant::now();
    let (output, state) = run_layer(config, &weights, &input);
    let elapsed = start.elapsed();

    // ── Output ─────────────────────────────────────────────────
    let units = config.units;
    let rows = output.numel() / units;
    for (r, row) in output.as_slice().chunks(units).enumerate() {
        let label = if rows == 1 {
            "h(final)".to_string()
        } else {
            format!("h[{r}]")
        };
        println!("  {:<10} {}", label, format_row(row));
    }
    if config.kind == CellKind::Lstm {
        println!("  {:<10} {}", "c(final)", format_row(&state[units..]));
    }
    println!();

    // ── Summary ────────────────────────────────────────────────
    println!("  Summary:");
    println!("    Steps:        {}", config.timesteps);
    println!("    Elapsed:      {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    println!(
        "    Per step:     {:.2} µs",
        elapsed.as_secs_f64() * 1e6 / config.timesteps as f64,
    );

    Ok(())
}

/// Runs the layer described by `config` from a zero state. Returns the output
/// and the final state buffer.
pub fn run_layer(
    config: &RecurrentConfig,
    weights: &PackedWeights,
    input: &Tensor,
) -> (Tensor, Vec<f32>) {
    let options = config.sequence_options();
    let out_shape = if options.return_sequences {
        Shape::matrix(config.timesteps, config.units)
    } else {
        Shape::vector(config.units)
    };
    let mut output = Tensor::zeros(out_shape);
    let mut state = vec![0.0f32; config.state_len()];
    let view = input.view();

    match config.kind {
        CellKind::SimpleRnn => recurrent::simple_rnn(
            &mut output,
            &view,
            &mut state,
            weights,
            &config.activation,
            options,
        ),
        CellKind::Lstm => recurrent::lstm(
            &mut output,
            &view,
            &mut state,
            weights,
            &config.recurrent_activation,
            &config.activation,
            options,
        ),
        CellKind::Gru => recurrent::gru(
            &mut output,
            &view,
            &mut state,
            weights,
            &config.recurrent_activation,
            &config.activation,
            config.reset_after,
            options,
        ),
    }

    tracing::debug!(
        kind = %config.kind,
        outputs = output.numel(),
        "layer run complete"
    );
    (output, state)
}

fn format_row(row: &[f32]) -> String {
    const SHOWN: usize = 6;
    let mut s: Vec<String> = row.iter().take(SHOWN).map(|v| format!("{v:>8.4}")).collect();
    if row.len() > SHOWN {
        s.push(format!("… (+{})", row.len() - SHOWN));
    }
    s.join(" ")
}
