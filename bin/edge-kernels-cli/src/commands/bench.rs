// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `edge-kernels bench` command: sweep hidden widths across every cell kind.
//!
//! Each measurement runs the full sequence `iterations` times with one
//! scratch buffer, so the numbers reflect the allocation-free step path.

use std::time::{Duration, Instant};

use anyhow::Context;
use nn_kernels::recurrent::{self, Gru, Lstm, RecurrentCell, SimpleRnn};
use nn_kernels::{CellKind, RecurrentConfig};
use tensor_core::{Shape, Tensor};

struct BenchResult {
    kind: CellKind,
    units: usize,
    params: usize,
    per_run: Duration,
    steps_per_sec: f64,
}

pub fn execute(base: &RecurrentConfig, sweep_units: &str, iterations: usize) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            edge-kernels · Benchmark Suite            ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let widths: Vec<usize> = sweep_units
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid unit count '{}'", s.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    anyhow::ensure!(iterations > 0, "iterations must be at least 1");

    println!("  Units:      {widths:?}");
    println!("  Timesteps:  {}", base.timesteps);
    println!("  Input:      {}", base.input_width);
    println!("  Iterations: {iterations}");
    println!();

    // ── Results Table ──────────────────────────────────────────
    println!(
        "  {:<12} {:>8} {:>10} {:>12} {:>14}",
        "Cell", "Units", "Params", "Per run", "Steps/s",
    );
    println!("  {}", "-".repeat(60));

    let mut results = Vec::new();
    for &units in &widths {
        for kind in [CellKind::SimpleRnn, CellKind::Lstm, CellKind::Gru] {
            let config = RecurrentConfig {
                kind,
                units,
                ..base.clone()
            };
            config.validate()?;
            let r = run_single(&config, iterations)?;
            println!(
                "  {:<12} {:>8} {:>10} {:>9.1} µs {:>14.0}",
                r.kind.name(),
                r.units,
                r.params,
                r.per_run.as_secs_f64() * 1e6,
                r.steps_per_sec,
            );
            results.push(r);
        }
    }
    println!();

    // ── Summary ────────────────────────────────────────────────
    println!("  Summary:");
    for kind in [CellKind::SimpleRnn, CellKind::Lstm, CellKind::Gru] {
        if let Some(best) = results
            .iter()
            .filter(|r| r.kind == kind)
            .max_by(|a, b| a.steps_per_sec.total_cmp(&b.steps_per_sec))
        {
            println!(
                "    {:<12} peak {:.0} steps/s at {} units",
                kind.name(),
                best.steps_per_sec,
                best.units,
            );
        }
    }

    Ok(())
}

fn run_single(config: &RecurrentConfig, iterations: usize) -> anyhow::Result<BenchResult> {
    let weights = super::synthetic_weights(config)?;
    let input = super::synthetic_input(config)?;

    let per_run = match config.kind {
        CellKind::SimpleRnn => {
            let cell = SimpleRnn::new(&weights, &config.activation);
            time_cell(&cell, config, &input, iterations)
        }
        CellKind::Lstm => {
            let cell = Lstm::new(&weights, &config.recurrent_activation, &config.activation);
            time_cell(&cell, config, &input, iterations)
        }
        CellKind::Gru => {
            let cell = Gru::new(
                &weights,
                &config.recurrent_activation,
                &config.activation,
                config.reset_after,
            );
            time_cell(&cell, config, &input, iterations)
        }
    };

    let secs = per_run.as_secs_f64().max(f64::MIN_POSITIVE);
    tracing::debug!(
        kind = %config.kind,
        units = config.units,
        per_run_us = secs * 1e6,
        "bench point"
    );
    Ok(BenchResult {
        kind: config.kind,
        units: config.units,
        params: weights.num_parameters(),
        per_run,
        steps_per_sec: config.timesteps as f64 / secs,
    })
}

/// Mean wall time of one full sequence run.
fn time_cell<C: RecurrentCell>(
    cell: &C,
    config: &RecurrentConfig,
    input: &Tensor,
    iterations: usize,
) -> Duration {
    let options = config.sequence_options();
    let mut output = Tensor::zeros(Shape::vector(options.output_len(config.timesteps, config.units)));
    let mut state = vec![0.0f32; cell.state_len()];
    let mut scratch = cell.scratch();
    let view = input.view();

    // Warm-up run.
    recurrent::run_sequence(cell, &mut output, &view, &mut state, &mut scratch, options);

    let start = Instant::now();
    for _ in 0..iterations {
        state.fill(0.0);
        recurrent::run_sequence(cell, &mut output, &view, &mut state, &mut scratch, options);
    }
    start.elapsed() / iterations as u32
}
