// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # edge-kernels
//!
//! Command-line driver for the nn-kernels recurrent layers.
//!
//! ## Usage
//! ```bash
//! # Run one recurrent layer over a synthetic sequence
//! edge-kernels run --kind gru --units 16 --timesteps 32
//!
//! # Time every cell across a sweep of hidden widths
//! edge-kernels bench --sweep-units 8,32,128
//!
//! # Print buffer and parameter sizes for a layer configuration
//! edge-kernels sizes --config ./layer.toml
//! ```

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use nn_kernels::CellKind;

#[derive(Parser)]
#[command(
    name = "edge-kernels",
    about = "Allocation-free neural network layer kernels for edge devices",
    version,
    author
)]
struct Cli {
    /// Path to a TOML layer configuration (command flags override it).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Cell variant as spelled on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    SimpleRnn,
    Lstm,
    Gru,
}

impl From<Kind> for CellKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::SimpleRnn => CellKind::SimpleRnn,
            Kind::Lstm => CellKind::Lstm,
            Kind::Gru => CellKind::Gru,
        }
    }
}

/// Layer shape flags shared by every command.
#[derive(clap::Args)]
struct LayerArgs {
    /// Cell variant.
    #[arg(short, long, value_enum)]
    kind: Option<Kind>,

    /// Hidden state width.
    #[arg(short, long)]
    units: Option<usize>,

    /// Width of one input timestep.
    #[arg(long)]
    input_width: Option<usize>,

    /// Sequence length.
    #[arg(short, long)]
    timesteps: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one recurrent layer over a deterministic synthetic sequence.
    Run {
        #[command(flatten)]
        layer: LayerArgs,

        /// Consume timesteps from last to first.
        #[arg(long)]
        go_backwards: bool,

        /// Print the hidden state after every step.
        #[arg(long)]
        return_sequences: bool,
    },

    /// Time every cell kind across a sweep of hidden widths.
    Bench {
        #[command(flatten)]
        layer: LayerArgs,

        /// Comma-separated hidden widths to sweep (e.g., "8,32,128").
        #[arg(long, default_value = "8,32,128")]
        sweep_units: String,

        /// Sequence runs per measurement.
        #[arg(long, default_value_t = 200)]
        iterations: usize,
    },

    /// Print state, scratch, output and parameter sizes of a layer.
    Sizes {
        #[command(flatten)]
        layer: LayerArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Run {
            layer,
            go_backwards,
            return_sequences,
        } => {
            let mut config = commands::load_config(config_path, &layer)?;
            config.go_backwards |= go_backwards;
            config.return_sequences |= return_sequences;
            commands::run::execute(&config)
        }
        Commands::Bench {
            layer,
            sweep_units,
            iterations,
        } => {
            let config = commands::load_config(config_path, &layer)?;
            commands::bench::execute(&config, &sweep_units, iterations)
        }
        Commands::Sizes { layer } => {
            let config = commands::load_config(config_path, &layer)?;
            commands::sizes::execute(&config)
        }
    }
}
