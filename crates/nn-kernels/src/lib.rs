// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # nn-kernels
//!
//! Forward-pass layer kernels over [`tensor_core`] tensors, for running
//! trained networks on constrained devices.
//!
//! This crate provides:
//! - [`recurrent`]: SimpleRNN, LSTM and GRU cells behind the
//!   [`RecurrentCell`] trait, and the sequence driver that runs them.
//! - [`Activation`] / [`Activate`]: in-place activation functions.
//! - Dense, merge, embedding, batch-norm, pooling and convolution kernels.
//! - [`RecurrentConfig`]: TOML-backed description of one recurrent layer.
//!
//! Kernels write into caller-sized outputs and do not allocate. Weight
//! layouts are validated once, when [`PackedWeights`] is built; the kernels
//! themselves never return errors.

pub mod activation;
mod config;
pub mod convolution;
pub mod core_layers;
mod embedding;
mod error;
pub mod merge;
mod normalization;
pub mod pooling;
pub mod recurrent;

pub use activation::{Activate, Activation};
pub use config::{CellKind, RecurrentConfig};
pub use core_layers::{bias_add, dense, flatten, flip, permute_dims, repeat_vector, reshape};
pub use embedding::embedding;
pub use error::LayerError;
pub use normalization::{batch_norm, BatchNormParams};
pub use recurrent::{PackedWeights, RecurrentCell, SequenceOptions};
