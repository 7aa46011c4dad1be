// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for recurrent sequence runs and the dense layer.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nn_kernels::recurrent::{self, Gru, Lstm, SimpleRnn};
use nn_kernels::{dense, Activation, CellKind, PackedWeights, RecurrentCell, SequenceOptions};
use tensor_core::{Shape, Tensor};

const TIMESTEPS: usize = 32;
const INPUT_WIDTH: usize = 16;

fn weights(kind: CellKind, units: usize) -> PackedWeights {
    let g = kind.gates();
    let fill = |n: usize| (0..n).map(|i| ((i % 13) as f32 - 6.0) * 0.01).collect::<Vec<_>>();
    let bias_len = if kind == CellKind::Gru { 2 * g * units } else { g * units };
    PackedWeights::new(
        kind.name(),
        g,
        Tensor::from_vec(Shape::matrix(g * INPUT_WIDTH, units), fill(g * INPUT_WIDTH * units)).unwrap(),
        Tensor::from_vec(Shape::matrix(g * units, units), fill(g * units * units)).unwrap(),
        Tensor::from_vec(Shape::vector(bias_len), fill(bias_len)).unwrap(),
    )
    .unwrap()
}

fn bench_cells(c: &mut Criterion) {
    let input = Tensor::from_vec(
        Shape::matrix(TIMESTEPS, INPUT_WIDTH),
        (0..TIMESTEPS * INPUT_WIDTH).map(|i| (i as f32 * 0.1).sin()).collect(),
    )
    .unwrap();
    let options = SequenceOptions {
        go_backwards: false,
        return_sequences: true,
    };
    let (sig, tanh) = (Activation::Sigmoid, Activation::Tanh);

    let mut group = c.benchmark_group("recurrent_sequence");
    for units in [8usize, 32, 128] {
        let mut out = Tensor::zeros(Shape::matrix(TIMESTEPS, units));

        let w = weights(CellKind::SimpleRnn, units);
        let cell = SimpleRnn::new(&w, &tanh);
        let mut scratch = cell.scratch();
        let mut state = vec![0.0; cell.state_len()];
        group.bench_with_input(BenchmarkId::new("simple_rnn", units), &units, |b, _| {
            b.iter(|| recurrent::run_sequence(&cell, &mut out, &input.view(), &mut state, &mut scratch, options))
        });

        let w = weights(CellKind::Lstm, units);
        let cell = Lstm::new(&w, &sig, &tanh);
        let mut scratch = cell.scratch();
        let mut state = vec![0.0; cell.state_len()];
        group.bench_with_input(BenchmarkId::new("lstm", units), &units, |b, _| {
            b.iter(|| recurrent::run_sequence(&cell, &mut out, &input.view(), &mut state, &mut scratch, options))
        });

        let w = weights(CellKind::Gru, units);
        let cell = Gru::new(&w, &sig, &tanh, true);
        let mut scratch = cell.scratch();
        let mut state = vec![0.0; cell.state_len()];
        group.bench_with_input(BenchmarkId::new("gru", units), &units, |b, _| {
            b.iter(|| recurrent::run_sequence(&cell, &mut out, &input.view(), &mut state, &mut scratch, options))
        });
    }
    group.finish();
}

fn bench_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense");
    for (name, dims) in [("rank2", vec![32usize, 64]), ("rank3", vec![4, 8, 64])] {
        let input = Tensor::zeros(Shape::new(&dims).unwrap());
        let kernel = Tensor::zeros(Shape::matrix(64, 32));
        let bias = vec![0.1; 32];
        let mut out_dims = dims.clone();
        *out_dims.last_mut().unwrap() = 32;
        let mut out = Tensor::zeros(Shape::new(&out_dims).unwrap());
        let mut fwork = vec![0.0; input.numel() + kernel.numel()];
        group.bench_function(name, |b| {
            b.iter(|| dense(&mut out, &input.view(), &kernel.view(), &bias, &Activation::Relu, &mut fwork))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cells, bench_dense);
criterion_main!(benches);
