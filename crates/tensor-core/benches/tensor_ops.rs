// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for matmul and contraction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tensor_core::{affine_matmul, dot, dot_output_shape, dot_scratch_len, matmul, Shape, Tensor};

fn filled(dims: &[usize]) -> Tensor {
    let shape = Shape::new(dims).unwrap();
    let data = (0..shape.num_elements()).map(|i| (i % 17) as f32 * 0.1).collect();
    Tensor::from_vec(shape, data).unwrap()
}

fn bench_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    for n in [16usize, 64, 128] {
        let a = filled(&[n, n]);
        let b = filled(&[n, n]);
        let bias = vec![0.5; n];
        let mut out = vec![0.0; n * n];

        group.bench_with_input(BenchmarkId::new("plain", n), &n, |bench, &n| {
            bench.iter(|| matmul(&mut out, black_box(a.as_slice()), black_box(b.as_slice()), n, n, n))
        });
        group.bench_with_input(BenchmarkId::new("affine", n), &n, |bench, &n| {
            bench.iter(|| {
                affine_matmul(&mut out, black_box(a.as_slice()), black_box(b.as_slice()), &bias, n, n, n)
            })
        });
    }
    group.finish();
}

fn bench_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot");
    let cases: [(&str, &[usize], &[usize], &[usize], &[usize]); 3] = [
        ("rank2", &[64, 64], &[64, 64], &[1], &[0]),
        ("rank3_last_axis", &[8, 32, 64], &[64, 32], &[2], &[0]),
        ("rank3_leading_axis", &[64, 8, 8], &[64, 16], &[0], &[0]),
    ];
    for (name, da, db, axes_a, axes_b) in cases {
        let a = filled(da);
        let b = filled(db);
        let shape = dot_output_shape(a.shape(), b.shape(), axes_a, axes_b).unwrap();
        let mut out = Tensor::zeros(shape);
        let mut fwork = vec![0.0; dot_scratch_len(a.shape(), b.shape())];

        group.bench_function(name, |bench| {
            bench.iter(|| dot(&mut out, &a.view(), &b.view(), axes_a, axes_b, false, &mut fwork))
        });
        group.bench_function(format!("{name}_cosine"), |bench| {
            bench.iter(|| dot(&mut out, &a.view(), &b.view(), axes_a, axes_b, true, &mut fwork))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_matmul, bench_dot);
criterion_main!(benches);
