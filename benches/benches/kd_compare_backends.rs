// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use starfield_index::{Bounds, FixedTree, FloatTree, PointSet, SpatialIndex, levels_for_leaf_size};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_cloud(n: usize, ndims: usize, seed: u64) -> Vec<f64> {
    let mut rng = Rng::new(seed);
    (0..n * ndims).map(|_| rng.next_f64()).collect()
}

fn gen_queries(count: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| [rng.next_f64(), rng.next_f64(), rng.next_f64()])
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("kd_build");
    for &n in &[4096usize, 65_536] {
        let data = gen_cloud(n, 3, 0xCAFE_F00D_DEAD_BEEF);
        let levels = levels_for_leaf_size(n, 16);
        let bounds = Bounds::new(0.0, 1.0).unwrap();
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("fixed_n{}", n), |b| {
            b.iter_batched(
                || PointSet::new(data.clone(), 3).unwrap(),
                |points| {
                    let tree = FixedTree::build(points, levels, bounds).unwrap();
                    black_box(tree.num_nodes());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("float_n{}", n), |b| {
            b.iter_batched(
                || PointSet::new(data.clone(), 3).unwrap(),
                |points| {
                    let tree = FloatTree::build(points, levels, bounds).unwrap();
                    black_box(tree.num_nodes());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_range_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("kd_range_search");
    let queries = gen_queries(256, 0xBADC_F00D_1234_5678);
    for &n in &[4096usize, 65_536] {
        let data = gen_cloud(n, 3, 0xC1A5_7E55_9999_ABCD);
        let levels = levels_for_leaf_size(n, 16);
        let bounds = Bounds::new(0.0, 1.0).unwrap();
        let fixed = FixedTree::build(PointSet::new(data.clone(), 3).unwrap(), levels, bounds)
            .unwrap();
        let float = FloatTree::build(PointSet::new(data.clone(), 3).unwrap(), levels, bounds)
            .unwrap();
        let max_dist_sq = 0.05 * 0.05;
        group.throughput(Throughput::Elements(queries.len() as u64));

        group.bench_function(format!("fixed_n{}", n), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for q in &queries {
                    total += fixed.range_search(q, max_dist_sq).unwrap().len();
                }
                black_box(total);
            })
        });

        group.bench_function(format!("float_n{}", n), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for q in &queries {
                    total += float.range_search(q, max_dist_sq).unwrap().len();
                }
                black_box(total);
            })
        });

        group.bench_function(format!("fixed_sorted_n{}", n), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for q in &queries {
                    total += fixed.range_search_sorted(q, max_dist_sq).unwrap().len();
                }
                black_box(total);
            })
        });
    }
    group.finish();
}

fn bench_wide_radius(c: &mut Criterion) {
    // Wide radii stress the result buffers rather than the pruning.
    let mut group = c.benchmark_group("kd_wide_radius");
    let n = 16_384usize;
    let data = gen_cloud(n, 3, 0xFACE_FEED_CAFE_BABE);
    let bounds = Bounds::new(0.0, 1.0).unwrap();
    let fixed =
        FixedTree::build(PointSet::new(data, 3).unwrap(), levels_for_leaf_size(n, 16), bounds)
            .unwrap();
    let queries = gen_queries(64, 0x1234_5678_9ABC_DEF0);
    for &r in &[0.1_f64, 0.3] {
        group.bench_function(format!("fixed_r{}", r), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for q in &queries {
                    total += fixed.range_search(q, r * r).unwrap().len();
                }
                black_box(total);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_range_search, bench_wide_radius);
criterion_main!(benches);
