// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_kiddo")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use starfield_index::{Bounds, FixedTree, PointSet, SpatialIndex, levels_for_leaf_size};

use kiddo::{KdTree, SquaredEuclidean};

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

fn gen_rows(n: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = Rng::new(seed);
    (0..n)
        .map(|_| [rng.next_f64(), rng.next_f64(), rng.next_f64()])
        .collect()
}

fn bench_kd_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("kd_external_compare");
    for &n in &[4096usize, 65_536] {
        let rows = gen_rows(n, 0xCAFE_F00D_DEAD_BEEF);
        let query = [0.5, 0.5, 0.5];
        let max_dist_sq = 0.1 * 0.1;
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("starfield_build_query_n{}", n), |b| {
            b.iter_batched(
                || PointSet::from_rows(&rows).unwrap(),
                |points| {
                    let tree = FixedTree::build(
                        points,
                        levels_for_leaf_size(n, 16),
                        Bounds::new(0.0, 1.0).unwrap(),
                    )
                    .unwrap();
                    let hits = tree.range_search(&query, max_dist_sq).unwrap().len();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("kiddo_build_query_n{}", n), |b| {
            b.iter_batched(
                || rows.clone(),
                |rows| {
                    let mut tree: KdTree<f64, 3> = KdTree::new();
                    for (i, row) in rows.iter().enumerate() {
                        tree.add(row, i as u64);
                    }
                    let hits = tree
                        .within_unsorted::<SquaredEuclidean>(&query, max_dist_sq)
                        .len();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kd_external_compare);
criterion_main!(benches);
