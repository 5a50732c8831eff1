// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend cross-check.
//!
//! Build the fixed-point and floating-point trees on identical random
//! inputs, run the same radius queries against both, and require identical
//! result sets. Exits non-zero on the first disagreement.
//!
//! Run:
//! - `cargo run -p starfield_demos --example tree_crosscheck`

use starfield_index::{Bounds, FixedTree, FloatTree, PointSet, SpatialIndex};

struct Rng(u64);

impl Rng {
    fn next_f64(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        ((x >> 11) as f64) / ((1u64 << 53) as f64)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let n = 20_000;
    let mut rng = Rng(0xC1A5_7E55_9999_ABCD);
    let data: Vec<f64> = (0..n * 3).map(|_| rng.next_f64()).collect();
    let bounds = Bounds::new(0.0, 1.0)?;

    let fixed = FixedTree::build(PointSet::new(data.clone(), 3)?, 10, bounds)?;
    let float = FloatTree::build(PointSet::new(data, 3)?, 10, bounds)?;

    let mut queries = 0u32;
    let mut matches = 0usize;
    for _ in 0..200 {
        let query = [rng.next_f64(), rng.next_f64(), rng.next_f64()];
        let r = 0.15 * rng.next_f64();
        let a = index_set(&fixed, &query, r * r)?;
        let b = index_set(&float, &query, r * r)?;
        if a != b {
            eprintln!(
                "disagreement at query ({:.6}, {:.6}, {:.6}) radius {:.6}:",
                query[0], query[1], query[2], r
            );
            eprintln!("  fixed: {} matches, float: {} matches", a.len(), b.len());
            for i in a.iter().filter(|i| !b.contains(i)) {
                eprintln!("  only fixed: point {i}");
            }
            for i in b.iter().filter(|i| !a.contains(i)) {
                eprintln!("  only float: point {i}");
            }
            std::process::exit(1);
        }
        queries += 1;
        matches += a.len();
    }
    println!("{queries} queries agreed across backends ({matches} total matches)");
    Ok(())
}

fn index_set(
    tree: &impl SpatialIndex,
    query: &[f64],
    max_dist_sq: f64,
) -> Result<Vec<u32>, Box<dyn std::error::Error>> {
    let mut v: Vec<u32> = tree
        .range_search(query, max_dist_sq)?
        .iter()
        .map(|m| m.index)
        .collect();
    v.sort_unstable();
    Ok(v)
}
