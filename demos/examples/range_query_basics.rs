// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range query basics.
//!
//! Build a quantized tree over a small synthetic catalog, pick a depth from
//! a target leaf size, and run a couple of radius queries.
//!
//! Run:
//! - `cargo run -p starfield_demos --example range_query_basics`

use starfield_index::{Bounds, FixedTree, PointSet, SpatialIndex, levels_for_leaf_size};

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
    // A synthetic 3-D "catalog": unit-cube positions standing in for
    // unit-sphere star vectors.
    let n = 5000;
    let mut rng = Rng(0xCAFE_F00D_DEAD_BEEF);
    let data: Vec<f64> = (0..n * 3).map(|_| rng.next_f64()).collect();

    let levels = levels_for_leaf_size(n, 16);
    let tree = FixedTree::build(PointSet::new(data, 3)?, levels, Bounds::new(0.0, 1.0)?)?;
    println!(
        "built: {} points, {} dims, {} levels, {} node slots",
        tree.num_points(),
        tree.num_dims(),
        tree.max_depth(),
        tree.num_nodes()
    );

    let query = [0.5, 0.5, 0.5];
    for r in [0.05, 0.1, 0.2] {
        let hits = tree.range_search_sorted(&query, r * r)?;
        println!("radius {r}: {} matches", hits.len());
        for m in hits.matches().iter().take(3) {
            println!(
                "  #{:<4} dist {:.5}  at ({:.3}, {:.3}, {:.3})",
                m.index,
                m.dist_sq.sqrt(),
                m.point[0],
                m.point[1],
                m.point[2]
            );
        }
    }
    Ok(())
}
