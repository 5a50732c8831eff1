// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-place selection and partitioning over point ranges.
//!
//! Every routine here reorders the point rows and the permutation in
//! lock-step, so `perm[i]` always names the original position of the point
//! stored at `i`. All are deterministic: identical inputs produce identical
//! final layouts, which the build-determinism guarantee rests on.

use crate::types::{MAX_DIMS, PointSet};

/// Swap storage positions `a` and `b` of both the point rows and the
/// permutation.
#[inline]
pub(crate) fn swap_entries(points: &mut PointSet, perm: &mut [u32], a: usize, b: usize) {
    points.swap_rows(a, b);
    perm.swap(a, b);
}

/// Dimension with the largest coordinate extent over `[left, right]`
/// (inclusive, non-empty). Ties resolve to the first dimension encountered.
pub(crate) fn widest_dim(points: &PointSet, left: usize, right: usize) -> usize {
    let nd = points.ndims();
    let mut lo = [f64::INFINITY; MAX_DIMS];
    let mut hi = [f64::NEG_INFINITY; MAX_DIMS];
    for i in left..=right {
        for d in 0..nd {
            let v = points.coord(i, d);
            if v < lo[d] {
                lo[d] = v;
            }
            if v > hi[d] {
                hi[d] = v;
            }
        }
    }
    let mut dim = 0;
    let mut widest = hi[0] - lo[0];
    for d in 1..nd {
        let extent = hi[d] - lo[d];
        if extent > widest {
            widest = extent;
            dim = d;
        }
    }
    dim
}

/// Minimum and maximum of coordinate `dim` over `[left, right]` (inclusive,
/// non-empty).
pub(crate) fn min_max_coord(
    points: &PointSet,
    left: usize,
    right: usize,
    dim: usize,
) -> (f64, f64) {
    let mut lo = points.coord(left, dim);
    let mut hi = lo;
    for i in left + 1..=right {
        let v = points.coord(i, dim);
        if v < lo {
            lo = v;
        }
        if v > hi {
            hi = v;
        }
    }
    (lo, hi)
}

/// Index (among `a`, `b`, `c` positions 0/1/2) holding the median value.
fn median3(a: f64, b: f64, c: f64) -> usize {
    if a <= b {
        if b <= c {
            1
        } else if a <= c {
            2
        } else {
            0
        }
    } else if a <= c {
        0
    } else if b <= c {
        2
    } else {
        1
    }
}

/// Quickselect: reorder `[left, right]` so the `m`-th smallest coordinate on
/// `dim` sits at position `m`, everything before is `<=` it, and everything
/// after is `>=` it.
///
/// Expected linear time; median-of-three pivots keep sorted inputs off the
/// quadratic path. Iterative, fully deterministic.
pub(crate) fn select_median(
    points: &mut PointSet,
    perm: &mut [u32],
    left: usize,
    right: usize,
    dim: usize,
    m: usize,
) {
    debug_assert!(
        left <= m && m <= right,
        "selection target must lie inside the range"
    );
    let mut lo = left;
    let mut hi = right;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let pivot_at = match median3(
            points.coord(lo, dim),
            points.coord(mid, dim),
            points.coord(hi, dim),
        ) {
            0 => lo,
            1 => mid,
            _ => hi,
        };
        swap_entries(points, perm, pivot_at, hi);
        let pivot = points.coord(hi, dim);
        let mut store = lo;
        for j in lo..hi {
            if points.coord(j, dim) < pivot {
                swap_entries(points, perm, j, store);
                store += 1;
            }
        }
        swap_entries(points, perm, store, hi);
        if store == m {
            return;
        }
        if m < store {
            hi = store - 1;
        } else {
            lo = store + 1;
        }
    }
}

/// Partition `[left, right]` so every point whose `dim` coordinate satisfies
/// `below` precedes every point whose coordinate does not. Returns the first
/// index of the upper side (`left` if nothing satisfies `below`,
/// `right + 1` if everything does).
pub(crate) fn partition_below(
    points: &mut PointSet,
    perm: &mut [u32],
    left: usize,
    right: usize,
    dim: usize,
    below: impl Fn(f64) -> bool,
) -> usize {
    let mut store = left;
    for j in left..=right {
        if below(points.coord(j, dim)) {
            swap_entries(points, perm, j, store);
            store += 1;
        }
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn set_1d(values: &[f64]) -> (PointSet, Vec<u32>) {
        let points = PointSet::new(values.to_vec(), 1).unwrap();
        let perm = (0..values.len() as u32).collect();
        (points, perm)
    }

    #[test]
    fn widest_dim_prefers_first_on_ties() {
        let points = PointSet::from_rows(&[[0.0, 0.0], [1.0, 1.0]]).unwrap();
        assert_eq!(widest_dim(&points, 0, 1), 0);
        let points = PointSet::from_rows(&[[0.0, 0.0], [1.0, 2.0]]).unwrap();
        assert_eq!(widest_dim(&points, 0, 1), 1);
    }

    #[test]
    fn select_median_places_kth_smallest() {
        let values = [5.0, 9.0, 84.0, 7.0, 56.0, 4.0, 8.0, 4.0, 33.0, 120.0];
        for m in 0..values.len() {
            let (mut points, mut perm) = set_1d(&values);
            select_median(&mut points, &mut perm, 0, values.len() - 1, 0, m);
            let mut sorted = values;
            sorted.sort_by(f64::total_cmp);
            assert_eq!(points.coord(m, 0), sorted[m]);
            for i in 0..m {
                assert!(points.coord(i, 0) <= sorted[m], "lower side must not exceed the median");
            }
            for i in m..values.len() {
                assert!(points.coord(i, 0) >= sorted[m], "upper side must not undercut the median");
            }
        }
    }

    #[test]
    fn selection_keeps_permutation_in_lock_step() {
        let values = [3.0, 1.0, 2.0, 0.0];
        let (mut points, mut perm) = set_1d(&values);
        select_median(&mut points, &mut perm, 0, 3, 0, 2);
        for i in 0..4 {
            assert_eq!(
                points.coord(i, 0),
                values[perm[i] as usize],
                "perm must keep naming each point's original slot"
            );
        }
    }

    #[test]
    fn partition_below_splits_and_counts() {
        let values = [5.0, 9.0, 2.0, 7.0, 1.0];
        let (mut points, mut perm) = set_1d(&values);
        let m = partition_below(&mut points, &mut perm, 0, 4, 0, |v| v < 5.0);
        assert_eq!(m, 2);
        for i in 0..m {
            assert!(points.coord(i, 0) < 5.0, "lower side must satisfy the predicate");
        }
        for i in m..5 {
            assert!(points.coord(i, 0) >= 5.0, "upper side must not satisfy the predicate");
        }
    }

    #[test]
    fn partition_below_handles_one_sided_ranges() {
        let values = [1.0, 2.0, 3.0];
        let (mut points, mut perm) = set_1d(&values);
        assert_eq!(
            partition_below(&mut points, &mut perm, 0, 2, 0, |v| v < 0.5),
            0
        );
        assert_eq!(
            partition_below(&mut points, &mut perm, 0, 2, 0, |v| v < 9.0),
            3
        );
    }
}
