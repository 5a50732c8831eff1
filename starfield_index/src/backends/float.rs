// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conventional floating-point k-d tree.
//!
//! The cross-validation reference: same flat level-order layout and leaf
//! boundary scheme as the fixed-point tree, but split planes are stored as
//! full `f64` values and the search recurses with exact float comparisons.
//! Simpler and fatter; the bakeoff harnesses run it against [`FixedTree`]
//! (crate::FixedTree) on identical inputs and require identical result sets.

use alloc::vec;
use alloc::vec::Vec;

use crate::backend::{SpatialIndex, check_build_input};
use crate::error::{BuildError, DomainError};
use crate::math;
use crate::partition;
use crate::results::{SearchMatch, SearchResults};
use crate::types::{Bounds, MAX_DIMS, PointSet};

/// An interior split plane: axis and threshold. Points with `coord < value`
/// live in the left subtree, points with `coord >= value` in the right.
#[derive(Copy, Clone, Debug)]
struct SplitPlane {
    dim: u8,
    value: f64,
}

/// Flat k-d tree over unquantized coordinates.
pub struct FloatTree {
    splits: Vec<SplitPlane>,
    lr: Vec<u32>,
    points: PointSet,
    perm: Vec<u32>,
    levels: usize,
    bounds: Bounds,
}

impl FloatTree {
    /// Storage-order -> original-order permutation.
    pub fn permutation(&self) -> &[u32] {
        &self.perm
    }

    /// The reordered point storage.
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// The domain the tree was built over.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    fn leaf_range(&self, k: usize) -> (usize, usize) {
        let left = if k == 0 {
            0
        } else {
            self.lr[k - 1] as usize + 1
        };
        (left, self.lr[k] as usize)
    }

    /// Split one node's range around the median coordinate. Same boundary
    /// discipline as the fixed tree: ties go right, degenerate all-equal
    /// ranges empty the right child (via the next representable float), and
    /// the left child is never empty.
    fn split_range(
        points: &mut PointSet,
        perm: &mut [u32],
        left: usize,
        right: usize,
    ) -> (SplitPlane, usize) {
        if left > right {
            return (SplitPlane { dim: 0, value: 0.0 }, left);
        }
        let dim = if right > left {
            partition::widest_dim(points, left, right)
        } else {
            0
        };
        if right == left {
            let value = points.coord(left, dim).next_up();
            return (split(dim, value), right + 1);
        }

        let m = 1 + (left + right) / 2;
        partition::select_median(points, perm, left, right, dim, m);
        let mut value = points.coord(m, dim);
        let mut boundary =
            partition::partition_below(points, perm, left, right, dim, |v| v < value);
        if boundary == left {
            // The median equals the range minimum; split one ulp above it so
            // the duplicate floor stays left.
            let (lo, hi) = partition::min_max_coord(points, left, right, dim);
            value = lo.next_up();
            if hi >= value {
                boundary =
                    partition::partition_below(points, perm, left, right, dim, |v| v < value);
            } else {
                boundary = right + 1;
            }
        }

        if cfg!(debug_assertions) {
            for j in left..=right {
                let v = points.coord(j, dim);
                if j < boundary {
                    debug_assert!(v < value, "left side must fall below the split");
                } else {
                    debug_assert!(v >= value, "right side must sit at or above the split");
                }
            }
        }
        (split(dim, value), boundary)
    }

    fn search_node(
        &self,
        i: usize,
        query: &[f64],
        radius: f64,
        max_dist_sq: f64,
        out: &mut SearchResults,
    ) {
        if i < self.splits.len() {
            let plane = self.splits[i];
            let q = query[plane.dim as usize];
            let (near, far) = if q < plane.value {
                (2 * i + 1, 2 * i + 2)
            } else {
                (2 * i + 2, 2 * i + 1)
            };
            self.search_node(near, query, radius, max_dist_sq, out);
            if (q - plane.value).abs() <= radius {
                self.search_node(far, query, radius, max_dist_sq, out);
            }
        } else {
            let ndims = self.points.ndims();
            let (left, right) = self.leaf_range(i - self.splits.len());
            for j in left..=right {
                let mut d2 = 0.0;
                for (d, &x) in query.iter().enumerate() {
                    let diff = self.points.coord(j, d) - x;
                    d2 += diff * diff;
                }
                if d2 < max_dist_sq {
                    let mut point = [0.0; MAX_DIMS];
                    point[..ndims].copy_from_slice(self.points.point(j));
                    out.push(SearchMatch {
                        index: self.perm[j],
                        dist_sq: d2,
                        point,
                    });
                }
            }
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "split dimensions are bounded by MAX_DIMS"
)]
fn split(dim: usize, value: f64) -> SplitPlane {
    SplitPlane {
        dim: dim as u8,
        value,
    }
}

impl SpatialIndex for FloatTree {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "point and node counts are checked against the 32-bit index space before building"
    )]
    fn build(points: PointSet, levels: usize, bounds: Bounds) -> Result<Self, BuildError> {
        let (ninterior, nbottom) = check_build_input(&points, levels, bounds)?;
        let npoints = points.len();

        let mut points = points;
        let mut perm: Vec<u32> = (0..npoints as u32).collect();
        let mut splits = Vec::with_capacity(ninterior);

        let mut bounds_build: Vec<u32> = vec![0; ninterior + nbottom];
        bounds_build[0] = (npoints - 1) as u32;

        let mut level_start = 0;
        let mut level_next = 1;
        for i in 0..ninterior {
            if i == level_next {
                level_start = level_next;
                level_next = 2 * level_next + 1;
            }
            let left = if i == level_start {
                0
            } else {
                bounds_build[i - 1] as usize + 1
            };
            let right = bounds_build[i] as usize;
            let (plane, boundary) = Self::split_range(&mut points, &mut perm, left, right);
            splits.push(plane);
            bounds_build[2 * i + 1] = (boundary - 1) as u32;
            bounds_build[2 * i + 2] = right as u32;
        }

        let lr = bounds_build.split_off(ninterior);
        Ok(Self {
            splits,
            lr,
            points,
            perm,
            levels,
            bounds,
        })
    }

    fn range_search(
        &self,
        query: &[f64],
        max_dist_sq: f64,
    ) -> Result<SearchResults, DomainError> {
        let ndims = self.points.ndims();
        if query.len() != ndims {
            return Err(DomainError::DimensionMismatch {
                expected: ndims,
                actual: query.len(),
            });
        }
        for &x in query {
            if !self.bounds.contains(x) {
                return Err(DomainError::OutOfBounds {
                    value: x,
                    min: self.bounds.min(),
                    max: self.bounds.max(),
                });
            }
        }
        let mut out = SearchResults::new(ndims);
        if max_dist_sq <= 0.0 || max_dist_sq.is_nan() {
            return Ok(out);
        }
        let radius = math::sqrt(max_dist_sq);
        self.search_node(0, query, radius, max_dist_sq, &mut out);
        Ok(out)
    }

    fn num_points(&self) -> usize {
        self.points.len()
    }

    fn num_dims(&self) -> usize {
        self.points.ndims()
    }

    fn num_nodes(&self) -> usize {
        self.splits.len() + self.lr.len()
    }

    fn max_depth(&self) -> usize {
        self.levels
    }
}

impl core::fmt::Debug for FloatTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FloatTree")
            .field("num_points", &self.num_points())
            .field("num_dims", &self.num_dims())
            .field("levels", &self.levels)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}
