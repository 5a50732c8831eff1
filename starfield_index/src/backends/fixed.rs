// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-point flat k-d tree.
//!
//! The production backend: interior nodes are one bit-packed [`NodeWord`]
//! each, leaves are implicit ranges over the reordered point array, and the
//! range search walks the tree iteratively, pruning with integer arithmetic
//! only. Exact distances are computed in f64 during the leaf scans, so
//! quantization never changes which points a query returns.

use alloc::vec;
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::backend::{SpatialIndex, check_build_input};
use crate::error::{BuildError, DomainError};
use crate::math;
use crate::node::NodeWord;
use crate::partition;
use crate::quantize::Quantizer;
use crate::results::{SearchMatch, SearchResults};
use crate::types::{Bounds, MAX_DIMS, PointSet};

/// Quantized flat-array k-d tree with bit-packed interior nodes.
///
/// Built once, then immutable; safe to share read-only across threads. All
/// query scratch state (traversal stack, result buffer) is per-call.
pub struct FixedTree {
    /// One packed word per interior node, in level order.
    nodes: Vec<NodeWord>,
    /// Inclusive right boundary of each leaf slot's point range.
    lr: Vec<u32>,
    /// Point rows, reordered into storage order during the build.
    points: PointSet,
    /// Storage order -> original input order.
    perm: Vec<u32>,
    levels: usize,
    quant: Quantizer,
}

impl FixedTree {
    /// The encoded interior nodes, as persisted by external serializers.
    pub fn node_words(&self) -> &[NodeWord] {
        &self.nodes
    }

    /// The bottom boundary array: inclusive right boundary per leaf slot.
    pub fn leaf_boundaries(&self) -> &[u32] {
        &self.lr
    }

    /// Storage-order -> original-order permutation.
    pub fn permutation(&self) -> &[u32] {
        &self.perm
    }

    /// The reordered point storage.
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// The codec the tree was built with.
    pub fn quantizer(&self) -> &Quantizer {
        &self.quant
    }

    /// The domain the tree was built over.
    pub fn bounds(&self) -> Bounds {
        self.quant.bounds()
    }

    /// Inclusive `[left, right]` point range owned by leaf slot `k`.
    /// Empty leaves come back as `left == right + 1`.
    #[inline]
    fn leaf_range(&self, k: usize) -> (usize, usize) {
        let left = if k == 0 {
            0
        } else {
            self.lr[k - 1] as usize + 1
        };
        (left, self.lr[k] as usize)
    }

    /// Split one node's point range and encode the result.
    ///
    /// Returns the packed word and the final boundary: every point left of
    /// the boundary encodes strictly below the stored split location, every
    /// point at or right of it encodes at or above. The split value is the
    /// quantized median rounded down to the representable lattice, with two
    /// degenerate escapes: if rounding would empty the left side, the split
    /// moves just above the lowest occupied lattice cell; if the whole range
    /// shares one cell, the right child goes empty instead. Empty ranges
    /// therefore only ever appear as right children, so an inclusive `u32`
    /// boundary never underflows.
    fn split_range(
        points: &mut PointSet,
        perm: &mut [u32],
        quant: &Quantizer,
        left: usize,
        right: usize,
    ) -> (NodeWord, usize) {
        if left > right {
            // Empty range: both children stay empty.
            return (NodeWord::pack(0, 0), left);
        }
        let dim = if right > left {
            partition::widest_dim(points, left, right)
        } else {
            0
        };
        if right == left {
            let q = quant.encode_unchecked(points.coord(left, dim));
            return (NodeWord::pack(dim, lattice_above(q)), right + 1);
        }

        let m = 1 + (left + right) / 2;
        partition::select_median(points, perm, left, right, dim, m);
        let q_median = quant.encode_unchecked(points.coord(m, dim));
        let mut loc = q_median & NodeWord::LOC_MASK;
        let mut boundary = partition::partition_below(points, perm, left, right, dim, |v| {
            quant.encode_unchecked(v) < loc
        });
        if boundary == left {
            // Rounding swallowed the whole left side. Split just above the
            // lowest occupied cell instead.
            let (lo, hi) = partition::min_max_coord(points, left, right, dim);
            let q_hi = quant.encode_unchecked(hi);
            loc = lattice_above(quant.encode_unchecked(lo));
            if loc <= q_hi {
                boundary = partition::partition_below(points, perm, left, right, dim, |v| {
                    quant.encode_unchecked(v) < loc
                });
            } else {
                // The whole range sits in one lattice cell; nothing can go
                // right of a representable split. Empty the right child.
                boundary = right + 1;
            }
        }

        if cfg!(debug_assertions) {
            for j in left..=right {
                let q = quant.encode_unchecked(points.coord(j, dim));
                if j < boundary {
                    debug_assert!(q < loc, "left side must encode below the split");
                } else {
                    debug_assert!(q >= loc, "right side must encode at or above the split");
                }
            }
        }
        (NodeWord::pack(dim, loc), boundary)
    }
}

/// Smallest representable split location strictly above `q`. Never
/// overflows: the codec saturates encodings four quanta below `u32::MAX`.
#[inline]
fn lattice_above(q: u32) -> u32 {
    debug_assert!(
        q <= u32::MAX - 4,
        "encodings saturate below the top lattice cell"
    );
    (q & NodeWord::LOC_MASK) + 4
}

impl SpatialIndex for FixedTree {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "point and node counts are checked against the 32-bit index space before building"
    )]
    fn build(points: PointSet, levels: usize, bounds: Bounds) -> Result<Self, BuildError> {
        let (ninterior, nbottom) = check_build_input(&points, levels, bounds)?;
        let npoints = points.len();
        let quant = Quantizer::new(bounds);

        let mut points = points;
        let mut perm: Vec<u32> = (0..npoints as u32).collect();
        let mut nodes = Vec::with_capacity(ninterior);

        // Right boundaries for every node slot during the build; only the
        // bottom level survives as `lr`.
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
            let (word, boundary) = Self::split_range(&mut points, &mut perm, &quant, left, right);
            nodes.push(word);
            bounds_build[2 * i + 1] = (boundary - 1) as u32;
            bounds_build[2 * i + 2] = right as u32;
        }

        let lr = bounds_build.split_off(ninterior);
        debug_assert_eq!(
            lr[nbottom - 1] as usize,
            npoints - 1,
            "last leaf boundary must close the point array"
        );
        if cfg!(debug_assertions) {
            let mut seen = vec![false; npoints];
            for &p in &perm {
                debug_assert!(!seen[p as usize], "permutation must stay a bijection");
                seen[p as usize] = true;
            }
        }

        Ok(Self {
            nodes,
            lr,
            points,
            perm,
            levels,
            quant,
        })
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "node indices fit u32 because the node count is bounded by the point count"
    )]
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
        let mut qquery = [0_u32; MAX_DIMS];
        for (d, &x) in query.iter().enumerate() {
            qquery[d] = self.quant.encode(x)?;
        }
        let mut out = SearchResults::new(ndims);
        if max_dist_sq <= 0.0 || max_dist_sq.is_nan() {
            // Strict comparison: nothing can match a non-positive threshold.
            return Ok(out);
        }
        let qradius = self.quant.quantize_distance(math::sqrt(max_dist_sq));
        let ninterior = self.nodes.len();

        let mut stack: SmallVec<[u32; 64]> = SmallVec::new();
        stack.push(0);
        while let Some(i) = stack.pop() {
            let i = i as usize;
            if i < ninterior {
                let word = self.nodes[i];
                let loc = word.split_loc();
                let q = qquery[word.split_dim()];
                let (near, far) = if q < loc {
                    (2 * i + 1, 2 * i + 2)
                } else {
                    (2 * i + 2, 2 * i + 1)
                };
                stack.push(near as u32);
                // One-axis bound: the far side can only hold matches if the
                // splitting plane itself is within the (quantized) radius.
                if q.abs_diff(loc) <= qradius {
                    stack.push(far as u32);
                }
            } else {
                let (left, right) = self.leaf_range(i - ninterior);
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
        Ok(out)
    }

    fn num_points(&self) -> usize {
        self.points.len()
    }

    fn num_dims(&self) -> usize {
        self.points.ndims()
    }

    fn num_nodes(&self) -> usize {
        self.nodes.len() + self.lr.len()
    }

    fn max_depth(&self) -> usize {
        self.levels
    }
}

impl core::fmt::Debug for FixedTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FixedTree")
            .field("num_points", &self.num_points())
            .field("num_dims", &self.num_dims())
            .field("levels", &self.levels)
            .field("bounds", &self.bounds())
            .finish_non_exhaustive()
    }
}
