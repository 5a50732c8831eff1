// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared interface over the tree backends.

use crate::error::{BuildError, DomainError};
use crate::results::SearchResults;
use crate::types::{Bounds, PointSet};

/// A built, immutable spatial index answering exact radius queries.
///
/// Both tree backends implement this trait so cross-validation harnesses can
/// run one scenario against either implementation without knowing which is
/// in use. There is no mutation API: changing the data means rebuilding.
pub trait SpatialIndex: Sized {
    /// Build an index of the given depth over `points`.
    ///
    /// Consumes and reorders the point set. All-or-nothing: any precondition
    /// violation (depth, dimensionality, size, out-of-bounds coordinate)
    /// returns an error before anything is mutated.
    fn build(points: PointSet, levels: usize, bounds: Bounds) -> Result<Self, BuildError>;

    /// Every point with squared Euclidean distance *strictly* less than
    /// `max_dist_sq` from `query`, each reported once with its true
    /// coordinates, true squared distance, and original index. Order is
    /// unspecified.
    ///
    /// The query must match the tree's dimensionality and lie within its
    /// bounds.
    fn range_search(&self, query: &[f64], max_dist_sq: f64)
    -> Result<SearchResults, DomainError>;

    /// [`range_search`](Self::range_search) followed by a sort on ascending
    /// distance (ties broken by original index).
    fn range_search_sorted(
        &self,
        query: &[f64],
        max_dist_sq: f64,
    ) -> Result<SearchResults, DomainError> {
        let mut out = self.range_search(query, max_dist_sq)?;
        out.sort_by_distance();
        Ok(out)
    }

    /// Number of indexed points.
    fn num_points(&self) -> usize;

    /// Dimensionality of the indexed points.
    fn num_dims(&self) -> usize;

    /// Total node slots, `2^levels - 1`.
    fn num_nodes(&self) -> usize;

    /// Depth of the tree in levels.
    fn max_depth(&self) -> usize;
}

/// Depth heuristic for callers loading catalogs: the smallest depth whose
/// leaves hold about `target_leaf_size` points, clamped so the requested
/// depth is always buildable for `npoints`.
pub fn levels_for_leaf_size(npoints: usize, target_leaf_size: usize) -> usize {
    let target = target_leaf_size.max(1);
    let buckets = npoints.div_ceil(target).max(1);
    let mut levels = buckets.next_power_of_two().trailing_zeros() as usize + 1;
    while levels > 1 && (1_u64 << levels) - 1 > npoints as u64 {
        levels -= 1;
    }
    levels
}

/// Shape checks shared by both builders. Returns `(ninterior, nbottom)`.
///
/// The point set's dimensionality and row shape were validated at
/// construction; this adds the depth/size/bounds preconditions and the full
/// coordinate-domain scan, all before any mutation.
pub(crate) fn check_build_input(
    points: &PointSet,
    levels: usize,
    bounds: Bounds,
) -> Result<(usize, usize), BuildError> {
    let npoints = points.len();
    if levels == 0 {
        return Err(BuildError::ZeroLevels);
    }
    if npoints as u64 > u64::from(u32::MAX) {
        return Err(BuildError::TooManyPoints { npoints });
    }
    if levels > 32 || (1_u64 << levels) - 1 > npoints as u64 {
        return Err(BuildError::TooFewPoints { npoints, levels });
    }
    for i in 0..npoints {
        for d in 0..points.ndims() {
            let v = points.coord(i, d);
            if !bounds.contains(v) {
                return Err(BuildError::Domain(DomainError::OutOfBounds {
                    value: v,
                    min: bounds.min(),
                    max: bounds.max(),
                }));
            }
        }
    }
    let ninterior = (1_usize << (levels - 1)) - 1;
    let nbottom = 1_usize << (levels - 1);
    Ok((ninterior, nbottom))
}
