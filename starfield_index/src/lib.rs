// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=starfield_index --heading-base-level=0

//! Starfield Index: a quantized flat k-d point index for star catalogs.
//!
//! Starfield Index answers one question very fast, over millions of points:
//! which catalog points lie within distance `r` of a query point?
//!
//! - Build once over a row-major [`PointSet`] (1 to 4 dimensions), then run
//!   exact radius queries; there is no insertion or deletion after build.
//! - The production backend, [`FixedTree`], quantizes coordinates onto a
//!   32-bit lattice and packs each interior node into a single `u32`, so
//!   large trees stay cache-resident and serialize as flat blobs.
//! - Pruning uses integer arithmetic only; leaf scans recompute exact `f64`
//!   distances, so quantization never changes which points a query returns.
//! - [`FloatTree`] is the conventional unquantized reference behind the same
//!   [`SpatialIndex`] trait, used by the cross-check harnesses and benches.
//!
//! # Example
//!
//! ```rust
//! use starfield_index::{Bounds, FixedTree, PointSet, SpatialIndex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Five 2-D points on a [0, 1] domain, two levels deep.
//! let data = vec![0.1, 0.2, 0.5, 0.5, 0.9, 0.1, 0.25, 0.25, 0.75, 0.8];
//! let tree = FixedTree::build(PointSet::new(data, 2)?, 2, Bounds::new(0.0, 1.0)?)?;
//!
//! // All points strictly within sqrt(0.05) of (0.2, 0.2), nearest first.
//! let hits = tree.range_search_sorted(&[0.2, 0.2], 0.05)?;
//! assert_eq!(hits.len(), 2);
//! assert_eq!(hits.matches()[0].index, 3);
//! assert_eq!(hits.matches()[1].index, 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Choosing a backend
//!
//! - [`FixedTree`]: the point of this crate. One `u32` per interior node,
//!   integer pruning, permutation and boundary arrays sized for mmap-friendly
//!   persistence by the catalog layer. Use it unless you are debugging.
//! - [`FloatTree`]: full `f64` split planes and recursive search. Roughly
//!   twice the node memory; keep it for cross-validation and bakeoffs.
//!
//! Depth comes from the caller; [`levels_for_leaf_size`] picks one from a
//! target leaf occupancy.
//!
//! ### Float semantics
//!
//! Coordinates must be finite and inside the declared [`Bounds`]; `NaN` is
//! rejected at the domain check. Matches are reported on *strict* squared
//! distance, so a zero radius matches nothing.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod backends;
pub mod error;
mod math;
pub mod node;
mod partition;
pub mod quantize;
pub mod results;
pub mod types;

pub use backend::{SpatialIndex, levels_for_leaf_size};
pub use backends::fixed::FixedTree;
pub use backends::float::FloatTree;
pub use error::{BuildError, DomainError};
pub use node::NodeWord;
pub use quantize::Quantizer;
pub use results::{SearchMatch, SearchResults};
pub use types::{Bounds, MAX_DIMS, PointSet};
