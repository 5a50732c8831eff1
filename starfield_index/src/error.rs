// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types returned by tree construction and queries.

use thiserror::Error;

/// A coordinate fell outside the declared domain, or a query did not match
/// the index shape.
///
/// Raised at build or query quantization time. Out-of-domain values are
/// rejected rather than clamped: the integer pruning in the search relies on
/// the codec being order-preserving over the declared bounds.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    /// A coordinate lies outside `[min, max]`.
    #[error("coordinate {value} outside declared bounds [{min}, {max}]")]
    OutOfBounds {
        /// The offending coordinate.
        value: f64,
        /// Lower bound of the declared domain.
        min: f64,
        /// Upper bound of the declared domain.
        max: f64,
    },
    /// A query point's dimensionality does not match the tree's.
    #[error("query has {actual} dimensions, index has {expected}")]
    DimensionMismatch {
        /// Dimensionality the tree was built with.
        expected: usize,
        /// Dimensionality of the query point.
        actual: usize,
    },
}

/// Tree construction was rejected before any mutation took place.
///
/// Build is all-or-nothing: no partially constructed tree is ever returned
/// and the input permutation is untouched on error.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BuildError {
    /// `levels` must be at least 1.
    #[error("tree depth must be at least 1 level")]
    ZeroLevels,
    /// Not enough points to fill the requested depth (`2^levels - 1` needed).
    #[error("{npoints} points cannot fill {levels} levels")]
    TooFewPoints {
        /// Points supplied.
        npoints: usize,
        /// Levels requested.
        levels: usize,
    },
    /// Dimensionality outside the supported `1..=4` range.
    #[error("point dimension {ndims} outside supported range 1..=4")]
    UnsupportedDims {
        /// Dimensionality supplied.
        ndims: usize,
    },
    /// Flat coordinate buffer length is not a multiple of the dimensionality.
    #[error("data length {len} is not a multiple of {ndims} dimensions")]
    RaggedData {
        /// Buffer length supplied.
        len: usize,
        /// Dimensionality supplied.
        ndims: usize,
    },
    /// More points than the 32-bit permutation/boundary indices can address.
    #[error("point count {npoints} exceeds the 32-bit index space")]
    TooManyPoints {
        /// Points supplied.
        npoints: usize,
    },
    /// Bounds endpoints must be finite with `min < max`.
    #[error("invalid bounds: min {min} must be finite and below max {max}")]
    InvalidBounds {
        /// Lower endpoint supplied.
        min: f64,
        /// Upper endpoint supplied.
        max: f64,
    },
    /// An input coordinate fell outside the declared bounds.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
