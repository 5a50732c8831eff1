// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-point quantization codec.
//!
//! Maps real coordinates bounded by a shared `(min, max)` pair onto a 32-bit
//! unsigned lattice. The mapping is lossy but monotonic: `x1 < x2` implies
//! `encode(x1) <= encode(x2)`, which is the property the integer pruning in
//! the range search depends on. Round trips are not exact; the absolute
//! error is at most half a quantum except within a few quanta of `max`,
//! where encoding saturates early (see [`Quantizer::encode`]).

use crate::error::DomainError;
use crate::math;
use crate::types::Bounds;

/// Size of the full 32-bit lattice, as a float.
const LATTICE_SPAN: f64 = 4_294_967_296.0;

/// Top of the encodable range. Saturating below `u32::MAX` keeps a
/// representable split value strictly above any encoded coordinate, which
/// the builder's degenerate-range handling requires.
const Q_MAX: u32 = u32::MAX - 4;

/// Extra quanta added to quantized radii. Absorbs the rounding of the query
/// coordinates and the saturation at the top of the domain, so the one-axis
/// integer prune can never cut off a true match.
const DIST_SLACK: u32 = 10;

/// Bidirectional mapping between bounded real coordinates and the 32-bit
/// fixed-point lattice. All dimensions share one quantum.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quantizer {
    bounds: Bounds,
    scale: f64,
    delta: f64,
}

impl Quantizer {
    /// Create a codec spanning `bounds` with quantum
    /// `delta = (max - min) / 2^32`.
    pub fn new(bounds: Bounds) -> Self {
        let scale = LATTICE_SPAN / bounds.extent();
        Self {
            bounds,
            scale,
            delta: 1.0 / scale,
        }
    }

    /// The domain this codec spans.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Width of one lattice cell.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Encode a real coordinate onto the lattice.
    ///
    /// Values outside the declared bounds are rejected, never wrapped or
    /// clamped: pruning correctness requires the encoding to be
    /// order-preserving over the declared domain. Within the domain the
    /// value is rounded to the nearest lattice point and saturated at
    /// `u32::MAX - 4`.
    pub fn encode(&self, x: f64) -> Result<u32, DomainError> {
        if !self.bounds.contains(x) {
            return Err(DomainError::OutOfBounds {
                value: x,
                min: self.bounds.min(),
                max: self.bounds.max(),
            });
        }
        Ok(self.encode_unchecked(x))
    }

    /// Encode a coordinate already known to lie within bounds.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the value is rounded, non-negative, and saturated below u32::MAX before the cast"
    )]
    #[inline]
    pub(crate) fn encode_unchecked(&self, x: f64) -> u32 {
        debug_assert!(
            self.bounds.contains(x),
            "encode_unchecked requires an in-domain coordinate"
        );
        let q = math::round((x - self.bounds.min()) * self.scale);
        if q >= f64::from(Q_MAX) { Q_MAX } else { q as u32 }
    }

    /// Map a lattice coordinate back to the real line.
    #[inline]
    pub fn decode(&self, q: u32) -> f64 {
        self.bounds.min() + f64::from(q) * self.delta
    }

    /// Conservatively quantize a real distance for integer pruning.
    ///
    /// Rounds up and adds constant slack; saturates at `u32::MAX` (which
    /// disables pruning entirely) for radii approaching the domain width.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the value is ceiled, non-negative, and range-checked before the cast"
    )]
    pub(crate) fn quantize_distance(&self, r: f64) -> u32 {
        debug_assert!(r >= 0.0, "distances are non-negative");
        let q = math::ceil(r * self.scale);
        if q >= f64::from(u32::MAX - DIST_SLACK) {
            u32::MAX
        } else {
            q as u32 + DIST_SLACK
        }
    }
}
