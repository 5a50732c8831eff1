// Copyright 2026 the Starfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree backends implementing [`SpatialIndex`](crate::SpatialIndex).

pub mod fixed;
pub mod float;

pub use fixed::FixedTree;
pub use float::FloatTree;
