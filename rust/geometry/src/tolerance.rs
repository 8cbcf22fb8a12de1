// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric tolerances shared by the kernel and the recognition engines.
//!
//! CAD drawings are drawn by hand: "horizontal" lines are rarely exactly
//! horizontal and closed outlines rarely close exactly. Two families of
//! tolerances absorb that noise:
//!
//! - the **global** tolerance bounds floating point noise (coincident points,
//!   closure of polygons)
//! - the **angular** and **slope** tolerances bound drafting noise in line
//!   directions
//!
//! Distance tolerances of the recognition engines (merge offset, shape match,
//! support search) are configuration, not constants.

/// Coincidence tolerance for points (drawing units).
pub const GLOBAL_TOLERANCE: f64 = 1e-3;

/// Maximum slope difference for two oblique lines to count as parallel.
pub const SLOPE_TOLERANCE: f64 = 0.01;

/// Angular band (degrees) around the axes absorbed by orientation classification.
pub const ANGLE_TOLERANCE_DEG: f64 = 1.0;

/// Vertices closer than this to their predecessor are dropped by `simplify`.
pub const MERGE_DISTANCE: f64 = 1.0;

/// Below this magnitude a denominator is treated as zero.
pub(crate) const EPSILON: f64 = 1e-10;

/// `tan(1°)`: slopes at or below this magnitude are horizontal.
#[inline]
pub fn horizontal_slope_limit() -> f64 {
    ANGLE_TOLERANCE_DEG.to_radians().tan()
}

/// `tan(89°)`: slopes at or above this magnitude are vertical.
#[inline]
pub fn vertical_slope_limit() -> f64 {
    (90.0 - ANGLE_TOLERANCE_DEG).to_radians().tan()
}
