// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planread Geometry Kernel
//!
//! Tolerance-aware 2D primitives for reading structural drawings: segment
//! orientation and parallel-line measurements, centerlines, polygon
//! containment, vertex simplification and rigid transforms, built on
//! nalgebra.

pub mod bounds;
pub mod error;
pub mod point;
pub mod polygon;
pub mod segment;
pub mod tolerance;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Rotation2, Vector2};

pub use bounds::{Bounds, HasBounds};
pub use error::{GeometryError, Result};
pub use point::Point2D;
pub use polygon::{
    bounds_contains, compare_polyline, offset_polygon, point_in_polygon,
    point_in_polygon_with_tolerance, simplify, Containment, Polygon,
};
pub use segment::{
    centerline, orientation, overlaps_in_projection, perpendicular_distance,
    point_to_segment_distance, Orientation, Segment,
};
pub use tolerance::{ANGLE_TOLERANCE_DEG, GLOBAL_TOLERANCE, MERGE_DISTANCE, SLOPE_TOLERANCE};
