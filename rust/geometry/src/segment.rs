// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line segments and the parallel-line operations the recognition engines
//! are built on.
//!
//! Every pairing and merging decision branches on [`Orientation`], so the
//! 1° band around the axes is absorbed here once: a line drawn at 0.4° is
//! horizontal for every caller.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::bounds::{Bounds, HasBounds};
use crate::point::Point2D;
use crate::tolerance::{horizontal_slope_limit, vertical_slope_limit, EPSILON, SLOPE_TOLERANCE};

/// Orientation class of a segment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    Oblique,
}

impl Orientation {
    /// Axis used for 1-D projections: `y` for vertical lines, `x` otherwise.
    pub fn projects_on_y(&self) -> bool {
        matches!(self, Orientation::Vertical)
    }
}

/// Ordered pair of points
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2D::new(x1, y1), Point2D::new(x2, y2))
    }

    pub fn dx(&self) -> f64 {
        self.end.x - self.start.x
    }

    pub fn dy(&self) -> f64 {
        self.end.y - self.start.y
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn midpoint(&self) -> Point2D {
        self.start.midpoint(&self.end)
    }

    /// Direction angle in radians, `(-PI, PI]`.
    pub fn angle(&self) -> f64 {
        self.dy().atan2(self.dx())
    }

    /// Unit direction, `None` for zero-length segments.
    pub fn direction(&self) -> Option<Vector2<f64>> {
        let v = Vector2::new(self.dx(), self.dy());
        let n = v.norm();
        (n > EPSILON).then(|| v / n)
    }

    /// Slope `dy/dx`; infinite for segments with no x extent.
    pub fn slope(&self) -> f64 {
        let dx = self.dx();
        if dx.abs() < EPSILON {
            f64::INFINITY
        } else {
            self.dy() / dx
        }
    }

    /// Y-intercept of the supporting line. For vertical segments this is the
    /// x coordinate of the line instead.
    pub fn intercept(&self) -> f64 {
        let k = self.slope();
        if k.is_infinite() {
            self.midpoint().x
        } else {
            self.start.y - k * self.start.x
        }
    }

    pub fn orientation(&self) -> Orientation {
        let k = self.slope().abs();
        if k <= horizontal_slope_limit() {
            Orientation::Horizontal
        } else if k >= vertical_slope_limit() {
            Orientation::Vertical
        } else {
            Orientation::Oblique
        }
    }

    pub fn reversed(&self) -> Segment {
        Segment::new(self.end, self.start)
    }

    /// Coordinate of a point along this segment's projection axis.
    pub fn axis_coordinate(&self, p: &Point2D) -> f64 {
        if self.orientation().projects_on_y() {
            p.y
        } else {
            p.x
        }
    }

    /// `(min, max)` extent along the projection axis.
    pub fn projection(&self) -> (f64, f64) {
        let a = self.axis_coordinate(&self.start);
        let b = self.axis_coordinate(&self.end);
        (a.min(b), a.max(b))
    }

    /// Same segment with its start at the smaller axis coordinate.
    pub fn normalized(&self) -> Segment {
        if self.axis_coordinate(&self.end) < self.axis_coordinate(&self.start) {
            self.reversed()
        } else {
            *self
        }
    }

    /// The constant coordinate of an axis-aligned segment (midpoint `y` for
    /// horizontal, midpoint `x` for vertical), intercept otherwise.
    pub fn constant_coordinate(&self) -> f64 {
        match self.orientation() {
            Orientation::Horizontal => self.midpoint().y,
            Orientation::Vertical => self.midpoint().x,
            Orientation::Oblique => self.intercept(),
        }
    }

    /// Point on this segment's supporting line at axis coordinate `t`.
    ///
    /// Horizontal and vertical segments keep their constant coordinate.
    pub fn point_at(&self, t: f64) -> Point2D {
        match self.orientation() {
            Orientation::Horizontal => Point2D::new(t, self.midpoint().y),
            Orientation::Vertical => Point2D::new(self.midpoint().x, t),
            Orientation::Oblique => Point2D::new(t, self.slope() * t + self.intercept()),
        }
    }

    pub fn distance_to_point(&self, p: &Point2D) -> f64 {
        point_to_segment_distance(p, &self.start, &self.end)
    }
}

impl HasBounds for Segment {
    fn bounds(&self) -> Bounds {
        Bounds::new(
            Point2D::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y)),
            Point2D::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y)),
        )
    }
}

/// Orientation class of a segment, see [`Segment::orientation`].
pub fn orientation(segment: &Segment) -> Orientation {
    segment.orientation()
}

/// Perpendicular distance between two parallel segments.
///
/// Horizontal and vertical pairs compare their constant coordinates. Oblique
/// pairs are parallel only when their slopes agree within [`SLOPE_TOLERANCE`];
/// the intercept offset is then projected perpendicular to the mean slope.
/// Returns `None` when the segments are not parallel.
pub fn perpendicular_distance(a: &Segment, b: &Segment) -> Option<f64> {
    match (a.orientation(), b.orientation()) {
        (Orientation::Horizontal, Orientation::Horizontal) => {
            Some((a.midpoint().y - b.midpoint().y).abs())
        }
        (Orientation::Vertical, Orientation::Vertical) => {
            Some((a.midpoint().x - b.midpoint().x).abs())
        }
        (Orientation::Oblique, Orientation::Oblique) => {
            let (ka, kb) = (a.slope(), b.slope());
            if (ka - kb).abs() > SLOPE_TOLERANCE {
                return None;
            }
            let k = (ka + kb) / 2.0;
            Some((a.intercept() - b.intercept()).abs() / (1.0 + k * k).sqrt())
        }
        _ => None,
    }
}

/// Whether the 1-D projections of two segments overlap or touch within
/// `tolerance`. Projects on `y` when `a` is vertical, on `x` otherwise.
pub fn overlaps_in_projection(a: &Segment, b: &Segment, tolerance: f64) -> bool {
    let on_y = a.orientation().projects_on_y();
    let project = |s: &Segment| {
        let (p, q) = if on_y {
            (s.start.y, s.end.y)
        } else {
            (s.start.x, s.end.x)
        };
        (p.min(q), p.max(q))
    };
    let (amin, amax) = project(a);
    let (bmin, bmax) = project(b);
    let t = tolerance.max(0.0);
    amin <= bmax + t && bmin <= amax + t
}

/// Centerline between two parallel segments.
///
/// Axis-aligned pairs take the mean of their constant coordinates and the
/// mean of their corresponding extents. Oblique pairs project all four
/// endpoints onto the mid line and keep the extreme two. The result is
/// normalized. Returns `None` when the segments are not parallel.
pub fn centerline(a: &Segment, b: &Segment) -> Option<Segment> {
    perpendicular_distance(a, b)?;
    let line = match a.orientation() {
        Orientation::Horizontal => {
            let y = (a.midpoint().y + b.midpoint().y) / 2.0;
            let (amin, amax) = a.projection();
            let (bmin, bmax) = b.projection();
            Segment::from_coords((amin + bmin) / 2.0, y, (amax + bmax) / 2.0, y)
        }
        Orientation::Vertical => {
            let x = (a.midpoint().x + b.midpoint().x) / 2.0;
            let (amin, amax) = a.projection();
            let (bmin, bmax) = b.projection();
            Segment::from_coords(x, (amin + bmin) / 2.0, x, (amax + bmax) / 2.0)
        }
        Orientation::Oblique => {
            let k = (a.slope() + b.slope()) / 2.0;
            let c = (a.intercept() + b.intercept()) / 2.0;
            let origin = Point2D::new(0.0, c);
            let u = Vector2::new(1.0, k).normalize();
            let (mut tmin, mut tmax) = (f64::MAX, f64::MIN);
            for p in [a.start, a.end, b.start, b.end] {
                let t = origin.vector_to(&p).dot(&u);
                tmin = tmin.min(t);
                tmax = tmax.max(t);
            }
            Segment::new(origin.offset(&(u * tmin)), origin.offset(&(u * tmax)))
        }
    };
    Some(line.normalized())
}

/// Calculate distance from a point to a line segment
pub fn point_to_segment_distance(point: &Point2D, start: &Point2D, end: &Point2D) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < EPSILON {
        return point.distance_to(start);
    }

    // Project point onto line and clamp to the segment
    let t = ((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq;
    let t = t.clamp(0.0, 1.0);

    let proj = Point2D::new(start.x + t * dx, start.y + t * dy);
    point.distance_to(&proj)
}
