// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes, used as cheap pre-filters before exact tests.

use serde::{Deserialize, Serialize};

use crate::point::Point2D;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds {
    pub fn new(min: Point2D, max: Point2D) -> Self {
        Self { min, max }
    }

    /// Bounds of a point set, `None` when empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2D>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = *first;
        let mut max = *first;
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Self { min, max })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2D {
        self.min.midpoint(&self.max)
    }

    /// Grows the box by `tolerance` on every side. Negative tolerances are
    /// clamped to zero.
    pub fn expanded(&self, tolerance: f64) -> Self {
        let t = tolerance.max(0.0);
        Self {
            min: Point2D::new(self.min.x - t, self.min.y - t),
            max: Point2D::new(self.max.x + t, self.max.y + t),
        }
    }

    pub fn contains_point(&self, p: &Point2D) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Anything with an axis-aligned extent.
pub trait HasBounds {
    fn bounds(&self) -> Bounds;
}

impl HasBounds for Point2D {
    fn bounds(&self) -> Bounds {
        Bounds::new(*self, *self)
    }
}

impl HasBounds for Bounds {
    fn bounds(&self) -> Bounds {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_clamps_negative_tolerance() {
        let b = Bounds::new(Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0));
        assert_eq!(b.expanded(-5.0), b);
        let e = b.expanded(2.0);
        assert!(e.contains_point(&Point2D::new(-2.0, 12.0)));
        assert!(!e.contains_point(&Point2D::new(-2.1, 5.0)));
    }

    #[test]
    fn bounds_of_points() {
        let pts = [
            Point2D::new(3.0, -1.0),
            Point2D::new(-2.0, 4.0),
            Point2D::new(0.0, 0.0),
        ];
        let b = Bounds::from_points(&pts).unwrap();
        assert_eq!(b.min, Point2D::new(-2.0, -1.0));
        assert_eq!(b.max, Point2D::new(3.0, 4.0));
        assert!(Bounds::from_points(&[]).is_none());
    }
}
