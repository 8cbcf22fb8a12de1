// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Points in drawing units

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::tolerance::GLOBAL_TOLERANCE;

/// A 2D point (simplified for serialization)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Vector from `self` to `other`.
    pub fn vector_to(&self, other: &Point2D) -> Vector2<f64> {
        Vector2::new(other.x - self.x, other.y - self.y)
    }

    pub fn offset(&self, v: &Vector2<f64>) -> Point2D {
        Point2D::new(self.x + v.x, self.y + v.y)
    }

    /// Coordinates relative to `base`.
    pub fn relative_to(&self, base: &Point2D) -> Point2D {
        Point2D::new(self.x - base.x, self.y - base.y)
    }

    /// True when both points coincide within `tolerance`.
    pub fn coincides(&self, other: &Point2D, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }

    /// Coincidence within the global tolerance.
    pub fn same_as(&self, other: &Point2D) -> bool {
        self.coincides(other, GLOBAL_TOLERANCE)
    }
}
