// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property tests for the geometry kernel invariants.

use planread_geometry::{
    centerline, perpendicular_distance, point_in_polygon, Containment, HasBounds, Point2D,
    Polygon, Segment,
};
use proptest::prelude::*;

/// Regular convex polygon with `sides` vertices.
fn regular_polygon(center: Point2D, radius: f64, sides: usize, phase: f64) -> Polygon {
    let step = std::f64::consts::TAU / sides as f64;
    Polygon::closed_from(
        (0..sides)
            .map(|i| {
                let a = phase + step * i as f64;
                Point2D::new(center.x + radius * a.cos(), center.y + radius * a.sin())
            })
            .collect(),
    )
}

/// Property: orientation does not depend on endpoint order
#[test]
fn proptest_orientation_reversal_invariant() {
    proptest!(|(x1 in -1e5f64..1e5, y1 in -1e5f64..1e5, x2 in -1e5f64..1e5, y2 in -1e5f64..1e5)| {
        let s = Segment::from_coords(x1, y1, x2, y2);
        prop_assert_eq!(s.orientation(), s.reversed().orientation());
    });
}

/// Property: points outside the bounding box are outside the polygon
#[test]
fn proptest_outside_bounds_is_outside() {
    proptest!(|(
        cx in -1e4f64..1e4,
        cy in -1e4f64..1e4,
        radius in 10f64..2000.0,
        sides in 3usize..12,
        phase in 0f64..6.28,
        dx in 1f64..5000.0,
        dy in -5000f64..5000.0
    )| {
        let poly = regular_polygon(Point2D::new(cx, cy), radius, sides, phase);
        let b = poly.bounds();
        let p = Point2D::new(b.max.x + dx, cy + dy);
        prop_assert_eq!(point_in_polygon(&p, &poly).unwrap(), Containment::Outside);
    });
}

/// Property: the centroid of a convex polygon is inside it
#[test]
fn proptest_convex_centroid_is_inside() {
    proptest!(|(
        cx in -1e4f64..1e4,
        cy in -1e4f64..1e4,
        radius in 10f64..2000.0,
        sides in 3usize..12,
        phase in 0f64..6.28
    )| {
        let poly = regular_polygon(Point2D::new(cx, cy), radius, sides, phase);
        let ring = poly.ring();
        let n = ring.len() as f64;
        let centroid = Point2D::new(
            ring.iter().map(|p| p.x).sum::<f64>() / n,
            ring.iter().map(|p| p.y).sum::<f64>() / n,
        );
        prop_assert_eq!(point_in_polygon(&centroid, &poly).unwrap(), Containment::Inside);
    });
}

/// Property: the centerline of two offset horizontal lines sits half way
#[test]
fn proptest_centerline_is_half_way() {
    proptest!(|(
        y in -1e4f64..1e4,
        width in 141f64..600.0,
        x0 in -1e4f64..1e4,
        len in 200f64..8000.0
    )| {
        let a = Segment::from_coords(x0, y, x0 + len, y);
        let b = Segment::from_coords(x0 + len, y + width, x0, y + width);
        let d = perpendicular_distance(&a, &b).unwrap();
        prop_assert!((d - width).abs() < 1e-6);
        let c = centerline(&a, &b).unwrap();
        prop_assert!((c.start.y - (y + width / 2.0)).abs() < 1e-6);
        prop_assert!((c.length() - len).abs() < 1e-6);
    });
}
