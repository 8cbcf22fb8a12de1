// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygons: containment, simplification, rigid transforms and comparison.
//!
//! A closed [`Polygon`] repeats its first vertex at the end. [`Polygon::ring`]
//! gives the distinct vertices; every algorithm here works on the ring.

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::bounds::{Bounds, HasBounds};
use crate::error::{GeometryError, Result};
use crate::point::Point2D;
use crate::segment::{Orientation, Segment};
use crate::tolerance::{ANGLE_TOLERANCE_DEG, EPSILON, GLOBAL_TOLERANCE, MERGE_DISTANCE, SLOPE_TOLERANCE};

/// Result of a point containment test
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Containment {
    Outside,
    OnBoundary,
    Inside,
}

/// Ordered vertex sequence, optionally closed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point2D>,
    pub closed: bool,
}

impl Polygon {
    /// Wraps vertices as given, without touching closure.
    pub fn new(vertices: Vec<Point2D>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    /// Closed polygon; the first vertex is appended when the input does not
    /// already end on it.
    pub fn closed_from(mut vertices: Vec<Point2D>) -> Self {
        if let Some(first) = vertices.first().copied() {
            let needs_closing =
                vertices.len() == 1 || !first.same_as(&vertices[vertices.len() - 1]);
            if needs_closing {
                vertices.push(first);
            }
        }
        Self {
            vertices,
            closed: true,
        }
    }

    pub fn open(vertices: Vec<Point2D>) -> Self {
        Self {
            vertices,
            closed: false,
        }
    }

    /// Axis-aligned rectangle centered on `center`.
    pub fn rectangle(center: Point2D, width: f64, height: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::closed_from(vec![
            Point2D::new(center.x - hw, center.y - hh),
            Point2D::new(center.x + hw, center.y - hh),
            Point2D::new(center.x + hw, center.y + hh),
            Point2D::new(center.x - hw, center.y + hh),
        ])
    }

    /// Rectangle of `width` around a centerline (a wall or beam strip).
    pub fn strip(centerline: &Segment, width: f64) -> Self {
        let hw = width / 2.0;
        let normal = match centerline.direction() {
            Some(d) => Vector2::new(-d.y, d.x) * hw,
            None => Vector2::new(0.0, hw),
        };
        Self::closed_from(vec![
            centerline.start.offset(&-normal),
            centerline.end.offset(&-normal),
            centerline.end.offset(&normal),
            centerline.start.offset(&normal),
        ])
    }

    /// Closed flag set and the first and last vertices coincide.
    pub fn is_closed(&self) -> bool {
        self.closed
            && self.vertices.len() >= 4
            && self.vertices[0].same_as(&self.vertices[self.vertices.len() - 1])
    }

    /// Distinct vertices (closing duplicate removed).
    pub fn ring(&self) -> &[Point2D] {
        let n = self.vertices.len();
        if self.closed && n > 1 && self.vertices[0].same_as(&self.vertices[n - 1]) {
            &self.vertices[..n - 1]
        } else {
            &self.vertices
        }
    }

    /// Edges in order; closed polygons include the wrap-around edge.
    pub fn edges(&self) -> Vec<Segment> {
        let ring = self.ring();
        let n = ring.len();
        if n < 2 {
            return Vec::new();
        }
        let count = if self.closed { n } else { n - 1 };
        (0..count)
            .map(|i| Segment::new(ring[i], ring[(i + 1) % n]))
            .collect()
    }

    pub fn center(&self) -> Point2D {
        self.bounds().center()
    }

    pub fn width(&self) -> f64 {
        self.bounds().width()
    }

    pub fn height(&self) -> f64 {
        self.bounds().height()
    }

    /// Signed area (shoelace); positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        let ring = self.ring();
        let n = ring.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += ring[i].x * ring[j].y;
            area -= ring[j].x * ring[i].y;
        }
        area * 0.5
    }

    /// Acute orientation of the first edge in radians, `[0, PI/2)`.
    ///
    /// Angles within 1° of an axis snap to zero.
    pub fn original_angle(&self) -> f64 {
        let ring = self.ring();
        if ring.len() < 2 {
            return 0.0;
        }
        let first = Segment::new(ring[0], ring[1]);
        let deg = first.angle().to_degrees().rem_euclid(90.0);
        if deg <= ANGLE_TOLERANCE_DEG || deg >= 90.0 - ANGLE_TOLERANCE_DEG {
            0.0
        } else {
            deg.to_radians()
        }
    }

    pub fn translated(&self, v: &Vector2<f64>) -> Polygon {
        self.map(|p| p.offset(v))
    }

    /// Uniform scale about `origin`.
    pub fn scaled_about(&self, origin: &Point2D, factor: f64) -> Polygon {
        self.map(|p| {
            Point2D::new(
                origin.x + (p.x - origin.x) * factor,
                origin.y + (p.y - origin.y) * factor,
            )
        })
    }

    /// Counter-clockwise rotation by `angle` radians about `origin`.
    pub fn rotated_about(&self, origin: &Point2D, angle: f64) -> Polygon {
        let rotation = Rotation2::new(angle);
        self.map(|p| {
            let v = rotation * origin.vector_to(p);
            origin.offset(&v)
        })
    }

    /// Reflection across the vertical line through `origin`.
    pub fn mirrored_about(&self, origin: &Point2D) -> Polygon {
        self.map(|p| Point2D::new(2.0 * origin.x - p.x, p.y))
    }

    fn map<F: Fn(&Point2D) -> Point2D>(&self, f: F) -> Polygon {
        Polygon {
            vertices: self.vertices.iter().map(f).collect(),
            closed: self.closed,
        }
    }
}

impl HasBounds for Polygon {
    /// Bounds of the vertices; a zero-size box at the origin when empty.
    fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.vertices)
            .unwrap_or_else(|| Bounds::new(Point2D::ORIGIN, Point2D::ORIGIN))
    }
}

// ─── Containment ────────────────────────────────────────────────────────────

/// Classifies a point against a closed polygon by summing the signed angles
/// subtended by each edge.
///
/// A total below 1° means outside, above 359° inside; anything in between,
/// or a point lying on an edge or vertex, is on the boundary.
pub fn point_in_polygon(p: &Point2D, poly: &Polygon) -> Result<Containment> {
    if !poly.is_closed() {
        return Err(GeometryError::NotClosed);
    }

    let mut total = 0.0f64;
    for edge in poly.edges() {
        if edge.distance_to_point(p) <= GLOBAL_TOLERANCE {
            return Ok(Containment::OnBoundary);
        }
        let a = p.vector_to(&edge.start);
        let b = p.vector_to(&edge.end);
        let cross = a.x * b.y - a.y * b.x;
        total += cross.atan2(a.dot(&b));
    }

    let degrees = total.to_degrees().abs();
    Ok(if degrees < ANGLE_TOLERANCE_DEG {
        Containment::Outside
    } else if degrees > 360.0 - ANGLE_TOLERANCE_DEG {
        Containment::Inside
    } else {
        Containment::OnBoundary
    })
}

/// Tolerance-aware containment.
///
/// Inside only when inside the polygon shrunk by `tolerance`, outside only
/// when outside the polygon grown by `tolerance`; the band between is the
/// boundary. The answer does not depend on the polygon's winding.
pub fn point_in_polygon_with_tolerance(
    p: &Point2D,
    poly: &Polygon,
    tolerance: f64,
) -> Result<Containment> {
    if !poly.is_closed() {
        return Err(GeometryError::NotClosed);
    }
    let t = tolerance.max(0.0);
    if t <= EPSILON {
        return point_in_polygon(p, poly);
    }

    let shrunk = offset_polygon(poly, -t);
    let shrunk_is_usable = shrunk.signed_area().signum() == poly.signed_area().signum()
        && shrunk.signed_area().abs() > EPSILON;
    if shrunk_is_usable && point_in_polygon(p, &shrunk)? == Containment::Inside {
        return Ok(Containment::Inside);
    }

    let grown = offset_polygon(poly, t);
    if point_in_polygon(p, &grown)? == Containment::Outside {
        return Ok(Containment::Outside);
    }
    Ok(Containment::OnBoundary)
}

/// Offsets every edge of a closed polygon by `distance` (positive grows it)
/// using mitered corners.
pub fn offset_polygon(poly: &Polygon, distance: f64) -> Polygon {
    let ring = poly.ring();
    let n = ring.len();
    if n < 3 {
        return poly.clone();
    }
    // Outward normal side depends on winding
    let side = if poly.signed_area() >= 0.0 { 1.0 } else { -1.0 };
    let normal = |a: &Point2D, b: &Point2D| -> Vector2<f64> {
        let d = a.vector_to(b);
        let len = d.norm();
        if len < EPSILON {
            Vector2::zeros()
        } else {
            Vector2::new(d.y, -d.x) * (side / len)
        }
    };

    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let prev = &ring[(i + n - 1) % n];
        let cur = &ring[i];
        let next = &ring[(i + 1) % n];
        let n1 = normal(prev, cur);
        let n2 = normal(cur, next);
        let denom = 1.0 + n1.dot(&n2);
        let shift = if denom.abs() < EPSILON {
            n1 * distance
        } else {
            (n1 + n2) * (distance / denom)
        };
        out.push(cur.offset(&shift));
    }
    Polygon::closed_from(out)
}

/// Bounding-box containment of `inner` in `outer`, with `outer` grown by
/// `tolerance` (clamped to zero). A cheap pre-filter for exact tests.
pub fn bounds_contains<T: HasBounds + ?Sized>(inner: &T, outer: &Polygon, tolerance: f64) -> bool {
    outer.bounds().expanded(tolerance).contains_bounds(&inner.bounds())
}

// ─── Simplification ─────────────────────────────────────────────────────────

/// Removes near-duplicate and collinear vertices.
///
/// Vertices closer than [`MERGE_DISTANCE`] to their predecessor go first,
/// then vertices collinear with both neighbours are removed until none are
/// left (closed polygons wrap around). Returns `None` when fewer than four
/// distinct vertices survive.
pub fn simplify(poly: &Polygon) -> Option<Polygon> {
    let mut ring: Vec<Point2D> = Vec::with_capacity(poly.vertices.len());
    for p in poly.ring() {
        match ring.last() {
            Some(last) if last.distance_to(p) < MERGE_DISTANCE => {}
            _ => ring.push(*p),
        }
    }
    if poly.closed && ring.len() > 1 && ring[0].distance_to(&ring[ring.len() - 1]) < MERGE_DISTANCE {
        ring.pop();
    }

    loop {
        let n = ring.len();
        if n < 3 {
            break;
        }
        let removable = (0..n).find(|&i| {
            if !poly.closed && (i == 0 || i == n - 1) {
                return false;
            }
            let prev = &ring[(i + n - 1) % n];
            let next = &ring[(i + 1) % n];
            same_slope(prev, &ring[i], next)
        });
        match removable {
            Some(i) => {
                ring.remove(i);
            }
            None => break,
        }
    }

    if ring.len() < 4 {
        return None;
    }
    Some(if poly.closed {
        Polygon::closed_from(ring)
    } else {
        Polygon::open(ring)
    })
}

/// Slope equality of `a→b` and `b→c`. Steep edges compare inverse slopes.
fn same_slope(a: &Point2D, b: &Point2D, c: &Point2D) -> bool {
    let first = Segment::new(*a, *b);
    let second = Segment::new(*b, *c);
    let (o1, o2) = (first.orientation(), second.orientation());
    if o1 != o2 {
        return false;
    }
    match o1 {
        Orientation::Vertical => {
            let inv = |s: &Segment| s.dx() / s.dy();
            (inv(&first) - inv(&second)).abs() <= SLOPE_TOLERANCE
        }
        _ => (first.slope() - second.slope()).abs() <= SLOPE_TOLERANCE,
    }
}

// ─── Comparison ─────────────────────────────────────────────────────────────

/// Shape equality up to translation.
///
/// Rejects early when width or height differ by `tolerance` or more, or when
/// the vertex counts differ. Otherwise every vertex of each polygon, taken
/// relative to its own bounds center, must have a counterpart in the other
/// within `tolerance`.
pub fn compare_polyline(a: &Polygon, b: &Polygon, tolerance: f64) -> bool {
    let (ba, bb) = (a.bounds(), b.bounds());
    if (ba.width() - bb.width()).abs() >= tolerance || (ba.height() - bb.height()).abs() >= tolerance {
        return false;
    }
    let (ra, rb) = (a.ring(), b.ring());
    if ra.len() != rb.len() {
        return false;
    }

    let centered = |ring: &[Point2D], c: Point2D| -> SmallVec<[Point2D; 8]> {
        ring.iter().map(|p| p.relative_to(&c)).collect()
    };
    let pa = centered(ra, ba.center());
    let pb = centered(rb, bb.center());

    let covered = |from: &[Point2D], into: &[Point2D]| {
        from.iter()
            .all(|p| into.iter().any(|q| p.coincides(q, tolerance)))
    };
    covered(&pa[..], &pb[..]) && covered(&pb[..], &pa[..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn square(size: f64) -> Polygon {
        Polygon::rectangle(Point2D::new(0.0, 0.0), size, size)
    }

    fn l_shape() -> Polygon {
        Polygon::closed_from(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(600.0, 0.0),
            Point2D::new(600.0, 200.0),
            Point2D::new(200.0, 200.0),
            Point2D::new(200.0, 500.0),
            Point2D::new(0.0, 500.0),
        ])
    }

    #[test]
    fn test_closed_from_appends_first_vertex() {
        let p = square(10.0);
        assert_eq!(p.vertices.len(), 5);
        assert!(p.is_closed());
        assert_eq!(p.ring().len(), 4);
        assert!(!Polygon::open(p.ring().to_vec()).is_closed());
    }

    #[test]
    fn test_point_in_polygon() {
        let p = square(100.0);
        assert_eq!(point_in_polygon(&Point2D::new(0.0, 0.0), &p).unwrap(), Containment::Inside);
        assert_eq!(point_in_polygon(&Point2D::new(80.0, 0.0), &p).unwrap(), Containment::Outside);
        assert_eq!(point_in_polygon(&Point2D::new(50.0, 10.0), &p).unwrap(), Containment::OnBoundary);
        assert_eq!(point_in_polygon(&Point2D::new(50.0, 50.0), &p).unwrap(), Containment::OnBoundary);
    }

    #[test]
    fn test_point_in_open_polygon_is_an_error() {
        let p = Polygon::open(square(100.0).ring().to_vec());
        assert!(matches!(
            point_in_polygon(&Point2D::new(0.0, 0.0), &p),
            Err(GeometryError::NotClosed)
        ));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        let l = l_shape();
        assert_eq!(point_in_polygon(&Point2D::new(100.0, 400.0), &l).unwrap(), Containment::Inside);
        assert_eq!(point_in_polygon(&Point2D::new(400.0, 400.0), &l).unwrap(), Containment::Outside);
    }

    #[test]
    fn test_tolerance_containment_ignores_winding() {
        let ccw = square(100.0);
        let cw = Polygon::closed_from(ccw.ring().iter().rev().copied().collect());
        let near = Point2D::new(51.0, 0.0);
        let inner = Point2D::new(48.0, 0.0);
        for poly in [&ccw, &cw] {
            assert_eq!(point_in_polygon_with_tolerance(&near, poly, 2.0).unwrap(), Containment::OnBoundary);
            assert_eq!(point_in_polygon_with_tolerance(&inner, poly, 1.0).unwrap(), Containment::Inside);
            assert_eq!(
                point_in_polygon_with_tolerance(&Point2D::new(60.0, 0.0), poly, 2.0).unwrap(),
                Containment::Outside
            );
        }
    }

    #[test]
    fn test_offset_square() {
        let grown = offset_polygon(&square(100.0), 10.0);
        assert_relative_eq!(grown.width(), 120.0, epsilon = 1e-9);
        let shrunk = offset_polygon(&square(100.0), -10.0);
        assert_relative_eq!(shrunk.height(), 80.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bounds_contains() {
        let outer = square(100.0);
        assert!(bounds_contains(&Point2D::new(52.0, 0.0), &outer, 5.0));
        assert!(!bounds_contains(&Point2D::new(52.0, 0.0), &outer, -5.0));
        let seg = Segment::from_coords(-40.0, 0.0, 40.0, 0.0);
        assert!(bounds_contains(&seg, &outer, 0.0));
        assert!(bounds_contains(&square(80.0), &outer, 0.0));
    }

    #[test]
    fn test_simplify_removes_collinear_and_close_vertices() {
        let noisy = Polygon::closed_from(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(250.0, 0.0),
            Point2D::new(500.0, 0.0),
            Point2D::new(500.0, 0.4),
            Point2D::new(500.0, 400.0),
            Point2D::new(0.0, 400.0),
            Point2D::new(0.0, 200.0),
        ]);
        let simple = simplify(&noisy).unwrap();
        assert_eq!(simple.ring().len(), 4);
        assert!(simple.is_closed());
        assert_relative_eq!(simple.width(), 500.0);
        assert_relative_eq!(simple.height(), 400.0);
    }

    #[test]
    fn test_simplify_degenerate_returns_none() {
        let tri = Polygon::closed_from(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(50.0, 80.0),
        ]);
        assert!(simplify(&tri).is_none());

        let sliver = Polygon::closed_from(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(200.0, 0.0),
            Point2D::new(100.0, 0.0),
        ]);
        assert!(simplify(&sliver).is_none());
    }

    #[test]
    fn test_original_angle() {
        assert_relative_eq!(square(10.0).original_angle(), 0.0);
        let rotated = square(10.0).rotated_about(&Point2D::ORIGIN, 30f64.to_radians());
        assert_relative_eq!(rotated.original_angle().to_degrees(), 30.0, epsilon = 1e-9);
        let nearly = square(10.0).rotated_about(&Point2D::ORIGIN, 0.5f64.to_radians());
        assert_relative_eq!(nearly.original_angle(), 0.0);
    }

    #[test]
    fn test_rigid_transforms() {
        let l = l_shape();
        let r = l.rotated_about(&l.center(), FRAC_PI_2);
        assert_relative_eq!(r.width(), 500.0, epsilon = 1e-9);
        assert_relative_eq!(r.height(), 600.0, epsilon = 1e-9);

        let m = l.mirrored_about(&l.center());
        assert_relative_eq!(m.width(), 600.0, epsilon = 1e-9);
        assert!(m.signed_area() < 0.0);

        let s = l.scaled_about(&Point2D::ORIGIN, 0.5);
        assert_relative_eq!(s.width(), 300.0);
    }

    #[test]
    fn test_compare_polyline() {
        let l = l_shape();
        let moved = l.translated(&Vector2::new(1000.0, -250.0));
        assert!(compare_polyline(&l, &moved, 1.0));

        let mirrored = l.mirrored_about(&l.center());
        assert!(!compare_polyline(&l, &mirrored, 1.0));

        assert!(!compare_polyline(&l, &square(500.0), 1.0));
    }

    #[test]
    fn test_strip_around_centerline() {
        let strip = Polygon::strip(&Segment::from_coords(0.0, 0.0, 1000.0, 0.0), 300.0);
        assert_relative_eq!(strip.width(), 1000.0);
        assert_relative_eq!(strip.height(), 300.0);
        assert!(strip.is_closed());
    }
}
