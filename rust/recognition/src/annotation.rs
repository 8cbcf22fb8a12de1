// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Association of drawing texts with recognised elements: tags that name
//! columns and walls, and dimension labels that size beams.

use planread_geometry::{Bounds, Orientation, Point2D, Segment};

use crate::component::{BeamComponent, BeamDimensions};
use crate::types::TextLabel;

fn nearest_within<'a, F>(labels: &'a [TextLabel], radius: f64, distance: F) -> Option<&'a TextLabel>
where
    F: Fn(&Point2D) -> f64,
{
    labels
        .iter()
        .filter(|l| !l.text.trim().is_empty())
        .map(|l| (l, distance(&l.position)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(l, _)| l)
}

fn distance_to_bounds(bounds: &Bounds, p: &Point2D) -> f64 {
    let dx = (bounds.min.x - p.x).max(p.x - bounds.max.x).max(0.0);
    let dy = (bounds.min.y - p.y).max(p.y - bounds.max.y).max(0.0);
    (dx * dx + dy * dy).sqrt()
}

/// Tag for an outline: text inside the bounds wins (closest to the center),
/// otherwise the text nearest to the bounds within `radius`.
pub fn label_for_bounds<'a>(bounds: &Bounds, labels: &'a [TextLabel], radius: f64) -> Option<&'a TextLabel> {
    let center = bounds.center();
    let inside = labels
        .iter()
        .filter(|l| !l.text.trim().is_empty() && bounds.contains_point(&l.position))
        .min_by(|a, b| {
            a.position
                .distance_to(&center)
                .total_cmp(&b.position.distance_to(&center))
        });
    inside.or_else(|| nearest_within(labels, radius, |p| distance_to_bounds(bounds, p)))
}

/// Tag nearest to a centerline within `radius`.
pub fn label_for_segment<'a>(segment: &Segment, labels: &'a [TextLabel], radius: f64) -> Option<&'a TextLabel> {
    nearest_within(labels, radius, |p| segment.distance_to_point(p))
}

/// Counts from a dimension-label pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelAssociation {
    /// Labels whose dimensions were written to a beam
    pub applied: usize,
    /// Labels that did not parse or found no beam
    pub unmatched: usize,
}

/// Writes `"<w>x<h>"` labels onto the beams they describe.
///
/// A horizontal label sizes the nearest horizontal beam above it, a
/// vertical label the nearest vertical beam to its left, and an oblique
/// label the nearest oblique beam, however far away. `side_tolerance` lets
/// a beam sit slightly on the wrong side of the insertion point.
pub fn associate_dimension_labels<'a, I>(
    beams: I,
    labels: &[TextLabel],
    side_tolerance: f64,
) -> LabelAssociation
where
    I: IntoIterator<Item = &'a mut BeamComponent>,
{
    let mut beams: Vec<&mut BeamComponent> = beams.into_iter().collect();
    let mut counts = LabelAssociation::default();

    for label in labels {
        if BeamDimensions::parse(&label.text).is_none() {
            counts.unmatched += 1;
            continue;
        }
        let class = label.orientation();
        let at = label.position;

        let nearest = beams
            .iter()
            .enumerate()
            .filter(|(_, b)| b.centerline.orientation() == class)
            .filter(|(_, b)| match class {
                Orientation::Horizontal => b.centerline.constant_coordinate() >= at.y - side_tolerance,
                // 270° text counts as vertical too and still looks left
                Orientation::Vertical => b.centerline.constant_coordinate() <= at.x + side_tolerance,
                Orientation::Oblique => true,
            })
            .map(|(i, b)| (i, b.centerline.distance_to_point(&at)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);

        let applied = match nearest {
            Some(i) => beams[i].set_in_place_annotation(&label.text),
            None => false,
        };
        if applied {
            counts.applied += 1;
        } else {
            counts.unmatched += 1;
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityId;
    use smallvec::smallvec;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn beam(x1: f64, y1: f64, x2: f64, y2: f64) -> BeamComponent {
        BeamComponent::new(
            Segment::from_coords(x1, y1, x2, y2),
            200.0,
            500.0,
            smallvec![EntityId(1)],
        )
    }

    #[test]
    fn test_horizontal_label_sizes_beam_above() {
        let mut beams = vec![beam(0.0, 0.0, 3000.0, 0.0), beam(0.0, -400.0, 3000.0, -400.0)];
        let labels = vec![TextLabel::new(Point2D::new(1200.0, -150.0), "300x600")];
        let counts = associate_dimension_labels(beams.iter_mut(), &labels, 10.0);
        assert_eq!(counts, LabelAssociation { applied: 1, unmatched: 0 });
        assert_eq!(beams[0].in_place_annotation(), "300x600");
        // the closer beam below the label is untouched
        assert_eq!(beams[1].width, 200.0);
    }

    #[test]
    fn test_vertical_label_sizes_beam_to_its_left() {
        let mut beams = vec![beam(0.0, 0.0, 0.0, 3000.0), beam(500.0, 0.0, 500.0, 3000.0)];
        let labels =
            vec![TextLabel::new(Point2D::new(150.0, 1000.0), "250x700").with_rotation(FRAC_PI_2)];
        let counts = associate_dimension_labels(beams.iter_mut(), &labels, 10.0);
        assert_eq!(counts.applied, 1);
        assert_eq!(beams[0].width, 250.0);
        assert_eq!(beams[0].height, 700.0);
        assert_eq!(beams[1].width, 200.0);
    }

    #[test]
    fn test_label_far_below_its_beam() {
        let mut beams = vec![beam(0.0, 0.0, 3000.0, 0.0)];
        let labels = vec![TextLabel::new(Point2D::new(1500.0, -1600.0), "300x600")];
        let counts = associate_dimension_labels(beams.iter_mut(), &labels, 10.0);
        assert_eq!(counts, LabelAssociation { applied: 1, unmatched: 0 });
        assert_eq!(beams[0].width, 300.0);
        assert_eq!(beams[0].height, 600.0);
    }

    #[test]
    fn test_oblique_label_sizes_oblique_beam() {
        let mut beams = vec![
            beam(0.0, 0.0, 3000.0, 3000.0),
            beam(0.0, 2000.0, 3000.0, 5000.0),
            beam(0.0, 1400.0, 3000.0, 1400.0),
        ];
        let labels =
            vec![TextLabel::new(Point2D::new(1500.0, 1400.0), "300x600").with_rotation(FRAC_PI_4)];
        let counts = associate_dimension_labels(beams.iter_mut(), &labels, 10.0);
        assert_eq!(counts.applied, 1);
        assert_eq!(beams[0].width, 300.0);
        assert_eq!(beams[0].height, 600.0);
        assert_eq!(beams[1].width, 200.0);
        // the horizontal beam through the insertion point is the wrong class
        assert_eq!(beams[2].width, 200.0);
    }

    #[test]
    fn test_unmatched_labels_are_counted() {
        let mut beams = vec![beam(0.0, 0.0, 3000.0, 0.0)];
        let labels = vec![
            TextLabel::new(Point2D::new(0.0, 0.0), "KL1(2)"),
            TextLabel::new(Point2D::new(1000.0, 5000.0), "300x600"),
        ];
        let counts = associate_dimension_labels(beams.iter_mut(), &labels, 10.0);
        assert_eq!(counts, LabelAssociation { applied: 0, unmatched: 2 });
    }

    #[test]
    fn test_label_inside_bounds_wins() {
        let bounds = Bounds::new(Point2D::new(0.0, 0.0), Point2D::new(500.0, 500.0));
        let labels = vec![
            TextLabel::new(Point2D::new(510.0, 250.0), "KZ2"),
            TextLabel::new(Point2D::new(100.0, 100.0), "KZ1"),
        ];
        assert_eq!(label_for_bounds(&bounds, &labels, 800.0).unwrap().text, "KZ1");
        assert_eq!(label_for_bounds(&bounds, &labels[..1], 800.0).unwrap().text, "KZ2");
        assert!(label_for_bounds(&bounds, &labels[..1], 5.0).is_none());
    }

    #[test]
    fn test_label_for_segment() {
        let wall = Segment::from_coords(0.0, 0.0, 3000.0, 0.0);
        let labels = vec![
            TextLabel::new(Point2D::new(1500.0, 300.0), "Q1"),
            TextLabel::new(Point2D::new(1500.0, 150.0), "Q2"),
            TextLabel::new(Point2D::new(1500.0, 100.0), "  "),
        ];
        assert_eq!(label_for_segment(&wall, &labels, 500.0).unwrap().text, "Q2");
    }
}
