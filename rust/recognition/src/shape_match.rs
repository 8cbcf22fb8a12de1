// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Matching of plan column outlines against enlarged column details.
//!
//! Details are drawn at a multiple of plan scale and in a canonical pose. To
//! place a detail the matcher shrinks it back to plan scale, then tries the
//! eight poses made of four quarter turns with and without a mirror. The
//! quarter turns are offset by the difference between the first-edge angles
//! of both outlines, so skewed columns match too.

use std::f64::consts::{FRAC_PI_2, TAU};

use planread_geometry::{compare_polyline, Polygon};
use serde::{Deserialize, Serialize};

/// Pose under which a detail reproduces a plan outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeMatch {
    pub matched: bool,
    pub mirrored: bool,
    /// Counter-clockwise rotation in radians, `[0, 2π)`
    pub angle: f64,
}

impl ShapeMatch {
    pub fn no_match() -> Self {
        Self {
            matched: false,
            mirrored: false,
            angle: 0.0,
        }
    }
}

/// The eight `(mirrored, angle)` poses tried for a plan/detail pair, in
/// trial order.
pub fn candidate_poses(plan: &Polygon, detail: &Polygon) -> [(bool, f64); 8] {
    let theta = plan.original_angle();
    let theta_d = detail.original_angle();
    let mut poses = [(false, 0.0); 8];
    for k in 0..4 {
        let quarter = k as f64 * FRAC_PI_2;
        poses[k] = (false, (quarter + theta - theta_d).rem_euclid(TAU));
        poses[k + 4] = (true, (quarter + FRAC_PI_2 - theta - theta_d).rem_euclid(TAU));
    }
    poses
}

/// `detail` at plan scale in the given pose. The mirror is applied after
/// the rotation, across the vertical line through the bounds center.
pub fn posed_detail(detail: &Polygon, multiple: f64, mirrored: bool, angle: f64) -> Polygon {
    let center = detail.center();
    let posed = detail
        .scaled_about(&center, 1.0 / multiple)
        .rotated_about(&center, angle);
    if mirrored {
        posed.mirrored_about(&center)
    } else {
        posed
    }
}

/// Finds the first pose under which `detail`, drawn at `multiple` times
/// plan scale, matches `plan` within `tolerance`.
pub fn match_profile(plan: &Polygon, detail: &Polygon, multiple: f64, tolerance: f64) -> ShapeMatch {
    if !(multiple.is_finite() && multiple > 0.0) {
        return ShapeMatch::no_match();
    }
    candidate_poses(plan, detail)
        .into_iter()
        .find(|&(mirrored, angle)| {
            compare_polyline(plan, &posed_detail(detail, multiple, mirrored, angle), tolerance)
        })
        .map(|(mirrored, angle)| ShapeMatch {
            matched: true,
            mirrored,
            angle,
        })
        .unwrap_or_else(ShapeMatch::no_match)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use planread_geometry::Point2D;

    fn l_shape(scale: f64) -> Polygon {
        Polygon::closed_from(
            [
                (0.0, 0.0),
                (600.0, 0.0),
                (600.0, 200.0),
                (200.0, 200.0),
                (200.0, 500.0),
                (0.0, 500.0),
            ]
            .iter()
            .map(|&(x, y)| Point2D::new(x * scale, y * scale))
            .collect(),
        )
    }

    #[test]
    fn test_identity_pose() {
        let m = match_profile(&l_shape(1.0), &l_shape(5.0), 5.0, 1.0);
        assert!(m.matched);
        assert!(!m.mirrored);
        assert_relative_eq!(m.angle, 0.0);
    }

    #[test]
    fn test_quarter_turn() {
        let detail = l_shape(5.0);
        let plan = l_shape(1.0)
            .rotated_about(&Point2D::new(1000.0, 1000.0), FRAC_PI_2)
            .translated(&planread_geometry::Vector2::new(4000.0, -200.0));
        let m = match_profile(&plan, &detail, 5.0, 1.0);
        assert!(m.matched);
        assert!(!m.mirrored);
        assert_relative_eq!(m.angle, FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_mirrored_pose() {
        let detail = l_shape(5.0);
        let plan = l_shape(1.0).mirrored_about(&Point2D::new(300.0, 0.0));
        let m = match_profile(&plan, &detail, 5.0, 1.0);
        assert!(m.matched);
        assert!(m.mirrored);
        let posed = posed_detail(&detail, 5.0, m.mirrored, m.angle);
        assert!(compare_polyline(&plan, &posed, 1.0));
    }

    #[test]
    fn test_size_mismatch() {
        let m = match_profile(&l_shape(1.0), &l_shape(4.0), 5.0, 1.0);
        assert_eq!(m, ShapeMatch::no_match());
    }

    #[test]
    fn test_rejects_bad_multiple() {
        assert!(!match_profile(&l_shape(1.0), &l_shape(1.0), 0.0, 1.0).matched);
    }
}
