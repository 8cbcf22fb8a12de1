// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collinear merging of member fragments.
//!
//! Draughtsmen break a wall or beam wherever something crosses it, so one
//! member usually arrives as several collinear pieces. A merge pass joins
//! every pair that lies on the same line and overlaps or touches; passes
//! repeat until nothing changes or the budget is spent.

use planread_geometry::{overlaps_in_projection, Orientation, Segment, SLOPE_TOLERANCE};
use tracing::debug;

use crate::component::Component;
use crate::pool::CandidatePool;

/// How many merge passes may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeBudget {
    /// At most this many passes
    Passes(usize),
    /// Until a pass changes nothing
    FixedPoint,
}

impl Default for MergeBudget {
    fn default() -> Self {
        MergeBudget::Passes(5)
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutcome<T> {
    pub components: Vec<T>,
    /// Passes run, including the final pass that changed nothing
    pub passes: usize,
    /// A pass completed without merging anything
    pub converged: bool,
    /// Number of components absorbed into others
    pub merged: usize,
}

/// Joins `b` into `a` when both lie on one line.
///
/// Both must share an orientation class. Horizontal and vertical segments
/// may be offset perpendicular by at most `tolerance`; oblique segments need
/// slopes within [`SLOPE_TOLERANCE`] and intercepts within `tolerance`. The
/// projections must overlap or touch within `tolerance`. The result lies on
/// `a`'s line and spans the union of both extents.
pub fn extend(a: &Segment, b: &Segment, tolerance: f64) -> Option<Segment> {
    let class = a.orientation();
    if class != b.orientation() {
        return None;
    }
    match class {
        Orientation::Horizontal | Orientation::Vertical => {
            if (a.constant_coordinate() - b.constant_coordinate()).abs() > tolerance {
                return None;
            }
        }
        Orientation::Oblique => {
            if (a.slope() - b.slope()).abs() > SLOPE_TOLERANCE
                || (a.intercept() - b.intercept()).abs() > tolerance
            {
                return None;
            }
        }
    }
    if !overlaps_in_projection(a, b, tolerance) {
        return None;
    }

    let (amin, amax) = a.projection();
    let (bmin, bmax) = b.projection();
    let line = Segment::new(a.point_at(amin.min(bmin)), a.point_at(amax.max(bmax)));
    Some(line.normalized())
}

/// Merges collinear components.
///
/// Each pass walks every ordered pair `(i, j)`; when `j` extends `i`, `i`
/// takes the joined centerline and `j`'s source ids, and `j` leaves the
/// list. A pass that merges nothing ends the loop early.
pub fn merge_components<T: Component>(
    components: Vec<T>,
    tolerance: f64,
    budget: MergeBudget,
) -> MergeOutcome<T> {
    let mut pool: CandidatePool<T> = components.into_iter().collect();
    let mut passes = 0;
    let mut converged = false;
    let mut merged = 0;

    loop {
        if let MergeBudget::Passes(limit) = budget {
            if passes >= limit {
                break;
            }
        }
        passes += 1;

        let mut changed = false;
        let keys = pool.keys();
        for &i in &keys {
            for &j in &keys {
                if i == j || !pool.contains(i) || !pool.contains(j) {
                    continue;
                }
                let joined = match (pool.get(i), pool.get(j)) {
                    (Some(a), Some(b)) => extend(a.centerline(), b.centerline(), tolerance),
                    _ => None,
                };
                let Some(line) = joined else {
                    continue;
                };
                if let Some(absorbed) = pool.remove(j) {
                    if let Some(target) = pool.get_mut(i) {
                        target.set_centerline(line);
                        target.absorb_sources(absorbed.sources());
                    }
                    changed = true;
                    merged += 1;
                }
            }
        }

        debug!(pass = passes, remaining = pool.len(), changed, "merge pass");
        if !changed {
            converged = true;
            break;
        }
    }

    MergeOutcome {
        components: pool.into_vec(),
        passes,
        converged,
        merged,
    }
}
