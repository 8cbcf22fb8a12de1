// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Span resolution for beam candidates.
//!
//! A beam is only real once both of its ends rest on something. Supports
//! are column outlines, wall strips and the strips of beams already
//! resolved, so resolving one beam can support the next. Resolution runs
//! in rounds:
//!
//! 1. candidates with both ends supported are final
//! 2. a candidate whose start is supported is bridged across aligned pieces
//!    to a candidate whose end is supported, provided no gap on the way is
//!    wider than a beam can cross. Candidates supported only at their end
//!    wait for a later round or the cantilever tier.
//!
//! Rounds stop when one makes no progress or the budget is spent. The
//! leftovers with one supported end are then kept as cantilevers, and a
//! last both-ends pass runs against the enlarged support set.

use planread_geometry::{bounds_contains, perpendicular_distance, Point2D, Polygon, Segment};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotation::{associate_dimension_labels, LabelAssociation};
use crate::component::{BeamComponent, Component};
use crate::config::RecognitionConfig;
use crate::pool::{CandidateKey, CandidatePool};
use crate::types::TextLabel;

/// Tolerances and budget for span resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanOptions {
    /// Slack around supports when testing an endpoint
    pub support_tolerance: f64,
    /// Widest gap a bridge may cross, before `support_tolerance` is added
    pub beam_max_width: f64,
    /// Perpendicular offset under which two pieces lie on one line
    pub alignment_tolerance: f64,
    pub max_rounds: usize,
}

impl SpanOptions {
    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self {
            support_tolerance: config.support_tolerance(),
            beam_max_width: config.beam_max_width,
            alignment_tolerance: config.alignment_tolerance,
            max_rounds: config.max_span_rounds,
        }
    }
}

/// How a beam got resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Both ends on supports
    BothEnds,
    /// Joined from `pieces` aligned candidates
    Bridged { pieces: usize },
    /// One end supported, other end free
    Cantilever,
    /// Both ends supported once cantilevers were added
    FinalPass,
}

/// A finalized beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBeam {
    pub beam: BeamComponent,
    pub resolution: Resolution,
    /// Round that finalized the beam; cantilevers and the final pass use
    /// the round after the last one run
    pub round: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SpanResolution {
    pub beams: Vec<ResolvedBeam>,
    /// Candidates with no supported end
    pub unresolved: Vec<BeamComponent>,
    pub rounds: usize,
    pub labels: LabelAssociation,
}

struct Bridge {
    line: Segment,
    consumed: Vec<CandidateKey>,
}

/// Resolves beam candidates against a fixed set of column and wall supports
pub struct SpanResolver<'a> {
    options: SpanOptions,
    columns: &'a [Polygon],
    walls: &'a [Polygon],
}

impl<'a> SpanResolver<'a> {
    pub fn new(options: SpanOptions, columns: &'a [Polygon], walls: &'a [Polygon]) -> Self {
        Self {
            options,
            columns,
            walls,
        }
    }

    /// Runs every round, the cantilever tier and the final pass, then sizes
    /// the resolved beams from `labels`.
    pub fn resolve(&self, candidates: Vec<BeamComponent>, labels: &[TextLabel]) -> SpanResolution {
        let mut pool: CandidatePool<BeamComponent> = candidates
            .into_iter()
            .map(|mut b| {
                b.centerline = b.centerline.normalized();
                b
            })
            .collect();
        let mut finalized: Vec<ResolvedBeam> = Vec::new();
        let mut rounds = 0;

        while rounds < self.options.max_rounds && !pool.is_empty() {
            rounds += 1;
            let supports = self.supports(&finalized);
            let settled = self.settle_supported(&mut pool, &supports, &mut finalized, rounds, Resolution::BothEnds);
            let bridged = self.bridge_gaps(&mut pool, &supports, &mut finalized, rounds);
            debug!(
                round = rounds,
                settled,
                bridged,
                remaining = pool.len(),
                "span round"
            );
            if settled + bridged == 0 {
                break;
            }
        }

        // Tier 3
        let last = rounds + 1;
        let supports = self.supports(&finalized);
        let mut cantilevers = 0;
        for key in pool.keys() {
            let one_end = pool.get(key).map_or(false, |b| {
                self.is_supported(&b.centerline.start, &supports)
                    || self.is_supported(&b.centerline.end, &supports)
            });
            if !one_end {
                continue;
            }
            if let Some(beam) = pool.remove(key) {
                finalized.push(ResolvedBeam {
                    beam,
                    resolution: Resolution::Cantilever,
                    round: last,
                });
                cantilevers += 1;
            }
        }
        let supports = self.supports(&finalized);
        let late = self.settle_supported(&mut pool, &supports, &mut finalized, last, Resolution::FinalPass);

        let labels = associate_dimension_labels(
            finalized.iter_mut().map(|r| &mut r.beam),
            labels,
            self.options.alignment_tolerance,
        );

        debug!(
            rounds,
            resolved = finalized.len(),
            cantilevers,
            late,
            unresolved = pool.len(),
            labels_applied = labels.applied,
            labels_unmatched = labels.unmatched,
            "span resolution finished"
        );

        SpanResolution {
            beams: finalized,
            unresolved: pool.into_vec(),
            rounds,
            labels,
        }
    }

    fn supports(&self, finalized: &[ResolvedBeam]) -> Vec<Polygon> {
        self.columns
            .iter()
            .chain(self.walls.iter())
            .cloned()
            .chain(finalized.iter().map(|r| r.beam.strip()))
            .collect()
    }

    fn is_supported(&self, p: &Point2D, supports: &[Polygon]) -> bool {
        supports
            .iter()
            .any(|s| bounds_contains(p, s, self.options.support_tolerance))
    }

    /// Tier 1: finalizes candidates with both ends supported.
    fn settle_supported(
        &self,
        pool: &mut CandidatePool<BeamComponent>,
        supports: &[Polygon],
        finalized: &mut Vec<ResolvedBeam>,
        round: usize,
        resolution: Resolution,
    ) -> usize {
        let mut count = 0;
        for key in pool.keys() {
            let both = pool.get(key).map_or(false, |b| {
                self.is_supported(&b.centerline.start, supports)
                    && self.is_supported(&b.centerline.end, supports)
            });
            if !both {
                continue;
            }
            if let Some(beam) = pool.remove(key) {
                finalized.push(ResolvedBeam {
                    beam,
                    resolution,
                    round,
                });
                count += 1;
            }
        }
        count
    }

    /// Tier 2: bridges candidates supported at the start only.
    fn bridge_gaps(
        &self,
        pool: &mut CandidatePool<BeamComponent>,
        supports: &[Polygon],
        finalized: &mut Vec<ResolvedBeam>,
        round: usize,
    ) -> usize {
        let mut count = 0;
        for key in pool.keys() {
            let Some(candidate) = pool.get(key) else {
                continue;
            };
            if !self.is_supported(&candidate.centerline.start, supports)
                || self.is_supported(&candidate.centerline.end, supports)
            {
                continue;
            }
            let Some(bridge) = self.find_bridge(pool, key, supports) else {
                continue;
            };
            let Some(mut beam) = pool.remove(key) else {
                continue;
            };
            for piece in &bridge.consumed {
                if let Some(piece) = pool.remove(*piece) {
                    beam.absorb_sources(piece.sources());
                }
            }
            beam.set_centerline(bridge.line);
            finalized.push(ResolvedBeam {
                beam,
                resolution: Resolution::Bridged {
                    pieces: bridge.consumed.len() + 1,
                },
                round,
            });
            count += 1;
        }
        count
    }

    fn find_bridge(
        &self,
        pool: &CandidatePool<BeamComponent>,
        key: CandidateKey,
        supports: &[Polygon],
    ) -> Option<Bridge> {
        let line = pool.get(key)?.centerline;
        let class = line.orientation();
        let (c_min, gap_from) = line.projection();

        let aligned: Vec<(CandidateKey, Segment)> = pool
            .iter()
            .filter(|(k, b)| *k != key && b.orientation() == class)
            .filter(|(_, b)| {
                perpendicular_distance(&line, &b.centerline)
                    .map_or(false, |d| d <= self.options.alignment_tolerance)
            })
            .map(|(k, b)| (k, b.centerline))
            .collect();

        // Nearest aligned candidate past the free end whose end rests on a
        // support.
        let (target_key, target) = aligned
            .iter()
            .filter(|(_, s)| s.projection().0 > gap_from && self.is_supported(&s.end, supports))
            .min_by(|a, b| a.1.projection().0.total_cmp(&b.1.projection().0))?;
        let (gap_to, t_max) = target.projection();

        let mut middle: Vec<(CandidateKey, f64, f64)> = aligned
            .iter()
            .filter(|(k, _)| k != target_key)
            .map(|(k, s)| {
                let (lo, hi) = s.projection();
                (*k, lo, hi)
            })
            .filter(|(_, lo, hi)| {
                let mid = (lo + hi) / 2.0;
                mid > gap_from && mid < gap_to
            })
            .collect();
        middle.sort_by(|a, b| a.1.total_cmp(&b.1));

        let limit = self.options.beam_max_width + self.options.support_tolerance;
        let mut reached = gap_from;
        for (_, lo, hi) in &middle {
            if lo - reached > limit {
                return None;
            }
            reached = reached.max(*hi);
        }
        if gap_to - reached > limit {
            return None;
        }

        let mut consumed: Vec<CandidateKey> = middle.iter().map(|(k, _, _)| *k).collect();
        consumed.push(*target_key);
        Some(Bridge {
            line: Segment::new(line.point_at(c_min), line.point_at(t_max)),
            consumed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityId;
    use approx::assert_relative_eq;
    use smallvec::smallvec;

    fn options() -> SpanOptions {
        SpanOptions {
            support_tolerance: 150.0,
            beam_max_width: 300.0,
            alignment_tolerance: 10.0,
            max_rounds: 15,
        }
    }

    fn beam(id: u64, x1: f64, y1: f64, x2: f64, y2: f64) -> BeamComponent {
        BeamComponent::new(
            Segment::from_coords(x1, y1, x2, y2),
            200.0,
            500.0,
            smallvec![EntityId(id)],
        )
    }

    fn column(x: f64, y: f64) -> Polygon {
        Polygon::rectangle(Point2D::new(x, y), 400.0, 400.0)
    }

    #[test]
    fn test_both_ends_supported() {
        let columns = vec![column(0.0, 0.0), column(6000.0, 0.0)];
        let resolver = SpanResolver::new(options(), &columns, &[]);
        let out = resolver.resolve(vec![beam(1, 6000.0, 0.0, 0.0, 0.0)], &[]);
        assert_eq!(out.beams.len(), 1);
        assert_eq!(out.beams[0].resolution, Resolution::BothEnds);
        assert_eq!(out.beams[0].round, 1);
        // candidates are normalized on entry
        assert_relative_eq!(out.beams[0].beam.centerline.start.x, 0.0);
    }

    #[test]
    fn test_resolved_beam_supports_the_next() {
        let columns = vec![column(0.0, 0.0), column(6000.0, 0.0)];
        let resolver = SpanResolver::new(options(), &columns, &[]);
        // secondary beam framing into the middle of the main beam
        let out = resolver.resolve(
            vec![beam(1, 3000.0, 0.0, 3000.0, 4000.0), beam(2, 0.0, 0.0, 6000.0, 0.0)],
            &[],
        );
        assert!(out.unresolved.is_empty());
        let secondary = out
            .beams
            .iter()
            .find(|r| r.beam.sources[0] == EntityId(1))
            .unwrap();
        // the free end at y=4000 has no support, so it stays a cantilever
        assert_eq!(secondary.resolution, Resolution::Cantilever);
    }

    #[test]
    fn test_bridge_starts_from_supported_start() {
        let columns = vec![column(0.0, 0.0), column(5000.0, 0.0)];
        let resolver = SpanResolver::new(options(), &columns, &[]);
        // the end-supported piece comes first and waits for its partner
        let out = resolver.resolve(
            vec![beam(1, 2200.0, 0.0, 5000.0, 0.0), beam(2, 0.0, 0.0, 2000.0, 0.0)],
            &[],
        );
        assert_eq!(out.beams.len(), 1);
        let r = &out.beams[0];
        assert_eq!(r.resolution, Resolution::Bridged { pieces: 2 });
        assert_relative_eq!(r.beam.centerline.start.x, 0.0);
        assert_relative_eq!(r.beam.centerline.end.x, 5000.0);
        assert_eq!(r.beam.sources.len(), 2);
    }

    #[test]
    fn test_result_does_not_depend_on_candidate_order() {
        let columns = vec![column(0.0, 0.0), column(3000.0, 0.0)];
        let walls = vec![Polygon::rectangle(Point2D::new(1500.0, 0.0), 240.0, 2000.0)];
        let resolver = SpanResolver::new(
            SpanOptions {
                support_tolerance: 200.0,
                ..options()
            },
            &columns,
            &walls,
        );
        let t = beam(1, 0.0, 0.0, 1000.0, 0.0);
        let c1 = beam(2, 1100.0, 0.0, 1400.0, 0.0);
        let c2 = beam(3, 1900.0, 0.0, 3000.0, 0.0);

        let spans = |candidates: Vec<BeamComponent>| {
            let mut out: Vec<(f64, f64, Resolution)> = resolver
                .resolve(candidates, &[])
                .beams
                .iter()
                .map(|r| (r.beam.centerline.start.x, r.beam.centerline.end.x, r.resolution))
                .collect();
            out.sort_by(|a, b| a.0.total_cmp(&b.0));
            out
        };
        let forward = spans(vec![t.clone(), c1.clone(), c2.clone()]);
        let reverse = spans(vec![c2, c1, t]);

        assert_eq!(forward, reverse);
        // the bridge stops at the wall; the piece past it only rests on
        // the far column
        assert_eq!(
            forward,
            vec![
                (0.0, 1400.0, Resolution::Bridged { pieces: 2 }),
                (1900.0, 3000.0, Resolution::Cantilever),
            ]
        );
    }

    #[test]
    fn test_free_candidate_stays_unresolved() {
        let columns = vec![column(0.0, 0.0)];
        let resolver = SpanResolver::new(options(), &columns, &[]);
        let out = resolver.resolve(vec![beam(1, 2000.0, 2000.0, 4000.0, 2000.0)], &[]);
        assert!(out.beams.is_empty());
        assert_eq!(out.unresolved.len(), 1);
        assert_eq!(out.rounds, 1);
    }

    #[test]
    fn test_round_budget() {
        let columns = vec![column(0.0, 0.0), column(3000.0, 0.0)];
        let resolver = SpanResolver::new(
            SpanOptions {
                max_rounds: 1,
                ..options()
            },
            &columns,
            &[],
        );
        let out = resolver.resolve(vec![beam(1, 0.0, 0.0, 3000.0, 0.0)], &[]);
        assert_eq!(out.rounds, 1);
        assert_eq!(out.beams.len(), 1);
    }
}
