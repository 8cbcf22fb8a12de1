// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pairing of parallel edge lines into members.
//!
//! A wall or beam is drawn as two parallel lines. Within one orientation
//! bucket each line, in input order, takes the closest parallel overlapping
//! partner whose distance lies in the accepted width band. The partner is
//! consumed; a line that finds no partner is either dropped or reported as
//! unpaired.

use planread_geometry::{centerline, overlaps_in_projection, perpendicular_distance, Orientation, Segment};
use smallvec::smallvec;
use tracing::debug;

use crate::component::SourceIds;
use crate::types::SourceLine;

/// Width band and unpaired policy for one pairing run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingOptions {
    /// Lower bound on the pair distance, exclusive
    pub min_width: f64,
    /// Upper bound on the pair distance, inclusive
    pub max_width: f64,
    /// Report unpaired lines instead of dropping them
    pub keep_unpaired: bool,
}

/// Two edge lines read as one member
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePair {
    pub first: SourceLine,
    pub second: SourceLine,
    pub centerline: Segment,
    pub width: f64,
}

impl LinePair {
    pub fn sources(&self) -> SourceIds {
        smallvec![self.first.source, self.second.source]
    }
}

/// Result of pairing one or more buckets
#[derive(Debug, Clone, Default)]
pub struct PairingOutcome {
    pub pairs: Vec<LinePair>,
    /// Lines without a partner, only filled when `keep_unpaired` is set
    pub unpaired: Vec<SourceLine>,
    /// Lines without a partner that were dropped
    pub discarded: usize,
}

impl PairingOutcome {
    fn extend(&mut self, other: PairingOutcome) {
        self.pairs.extend(other.pairs);
        self.unpaired.extend(other.unpaired);
        self.discarded += other.discarded;
    }
}

/// Lines split by orientation class
#[derive(Debug, Clone, Default)]
pub struct OrientationBuckets {
    pub horizontal: Vec<SourceLine>,
    pub vertical: Vec<SourceLine>,
    pub oblique: Vec<SourceLine>,
}

/// Splits lines into horizontal, vertical and oblique buckets, keeping the
/// input order inside each bucket.
pub fn bucket_by_orientation(lines: impl IntoIterator<Item = SourceLine>) -> OrientationBuckets {
    let mut buckets = OrientationBuckets::default();
    for line in lines {
        match line.segment.orientation() {
            Orientation::Horizontal => buckets.horizontal.push(line),
            Orientation::Vertical => buckets.vertical.push(line),
            Orientation::Oblique => buckets.oblique.push(line),
        }
    }
    buckets
}

/// Pairs the lines of one orientation bucket.
///
/// For each unmatched line `i` the partner is the unmatched `j > i` that is
/// parallel, overlaps in projection and has the smallest distance in
/// `(min_width, max_width]`. Ties keep the first `j`.
pub fn pair_lines(lines: &[SourceLine], options: &PairingOptions) -> PairingOutcome {
    let mut outcome = PairingOutcome::default();
    let mut used = vec![false; lines.len()];

    for i in 0..lines.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let a = &lines[i].segment;

        let mut best: Option<(usize, f64)> = None;
        for j in (i + 1)..lines.len() {
            if used[j] {
                continue;
            }
            let b = &lines[j].segment;
            let Some(width) = perpendicular_distance(a, b) else {
                continue;
            };
            if width <= options.min_width || width > options.max_width {
                continue;
            }
            if !overlaps_in_projection(a, b, 0.0) {
                continue;
            }
            if best.map_or(true, |(_, w)| width < w) {
                best = Some((j, width));
            }
        }

        let pair = best.and_then(|(j, width)| {
            centerline(a, &lines[j].segment).map(|line| (j, width, line))
        });
        match pair {
            Some((j, width, line)) => {
                used[j] = true;
                outcome.pairs.push(LinePair {
                    first: lines[i],
                    second: lines[j],
                    centerline: line,
                    width,
                });
            }
            None if options.keep_unpaired => outcome.unpaired.push(lines[i]),
            None => outcome.discarded += 1,
        }
    }

    outcome
}

/// Buckets `lines` by orientation and pairs each bucket.
pub fn pair_all(lines: impl IntoIterator<Item = SourceLine>, options: &PairingOptions) -> PairingOutcome {
    let buckets = bucket_by_orientation(lines);
    let mut outcome = PairingOutcome::default();
    for (label, bucket) in [
        ("horizontal", &buckets.horizontal),
        ("vertical", &buckets.vertical),
        ("oblique", &buckets.oblique),
    ] {
        let part = pair_lines(bucket, options);
        debug!(
            bucket = label,
            lines = bucket.len(),
            pairs = part.pairs.len(),
            unpaired = part.unpaired.len() + part.discarded,
            "paired bucket"
        );
        outcome.extend(part);
    }
    outcome
}
