// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Beam reading: pair edge lines, merge fragments, resolve spans

use planread_geometry::Polygon;
use tracing::debug;

use crate::component::BeamComponent;
use crate::config::RecognitionConfig;
use crate::element::{BeamElement, ElementMeta};
use crate::merge::{merge_components, MergeBudget};
use crate::pairing::{pair_all, PairingOptions};
use crate::span::{SpanOptions, SpanResolver};
use crate::types::{SourceLine, TextLabel};

#[derive(Debug, Clone, Default)]
pub struct BeamReading {
    pub beams: Vec<BeamElement>,
    /// Candidates with no supported end
    pub unresolved: usize,
    /// Edge lines without a partner
    pub discarded: usize,
    pub rounds: usize,
    pub labels_applied: usize,
    pub labels_unmatched: usize,
}

/// Reads beams from edge lines, resolving spans against `columns` and
/// `walls` and sizing them from dimension `labels`.
pub fn read_beams(
    lines: Vec<SourceLine>,
    labels: &[TextLabel],
    columns: &[Polygon],
    walls: &[Polygon],
    config: &RecognitionConfig,
) -> BeamReading {
    // unpaired beam lines carry no information
    let options = PairingOptions {
        min_width: config.min_pair_width,
        max_width: config.beam_max_width,
        keep_unpaired: false,
    };
    let pairing = pair_all(lines, &options);

    let candidates: Vec<BeamComponent> = pairing
        .pairs
        .iter()
        .map(|p| BeamComponent::new(p.centerline, p.width, config.default_beam_height, p.sources()))
        .collect();
    let merged = merge_components(
        candidates,
        config.merge_tolerance,
        MergeBudget::Passes(config.merge_passes),
    );
    debug!(
        pairs = pairing.pairs.len(),
        candidates = merged.components.len(),
        passes = merged.passes,
        "merged beam fragments"
    );

    let resolver = SpanResolver::new(SpanOptions::from_config(config), columns, walls);
    let resolution = resolver.resolve(merged.components, labels);

    let beams = resolution
        .beams
        .into_iter()
        .map(|r| BeamElement {
            meta: ElementMeta::new(r.beam.in_place_annotation(), true, r.beam.sources.clone()),
            beam: r.beam,
            resolution: r.resolution,
            round: r.round,
        })
        .collect();

    BeamReading {
        beams,
        unresolved: resolution.unresolved.len(),
        discarded: pairing.discarded,
        rounds: resolution.rounds,
        labels_applied: resolution.labels.applied,
        labels_unmatched: resolution.labels.unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Resolution;
    use crate::types::EntityId;
    use planread_geometry::{Point2D, Segment};

    fn line(id: u64, x1: f64, y1: f64, x2: f64, y2: f64) -> SourceLine {
        SourceLine::new(Segment::from_coords(x1, y1, x2, y2), EntityId(id))
    }

    #[test]
    fn test_beam_between_columns_with_label() {
        let columns = vec![
            Polygon::rectangle(Point2D::new(0.0, 0.0), 500.0, 500.0),
            Polygon::rectangle(Point2D::new(6000.0, 0.0), 500.0, 500.0),
        ];
        let lines = vec![
            line(1, 250.0, -150.0, 5750.0, -150.0),
            line(2, 250.0, 150.0, 5750.0, 150.0),
            // stray line with no partner
            line(3, 1000.0, 2000.0, 1800.0, 2000.0),
        ];
        let labels = vec![TextLabel::new(Point2D::new(3000.0, -400.0), "300x700")];
        let reading = read_beams(lines, &labels, &columns, &[], &RecognitionConfig::default());
        assert_eq!(reading.beams.len(), 1);
        assert_eq!(reading.discarded, 1);
        let beam = &reading.beams[0];
        assert_eq!(beam.resolution, Resolution::BothEnds);
        assert_eq!(beam.beam.width, 300.0);
        assert_eq!(beam.beam.height, 700.0);
        assert_eq!(beam.meta.name, "300x700");
        assert_eq!(reading.labels_applied, 1);
    }

    #[test]
    fn test_unlabelled_beam_keeps_defaults() {
        let walls = vec![
            Polygon::rectangle(Point2D::new(0.0, 2000.0), 240.0, 4000.0),
            Polygon::rectangle(Point2D::new(4000.0, 2000.0), 240.0, 4000.0),
        ];
        let lines = vec![
            line(1, 120.0, 1900.0, 3880.0, 1900.0),
            line(2, 120.0, 2100.0, 3880.0, 2100.0),
        ];
        let config = RecognitionConfig::default();
        let reading = read_beams(lines, &[], &[], &walls, &config);
        assert_eq!(reading.beams.len(), 1);
        assert_eq!(reading.beams[0].beam.width, 200.0);
        assert_eq!(reading.beams[0].beam.height, config.default_beam_height);
    }
}
