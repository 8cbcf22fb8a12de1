// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall reading: pair edge lines, merge fragments, name from tags

use rustc_hash::FxHashSet;
use smallvec::smallvec;
use tracing::{debug, warn};

use crate::annotation::label_for_segment;
use crate::component::WallComponent;
use crate::config::RecognitionConfig;
use crate::element::{ElementMeta, WallElement, WallGeometry, WallInfo, UNASSIGNED};
use crate::merge::{merge_components, MergeBudget};
use crate::pairing::{pair_all, PairingOptions};
use crate::types::{SourceLine, TextLabel};

#[derive(Debug, Clone, Default)]
pub struct WallReading {
    pub walls: Vec<WallElement>,
    pub infos: Vec<WallInfo>,
    /// Two-line walls after merging
    pub paired: usize,
    /// Unpaired lines kept as invalid placeholders
    pub single_line: usize,
    /// Unpaired lines dropped
    pub discarded: usize,
    /// Walls without a tag
    pub unassigned: usize,
}

/// Reads walls from edge lines and wall tags.
pub fn read_walls(lines: Vec<SourceLine>, tags: &[TextLabel], config: &RecognitionConfig) -> WallReading {
    let options = PairingOptions {
        min_width: config.min_pair_width,
        max_width: config.max_wall_width,
        keep_unpaired: config.keep_unpaired_as_invalid,
    };
    let pairing = pair_all(lines, &options);

    let components: Vec<WallComponent> = pairing
        .pairs
        .iter()
        .map(|p| WallComponent::new(p.centerline, p.width, p.sources()))
        .collect();
    let merged = merge_components(
        components,
        config.merge_tolerance,
        MergeBudget::Passes(config.merge_passes),
    );
    debug!(
        pairs = pairing.pairs.len(),
        walls = merged.components.len(),
        passes = merged.passes,
        converged = merged.converged,
        "merged wall fragments"
    );

    let name_for = |line: &planread_geometry::Segment| {
        label_for_segment(line, tags, config.label_search_radius)
            .map(|l| l.text.trim().to_string())
            .unwrap_or_else(|| UNASSIGNED.to_string())
    };

    let mut reading = WallReading {
        discarded: pairing.discarded,
        ..Default::default()
    };
    for component in merged.components {
        let name = name_for(&component.centerline);
        let meta = ElementMeta::new(name, true, component.sources.clone());
        reading.walls.push(WallElement {
            meta,
            geometry: WallGeometry::TwoLine(component),
        });
        reading.paired += 1;
    }
    for line in pairing.unpaired {
        let name = name_for(&line.segment);
        warn!(source = %line.source, "wall line without a partner");
        reading.walls.push(WallElement {
            meta: ElementMeta::new(name, false, smallvec![line.source]),
            geometry: WallGeometry::SingleLine { line: line.segment },
        });
        reading.single_line += 1;
    }
    reading.unassigned = reading.walls.iter().filter(|w| !w.is_assigned()).count();
    reading.infos = wall_infos(&reading.walls);
    reading
}

/// One record per distinct (name, thickness) among valid two-line walls,
/// thickness rounded to whole units, sorted by name then thickness.
pub fn wall_infos(walls: &[WallElement]) -> Vec<WallInfo> {
    let groups: FxHashSet<(String, i64)> = walls
        .iter()
        .filter(|w| w.meta.valid)
        .map(|w| (w.meta.name.clone(), w.thickness().round() as i64))
        .collect();
    let mut infos: Vec<WallInfo> = groups
        .into_iter()
        .map(|(name, thickness)| WallInfo {
            name,
            thickness: thickness as f64,
        })
        .collect();
    infos.sort_by(|a, b| a.name.cmp(&b.name).then(a.thickness.total_cmp(&b.thickness)));
    infos
}
