// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The recognition session.
//!
//! A session owns the configuration and the results of the last run.
//! Results are published as an immutable snapshot that is replaced in one
//! step when a run completes, so readers never see a half-finished run.

use std::sync::Arc;

use planread_geometry::{Point2D, Polygon};
use tracing::{debug, info};

use crate::beams::{read_beams, BeamReading};
use crate::columns::{read_column_details, read_columns};
use crate::component::Component;
use crate::config::RecognitionConfig;
use crate::element::{BeamElement, ColumnDetail, ColumnElement, ColumnIssue, RecognizedElement, WallElement, WallGeometry, WallInfo};
use crate::error::{RecognitionError, Result};
use crate::export::{export_snapshot, ExportDocument};
use crate::report::RecognitionReport;
use crate::sink::DrawingSink;
use crate::span::Resolution;
use crate::types::{EntityKind, RawEntity, SourceLine, SourcePolygon, TextLabel};
use crate::walls::{read_walls, WallReading};

/// Source geometry sorted by role
#[derive(Debug, Clone, Default)]
pub struct ClassifiedGeometry {
    pub column_outlines: Vec<SourcePolygon>,
    pub column_tags: Vec<TextLabel>,
    pub detail_outlines: Vec<SourcePolygon>,
    pub detail_names: Vec<TextLabel>,
    pub wall_lines: Vec<SourceLine>,
    pub wall_tags: Vec<TextLabel>,
    pub beam_lines: Vec<SourceLine>,
    pub beam_labels: Vec<TextLabel>,
    /// Entities that matched no role
    pub ignored: usize,
}

/// Columns and details of one run
#[derive(Debug, Clone, Default)]
pub struct ColumnReading {
    pub columns: Vec<ColumnElement>,
    pub details: Vec<ColumnDetail>,
    pub details_skipped: usize,
}

/// Results of one run
#[derive(Debug, Clone, Default)]
pub struct RecognitionSnapshot {
    pub columns: Vec<ColumnElement>,
    pub column_details: Vec<ColumnDetail>,
    pub walls: Vec<WallElement>,
    pub wall_infos: Vec<WallInfo>,
    pub beams: Vec<BeamElement>,
    pub report: RecognitionReport,
}

impl RecognitionSnapshot {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.walls.is_empty() && self.beams.is_empty()
    }
}

pub struct RecognitionSession {
    config: RecognitionConfig,
    current: Arc<RecognitionSnapshot>,
}

impl RecognitionSession {
    pub fn new(config: RecognitionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            current: Arc::new(RecognitionSnapshot::default()),
        })
    }

    pub fn config(&self) -> &RecognitionConfig {
        &self.config
    }

    /// Drops the results of the last run.
    pub fn clear(&mut self) {
        self.current = Arc::new(RecognitionSnapshot::default());
    }

    /// Results of the last run.
    pub fn snapshot(&self) -> Arc<RecognitionSnapshot> {
        Arc::clone(&self.current)
    }

    /// Sorts entities by layer and kind. An entity on several configured
    /// layer sets is used for each role; polylines on wall and beam layers
    /// contribute their edges as lines.
    pub fn classify(&self, entities: &[RawEntity]) -> ClassifiedGeometry {
        let layers = &self.config.layers;
        let mut geometry = ClassifiedGeometry::default();

        for entity in entities {
            let layer = entity.layer.as_str();
            let mut used = false;
            match &entity.kind {
                EntityKind::Line(segment) => {
                    let line = SourceLine::new(*segment, entity.id);
                    if layers.walls.contains(layer) {
                        geometry.wall_lines.push(line);
                        used = true;
                    }
                    if layers.beams.contains(layer) {
                        geometry.beam_lines.push(line);
                        used = true;
                    }
                }
                EntityKind::Polyline(polygon) => {
                    let outline = || SourcePolygon {
                        polygon: polygon.clone(),
                        source: entity.id,
                    };
                    if layers.columns.contains(layer) {
                        geometry.column_outlines.push(outline());
                        used = true;
                    }
                    if layers.column_details.contains(layer) {
                        geometry.detail_outlines.push(outline());
                        used = true;
                    }
                    let id = entity.id;
                    let edges = || polygon.edges().into_iter().map(move |s| SourceLine::new(s, id));
                    if layers.walls.contains(layer) {
                        geometry.wall_lines.extend(edges());
                        used = true;
                    }
                    if layers.beams.contains(layer) {
                        geometry.beam_lines.extend(edges());
                        used = true;
                    }
                }
                EntityKind::Text(label) => {
                    let mut label = label.clone();
                    if label.source.is_none() {
                        label.source = Some(entity.id);
                    }
                    let targets = [
                        (&layers.column_tags, &mut geometry.column_tags),
                        (&layers.column_detail_names, &mut geometry.detail_names),
                        (&layers.wall_tags, &mut geometry.wall_tags),
                        (&layers.beam_labels, &mut geometry.beam_labels),
                    ];
                    for (set, list) in targets {
                        if set.contains(layer) {
                            list.push(label.clone());
                            used = true;
                        }
                    }
                }
            }
            if !used {
                geometry.ignored += 1;
            }
        }

        debug!(
            columns = geometry.column_outlines.len(),
            details = geometry.detail_outlines.len(),
            wall_lines = geometry.wall_lines.len(),
            beam_lines = geometry.beam_lines.len(),
            ignored = geometry.ignored,
            "classified entities"
        );
        geometry
    }

    pub fn read_columns(&self, geometry: &ClassifiedGeometry) -> ColumnReading {
        let (details, details_skipped) =
            read_column_details(&geometry.detail_outlines, &geometry.detail_names, &self.config);
        let columns = read_columns(
            &geometry.column_outlines,
            &geometry.column_tags,
            &details,
            &self.config,
        );
        ColumnReading {
            columns,
            details,
            details_skipped,
        }
    }

    pub fn read_walls(&self, geometry: &ClassifiedGeometry) -> WallReading {
        read_walls(geometry.wall_lines.clone(), &geometry.wall_tags, &self.config)
    }

    /// Reads beams, resolving spans against the columns and walls read
    /// earlier in the same run.
    pub fn read_beams(
        &self,
        geometry: &ClassifiedGeometry,
        columns: &[ColumnElement],
        walls: &[WallElement],
    ) -> BeamReading {
        // open or degenerate outlines cannot carry anything
        let column_supports: Vec<Polygon> = columns
            .iter()
            .filter(|c| !matches!(c.issue, Some(ColumnIssue::NotClosed | ColumnIssue::Degenerate)))
            .map(|c| c.outline.clone())
            .collect();
        let wall_supports: Vec<Polygon> = walls.iter().filter_map(WallElement::support).collect();
        read_beams(
            geometry.beam_lines.clone(),
            &geometry.beam_labels,
            &column_supports,
            &wall_supports,
            &self.config,
        )
    }

    /// Runs recognition over `entities` and publishes the results.
    pub fn run(&mut self, entities: &[RawEntity]) -> Result<Arc<RecognitionSnapshot>> {
        let layers = &self.config.layers;
        if layers.columns.is_empty() && layers.walls.is_empty() && layers.beams.is_empty() {
            return Err(RecognitionError::UnknownLayerSet("columns, walls or beams"));
        }

        let geometry = self.classify(entities);
        let columns = self.read_columns(&geometry);
        let walls = self.read_walls(&geometry);
        let beams = self.read_beams(&geometry, &columns.columns, &walls.walls);

        let report = RecognitionReport {
            entities: entities.len(),
            ignored: geometry.ignored,
            columns: columns.columns.len(),
            columns_invalid: columns.columns.iter().filter(|c| !c.is_valid()).count(),
            column_details: columns.details.len(),
            column_details_skipped: columns.details_skipped,
            walls: walls.walls.len(),
            walls_single_line: walls.single_line,
            walls_unassigned: walls.unassigned,
            wall_lines_discarded: walls.discarded,
            wall_types: walls.infos.len(),
            beams: beams.beams.len(),
            beams_bridged: count_resolved(&beams.beams, |r| matches!(r, Resolution::Bridged { .. })),
            beams_cantilever: count_resolved(&beams.beams, |r| matches!(r, Resolution::Cantilever)),
            beams_unresolved: beams.unresolved,
            beam_lines_discarded: beams.discarded,
            span_rounds: beams.rounds,
            labels_applied: beams.labels_applied,
            labels_unmatched: beams.labels_unmatched,
        };
        info!(
            entities = report.entities,
            columns = report.columns,
            walls = report.walls,
            beams = report.beams,
            invalid = report.columns_invalid + report.walls_single_line,
            "recognition finished"
        );

        let snapshot = RecognitionSnapshot {
            columns: columns.columns,
            column_details: columns.details,
            walls: walls.walls,
            wall_infos: walls.infos,
            beams: beams.beams,
            report,
        };
        self.current = Arc::new(snapshot);
        Ok(self.snapshot())
    }

    /// Draws the current results into `sink`, records the ids written for
    /// each element and releases the results. The returned snapshot carries
    /// the drawn ids.
    pub fn emit(&mut self, sink: &mut dyn DrawingSink) -> Arc<RecognitionSnapshot> {
        let mut snapshot = (*self.current).clone();
        let layers = &self.config.result_layers;

        for column in &mut snapshot.columns {
            let layer = if column.is_valid() {
                &layers.columns
            } else {
                &layers.invalid
            };
            let id = sink.write_polyline(layer, &column.outline);
            column.meta.drawn.push(id);
        }

        for wall in &mut snapshot.walls {
            let id = match &wall.geometry {
                WallGeometry::TwoLine(c) => sink.write_polyline(&layers.walls, &c.strip()),
                WallGeometry::SingleLine { line } => sink.write_line(&layers.invalid, line),
            };
            wall.meta.drawn.push(id);
        }

        for beam in &mut snapshot.beams {
            let outline = sink.write_polyline(&layers.beams, &beam.beam.strip());
            let line = beam.beam.centerline;
            let label = TextLabel::new(line.midpoint(), beam.beam.in_place_annotation())
                .with_rotation(upright(line.angle()));
            let text = sink.write_text(&layers.beam_labels, &label);
            beam.meta.drawn.extend([outline, text]);
        }

        let drawn: usize = snapshot.columns.iter().map(|c| c.meta.drawn.len()).sum::<usize>()
            + snapshot.walls.iter().map(|w| w.meta.drawn.len()).sum::<usize>()
            + snapshot.beams.iter().map(|b| b.meta.drawn.len()).sum::<usize>();
        info!(drawn, "emitted recognised elements");

        self.clear();
        Arc::new(snapshot)
    }

    /// Export document of the current results relative to `base`.
    pub fn export(&self, base: Point2D) -> ExportDocument {
        export_snapshot(&self.current, base, &self.config)
    }
}

fn count_resolved(beams: &[BeamElement], pred: impl Fn(&Resolution) -> bool) -> usize {
    beams.iter().filter(|b| pred(&b.resolution)).count()
}

/// Keeps text readable: rotations pointing left are turned half a turn.
fn upright(angle: f64) -> f64 {
    let a = angle.rem_euclid(std::f64::consts::TAU);
    if a > std::f64::consts::FRAC_PI_2 && a <= 3.0 * std::f64::consts::FRAC_PI_2 {
        a - std::f64::consts::PI
    } else {
        a
    }
}
