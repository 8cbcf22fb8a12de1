// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export of recognised elements as a JSON document.
//!
//! Points are written as `"x,y"` strings relative to a base point picked by
//! the user, angles in degrees. Only valid elements are exported.

use planread_geometry::{HasBounds, Point2D};
use serde::{Deserialize, Serialize};

use crate::config::RecognitionConfig;
use crate::element::{RecognizedElement, WallGeometry};
use crate::error::Result;
use crate::session::RecognitionSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDetailRecord {
    pub name: String,
    /// Vertices at plan scale, relative to the detail center
    pub vertices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    pub point: String,
    pub mirrored: bool,
    /// Degrees
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallTypeRecord {
    pub name: String,
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallRecord {
    pub name: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamRecord {
    pub start: String,
    pub end: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub column_details: Vec<ColumnDetailRecord>,
    pub columns: Vec<ColumnRecord>,
    pub wall_types: Vec<WallTypeRecord>,
    pub walls: Vec<WallRecord>,
    pub beams: Vec<BeamRecord>,
}

impl ExportDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Rounds to 1e-3 and clears negative zero.
fn plain(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0 + 0.0
}

/// `"x,y"` of `p` relative to `base`.
pub fn format_point(p: &Point2D, base: &Point2D) -> String {
    let r = p.relative_to(base);
    format!("{},{}", plain(r.x), plain(r.y))
}

fn decorated(name: &str, config: &RecognitionConfig) -> String {
    format!("{}{}{}", config.name_prefix, name, config.name_postfix)
}

/// Builds the export document for `snapshot` relative to `base`.
pub fn export_snapshot(snapshot: &RecognitionSnapshot, base: Point2D, config: &RecognitionConfig) -> ExportDocument {
    let column_details = snapshot
        .column_details
        .iter()
        .map(|d| {
            let center = d.outline.bounds().center();
            let vertices = d
                .outline
                .ring()
                .iter()
                .map(|p| {
                    let r = p.relative_to(&center);
                    let real = Point2D::new(r.x / config.column_multiple, r.y / config.column_multiple);
                    format_point(&real, &Point2D::ORIGIN)
                })
                .collect();
            ColumnDetailRecord {
                name: decorated(&d.name, config),
                vertices,
            }
        })
        .collect();

    let columns = snapshot
        .columns
        .iter()
        .filter(|c| c.is_valid())
        .map(|c| {
            let (mirrored, angle) = c
                .placement
                .as_ref()
                .map_or((false, 0.0), |p| (p.mirrored, p.angle.to_degrees()));
            ColumnRecord {
                name: decorated(c.name(), config),
                point: format_point(&c.outline.center(), &base),
                mirrored,
                angle: plain(angle),
            }
        })
        .collect();

    let wall_types = snapshot
        .wall_infos
        .iter()
        .map(|w| WallTypeRecord {
            name: decorated(&w.name, config),
            thickness: w.thickness,
        })
        .collect();

    let walls = snapshot
        .walls
        .iter()
        .filter(|w| w.is_valid())
        .filter_map(|w| match &w.geometry {
            WallGeometry::TwoLine(c) => Some(WallRecord {
                name: decorated(w.name(), config),
                start: format_point(&c.centerline.start, &base),
                end: format_point(&c.centerline.end, &base),
            }),
            WallGeometry::SingleLine { .. } => None,
        })
        .collect();

    let beams = snapshot
        .beams
        .iter()
        .map(|b| BeamRecord {
            start: format_point(&b.beam.centerline.start, &base),
            end: format_point(&b.beam.centerline.end, &base),
            width: b.beam.width,
            height: b.beam.height,
        })
        .collect();

    ExportDocument {
        column_details,
        columns,
        wall_types,
        walls,
        beams,
    }
}
