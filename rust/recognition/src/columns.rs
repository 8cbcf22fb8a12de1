// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Column and column-detail reading

use planread_geometry::{simplify, GeometryError, HasBounds, Polygon};
use smallvec::smallvec;
use tracing::{debug, warn};

use crate::annotation::label_for_bounds;
use crate::config::RecognitionConfig;
use crate::element::{ColumnDetail, ColumnElement, ColumnIssue, DetailPlacement, ElementMeta};
use crate::shape_match::match_profile;
use crate::types::{SourcePolygon, TextLabel};

fn simplified(polygon: &Polygon) -> Result<Polygon, ColumnIssue> {
    if !polygon.is_closed() {
        return Err(ColumnIssue::NotClosed);
    }
    simplify(polygon).ok_or_else(|| {
        let error = GeometryError::Degenerate(polygon.ring().len());
        debug!(%error, "outline rejected");
        ColumnIssue::Degenerate
    })
}

/// Reads named column details. Details that are open, degenerate or have
/// no name are skipped; the count of skipped details is returned alongside.
pub fn read_column_details(
    outlines: &[SourcePolygon],
    names: &[TextLabel],
    config: &RecognitionConfig,
) -> (Vec<ColumnDetail>, usize) {
    let mut details = Vec::new();
    let mut skipped = 0;
    for outline in outlines {
        let Ok(polygon) = simplified(&outline.polygon) else {
            skipped += 1;
            continue;
        };
        // details are drawn enlarged, so their names sit further out
        let radius = config.label_search_radius * config.column_multiple;
        match label_for_bounds(&polygon.bounds(), names, radius) {
            Some(label) => details.push(ColumnDetail {
                name: label.text.trim().to_string(),
                outline: polygon,
                source: outline.source,
            }),
            None => {
                warn!(source = %outline.source, "column detail without a name");
                skipped += 1;
            }
        }
    }
    (details, skipped)
}

/// Reads plan columns, naming each from the nearest tag and placing the
/// detail of the same name on it.
///
/// Columns stay in the result when they cannot be read; they carry
/// `valid = false` and the reason in `issue`. When no details exist at all
/// columns are read without placement.
pub fn read_columns(
    outlines: &[SourcePolygon],
    tags: &[TextLabel],
    details: &[ColumnDetail],
    config: &RecognitionConfig,
) -> Vec<ColumnElement> {
    outlines
        .iter()
        .map(|outline| read_column(outline, tags, details, config))
        .collect()
}

fn read_column(
    outline: &SourcePolygon,
    tags: &[TextLabel],
    details: &[ColumnDetail],
    config: &RecognitionConfig,
) -> ColumnElement {
    let polygon = match simplified(&outline.polygon) {
        Ok(p) => p,
        Err(issue) => {
            warn!(source = %outline.source, ?issue, "invalid column outline");
            return ColumnElement {
                meta: ElementMeta::new("", false, smallvec![outline.source]),
                outline: outline.polygon.clone(),
                placement: None,
                issue: Some(issue),
            };
        }
    };

    let name = label_for_bounds(&polygon.bounds(), tags, config.label_search_radius)
        .map(|l| l.text.trim().to_string())
        .unwrap_or_default();

    let (placement, issue) = if details.is_empty() {
        (None, None)
    } else {
        match details.iter().find(|d| d.name == name) {
            None => (None, Some(ColumnIssue::MissingDetail)),
            Some(detail) => {
                let m = match_profile(&polygon, &detail.outline, config.column_multiple, config.shape_tolerance);
                if m.matched {
                    let placement = DetailPlacement {
                        detail: detail.name.clone(),
                        mirrored: m.mirrored,
                        angle: m.angle,
                    };
                    (Some(placement), None)
                } else {
                    (None, Some(ColumnIssue::ShapeMismatch))
                }
            }
        }
    };
    if let Some(issue) = issue {
        warn!(source = %outline.source, name = %name, ?issue, "column does not match its detail");
    }

    ColumnElement {
        meta: ElementMeta::new(name, issue.is_none(), smallvec![outline.source]),
        outline: polygon,
        placement,
        issue,
    }
}
