// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recognised structural elements

use planread_geometry::{Polygon, Segment};
use serde::{Deserialize, Serialize};

use crate::component::{BeamComponent, Component, SourceIds, WallComponent};
use crate::span::Resolution;
use crate::types::EntityId;

/// Name given to walls without a tag
pub const UNASSIGNED: &str = "unassigned";

/// Bookkeeping shared by every element
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ElementMeta {
    pub name: String,
    pub valid: bool,
    /// Entities the element was read from
    pub sources: SourceIds,
    /// Entities written for the element by the drawing sink
    pub drawn: Vec<EntityId>,
}

impl ElementMeta {
    pub fn new(name: impl Into<String>, valid: bool, sources: SourceIds) -> Self {
        Self {
            name: name.into(),
            valid,
            sources,
            drawn: Vec::new(),
        }
    }
}

pub trait RecognizedElement {
    fn meta(&self) -> &ElementMeta;

    fn meta_mut(&mut self) -> &mut ElementMeta;

    fn name(&self) -> &str {
        &self.meta().name
    }

    fn is_valid(&self) -> bool {
        self.meta().valid
    }
}

/// Why a column is invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnIssue {
    NotClosed,
    Degenerate,
    MissingDetail,
    ShapeMismatch,
}

/// Where a column detail sits on the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailPlacement {
    pub detail: String,
    pub mirrored: bool,
    /// Radians
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnElement {
    pub meta: ElementMeta,
    /// Simplified outline, or the raw outline when it could not be read
    pub outline: Polygon,
    pub placement: Option<DetailPlacement>,
    pub issue: Option<ColumnIssue>,
}

impl RecognizedElement for ColumnElement {
    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}

/// A named column section drawn at enlarged scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDetail {
    pub name: String,
    /// Simplified outline as drawn (enlarged)
    pub outline: Polygon,
    pub source: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WallGeometry {
    /// Centerline and thickness from a line pair
    TwoLine(WallComponent),
    /// A wall line that found no partner
    SingleLine { line: Segment },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallElement {
    pub meta: ElementMeta,
    pub geometry: WallGeometry,
}

impl WallElement {
    pub fn centerline(&self) -> &Segment {
        match &self.geometry {
            WallGeometry::TwoLine(c) => c.centerline(),
            WallGeometry::SingleLine { line } => line,
        }
    }

    /// Thickness; zero for single-line walls.
    pub fn thickness(&self) -> f64 {
        match &self.geometry {
            WallGeometry::TwoLine(c) => c.width,
            WallGeometry::SingleLine { .. } => 0.0,
        }
    }

    /// Footprint usable as a beam support (two-line walls only).
    pub fn support(&self) -> Option<Polygon> {
        match &self.geometry {
            WallGeometry::TwoLine(c) => Some(c.strip()),
            WallGeometry::SingleLine { .. } => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.meta.name != UNASSIGNED
    }
}

impl RecognizedElement for WallElement {
    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}

/// Wall type: a tag with one thickness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallInfo {
    pub name: String,
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamElement {
    pub meta: ElementMeta,
    pub beam: BeamComponent,
    pub resolution: Resolution,
    pub round: usize,
}

impl RecognizedElement for BeamElement {
    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}
