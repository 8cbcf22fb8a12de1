// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for the raw drawing entities a recognition run consumes

use planread_geometry::{Bounds, HasBounds, Orientation, Point2D, Polygon, Segment, ANGLE_TOLERANCE_DEG};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Handle of an entity in the host drawing store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Free text found in the drawing (tags, names, dimension labels)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextLabel {
    /// Insertion point
    pub position: Point2D,
    pub text: String,
    /// Rotation in radians, counter-clockwise from the x axis
    #[serde(default)]
    pub rotation: f64,
    /// Entity the text was read from
    #[serde(default)]
    pub source: Option<EntityId>,
}

impl TextLabel {
    pub fn new(position: Point2D, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            rotation: 0.0,
            source: None,
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Reading direction of the text.
    ///
    /// Rotations near 0° or 180° read horizontally, near 90° or 270°
    /// vertically, anything else is oblique.
    pub fn orientation(&self) -> Orientation {
        let deg = self.rotation.to_degrees().rem_euclid(180.0);
        if deg <= ANGLE_TOLERANCE_DEG || deg >= 180.0 - ANGLE_TOLERANCE_DEG {
            Orientation::Horizontal
        } else if (deg - 90.0).abs() <= ANGLE_TOLERANCE_DEG {
            Orientation::Vertical
        } else {
            Orientation::Oblique
        }
    }
}

/// Geometry of a raw entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Line(Segment),
    Polyline(Polygon),
    Text(TextLabel),
}

/// One entity from the user-picked region of the drawing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawEntity {
    pub id: EntityId,
    pub layer: String,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl RawEntity {
    pub fn line(id: u64, layer: impl Into<String>, segment: Segment) -> Self {
        Self {
            id: EntityId(id),
            layer: layer.into(),
            kind: EntityKind::Line(segment),
        }
    }

    pub fn polyline(id: u64, layer: impl Into<String>, polygon: Polygon) -> Self {
        Self {
            id: EntityId(id),
            layer: layer.into(),
            kind: EntityKind::Polyline(polygon),
        }
    }

    pub fn text(id: u64, layer: impl Into<String>, mut label: TextLabel) -> Self {
        label.source = Some(EntityId(id));
        Self {
            id: EntityId(id),
            layer: layer.into(),
            kind: EntityKind::Text(label),
        }
    }
}

impl HasBounds for RawEntity {
    fn bounds(&self) -> Bounds {
        match &self.kind {
            EntityKind::Line(s) => s.bounds(),
            EntityKind::Polyline(p) => p.bounds(),
            EntityKind::Text(t) => t.position.bounds(),
        }
    }
}

/// A frozen copy of the entities in a picked region
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawingSnapshot {
    pub entities: Vec<RawEntity>,
}

impl DrawingSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A line segment tagged with the entity it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceLine {
    pub segment: Segment,
    pub source: EntityId,
}

impl SourceLine {
    pub fn new(segment: Segment, source: EntityId) -> Self {
        Self { segment, source }
    }
}

/// A polygon tagged with the entity it came from
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePolygon {
    pub polygon: Polygon,
    pub source: EntityId,
}
