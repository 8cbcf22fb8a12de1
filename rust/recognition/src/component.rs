// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural components synthesised from pairs of parallel lines

use planread_geometry::{Orientation, Polygon, Segment};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::types::EntityId;

/// Entity ids a component was built from
pub type SourceIds = SmallVec<[EntityId; 4]>;

/// A member described by a centerline and a width
pub trait Component {
    fn centerline(&self) -> &Segment;

    /// Replaces the centerline (merging, span splicing).
    fn set_centerline(&mut self, centerline: Segment);

    fn width(&self) -> f64;

    fn sources(&self) -> &SourceIds;

    /// Takes over the source ids of a component merged into this one.
    fn absorb_sources(&mut self, other: &SourceIds);

    fn orientation(&self) -> Orientation {
        self.centerline().orientation()
    }

    /// Footprint of the member as a closed rectangle.
    fn strip(&self) -> Polygon {
        Polygon::strip(self.centerline(), self.width())
    }
}

fn absorb(into: &mut SourceIds, from: &SourceIds) {
    for id in from {
        if !into.contains(id) {
            into.push(*id);
        }
    }
}

/// A wall read from two parallel edge lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WallComponent {
    pub centerline: Segment,
    /// Thickness (distance between the edge lines)
    pub width: f64,
    pub sources: SourceIds,
}

impl WallComponent {
    pub fn new(centerline: Segment, width: f64, sources: SourceIds) -> Self {
        Self {
            centerline,
            width,
            sources,
        }
    }
}

impl Component for WallComponent {
    fn centerline(&self) -> &Segment {
        &self.centerline
    }

    fn set_centerline(&mut self, centerline: Segment) {
        self.centerline = centerline;
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn sources(&self) -> &SourceIds {
        &self.sources
    }

    fn absorb_sources(&mut self, other: &SourceIds) {
        absorb(&mut self.sources, other);
    }
}

/// Width and height parsed from a `"<width>x<height>"` annotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamDimensions {
    pub width: f64,
    pub height: f64,
}

impl BeamDimensions {
    /// Parses `"300x600"`, also accepting `X`, `×` and `*` as separator.
    /// Both values must be positive.
    pub fn parse(text: &str) -> Option<Self> {
        let (w, h) = text.trim().split_once(['x', 'X', '×', '*'])?;
        let width: f64 = w.trim().parse().ok()?;
        let height: f64 = h.trim().parse().ok()?;
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Some(Self { width, height })
        } else {
            None
        }
    }
}

impl std::fmt::Display for BeamDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A beam read from two parallel edge lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeamComponent {
    pub centerline: Segment,
    pub width: f64,
    pub height: f64,
    pub sources: SourceIds,
}

impl BeamComponent {
    pub fn new(centerline: Segment, width: f64, height: f64, sources: SourceIds) -> Self {
        Self {
            centerline,
            width,
            height,
            sources,
        }
    }

    pub fn dimensions(&self) -> BeamDimensions {
        BeamDimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// The `"<width>x<height>"` text drawn next to the beam.
    pub fn in_place_annotation(&self) -> String {
        self.dimensions().to_string()
    }

    /// Overwrites width and height from an annotation. Returns false and
    /// leaves the beam untouched when the text does not parse.
    pub fn set_in_place_annotation(&mut self, text: &str) -> bool {
        match BeamDimensions::parse(text) {
            Some(dims) => {
                self.width = dims.width;
                self.height = dims.height;
                true
            }
            None => false,
        }
    }
}

impl Component for BeamComponent {
    fn centerline(&self) -> &Segment {
        &self.centerline
    }

    fn set_centerline(&mut self, centerline: Segment) {
        self.centerline = centerline;
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn sources(&self) -> &SourceIds {
        &self.sources
    }

    fn absorb_sources(&mut self, other: &SourceIds) {
        absorb(&mut self.sources, other);
    }
}
