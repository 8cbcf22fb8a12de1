// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output side of a run: where recognised elements get drawn

use planread_geometry::{Polygon, Segment};

use crate::types::{DrawingSnapshot, EntityId, EntityKind, RawEntity, TextLabel};

/// A drawing store that accepts new entities and hands back their ids
pub trait DrawingSink {
    fn write_polyline(&mut self, layer: &str, polygon: &Polygon) -> EntityId;

    fn write_line(&mut self, layer: &str, segment: &Segment) -> EntityId;

    fn write_text(&mut self, layer: &str, label: &TextLabel) -> EntityId;
}

/// In-memory drawing store
#[derive(Debug, Clone, Default)]
pub struct MemoryDrawing {
    entities: Vec<RawEntity>,
    next_id: u64,
}

impl MemoryDrawing {
    /// Store whose ids start at `first_id`, so they cannot collide with the
    /// ids of the source snapshot.
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            entities: Vec::new(),
            next_id: first_id,
        }
    }

    pub fn entities(&self) -> &[RawEntity] {
        &self.entities
    }

    pub fn on_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a RawEntity> + 'a {
        self.entities.iter().filter(move |e| e.layer == layer)
    }

    pub fn into_snapshot(self) -> DrawingSnapshot {
        DrawingSnapshot {
            entities: self.entities,
        }
    }

    fn push(&mut self, layer: &str, kind: EntityKind) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(RawEntity {
            id,
            layer: layer.to_string(),
            kind,
        });
        id
    }
}

impl DrawingSink for MemoryDrawing {
    fn write_polyline(&mut self, layer: &str, polygon: &Polygon) -> EntityId {
        self.push(layer, EntityKind::Polyline(polygon.clone()))
    }

    fn write_line(&mut self, layer: &str, segment: &Segment) -> EntityId {
        self.push(layer, EntityKind::Line(*segment))
    }

    fn write_text(&mut self, layer: &str, label: &TextLabel) -> EntityId {
        let id = EntityId(self.next_id);
        let mut label = label.clone();
        label.source = Some(id);
        self.push(layer, EntityKind::Text(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planread_geometry::Point2D;

    #[test]
    fn test_ids_are_sequential() {
        let mut drawing = MemoryDrawing::starting_at(100);
        let a = drawing.write_line("A", &Segment::from_coords(0.0, 0.0, 1.0, 0.0));
        let b = drawing.write_text("B", &TextLabel::new(Point2D::new(0.0, 0.0), "x"));
        assert_eq!(a, EntityId(100));
        assert_eq!(b, EntityId(101));
        assert_eq!(drawing.on_layer("A").count(), 1);
        match &drawing.entities()[1].kind {
            EntityKind::Text(t) => assert_eq!(t.source, Some(b)),
            other => panic!("expected text, got {:?}", other),
        }
    }
}
