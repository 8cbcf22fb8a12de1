// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural element recognition from 2D CAD line work
//!
//! This crate turns the raw entities of a structural drawing (lines,
//! polylines and texts sorted by layer) into columns, walls and beams:
//! 1. Classify entities by layer and kind
//! 2. Read columns from closed outlines and place their enlarged details
//! 3. Pair wall edge lines, merge the fragments, name them from tags
//! 4. Pair beam edge lines, merge, then resolve spans against supports
//! 5. Emit the elements into a drawing, or export them as JSON
//!
//! # Usage
//!
//! ```rust,ignore
//! use planread_recognition::{RecognitionConfig, RecognitionSession, DrawingSnapshot};
//!
//! let drawing = DrawingSnapshot::from_json(&json)?;
//! let mut session = RecognitionSession::new(RecognitionConfig::default())?;
//! let snapshot = session.run(&drawing.entities)?;
//! println!("{}", snapshot.report);
//! ```

pub mod annotation;
pub mod beams;
pub mod columns;
pub mod component;
pub mod config;
pub mod element;
pub mod error;
pub mod export;
pub mod merge;
pub mod pairing;
pub mod pool;
pub mod report;
pub mod session;
pub mod shape_match;
pub mod sink;
pub mod span;
pub mod types;
pub mod walls;

// Re-export commonly used types and functions
pub use component::{BeamComponent, BeamDimensions, Component, SourceIds, WallComponent};
pub use config::{LayerConfig, LayerSet, RecognitionConfig, ResultLayers};
pub use element::{
    BeamElement, ColumnDetail, ColumnElement, ColumnIssue, DetailPlacement, ElementMeta,
    RecognizedElement, WallElement, WallGeometry, WallInfo, UNASSIGNED,
};
pub use error::{RecognitionError, Result};
pub use export::{export_snapshot, ExportDocument};
pub use merge::{extend, merge_components, MergeBudget, MergeOutcome};
pub use pairing::{bucket_by_orientation, pair_all, pair_lines, LinePair, PairingOptions, PairingOutcome};
pub use report::RecognitionReport;
pub use session::{ClassifiedGeometry, RecognitionSession, RecognitionSnapshot};
pub use shape_match::{match_profile, ShapeMatch};
pub use sink::{DrawingSink, MemoryDrawing};
pub use span::{Resolution, ResolvedBeam, SpanOptions, SpanResolution, SpanResolver};
pub use types::{DrawingSnapshot, EntityId, EntityKind, RawEntity, SourceLine, SourcePolygon, TextLabel};

use std::sync::Arc;

/// Runs a one-off recognition over `entities` with `config`.
pub fn recognize(entities: &[RawEntity], config: RecognitionConfig) -> Result<Arc<RecognitionSnapshot>> {
    let mut session = RecognitionSession::new(config)?;
    session.run(entities)
}
