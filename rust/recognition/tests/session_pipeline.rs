// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end runs over a small synthetic structural plan.

use planread_geometry::{Point2D, Polygon, Segment};
use planread_recognition::{
    DrawingSnapshot, MemoryDrawing, RawEntity, RecognitionConfig, RecognitionSession,
    RecognizedElement, Resolution, TextLabel, UNASSIGNED,
};

/// Two columns joined by a beam, a tagged wall north of them carrying a
/// second beam, one stray wall line and one dimension text.
fn synthetic_plan() -> Vec<RawEntity> {
    let line = |id, layer: &str, x1, y1, x2, y2| RawEntity::line(id, layer, Segment::from_coords(x1, y1, x2, y2));
    let text = |id, layer: &str, x, y, s: &str| RawEntity::text(id, layer, TextLabel::new(Point2D::new(x, y), s));
    vec![
        // columns and their tags
        RawEntity::polyline(1, "COLU", Polygon::rectangle(Point2D::new(0.0, 0.0), 500.0, 500.0)),
        RawEntity::polyline(2, "COLU", Polygon::rectangle(Point2D::new(6000.0, 0.0), 500.0, 500.0)),
        text(3, "COLU_TEXT", 50.0, 50.0, "KZ1"),
        text(4, "COLU_TEXT", 6050.0, 50.0, "KZ1"),
        // detail drawn five times larger
        RawEntity::polyline(5, "COLU_DETAIL", Polygon::rectangle(Point2D::new(20_000.0, 20_000.0), 2500.0, 2500.0)),
        text(6, "COLU_DETAIL_TEXT", 20_000.0, 21_500.0, "KZ1"),
        // a 240 wall and its tag
        line(10, "WALL", -250.0, 2880.0, 6250.0, 2880.0),
        line(11, "WALL", -250.0, 3120.0, 6250.0, 3120.0),
        text(12, "WALL_TEXT", 3000.0, 3300.0, "Q1"),
        // stray wall line
        line(13, "WALL", 10_000.0, 0.0, 10_000.0, 3000.0),
        // beam between the columns
        line(20, "BEAM", 250.0, -150.0, 5750.0, -150.0),
        line(21, "BEAM", 250.0, 150.0, 5750.0, 150.0),
        text(22, "BEAM_TEXT", 3000.0, -400.0, "300x700"),
        // beam from the first column to the wall
        line(23, "BEAM", -100.0, 250.0, -100.0, 2880.0),
        line(24, "BEAM", 100.0, 250.0, 100.0, 2880.0),
        // unrelated
        text(30, "DIM", 0.0, -2000.0, "6000"),
    ]
}

fn config() -> RecognitionConfig {
    RecognitionConfig {
        name_prefix: "P-".into(),
        ..Default::default()
    }
}

#[test]
fn test_run_reads_every_element_kind() {
    let mut session = RecognitionSession::new(config()).unwrap();
    let snapshot = session.run(&synthetic_plan()).unwrap();
    let report = &snapshot.report;

    assert_eq!(report.entities, 16);
    assert_eq!(report.ignored, 1);

    assert_eq!(report.columns, 2);
    assert_eq!(report.columns_invalid, 0);
    assert_eq!(report.column_details, 1);
    for column in &snapshot.columns {
        assert_eq!(column.name(), "KZ1");
        let placement = column.placement.as_ref().unwrap();
        assert!(!placement.mirrored);
        assert!(placement.angle.abs() < 1e-9);
    }

    assert_eq!(report.walls, 2);
    assert_eq!(report.walls_single_line, 1);
    assert_eq!(report.walls_unassigned, 1);
    let stray = snapshot.walls.iter().find(|w| !w.is_valid()).unwrap();
    assert_eq!(stray.name(), UNASSIGNED);
    assert_eq!(snapshot.wall_infos.len(), 1);
    assert_eq!(snapshot.wall_infos[0].name, "Q1");
    assert_eq!(snapshot.wall_infos[0].thickness, 240.0);

    assert_eq!(report.beams, 2);
    assert_eq!(report.beams_unresolved, 0);
    assert_eq!(report.labels_applied, 1);
    assert!(snapshot
        .beams
        .iter()
        .all(|b| b.resolution == Resolution::BothEnds));
    let main = snapshot.beams.iter().find(|b| b.beam.width == 300.0).unwrap();
    assert_eq!(main.beam.height, 700.0);
    assert_eq!(main.name(), "300x700");
}

#[test]
fn test_export_document() {
    let mut session = RecognitionSession::new(config()).unwrap();
    session.run(&synthetic_plan()).unwrap();
    let doc = session.export(Point2D::new(0.0, 0.0));

    assert_eq!(doc.column_details.len(), 1);
    assert_eq!(doc.column_details[0].name, "P-KZ1");
    let mut vertices = doc.column_details[0].vertices.clone();
    vertices.sort();
    assert_eq!(vertices, vec!["-250,-250", "-250,250", "250,-250", "250,250"]);

    let points: Vec<&str> = doc.columns.iter().map(|c| c.point.as_str()).collect();
    assert_eq!(points, vec!["0,0", "6000,0"]);
    assert!(doc.columns.iter().all(|c| c.name == "P-KZ1" && c.angle == 0.0));

    assert_eq!(doc.wall_types.len(), 1);
    assert_eq!(doc.wall_types[0].name, "P-Q1");
    assert_eq!(doc.walls.len(), 1);
    assert_eq!(doc.walls[0].start, "-250,3000");
    assert_eq!(doc.walls[0].end, "6250,3000");

    assert_eq!(doc.beams.len(), 2);
    let main = doc.beams.iter().find(|b| b.width == 300.0).unwrap();
    assert_eq!((main.start.as_str(), main.end.as_str()), ("250,0", "5750,0"));
    assert_eq!(main.height, 700.0);

    let json = doc.to_json().unwrap();
    assert!(json.contains("\"P-Q1\""));
}

#[test]
fn test_emit_draws_and_releases() {
    let mut session = RecognitionSession::new(config()).unwrap();
    session.run(&synthetic_plan()).unwrap();
    let mut drawing = MemoryDrawing::starting_at(10_000);
    let emitted = session.emit(&mut drawing);

    assert_eq!(drawing.on_layer("PR-COLUMN").count(), 2);
    assert_eq!(drawing.on_layer("PR-WALL").count(), 1);
    assert_eq!(drawing.on_layer("PR-INVALID").count(), 1);
    assert_eq!(drawing.on_layer("PR-BEAM").count(), 2);
    assert_eq!(drawing.on_layer("PR-BEAM-TEXT").count(), 2);
    assert!(emitted.beams.iter().all(|b| b.meta.drawn.len() == 2));
    assert!(session.snapshot().is_empty());

    // drawn output is itself a readable snapshot
    let json = drawing.into_snapshot().to_json().unwrap();
    assert_eq!(DrawingSnapshot::from_json(&json).unwrap().entities.len(), 8);
}

#[test]
fn test_runs_replace_results_atomically() {
    let mut session = RecognitionSession::new(config()).unwrap();
    let first = session.run(&synthetic_plan()).unwrap();
    let second = session.run(&[]).unwrap();

    assert!(second.is_empty());
    assert_eq!(first.report.columns, 2);
    assert!(session.snapshot().is_empty());
}

#[test]
fn test_unpaired_policy_toggles_placeholders() {
    let config = RecognitionConfig {
        keep_unpaired_as_invalid: false,
        ..config()
    };
    let mut session = RecognitionSession::new(config).unwrap();
    let snapshot = session.run(&synthetic_plan()).unwrap();
    assert_eq!(snapshot.report.walls, 1);
    assert_eq!(snapshot.report.wall_lines_discarded, 1);
    assert!(snapshot.walls.iter().all(|w| w.is_valid()));
}
