//! Host Tests - Tool Switching, Picking and Replay
//!
//! Exercises the ToolHost end to end: selecting tools, the three-click
//! profile builders, screen-space picking and recorded sessions.

use std::io::Write;
use std::path::Path;

use glam::Vec3;
use viewport_builders::camera::{Ray, ViewCamera, intersect_picking_plane};
use viewport_builders::input::{Intersection, MouseButton, PointerEvent, Position};
use viewport_builders::playback::Recording;
use viewport_builders::scene::{EntityKind, MemoryScene, PickingPlane, PlaneAxis, Primitive};
use viewport_builders::fit::CurveData;
use viewport_builders::{ConfigError, FitKind, FitResponse, ToolConfig, ToolHost, ToolKind};

fn hit(x: f32, y: f32, z: f32) -> Vec<Intersection> {
    vec![Intersection::at(Vec3::new(x, y, z))]
}

fn host() -> ToolHost<MemoryScene> {
    ToolHost::new(MemoryScene::new(), ToolConfig::default())
}

fn mesh(host: &ToolHost<MemoryScene>, name: &str) -> (Primitive, Vec3) {
    let id = host.scene().find_by_name(name).expect("named entity");
    let record = host.scene().entity(id).expect("record");
    match record.kind {
        EntityKind::Mesh { primitive, .. } => (primitive, record.position),
        ref other => panic!("not a mesh: {other:?}"),
    }
}

// ============================================================================
// Tool switching
// ============================================================================

#[test]
fn test_switching_tools_cancels_curve_session() {
    let mut host = host();
    host.select_tool(ToolKind::Spline);
    host.pointer_down(&PointerEvent::primary(), &hit(0.0, 0.0, 0.0));
    host.pointer_down(&PointerEvent::primary(), &hit(1.0, 0.0, 0.0));
    let stale = host.drain_fit_requests();

    host.select_tool(ToolKind::Sphere);
    assert!(host.scene().permanent_entities().is_empty());
    assert!(host.scene().picking_plane().is_some_and(|p| !p.visible));

    // Answers to the abandoned curve reach the sphere tool and do nothing
    for request in &stale {
        host.deliver_fit(FitResponse::answering(request, "late", Default::default()));
    }
    assert!(host.scene().permanent_entities().is_empty());
    assert!(host.scene().preview_entities().is_empty());
}

#[test]
fn test_answer_from_previous_spline_session_is_dropped() {
    let mut host = host();
    host.select_tool(ToolKind::Spline);
    host.pointer_down(&PointerEvent::primary(), &hit(0.0, 0.0, 0.0));
    host.pointer_down(&PointerEvent::secondary(), &hit(1.0, 0.0, 0.0));
    let old = host.drain_fit_requests();
    let finalize = old
        .iter()
        .find(|r| r.kind == FitKind::Finalize)
        .cloned()
        .expect("finalize request");

    // Same tool again: a fresh builder with its own session
    host.select_tool(ToolKind::Spline);
    host.pointer_down(&PointerEvent::primary(), &hit(5.0, 5.0, 0.0));
    let current = host.drain_fit_requests();
    assert_eq!(current.len(), 1);
    assert_ne!(current[0].ticket.session, finalize.ticket.session);

    let points = finalize.points.clone();
    host.deliver_fit(FitResponse::answering(&finalize, "old-final", CurveData { points }));

    assert!(host.is_armed());
    assert!(host.scene().find_by_tag("old-final").is_none());
    assert!(host.scene().find_by_name("Spline").is_none());
    assert_eq!(host.scene().permanent_entities().len(), 1);

    // The live session still accepts its own answers
    let points = current[0].points.clone();
    host.deliver_fit(FitResponse::answering(&current[0], "new-preview", CurveData { points }));
    assert!(host.scene().find_by_tag("new-preview").is_some());
    assert!(host.is_armed());
}

#[test]
fn test_finished_tool_stays_selected_but_disarmed() {
    let mut host = host();
    host.select_tool(ToolKind::Sphere);
    host.pointer_down(&PointerEvent::primary(), &hit(0.0, 0.0, 0.0));
    host.pointer_down(&PointerEvent::primary(), &hit(3.0, 4.0, 0.0));

    assert_eq!(host.active_tool(), Some(ToolKind::Sphere));
    assert!(!host.is_armed());
    assert!(!host.pointer_down(&PointerEvent::primary(), &hit(9.0, 9.0, 0.0)));
    assert_eq!(host.scene().permanent_entities().len(), 1);
}

#[test]
fn test_middle_button_acts_as_primary() {
    let mut host = host();
    host.select_tool(ToolKind::Spline);
    let middle = PointerEvent::new(MouseButton::Middle, Position::default());
    host.pointer_down(&middle, &hit(0.0, 0.0, 0.0));
    host.pointer_down(&middle, &hit(1.0, 0.0, 0.0));

    let requests = host.drain_fit_requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.kind == FitKind::Preview));
    assert!(host.is_armed());
}

// ============================================================================
// Profile builders
// ============================================================================

#[test]
fn test_box_three_clicks() {
    let mut host = host();
    host.select_tool(ToolKind::Box);
    host.pointer_down(&PointerEvent::primary(), &hit(0.0, 0.0, 0.0));
    host.pointer_hover(&PointerEvent::default(), &hit(1.0, 1.0, 0.0));
    host.pointer_down(&PointerEvent::primary(), &hit(2.0, 1.0, 0.0));
    host.pointer_hover(&PointerEvent::default(), &hit(2.0, 2.0, 0.0));
    assert_eq!(host.scene().preview_entities().len(), 1);
    host.pointer_down(&PointerEvent::primary(), &hit(2.0, 3.0, 0.0));

    assert!(!host.is_armed());
    assert!(host.scene().preview_entities().is_empty());
    let (primitive, position) = mesh(&host, "Box");
    assert_eq!(
        primitive,
        Primitive::Box {
            size: Vec3::new(2.0, 1.0, 2.0)
        }
    );
    assert_eq!(position, Vec3::new(1.0, 0.5, 1.0));
}

#[test]
fn test_box_hover_does_not_accumulate_geometry() {
    let mut host = host();
    host.select_tool(ToolKind::Box);
    host.pointer_down(&PointerEvent::primary(), &hit(0.0, 0.0, 0.0));

    for step in 1..=15 {
        let x = step as f32 * 0.5;
        host.pointer_hover(&PointerEvent::default(), &hit(x, x, 0.0));
        assert_eq!(host.scene().geometry_count(), 0);
        assert_eq!(host.scene().entity_count(), 1);
    }
}

#[test]
fn test_cylinder_three_clicks() {
    let mut host = host();
    host.select_tool(ToolKind::Cylinder);
    host.pointer_down(&PointerEvent::primary(), &hit(1.0, 1.0, 0.0));
    host.pointer_down(&PointerEvent::primary(), &hit(4.0, 5.0, 0.0));
    host.pointer_down(&PointerEvent::primary(), &hit(4.0, 8.0, 0.0));

    let (primitive, position) = mesh(&host, "Cylinder");
    assert_eq!(
        primitive,
        Primitive::Cylinder {
            radius: 5.0,
            height: 3.0,
            axis: PlaneAxis::Z
        }
    );
    assert_eq!(position, Vec3::new(1.0, 1.0, 1.5));
}

// ============================================================================
// Picking
// ============================================================================

#[test]
fn test_screen_center_picks_camera_target() {
    let mut host = host();
    host.select_tool(ToolKind::Sphere);
    let camera = ViewCamera::default();
    let center = PointerEvent::new(MouseButton::Left, Position::new(0.5, 0.5));

    let hits = host.pick(&center, &camera);
    assert_eq!(hits.len(), 1);
    assert!(hits[0].point.length() < 1e-3);
    assert!(hits[0].distance > 0.0);
}

#[test]
fn test_nothing_picked_without_armed_tool() {
    let host = host();
    let center = PointerEvent::new(MouseButton::Left, Position::new(0.5, 0.5));
    assert!(host.pick(&center, &ViewCamera::default()).is_empty());
}

#[test]
fn test_picking_plane_on_other_axis() {
    let plane = PickingPlane::invisible(PlaneAxis::Y, 2.0, 100.0);
    let ray = Ray::new(Vec3::new(1.0, -5.0, 3.0), Vec3::Y);
    let hit = intersect_picking_plane(&ray, &plane).expect("hit");
    assert_eq!(hit.point, Vec3::new(1.0, 2.0, 3.0));
    assert!((hit.distance - 7.0).abs() < 1e-5);

    let away = Ray::new(Vec3::new(1.0, -5.0, 3.0), Vec3::NEG_Y);
    assert!(intersect_picking_plane(&away, &plane).is_none());
}

#[test]
fn test_sphere_through_camera_clicks() {
    let mut host = host();
    host.select_tool(ToolKind::Sphere);
    let camera = ViewCamera::default();
    host.pointer_down_at(&PointerEvent::new(MouseButton::Left, Position::new(0.5, 0.5)), &camera);
    host.pointer_down_at(&PointerEvent::new(MouseButton::Left, Position::new(0.7, 0.5)), &camera);

    let (primitive, position) = mesh(&host, "Sphere");
    assert!(position.length() < 1e-3);
    assert!(matches!(primitive, Primitive::Sphere { radius, .. } if radius > 0.0));
}

// ============================================================================
// Configuration and replay
// ============================================================================

#[test]
fn test_config_rejects_bad_extent() {
    let err = ToolConfig::from_json_str(r#"{ "picking_plane": { "extent": 0.0 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            field: "picking_plane.extent",
            ..
        }
    ));
}

#[test]
fn test_config_axis_drives_picking_plane() {
    let config = ToolConfig::from_json_str(r#"{ "picking_plane": { "axis": "y", "offset": 1.5 } }"#)
        .expect("valid config");
    let mut host = ToolHost::new(MemoryScene::with_config(&config), config);
    host.select_tool(ToolKind::Dodecahedron);

    let plane = host.scene().picking_plane().copied().expect("plane");
    assert_eq!(plane.axis, PlaneAxis::Y);
    assert_eq!(plane.offset, 1.5);
}

#[test]
fn test_config_file_feeds_replay() {
    let mut config_file = tempfile::NamedTempFile::new().expect("temp file");
    write!(config_file, r#"{{ "marker_radius": 0.25 }}"#).expect("write config");
    let config = ToolConfig::load(config_file.path()).expect("valid config");

    let recording = Recording::from_json_str(
        r#"{ "events": [
            { "event": "select", "tool": "spline" },
            { "event": "down", "hits": [[1, 1, 0]] }
        ] }"#,
    )
    .expect("valid recording");
    let mut host = ToolHost::new(MemoryScene::with_config(&config), config);
    recording.replay(&mut host);

    let marker = host.scene().permanent_entities()[0];
    assert!(matches!(
        host.scene().entity(marker).map(|e| &e.kind),
        Some(EntityKind::Marker { radius, .. }) if *radius == 0.25
    ));
}

#[test]
fn test_demo_recording_replays() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/spline_session.json");
    let recording = Recording::load(&path).expect("demo recording");
    let config = recording.tool_config();
    let mut host = ToolHost::new(MemoryScene::with_config(&config), config);
    let summary = recording.replay(&mut host);

    assert_eq!(summary.events, recording.events.len());
    let scene = host.scene();
    assert_eq!(scene.permanent_entities().len(), 3);
    assert!(scene.find_by_name("Sphere").is_some());
    assert!(scene.find_by_name("Box").is_some());
    let curve = scene.find_by_name("Spline").expect("curve");
    assert_eq!(scene.children_of(curve).len(), 3);
}
