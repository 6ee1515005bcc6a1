//! Radius Builder Tests - Sphere and Polyhedron Sessions
//!
//! Drives the two-click builders through a MemoryScene and checks what ends
//! up in the scene graph.

use glam::Vec3;
use viewport_builders::fit::QueuedFitService;
use viewport_builders::input::{Intersection, PointerEvent};
use viewport_builders::scene::{EntityKind, MemoryScene, PlaneAxis, Primitive};
use viewport_builders::tools::{PolyhedronBuilder, RadiusStep, ShapeBuilder, SphereBuilder, ToolContext};
use viewport_builders::ToolConfig;

fn hit(x: f32, y: f32, z: f32) -> Vec<Intersection> {
    vec![Intersection::at(Vec3::new(x, y, z))]
}

fn sphere_radius(scene: &MemoryScene, id: viewport_builders::scene::EntityId) -> Option<f32> {
    match scene.entity(id).map(|e| &e.kind) {
        Some(EntityKind::Mesh {
            primitive: Primitive::Sphere { radius, .. },
            ..
        }) => Some(*radius),
        _ => None,
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_start_installs_invisible_plane() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut builder = SphereBuilder::new(ToolConfig::default());
    builder.start_tool(&mut ToolContext::new(&mut scene, &mut fits));

    let plane = scene.picking_plane().copied().expect("plane installed");
    assert!(!plane.visible);
    assert_eq!(plane.axis, PlaneAxis::Z);
    assert_eq!(plane.extent, 5000.0);
    assert!(builder.is_armed());
}

#[test]
fn test_click_without_intersection_is_noop() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut ctx = ToolContext::new(&mut scene, &mut fits);
    let mut builder = SphereBuilder::new(ToolConfig::default());

    builder.start_tool(&mut ctx);
    assert!(builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &[]));
    builder.on_pointer_hover(&mut ctx, &PointerEvent::default(), &[]);

    assert_eq!(builder.step(), RadiusStep::AwaitingCenter);
    assert!(builder.anchor_points().is_empty());
    assert!(builder.preview().is_none());
    assert!(scene.permanent_entities().is_empty());
    assert!(scene.preview_entities().is_empty());
}

// ============================================================================
// Sphere
// ============================================================================

#[test]
fn test_two_click_sphere() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut ctx = ToolContext::new(&mut scene, &mut fits);
    let mut builder = SphereBuilder::new(ToolConfig::default());

    builder.start_tool(&mut ctx);
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(0.0, 0.0, 0.0));
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(3.0, 4.0, 0.0));

    assert!(!builder.is_armed());
    assert_eq!(
        builder.step(),
        RadiusStep::Complete {
            center: Vec3::ZERO,
            radius: 5.0
        }
    );
    assert!(scene.picking_plane().is_none());

    let permanent = scene.permanent_entities();
    assert_eq!(permanent.len(), 1);
    let sphere = permanent[0];
    assert_eq!(sphere_radius(&scene, sphere), Some(5.0));
    let record = scene.entity(sphere).expect("sphere");
    assert_eq!(record.name, "Sphere");
    assert_eq!(record.position, Vec3::ZERO);
    assert!(matches!(
        record.kind,
        EntityKind::Mesh {
            primitive: Primitive::Sphere {
                width_segments: 32,
                height_segments: 16,
                ..
            },
            ..
        }
    ));
}

#[test]
fn test_radius_ignores_height_above_plane() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut ctx = ToolContext::new(&mut scene, &mut fits);
    let mut builder = SphereBuilder::new(ToolConfig::default());

    builder.start_tool(&mut ctx);
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(1.0, 1.0, 0.0));
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(4.0, 5.0, 7.0));

    let sphere = builder.committed().expect("committed");
    assert_eq!(sphere_radius(&scene, sphere), Some(5.0));
}

#[test]
fn test_hover_keeps_exactly_one_preview() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut ctx = ToolContext::new(&mut scene, &mut fits);
    let mut builder = SphereBuilder::new(ToolConfig::default());

    builder.start_tool(&mut ctx);
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(0.0, 0.0, 0.0));
    for x in [1.0, 2.0, 3.0, 4.0] {
        builder.on_pointer_hover(&mut ctx, &PointerEvent::default(), &hit(x, 0.0, 0.0));
    }

    let previews = scene.preview_entities();
    assert_eq!(previews.len(), 1);
    assert_eq!(Some(previews[0]), builder.preview());
    assert_eq!(sphere_radius(&scene, previews[0]), Some(4.0));
    assert_eq!(scene.destroyed_count, 3);
    assert_eq!(scene.materials_created, 1);
}

#[test]
fn test_hover_does_not_accumulate_scene_resources() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut builder = SphereBuilder::new(ToolConfig::default());

    let mut ctx = ToolContext::new(&mut scene, &mut fits);
    builder.start_tool(&mut ctx);
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(0.0, 0.0, 0.0));

    for x in 1..=20 {
        let mut ctx = ToolContext::new(&mut scene, &mut fits);
        builder.on_pointer_hover(&mut ctx, &PointerEvent::default(), &hit(x as f32, 0.0, 0.0));

        assert_eq!(scene.geometry_count(), 0);
        assert_eq!(scene.entity_count(), 1);
    }
}

#[test]
fn test_commit_destroys_preview_and_releases_material() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut ctx = ToolContext::new(&mut scene, &mut fits);
    let mut builder = SphereBuilder::new(ToolConfig::default());

    builder.start_tool(&mut ctx);
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(0.0, 0.0, 0.0));
    builder.on_pointer_hover(&mut ctx, &PointerEvent::default(), &hit(1.0, 0.0, 0.0));
    let preview = builder.preview().expect("preview");
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(2.0, 0.0, 0.0));

    assert!(!scene.contains(preview));
    assert!(scene.preview_entities().is_empty());
    assert_eq!(scene.materials_created, 1);

    let sphere = builder.committed().expect("committed");
    let material = match scene.entity(sphere).map(|e| &e.kind) {
        Some(EntityKind::Mesh { material, .. }) => *material,
        other => panic!("unexpected entity {other:?}"),
    };
    assert!(scene.is_material_released(material));
}

#[test]
fn test_zero_radius_passes_through() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut ctx = ToolContext::new(&mut scene, &mut fits);
    let mut builder = SphereBuilder::new(ToolConfig::default());

    builder.start_tool(&mut ctx);
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(2.0, 2.0, 0.0));
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(2.0, 2.0, 0.0));

    let sphere = builder.committed().expect("committed");
    assert_eq!(sphere_radius(&scene, sphere), Some(0.0));
}

#[test]
fn test_forced_stop_discards_preview() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut ctx = ToolContext::new(&mut scene, &mut fits);
    let mut builder = SphereBuilder::new(ToolConfig::default());

    builder.start_tool(&mut ctx);
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(0.0, 0.0, 0.0));
    builder.on_pointer_hover(&mut ctx, &PointerEvent::default(), &hit(1.0, 0.0, 0.0));
    builder.stop_tool(&mut ctx);

    assert!(!builder.is_armed());
    assert!(builder.preview().is_none());
    assert!(scene.picking_plane().is_none());
    assert!(scene.preview_entities().is_empty());
    assert!(scene.permanent_entities().is_empty());
}

#[test]
fn test_restart_begins_clean_session() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut ctx = ToolContext::new(&mut scene, &mut fits);
    let mut builder = SphereBuilder::new(ToolConfig::default());

    builder.start_tool(&mut ctx);
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(0.0, 0.0, 0.0));
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(1.0, 0.0, 0.0));
    builder.start_tool(&mut ctx);

    assert!(builder.is_armed());
    assert_eq!(builder.step(), RadiusStep::AwaitingCenter);
    assert!(builder.committed().is_none());
    // First session's sphere stays
    assert_eq!(scene.permanent_entities().len(), 1);
}

// ============================================================================
// Polyhedron
// ============================================================================

#[test]
fn test_polyhedron_follows_same_protocol() {
    let mut scene = MemoryScene::new();
    let mut fits = QueuedFitService::new();
    let mut ctx = ToolContext::new(&mut scene, &mut fits);
    let mut builder = PolyhedronBuilder::new(ToolConfig::default());

    builder.start_tool(&mut ctx);
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(-1.0, 0.0, 0.0));
    builder.on_pointer_hover(&mut ctx, &PointerEvent::default(), &hit(0.0, 0.0, 0.0));
    builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hit(2.0, 4.0, 0.0));

    assert!(!builder.is_armed());
    let id = scene.find_by_name("Dodecahedron").expect("dodecahedron");
    let record = scene.entity(id).expect("record");
    assert_eq!(record.position, Vec3::new(-1.0, 0.0, 0.0));
    assert!(matches!(
        record.kind,
        EntityKind::Mesh {
            primitive: Primitive::Dodecahedron { radius },
            ..
        } if radius == 5.0
    ));
    assert!(scene.preview_entities().is_empty());
}
