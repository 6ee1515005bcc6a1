//! Radius Builders
//!
//! Two-click tools: the first click places the center, the second sets the
//! radius as the in-plane distance from the center. Hovering between the two
//! clicks previews the shape at the live radius.
//!
//! Sphere and dodecahedron share the whole state machine and differ only in
//! the [`RadiusShape`] they build.

use std::marker::PhantomData;

use glam::Vec3;
use tracing::{debug, info};

use super::{SessionResources, ShapeBuilder, ToolContext};
use crate::config::ToolConfig;
use crate::input::{Intersection, PointerEvent, first_hit};
use crate::scene::{EntityId, Primitive, SceneCollaborator, SceneLayer};

/// Geometry strategy of a radius builder.
pub trait RadiusShape {
    /// Name given to the committed entity.
    const NAME: &'static str;

    fn primitive(radius: f32, config: &ToolConfig) -> Primitive;
}

pub struct SphereShape;

impl RadiusShape for SphereShape {
    const NAME: &'static str = "Sphere";

    fn primitive(radius: f32, config: &ToolConfig) -> Primitive {
        Primitive::Sphere {
            radius,
            width_segments: config.sphere_width_segments,
            height_segments: config.sphere_height_segments,
        }
    }
}

pub struct DodecahedronShape;

impl RadiusShape for DodecahedronShape {
    const NAME: &'static str = "Dodecahedron";

    fn primitive(radius: f32, _config: &ToolConfig) -> Primitive {
        Primitive::Dodecahedron { radius }
    }
}

pub type SphereBuilder = RadiusBuilder<SphereShape>;
pub type PolyhedronBuilder = RadiusBuilder<DodecahedronShape>;

/// Where a radius builder is in its two-click sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusStep {
    AwaitingCenter,
    AwaitingRadius { center: Vec3 },
    Complete { center: Vec3, radius: f32 },
}

/// Generic two-point radius builder.
pub struct RadiusBuilder<S: RadiusShape> {
    config: ToolConfig,
    armed: bool,
    step: RadiusStep,
    resources: SessionResources,
    /// Entity committed by the last completed session
    committed: Option<EntityId>,
    _shape: PhantomData<S>,
}

impl<S: RadiusShape> RadiusBuilder<S> {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            config,
            armed: false,
            step: RadiusStep::AwaitingCenter,
            resources: SessionResources::default(),
            committed: None,
            _shape: PhantomData,
        }
    }

    pub fn step(&self) -> RadiusStep {
        self.step
    }

    /// Anchor points collected so far, in click order.
    pub fn anchor_points(&self) -> Vec<Vec3> {
        match self.step {
            RadiusStep::AwaitingCenter => Vec::new(),
            RadiusStep::AwaitingRadius { center } | RadiusStep::Complete { center, .. } => {
                vec![center]
            }
        }
    }

    pub fn preview(&self) -> Option<EntityId> {
        self.resources.preview()
    }

    pub fn committed(&self) -> Option<EntityId> {
        self.committed
    }

    fn radius_to(&self, center: Vec3, point: Vec3) -> f32 {
        self.config.picking_plane.axis.planar_distance(center, point)
    }

    /// Build a mesh of the shape at `center`, not yet added to the scene.
    fn build_entity(&mut self, scene: &mut dyn SceneCollaborator, center: Vec3, radius: f32) -> EntityId {
        let geometry = scene.create_geometry(S::primitive(radius, &self.config));
        let material = self.resources.material(scene, self.config.shape_color);
        let entity = scene.create_mesh_entity(geometry, material);
        scene.set_entity_position(entity, center);
        entity
    }

    /// Replace the preview with the real shape and end the session.
    fn finalize_shape(&mut self, ctx: &mut ToolContext<'_>, center: Vec3, radius: f32) {
        self.resources.clear_preview(ctx.scene);

        let entity = self.build_entity(ctx.scene, center, radius);
        ctx.scene.set_entity_name(entity, S::NAME);
        ctx.scene.add_entity_to_scene(entity, SceneLayer::Permanent);

        self.step = RadiusStep::Complete { center, radius };
        self.committed = Some(entity);
        info!(
            tool = S::NAME,
            radius,
            x = center.x,
            y = center.y,
            z = center.z,
            "[{}] shape committed",
            S::NAME
        );

        self.stop_tool(ctx);
    }
}

impl<S: RadiusShape> ShapeBuilder for RadiusBuilder<S> {
    fn tool_name(&self) -> &'static str {
        S::NAME
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn start_tool(&mut self, ctx: &mut ToolContext<'_>) {
        if self.armed {
            self.resources.release(ctx.scene);
        }
        self.step = RadiusStep::AwaitingCenter;
        self.resources = SessionResources::default();
        self.committed = None;

        ctx.scene.add_picking_plane(self.config.picking_plane.invisible());
        self.armed = true;
        info!(tool = S::NAME, "[{}] tool armed", S::NAME);
    }

    fn stop_tool(&mut self, ctx: &mut ToolContext<'_>) {
        if !self.armed {
            return;
        }
        self.resources.release(ctx.scene);
        ctx.scene.remove_picking_plane();
        self.armed = false;
        info!(tool = S::NAME, "[{}] tool disarmed", S::NAME);
    }

    fn on_pointer_hover(
        &mut self,
        ctx: &mut ToolContext<'_>,
        _event: &PointerEvent,
        intersections: &[Intersection],
    ) {
        if !self.armed {
            return;
        }
        let Some(point) = first_hit(intersections) else {
            return;
        };
        let RadiusStep::AwaitingRadius { center } = self.step else {
            return;
        };

        let radius = self.radius_to(center, point);
        let entity = self.build_entity(ctx.scene, center, radius);
        self.resources.replace_preview(ctx.scene, entity);
        debug!(tool = S::NAME, radius, "preview updated");
    }

    fn on_pointer_down(
        &mut self,
        ctx: &mut ToolContext<'_>,
        _event: &PointerEvent,
        intersections: &[Intersection],
    ) -> bool {
        if !self.armed {
            return false;
        }
        let Some(point) = first_hit(intersections) else {
            return true;
        };

        match self.step {
            RadiusStep::AwaitingCenter => {
                self.step = RadiusStep::AwaitingRadius { center: point };
                debug!(tool = S::NAME, x = point.x, y = point.y, z = point.z, "center placed");
            }
            RadiusStep::AwaitingRadius { center } => {
                let radius = self.radius_to(center, point);
                self.finalize_shape(ctx, center, radius);
            }
            RadiusStep::Complete { .. } => {}
        }
        true
    }
}
