//! Profile Builders
//!
//! Three-click tools that draw a flat profile in the picking plane and then
//! pull it out along the plane's fixed axis:
//! base point -> profile point -> height point.
//!
//! - Box: base and profile are opposite rectangle corners
//! - Cylinder: base is the center, profile sets the radius

use std::marker::PhantomData;

use glam::Vec3;
use tracing::{debug, info};

use super::{SessionResources, ShapeBuilder, ToolContext};
use crate::config::ToolConfig;
use crate::input::{Intersection, PointerEvent, first_hit};
use crate::scene::{EntityId, PlaneAxis, Primitive, SceneCollaborator, SceneLayer};

/// Geometry strategy of a profile builder.
pub trait ProfileShape {
    /// Name given to the committed entity.
    const NAME: &'static str;

    /// Geometry and world position of the shape. `height` is `None` while
    /// only the flat profile is known.
    fn build(base: Vec3, profile: Vec3, height: Option<f32>, axis: PlaneAxis) -> (Primitive, Vec3);
}

pub struct BoxShape;

impl ProfileShape for BoxShape {
    const NAME: &'static str = "Box";

    fn build(base: Vec3, profile: Vec3, height: Option<f32>, axis: PlaneAxis) -> (Primitive, Vec3) {
        let height = height.unwrap_or(0.0);
        let mut size = axis.flatten(profile - base).abs();
        size[axis.index()] = height;

        let center = (base + profile) * 0.5 + axis.unit() * (height * 0.5);
        (Primitive::Box { size }, center)
    }
}

pub struct CylinderShape;

impl ProfileShape for CylinderShape {
    const NAME: &'static str = "Cylinder";

    fn build(base: Vec3, profile: Vec3, height: Option<f32>, axis: PlaneAxis) -> (Primitive, Vec3) {
        let height = height.unwrap_or(0.0);
        let radius = axis.planar_distance(base, profile);

        let center = base + axis.unit() * (height * 0.5);
        (
            Primitive::Cylinder {
                radius,
                height,
                axis,
            },
            center,
        )
    }
}

pub type BoxBuilder = ProfileBuilder<BoxShape>;
pub type CylinderBuilder = ProfileBuilder<CylinderShape>;

/// Where a profile builder is in its three-click sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileStep {
    AwaitingBase,
    AwaitingProfile { base: Vec3 },
    AwaitingHeight { base: Vec3, profile: Vec3 },
    Complete { base: Vec3, profile: Vec3, height: f32 },
}

/// Generic three-point profile builder.
pub struct ProfileBuilder<S: ProfileShape> {
    config: ToolConfig,
    armed: bool,
    step: ProfileStep,
    resources: SessionResources,
    committed: Option<EntityId>,
    _shape: PhantomData<S>,
}

impl<S: ProfileShape> ProfileBuilder<S> {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            config,
            armed: false,
            step: ProfileStep::AwaitingBase,
            resources: SessionResources::default(),
            committed: None,
            _shape: PhantomData,
        }
    }

    pub fn step(&self) -> ProfileStep {
        self.step
    }

    pub fn anchor_points(&self) -> Vec<Vec3> {
        match self.step {
            ProfileStep::AwaitingBase => Vec::new(),
            ProfileStep::AwaitingProfile { base } => vec![base],
            ProfileStep::AwaitingHeight { base, profile }
            | ProfileStep::Complete { base, profile, .. } => vec![base, profile],
        }
    }

    pub fn preview(&self) -> Option<EntityId> {
        self.resources.preview()
    }

    pub fn committed(&self) -> Option<EntityId> {
        self.committed
    }

    fn axis(&self) -> PlaneAxis {
        self.config.picking_plane.axis
    }

    fn build_entity(
        &mut self,
        scene: &mut dyn SceneCollaborator,
        base: Vec3,
        profile: Vec3,
        height: Option<f32>,
    ) -> EntityId {
        let (primitive, position) = S::build(base, profile, height, self.axis());
        let geometry = scene.create_geometry(primitive);
        let material = self.resources.material(scene, self.config.shape_color);
        let entity = scene.create_mesh_entity(geometry, material);
        scene.set_entity_position(entity, position);
        entity
    }

    fn finalize_shape(&mut self, ctx: &mut ToolContext<'_>, base: Vec3, profile: Vec3, height: f32) {
        self.resources.clear_preview(ctx.scene);

        let entity = self.build_entity(ctx.scene, base, profile, Some(height));
        ctx.scene.set_entity_name(entity, S::NAME);
        ctx.scene.add_entity_to_scene(entity, SceneLayer::Permanent);

        self.step = ProfileStep::Complete {
            base,
            profile,
            height,
        };
        self.committed = Some(entity);
        info!(tool = S::NAME, height, "[{}] shape committed", S::NAME);

        self.stop_tool(ctx);
    }
}

impl<S: ProfileShape> ShapeBuilder for ProfileBuilder<S> {
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
        self.step = ProfileStep::AwaitingBase;
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

        let entity = match self.step {
            ProfileStep::AwaitingProfile { base } => self.build_entity(ctx.scene, base, point, None),
            ProfileStep::AwaitingHeight { base, profile } => {
                let height = self.axis().planar_distance(profile, point);
                self.build_entity(ctx.scene, base, profile, Some(height))
            }
            ProfileStep::AwaitingBase | ProfileStep::Complete { .. } => return,
        };
        self.resources.replace_preview(ctx.scene, entity);
        debug!(tool = S::NAME, "preview updated");
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
            ProfileStep::AwaitingBase => {
                self.step = ProfileStep::AwaitingProfile { base: point };
            }
            ProfileStep::AwaitingProfile { base } => {
                self.step = ProfileStep::AwaitingHeight {
                    base,
                    profile: point,
                };
            }
            ProfileStep::AwaitingHeight { base, profile } => {
                let height = self.axis().planar_distance(profile, point);
                self.finalize_shape(ctx, base, profile, height);
            }
            ProfileStep::Complete { .. } => {}
        }
        true
    }
}
