//! Shape Builder Tools
//!
//! Click-driven tools that build scene primitives: arm a tool, collect anchor
//! points from pointer clicks, show a preview while hovering, commit when the
//! shape is complete.
//!
//! - [`RadiusBuilder`] - center + radius point (sphere, dodecahedron)
//! - [`ProfileBuilder`] - base + profile point + height point (box, cylinder)
//! - [`CurveBuilder`] - open-ended point list fitted asynchronously (spline)

pub mod curve;
pub mod profile;
pub mod radius;

pub use curve::{CurveBuilder, CurveStep};
pub use profile::{BoxBuilder, BoxShape, CylinderBuilder, CylinderShape, ProfileBuilder, ProfileShape, ProfileStep};
pub use radius::{DodecahedronShape, PolyhedronBuilder, RadiusBuilder, RadiusShape, RadiusStep, SphereBuilder, SphereShape};

use tracing::debug;

use crate::fit::{FitResponse, FitService};
use crate::input::{Intersection, PointerEvent};
use crate::scene::{Color, EntityId, MaterialId, SceneCollaborator, SceneLayer};

/// Collaborators lent to a builder for the duration of one call.
pub struct ToolContext<'a> {
    pub scene: &'a mut dyn SceneCollaborator,
    pub fits: &'a mut dyn FitService,
}

impl<'a> ToolContext<'a> {
    pub fn new(scene: &'a mut dyn SceneCollaborator, fits: &'a mut dyn FitService) -> Self {
        Self { scene, fits }
    }
}

/// The lifecycle every builder follows.
///
/// Pointer and fit events reaching a disarmed builder are ignored.
pub trait ShapeBuilder {
    /// Name used for logging and for the committed entity.
    fn tool_name(&self) -> &'static str;

    fn is_armed(&self) -> bool;

    /// Install the picking plane and begin a fresh session.
    fn start_tool(&mut self, ctx: &mut ToolContext<'_>);

    /// Remove the picking plane and end the session. Committed shapes stay
    /// in the scene; session-owned transient objects do not.
    fn stop_tool(&mut self, ctx: &mut ToolContext<'_>);

    /// Pointer moved. An empty `intersections` list is a no-op.
    fn on_pointer_hover(
        &mut self,
        ctx: &mut ToolContext<'_>,
        event: &PointerEvent,
        intersections: &[Intersection],
    );

    /// Pointer clicked. An empty `intersections` list is a no-op.
    ///
    /// Returns `true` when the event was consumed, which is always the case
    /// while the tool is armed.
    fn on_pointer_down(
        &mut self,
        ctx: &mut ToolContext<'_>,
        event: &PointerEvent,
        intersections: &[Intersection],
    ) -> bool;

    /// A curve fit finished. Only builders that request fits care.
    fn on_fit_response(&mut self, _ctx: &mut ToolContext<'_>, response: FitResponse) {
        debug!(
            tool = self.tool_name(),
            uuid = %response.uuid,
            "fit response ignored by tool without fits"
        );
    }
}

/// Scene objects owned by one tool session: at most one preview entity and
/// one lazily created material.
#[derive(Debug, Default)]
pub(crate) struct SessionResources {
    preview: Option<EntityId>,
    material: Option<MaterialId>,
}

impl SessionResources {
    pub(crate) fn preview(&self) -> Option<EntityId> {
        self.preview
    }

    /// The session material, created on first use.
    pub(crate) fn material(&mut self, scene: &mut dyn SceneCollaborator, color: Color) -> MaterialId {
        *self
            .material
            .get_or_insert_with(|| scene.create_material(color))
    }

    /// Destroy the current preview and show `entity` in its place.
    pub(crate) fn replace_preview(&mut self, scene: &mut dyn SceneCollaborator, entity: EntityId) {
        self.clear_preview(scene);
        scene.add_entity_to_scene(entity, SceneLayer::Preview);
        self.preview = Some(entity);
    }

    pub(crate) fn clear_preview(&mut self, scene: &mut dyn SceneCollaborator) {
        if let Some(old) = self.preview.take() {
            scene.destroy_entity(old);
        }
    }

    /// Drop the preview and hand the material back to the scene.
    pub(crate) fn release(&mut self, scene: &mut dyn SceneCollaborator) {
        self.clear_preview(scene);
        if let Some(material) = self.material.take() {
            scene.release_material(material);
        }
    }
}
