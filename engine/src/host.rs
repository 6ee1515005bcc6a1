//! Tool Host
//!
//! Owns the scene and the fit queue, arms one builder at a time and routes
//! pointer and fit events to it.
//!
//! ```rust,ignore
//! let mut host = ToolHost::new(MemoryScene::new(), ToolConfig::default());
//! host.select_tool(ToolKind::Sphere);
//! host.pointer_down(&PointerEvent::primary(), &[Intersection::at(Vec3::ZERO)]);
//! host.pointer_down(&PointerEvent::primary(), &[Intersection::at(Vec3::new(3.0, 4.0, 0.0))]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::camera::ViewCamera;
use crate::config::ToolConfig;
use crate::fit::{FitRequest, FitResponse, QueuedFitService};
use crate::input::{Intersection, PointerEvent};
use crate::scene::SceneCollaborator;
use crate::tools::{
    BoxBuilder, CurveBuilder, CylinderBuilder, PolyhedronBuilder, ShapeBuilder, SphereBuilder,
    ToolContext,
};

/// Tools offered by the modeling toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Box,
    Sphere,
    Cylinder,
    Dodecahedron,
    Spline,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Box,
        ToolKind::Sphere,
        ToolKind::Cylinder,
        ToolKind::Dodecahedron,
        ToolKind::Spline,
    ];

    /// A fresh, disarmed builder for this tool.
    pub fn builder(&self, config: &ToolConfig) -> Box<dyn ShapeBuilder> {
        let config = config.clone();
        match self {
            ToolKind::Box => Box::new(BoxBuilder::new(config)),
            ToolKind::Sphere => Box::new(SphereBuilder::new(config)),
            ToolKind::Cylinder => Box::new(CylinderBuilder::new(config)),
            ToolKind::Dodecahedron => Box::new(PolyhedronBuilder::new(config)),
            ToolKind::Spline => Box::new(CurveBuilder::new(config)),
        }
    }
}

struct ActiveTool {
    kind: ToolKind,
    builder: Box<dyn ShapeBuilder>,
}

/// Hosts the viewport scene and at most one armed builder.
pub struct ToolHost<S: SceneCollaborator> {
    scene: S,
    fits: QueuedFitService,
    config: ToolConfig,
    active: Option<ActiveTool>,
}

impl<S: SceneCollaborator> ToolHost<S> {
    pub fn new(scene: S, config: ToolConfig) -> Self {
        Self {
            scene,
            fits: QueuedFitService::new(),
            config,
            active: None,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// The selected tool, armed or finished.
    pub fn active_tool(&self) -> Option<ToolKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    pub fn is_armed(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.builder.is_armed())
    }

    /// Stop whatever tool is armed, then arm a fresh builder of `kind`.
    pub fn select_tool(&mut self, kind: ToolKind) {
        self.cancel_tool();

        let mut builder = kind.builder(&self.config);
        let mut ctx = ToolContext::new(&mut self.scene, &mut self.fits);
        builder.start_tool(&mut ctx);
        info!(tool = ?kind, "[Host] tool selected");
        self.active = Some(ActiveTool { kind, builder });
    }

    /// Forcibly stop the armed tool. Committed shapes stay in the scene.
    pub fn cancel_tool(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        if active.builder.is_armed() {
            let mut ctx = ToolContext::new(&mut self.scene, &mut self.fits);
            active.builder.stop_tool(&mut ctx);
            info!(tool = ?active.kind, "[Host] tool cancelled");
        }
    }

    pub fn pointer_hover(&mut self, event: &PointerEvent, intersections: &[Intersection]) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let mut ctx = ToolContext::new(&mut self.scene, &mut self.fits);
        active.builder.on_pointer_hover(&mut ctx, event, intersections);
    }

    /// Returns whether the armed tool consumed the click.
    pub fn pointer_down(&mut self, event: &PointerEvent, intersections: &[Intersection]) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let mut ctx = ToolContext::new(&mut self.scene, &mut self.fits);
        active.builder.on_pointer_down(&mut ctx, event, intersections)
    }

    /// Intersections of the pointer ray with the installed picking plane.
    pub fn pick(&self, event: &PointerEvent, camera: &ViewCamera) -> Vec<Intersection> {
        self.scene.pick(&camera.ray(event.position))
    }

    /// Hover at a screen position, picking through `camera`.
    pub fn pointer_hover_at(&mut self, event: &PointerEvent, camera: &ViewCamera) {
        let hits = self.pick(event, camera);
        self.pointer_hover(event, &hits);
    }

    /// Click at a screen position, picking through `camera`.
    pub fn pointer_down_at(&mut self, event: &PointerEvent, camera: &ViewCamera) -> bool {
        let hits = self.pick(event, camera);
        self.pointer_down(event, &hits)
    }

    /// Fit requests sent since the last drain, oldest first.
    pub fn drain_fit_requests(&mut self) -> Vec<FitRequest> {
        self.fits.drain()
    }

    pub fn pending_fit_requests(&self) -> usize {
        self.fits.pending().len()
    }

    /// Hand a fit response to the selected tool.
    pub fn deliver_fit(&mut self, response: FitResponse) {
        let Some(active) = self.active.as_mut() else {
            warn!(uuid = %response.uuid, "[Host] fit response with no tool selected");
            return;
        };
        debug!(tool = ?active.kind, uuid = %response.uuid, kind = ?response.kind, "[Host] delivering fit");
        let mut ctx = ToolContext::new(&mut self.scene, &mut self.fits);
        active.builder.on_fit_response(&mut ctx, response);
    }

    /// Take the host apart, returning the scene.
    pub fn into_scene(mut self) -> S {
        self.cancel_tool();
        self.scene
    }
}
