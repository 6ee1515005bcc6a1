//! Curve Builder
//!
//! Open-ended spline tool. Every click adds an anchor point and a small
//! control marker; the curve itself is fitted by the [`FitService`] and comes
//! back later through [`ShapeBuilder::on_fit_response`].
//!
//! ```text
//! Empty --click--> Collecting --click--> Collecting
//!                       |
//!                       +--secondary click--> Finalizing --finalize response--> Empty (disarmed)
//! ```
//!
//! The first response pins the correlation id of the session; every later
//! preview request is tagged with it. Responses carry a [`FitTicket`] so a
//! response addressed to an older session is dropped instead of being taken
//! for this session's final curve.
//!
//! [`FitService`]: crate::fit::FitService

use glam::Vec3;
use tracing::{debug, info, warn};

use super::{SessionResources, ShapeBuilder, ToolContext};
use crate::config::ToolConfig;
use crate::fit::{FitKind, FitRequest, FitResponse, FitTicket};
use crate::input::{Intersection, PointerEvent, first_hit};
use crate::scene::{EntityId, SceneLayer};

const TOOL: &str = "Spline";

/// Where a curve session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveStep {
    /// No anchor yet
    #[default]
    Empty,
    /// At least one anchor, previews flowing
    Collecting,
    /// Finalize request sent, waiting for the answer
    Finalizing,
}

pub struct CurveBuilder {
    config: ToolConfig,
    armed: bool,
    step: CurveStep,
    /// Session number from the fit service, stamped on every request
    generation: u64,
    next_sequence: u64,
    anchor_points: Vec<Vec3>,
    control_markers: Vec<EntityId>,
    correlation_id: String,
    resources: SessionResources,
    /// Sequence of the newest preview applied so far
    latest_preview: Option<u64>,
    committed: Option<EntityId>,
}

impl CurveBuilder {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            config,
            armed: false,
            step: CurveStep::Empty,
            generation: 0,
            next_sequence: 0,
            anchor_points: Vec::new(),
            control_markers: Vec::new(),
            correlation_id: String::new(),
            resources: SessionResources::default(),
            latest_preview: None,
            committed: None,
        }
    }

    pub fn step(&self) -> CurveStep {
        self.step
    }

    pub fn anchor_points(&self) -> &[Vec3] {
        &self.anchor_points
    }

    pub fn control_markers(&self) -> &[EntityId] {
        &self.control_markers
    }

    /// Empty until the first fit response of the session arrives.
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn preview(&self) -> Option<EntityId> {
        self.resources.preview()
    }

    /// Curve committed by the last finished session.
    pub fn committed(&self) -> Option<EntityId> {
        self.committed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn send(&mut self, ctx: &mut ToolContext<'_>, kind: FitKind, correlation_id: String, points: Vec<Vec3>) {
        let ticket = FitTicket {
            session: self.generation,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        debug!(
            tool = TOOL,
            ?kind,
            sequence = ticket.sequence,
            points = points.len(),
            "fit requested"
        );
        ctx.fits.request_fit(FitRequest {
            ticket,
            kind,
            correlation_id,
            points,
        });
    }

    /// Drop everything the session owns except committed curves.
    fn discard_session(&mut self, ctx: &mut ToolContext<'_>) {
        for marker in self.control_markers.drain(..) {
            ctx.scene.destroy_entity(marker);
        }
        self.resources.release(ctx.scene);
        self.anchor_points.clear();
        self.correlation_id.clear();
        self.latest_preview = None;
    }

    fn build_curve(&mut self, ctx: &mut ToolContext<'_>, response: &FitResponse) -> EntityId {
        let color = response.color.unwrap_or(self.config.curve_color);
        let curve = ctx.scene.create_curve_entity(&response.value, color);
        ctx.scene.set_entity_name(curve, &response.name);
        ctx.scene.set_entity_tag(curve, &response.uuid);
        curve
    }

    fn apply_preview(&mut self, ctx: &mut ToolContext<'_>, response: FitResponse) {
        if self.step == CurveStep::Finalizing {
            debug!(tool = TOOL, uuid = %response.uuid, "preview ignored while finalizing");
            return;
        }
        let sequence = response.ticket.sequence;
        if self.latest_preview.is_some_and(|latest| sequence < latest) {
            debug!(tool = TOOL, sequence, "out-of-order preview dropped");
            return;
        }

        let curve = self.build_curve(ctx, &response);
        if self.correlation_id.is_empty() {
            self.correlation_id = response.uuid.clone();
            info!(tool = TOOL, uuid = %response.uuid, "[Spline] session pinned");
        } else if self.correlation_id != response.uuid {
            debug!(
                tool = TOOL,
                pinned = %self.correlation_id,
                uuid = %response.uuid,
                "preview answered under a different uuid"
            );
        }
        self.resources.replace_preview(ctx.scene, curve);
        self.latest_preview = Some(sequence);
    }

    /// Hand the markers to the finished curve and end the session.
    fn finalize_curve(&mut self, ctx: &mut ToolContext<'_>, curve: EntityId) {
        self.resources.clear_preview(ctx.scene);

        let markers = self.control_markers.len();
        for marker in self.control_markers.drain(..) {
            ctx.scene.remove_entity_from_scene(marker);
            ctx.scene.attach_child(curve, marker);
        }
        ctx.scene.add_entity_to_scene(curve, SceneLayer::Permanent);

        self.correlation_id.clear();
        self.anchor_points.clear();
        self.latest_preview = None;
        self.committed = Some(curve);
        self.step = CurveStep::Empty;
        info!(tool = TOOL, markers, "[Spline] curve committed");

        self.stop_tool(ctx);
    }
}

impl ShapeBuilder for CurveBuilder {
    fn tool_name(&self) -> &'static str {
        TOOL
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn start_tool(&mut self, ctx: &mut ToolContext<'_>) {
        if self.armed {
            self.discard_session(ctx);
        }
        self.generation = ctx.fits.open_session();
        self.next_sequence = 0;
        self.step = CurveStep::Empty;
        self.resources = SessionResources::default();
        self.committed = None;

        ctx.scene.add_picking_plane(self.config.picking_plane.snapping());
        self.armed = true;
        info!(tool = TOOL, generation = self.generation, "[Spline] tool armed");
    }

    fn stop_tool(&mut self, ctx: &mut ToolContext<'_>) {
        if !self.armed {
            return;
        }
        self.discard_session(ctx);
        ctx.scene.remove_picking_plane();
        self.generation = ctx.fits.open_session();
        self.step = CurveStep::Empty;
        self.armed = false;
        info!(tool = TOOL, "[Spline] tool disarmed");
    }

    fn on_pointer_hover(
        &mut self,
        ctx: &mut ToolContext<'_>,
        _event: &PointerEvent,
        intersections: &[Intersection],
    ) {
        if !self.armed || self.step != CurveStep::Collecting || self.correlation_id.is_empty() {
            return;
        }
        let Some(point) = first_hit(intersections) else {
            return;
        };

        let mut points = self.anchor_points.clone();
        points.push(point);
        let correlation_id = self.correlation_id.clone();
        self.send(ctx, FitKind::Preview, correlation_id, points);
    }

    fn on_pointer_down(
        &mut self,
        ctx: &mut ToolContext<'_>,
        event: &PointerEvent,
        intersections: &[Intersection],
    ) -> bool {
        if !self.armed {
            return false;
        }
        if self.step == CurveStep::Finalizing {
            debug!(tool = TOOL, "click ignored while finalizing");
            return true;
        }
        let Some(point) = first_hit(intersections) else {
            return true;
        };

        self.anchor_points.push(point);
        let marker = ctx.scene.create_point_marker(point);
        ctx.scene.add_entity_to_scene(marker, SceneLayer::Permanent);
        self.control_markers.push(marker);
        debug!(
            tool = TOOL,
            anchors = self.anchor_points.len(),
            x = point.x,
            y = point.y,
            z = point.z,
            "anchor placed"
        );

        if self.anchor_points.len() == 1 {
            self.step = CurveStep::Collecting;
            let nudged = point + Vec3::X * self.config.bootstrap_offset;
            let correlation_id = self.correlation_id.clone();
            self.send(ctx, FitKind::Preview, correlation_id, vec![point, nudged]);
        } else if event.button.is_secondary() {
            self.step = CurveStep::Finalizing;
            let points = self.anchor_points.clone();
            self.send(ctx, FitKind::Finalize, String::new(), points);
        } else {
            let points = self.anchor_points.clone();
            let correlation_id = self.correlation_id.clone();
            self.send(ctx, FitKind::Preview, correlation_id, points);
        }
        true
    }

    fn on_fit_response(&mut self, ctx: &mut ToolContext<'_>, response: FitResponse) {
        if !self.armed || response.ticket.session != self.generation {
            warn!(
                tool = TOOL,
                session = response.ticket.session,
                generation = self.generation,
                uuid = %response.uuid,
                "stale fit response dropped"
            );
            return;
        }

        match response.kind {
            FitKind::Preview => self.apply_preview(ctx, response),
            FitKind::Finalize => {
                let curve = self.build_curve(ctx, &response);
                self.finalize_curve(ctx, curve);
            }
        }
    }
}
