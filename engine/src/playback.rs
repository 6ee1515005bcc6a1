//! Recording Playback
//!
//! A recorded tool session is a JSON list of viewport events. Replaying it
//! against a [`ToolHost`] drives the builders exactly as live input would,
//! with the [`LocalCurveFitter`] standing in for the remote fitting service.
//!
//! ```json
//! {
//!   "events": [
//!     { "event": "select", "tool": "sphere" },
//!     { "event": "down", "hits": [[0, 0, 0]] },
//!     { "event": "hover", "hits": [[1, 1, 0]] },
//!     { "event": "down", "hits": [[3, 4, 0]] }
//!   ]
//! }
//! ```
//!
//! Pointer events without `hits` are picked through the recording's camera.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::camera::ViewCamera;
use crate::config::ToolConfig;
use crate::error::PlaybackError;
use crate::fit::LocalCurveFitter;
use crate::host::{ToolHost, ToolKind};
use crate::input::{Intersection, PointerEvent};
use crate::scene::SceneCollaborator;

/// Order in which pending fit requests are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOrder {
    /// Oldest request first
    #[default]
    Fifo,
    /// Newest request first, as a slow network might
    Reversed,
}

/// One step of a recorded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordedEvent {
    Select {
        tool: ToolKind,
    },
    Cancel,
    Hover {
        #[serde(default)]
        pointer: PointerEvent,
        /// Precomputed hit points; picked through the camera when absent
        #[serde(default)]
        hits: Option<Vec<Vec3>>,
    },
    Down {
        #[serde(default)]
        pointer: PointerEvent,
        #[serde(default)]
        hits: Option<Vec<Vec3>>,
    },
    /// Run every pending fit request through the local fitter.
    AnswerFits {
        #[serde(default)]
        order: AnswerOrder,
    },
    /// Lose every pending fit request.
    DropFits,
}

/// A replayable session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Builder settings; defaults when absent
    #[serde(default)]
    pub config: Option<ToolConfig>,
    #[serde(default)]
    pub camera: ViewCamera,
    pub events: Vec<RecordedEvent>,
}

/// Counters collected while replaying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub clicks_consumed: usize,
    pub fits_answered: usize,
    pub fits_dropped: usize,
}

impl Recording {
    pub fn from_json_str(json: &str) -> Result<Self, PlaybackError> {
        let recording: Recording = serde_json::from_str(json)?;
        if let Some(config) = &recording.config {
            config.validate()?;
        }
        Ok(recording)
    }

    pub fn load(path: &Path) -> Result<Self, PlaybackError> {
        let json = std::fs::read_to_string(path).map_err(|source| PlaybackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The recorded config, or the defaults.
    pub fn tool_config(&self) -> ToolConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Feed every event to `host`, in order.
    pub fn replay<S: SceneCollaborator>(&self, host: &mut ToolHost<S>) -> ReplaySummary {
        let mut fitter = LocalCurveFitter::new(host.config());
        let mut summary = ReplaySummary::default();

        for event in &self.events {
            summary.events += 1;
            match event {
                RecordedEvent::Select { tool } => host.select_tool(*tool),
                RecordedEvent::Cancel => host.cancel_tool(),
                RecordedEvent::Hover { pointer, hits } => {
                    let hits = self.intersections(host, pointer, hits.as_deref());
                    host.pointer_hover(pointer, &hits);
                }
                RecordedEvent::Down { pointer, hits } => {
                    let hits = self.intersections(host, pointer, hits.as_deref());
                    if host.pointer_down(pointer, &hits) {
                        summary.clicks_consumed += 1;
                    }
                }
                RecordedEvent::AnswerFits { order } => {
                    let mut requests = host.drain_fit_requests();
                    if *order == AnswerOrder::Reversed {
                        requests.reverse();
                    }
                    for request in &requests {
                        host.deliver_fit(fitter.fit(request));
                        summary.fits_answered += 1;
                    }
                }
                RecordedEvent::DropFits => {
                    let dropped = host.drain_fit_requests().len();
                    debug!(dropped, "[Replay] fit requests dropped");
                    summary.fits_dropped += dropped;
                }
            }
        }

        info!(
            events = summary.events,
            fits = summary.fits_answered,
            "[Replay] recording finished"
        );
        summary
    }

    fn intersections<S: SceneCollaborator>(
        &self,
        host: &ToolHost<S>,
        pointer: &PointerEvent,
        hits: Option<&[Vec3]>,
    ) -> Vec<Intersection> {
        match hits {
            Some(points) => points.iter().copied().map(Intersection::at).collect(),
            None => host.pick(pointer, &self.camera),
        }
    }
}
