//! Local Curve Fitter
//!
//! In-process stand-in for the remote fitting service: samples a uniform
//! Catmull-Rom spline through the requested points.

use glam::Vec3;
use tracing::debug;

use super::{CurveData, FitRequest, FitResponse};
use crate::config::ToolConfig;
use crate::scene::Color;

/// Sample a Catmull-Rom spline through `points` at `divisions + 1` evenly
/// spaced parameters. End segments reuse the end points as phantom controls,
/// so the curve passes through every input point.
pub fn sample_catmull_rom(points: &[Vec3], divisions: usize) -> Vec<Vec3> {
    match points.len() {
        0 => return Vec::new(),
        1 => return vec![points[0]],
        _ => {}
    }
    let divisions = divisions.max(1);
    let segments = points.len() - 1;
    let last = points.len() - 1;

    (0..=divisions)
        .map(|i| {
            let t = i as f32 / divisions as f32 * segments as f32;
            let seg = (t.floor() as usize).min(segments - 1);
            let u = t - seg as f32;

            let p0 = points[seg.saturating_sub(1)];
            let p1 = points[seg];
            let p2 = points[(seg + 1).min(last)];
            let p3 = points[(seg + 2).min(last)];

            let u2 = u * u;
            let u3 = u2 * u;
            0.5 * (2.0 * p1
                + (p2 - p0) * u
                + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
                + (3.0 * p1 - p0 - 3.0 * p2 + p3) * u3)
        })
        .collect()
}

/// Answers fit requests synchronously.
///
/// A request with a correlation id keeps the curve identity it names; every
/// request without one gets a fresh identity.
#[derive(Debug)]
pub struct LocalCurveFitter {
    samples_per_point: usize,
    color: Color,
    next_curve: u64,
}

impl LocalCurveFitter {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            samples_per_point: config.curve_samples_per_point,
            color: config.curve_color,
            next_curve: 0,
        }
    }

    pub fn fit(&mut self, request: &FitRequest) -> FitResponse {
        let uuid = if request.correlation_id.is_empty() {
            self.next_curve += 1;
            format!("spline-{:04}", self.next_curve)
        } else {
            request.correlation_id.clone()
        };

        let divisions = request.points.len() * self.samples_per_point;
        let value = CurveData {
            points: sample_catmull_rom(&request.points, divisions),
        };
        debug!(
            uuid = %uuid,
            anchors = request.points.len(),
            samples = value.points.len(),
            "[Fitter] curve fitted"
        );

        FitResponse::answering(request, uuid, value).with_color(self.color)
    }
}
