//! Curve Fit Protocol
//!
//! Request/response types exchanged with the asynchronous curve-fitting
//! collaborator. Requests are fire-and-forget; the host later delivers each
//! response to the armed builder through `on_fit_response`.
//!
//! Every message carries a [`FitTicket`] naming the builder session that
//! issued it and a [`FitKind`] saying whether it is a preview or the final
//! commit, so a builder never has to guess from the uuid alone.

pub mod local;

pub use local::{LocalCurveFitter, sample_catmull_rom};

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::Color;

/// Identifies which builder session (and which request within it) a fit
/// message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FitTicket {
    /// Session generation of the issuing builder
    pub session: u64,
    /// Increasing per request within the session
    pub sequence: u64,
}

static_assertions::assert_impl_all!(FitTicket: Copy, Eq, std::hash::Hash, Send, Sync);

/// What the issuing builder will do with the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitKind {
    /// Replace the live preview
    Preview,
    /// Commit the curve and end the session
    Finalize,
}

/// Fitted curve payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    /// Polyline samples along the fitted curve
    pub points: Vec<Vec3>,
}

/// A request to fit a curve through `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitRequest {
    pub ticket: FitTicket,
    pub kind: FitKind,
    /// Identifier of the curve being previewed; empty before the first
    /// response pins it, and always empty on the finalize request
    pub correlation_id: String,
    pub points: Vec<Vec3>,
}

/// The fitter's answer to a [`FitRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResponse {
    /// Copied from the request
    pub ticket: FitTicket,
    /// Copied from the request
    pub kind: FitKind,
    pub value: CurveData,
    #[serde(default)]
    pub color: Option<Color>,
    pub name: String,
    pub uuid: String,
}

impl FitResponse {
    /// A response to `request` carrying the given curve identity and payload.
    pub fn answering(request: &FitRequest, uuid: impl Into<String>, value: CurveData) -> Self {
        Self {
            ticket: request.ticket,
            kind: request.kind,
            value,
            color: None,
            name: "Spline".to_string(),
            uuid: uuid.into(),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// The asynchronous fitting collaborator, as seen from a builder.
pub trait FitService {
    /// A session number never handed out before by this service. Builders
    /// stamp it on their tickets, so answers to any earlier session, from
    /// any builder, can be told apart.
    fn open_session(&mut self) -> u64;

    /// Send `request`; the answer arrives later, possibly out of order.
    fn request_fit(&mut self, request: FitRequest);
}

/// Holds requests until the host forwards them to a real fitter.
#[derive(Debug, Default)]
pub struct QueuedFitService {
    pending: VecDeque<FitRequest>,
    last_session: u64,
}

impl QueuedFitService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &VecDeque<FitRequest> {
        &self.pending
    }

    pub fn last(&self) -> Option<&FitRequest> {
        self.pending.back()
    }

    /// Take every pending request, oldest first.
    pub fn drain(&mut self) -> Vec<FitRequest> {
        self.pending.drain(..).collect()
    }
}

impl FitService for QueuedFitService {
    fn open_session(&mut self) -> u64 {
        self.last_session += 1;
        self.last_session
    }

    fn request_fit(&mut self, request: FitRequest) {
        self.pending.push_back(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: FitKind) -> FitRequest {
        FitRequest {
            ticket: FitTicket {
                session: 3,
                sequence: 7,
            },
            kind,
            correlation_id: String::new(),
            points: vec![Vec3::ZERO, Vec3::X],
        }
    }

    #[test]
    fn test_sessions_only_go_up() {
        let mut fits = QueuedFitService::new();
        let first = fits.open_session();
        let second = fits.open_session();
        fits.drain();
        assert!(first > 0);
        assert!(second > first);
        assert!(fits.open_session() > second);
    }

    #[test]
    fn test_response_copies_ticket_and_kind() {
        let req = request(FitKind::Finalize);
        let resp = FitResponse::answering(&req, "abc", CurveData::default());
        assert_eq!(resp.ticket, req.ticket);
        assert_eq!(resp.kind, FitKind::Finalize);
        assert_eq!(resp.uuid, "abc");
        assert!(resp.color.is_none());
    }

    #[test]
    fn test_queue_keeps_request_order() {
        let mut queue = QueuedFitService::new();
        queue.request_fit(request(FitKind::Preview));
        queue.request_fit(request(FitKind::Finalize));
        assert_eq!(queue.last().map(|r| r.kind), Some(FitKind::Finalize));

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, FitKind::Preview);
        assert!(queue.pending().is_empty());
    }

    #[test]
    fn test_response_json_uses_snake_case_kind() {
        let resp = FitResponse::answering(&request(FitKind::Preview), "id-1", CurveData::default());
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"kind\":\"preview\""));
    }
}
