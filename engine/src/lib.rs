//! Viewport Builders Library
//!
//! Interactive shape-building tools for a pointer-driven 3D viewport.
//! A host arms one builder at a time, forwards pointer hovers and clicks
//! (already intersected with the tool's picking plane) and fit responses,
//! and the builder previews and commits primitives through a scene
//! collaborator.
//!
//! # Modules
//!
//! - [`tools`] - The builder protocol and the sphere, polyhedron, box,
//!   cylinder and spline builders
//! - [`scene`] - The scene collaborator interface and an in-memory scene
//! - [`fit`] - Asynchronous curve fit messages and a local fitter
//! - [`host`] - Tool selection and event routing
//! - [`input`] - Pointer events and intersections
//! - [`camera`] - Picking rays against the picking plane
//! - [`config`] - Builder settings
//! - [`playback`] - Replay of recorded sessions
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec3;
//! use viewport_builders::{Intersection, MemoryScene, PointerEvent, ToolConfig, ToolHost, ToolKind};
//!
//! let mut host = ToolHost::new(MemoryScene::new(), ToolConfig::default());
//! host.select_tool(ToolKind::Sphere);
//!
//! // Center, then a point on the surface
//! host.pointer_down(&PointerEvent::primary(), &[Intersection::at(Vec3::ZERO)]);
//! host.pointer_down(&PointerEvent::primary(), &[Intersection::at(Vec3::new(3.0, 4.0, 0.0))]);
//!
//! // A radius 5 sphere is in the scene and the tool is disarmed
//! assert!(!host.is_armed());
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod fit;
pub mod host;
pub mod input;
pub mod playback;
pub mod scene;
pub mod tools;

// Re-export the types a host needs at crate level
pub use config::ToolConfig;
pub use error::{ConfigError, PlaybackError};
pub use fit::{FitKind, FitRequest, FitResponse, FitService, FitTicket, LocalCurveFitter};
pub use host::{ToolHost, ToolKind};
pub use input::{Intersection, MouseButton, PointerEvent};
pub use scene::{MemoryScene, SceneCollaborator};
pub use tools::{CurveBuilder, PolyhedronBuilder, ShapeBuilder, SphereBuilder, ToolContext};
