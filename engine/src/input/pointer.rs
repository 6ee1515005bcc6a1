//! Pointer Events
//!
//! What the host forwards into a builder: the pointer event itself and the
//! already-computed ray hits against the picking plane.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::mouse::{MouseButton, Position};

/// A single pointer move or click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Button that triggered the event (hover events carry the default)
    #[serde(default)]
    pub button: MouseButton,
    /// Normalized screen position (0-1, 0-1), origin bottom-left
    #[serde(default)]
    pub position: Position,
}

impl PointerEvent {
    pub fn new(button: MouseButton, position: Position) -> Self {
        Self { button, position }
    }

    /// A left-button event at the screen origin. Handy when only the
    /// intersections matter.
    pub fn primary() -> Self {
        Self::new(MouseButton::Left, Position::default())
    }

    /// A right-button event at the screen origin.
    pub fn secondary() -> Self {
        Self::new(MouseButton::Right, Position::default())
    }
}

/// One ray/surface hit, nearest first in an intersection list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// Hit point in world space
    pub point: Vec3,
    /// Distance along the ray
    #[serde(default)]
    pub distance: f32,
}

impl Intersection {
    pub fn at(point: Vec3) -> Self {
        Self {
            point,
            distance: 0.0,
        }
    }
}

/// Nearest hit of an intersection list, `None` when the ray missed.
pub fn first_hit(intersections: &[Intersection]) -> Option<Vec3> {
    intersections.first().map(|hit| hit.point)
}
