//! Mouse Input Module
//!
//! Mouse button and screen position types shared by pointer events.
//! Decoupled from any windowing system.

use serde::{Deserialize, Serialize};

/// Mouse button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
    /// Additional mouse buttons (button 4, 5, etc.)
    Other(u16),
}

impl MouseButton {
    /// The button that places points and continues a tool session.
    pub fn is_primary(&self) -> bool {
        matches!(self, MouseButton::Left)
    }

    /// The button that asks a tool to finish what it is building.
    pub fn is_secondary(&self) -> bool {
        matches!(self, MouseButton::Right)
    }
}

/// 2D position, used for pointer coordinates.
///
/// Builders never read it; the host uses it to cast picking rays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert to tuple.
    pub fn to_tuple(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl From<(f32, f32)> for Position {
    fn from(tuple: (f32, f32)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}
