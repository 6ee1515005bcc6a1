//! Input Module
//!
//! Platform-agnostic pointer input consumed by the shape builders.
//!
//! # Example
//!
//! ```rust,ignore
//! use viewport_builders::input::{Intersection, PointerEvent};
//!
//! let hits = [Intersection::at(Vec3::new(1.0, 2.0, 0.0))];
//! builder.on_pointer_down(&mut ctx, &PointerEvent::primary(), &hits);
//! ```

pub mod mouse;
pub mod pointer;

pub use mouse::{MouseButton, Position};
pub use pointer::{Intersection, PointerEvent, first_hit};
