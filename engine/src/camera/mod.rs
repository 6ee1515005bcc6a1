//! Camera Module
//!
//! Picking-ray math for the viewport host.
//! This module is window-system agnostic - it only deals with camera math.

pub mod raycast;

pub use raycast::{Ray, RaycastConfig, ViewCamera, get_ray_direction, intersect_picking_plane};
