//! Raycast Module
//!
//! Host-side picking: turns a pointer position into a world ray and
//! intersects it with the tool's picking plane. Builders only ever see the
//! resulting intersection list.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::input::{Intersection, Position};
use crate::scene::PickingPlane;

/// Rays closer to parallel than this never hit a plane.
const PARALLEL_EPSILON: f32 = 0.0001;

/// A world-space ray with a normalized direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Calculate ray direction from screen UV coordinates
///
/// # Arguments
/// * `camera_pos` - Camera position in world space
/// * `camera_target` - Point the camera is looking at
/// * `uv` - Normalized screen coordinates (0-1, 0-1) where (0,0) is bottom-left
/// * `aspect_ratio` - Screen aspect ratio (width / height)
/// * `fov` - Vertical field of view in radians
///
/// # Returns
/// Normalized ray direction in world space
pub fn get_ray_direction(
    camera_pos: Vec3,
    camera_target: Vec3,
    uv: (f32, f32),
    aspect_ratio: f32,
    fov: f32,
) -> Vec3 {
    let ndc = (uv.0 * 2.0 - 1.0, uv.1 * 2.0 - 1.0);
    let half_fov = (fov * 0.5_f32).tan();

    let forward = (camera_target - camera_pos).normalize();

    // Viewport convention is Z-up; fall back to X when looking along Z
    let (right, up) = if forward.z.abs() > 0.99 {
        let right = Vec3::X;
        let up = right.cross(forward).normalize();
        (right, up)
    } else {
        let right = forward.cross(Vec3::Z).normalize();
        let up = right.cross(forward);
        (right, up)
    };

    (forward + right * ndc.0 * aspect_ratio * half_fov + up * ndc.1 * half_fov).normalize()
}

/// Intersect a ray with a picking plane.
///
/// # Returns
/// * `Some(Intersection)` - Hit inside the plane's extent, in front of the ray
/// * `None` - Parallel ray, hit behind the origin, or outside the extent
pub fn intersect_picking_plane(ray: &Ray, plane: &PickingPlane) -> Option<Intersection> {
    let axis = plane.axis.index();
    let denom = ray.direction[axis];
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = (plane.offset - ray.origin[axis]) / denom;
    if t < 0.0 {
        return None;
    }

    let mut point = ray.at(t);
    // Snap exactly onto the plane to keep planar measurements clean
    point[axis] = plane.offset;

    if !plane.contains(point) {
        return None;
    }

    Some(Intersection { point, distance: t })
}

/// Camera projection settings used to cast picking rays.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycastConfig {
    /// Screen aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Vertical field of view in radians
    pub fov: f32,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            fov: 1.2, // ~69 degrees
        }
    }
}

impl RaycastConfig {
    /// Create a new raycast config with the given aspect ratio
    pub fn with_aspect(aspect_ratio: f32) -> Self {
        Self {
            aspect_ratio,
            ..Default::default()
        }
    }

    /// World ray through a pointer position.
    pub fn screen_ray(&self, camera_pos: Vec3, camera_target: Vec3, pointer: Position) -> Ray {
        let direction = get_ray_direction(
            camera_pos,
            camera_target,
            pointer.to_tuple(),
            self.aspect_ratio,
            self.fov,
        );
        Ray::new(camera_pos, direction)
    }
}

/// Where the viewport looks from, plus its projection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub projection: RaycastConfig,
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -10.0, 10.0),
            target: Vec3::ZERO,
            projection: RaycastConfig::default(),
        }
    }
}

impl ViewCamera {
    pub fn ray(&self, pointer: Position) -> Ray {
        self.projection.screen_ray(self.position, self.target, pointer)
    }
}
