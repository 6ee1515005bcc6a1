//! Scene Collaborator
//!
//! The viewport surface the builders talk to. Builders never own a scene;
//! the host lends one to every call as `&mut dyn SceneCollaborator`.
//!
//! The crate ships [`MemoryScene`], a recording implementation used by the
//! replay binary and the tests.

pub mod memory;

pub use memory::{EntityKind, EntityRecord, MemoryScene};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::Ray;
use crate::fit::CurveData;
use crate::input::Intersection;

// ============================================================================
// HANDLES
// ============================================================================

/// Opaque handle to a scene entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Opaque handle to a rendering material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u64);

/// Opaque handle to a built geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub u64);

// ============================================================================
// PICKING PLANE
// ============================================================================

/// World axis a picking plane is fixed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneAxis {
    X,
    Y,
    #[default]
    Z,
}

impl PlaneAxis {
    /// Component index of this axis in a `Vec3`.
    pub fn index(&self) -> usize {
        match self {
            PlaneAxis::X => 0,
            PlaneAxis::Y => 1,
            PlaneAxis::Z => 2,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(&self) -> Vec3 {
        match self {
            PlaneAxis::X => Vec3::X,
            PlaneAxis::Y => Vec3::Y,
            PlaneAxis::Z => Vec3::Z,
        }
    }

    /// Drop the component along this axis.
    pub fn flatten(&self, v: Vec3) -> Vec3 {
        let mut flat = v;
        flat[self.index()] = 0.0;
        flat
    }

    /// Distance between two points measured inside a plane fixed on this
    /// axis. For the default Z plane this is the x/y distance.
    pub fn planar_distance(&self, a: Vec3, b: Vec3) -> f32 {
        self.flatten(b - a).length()
    }
}

/// Surface installed while a tool is armed so pointer rays hit something.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickingPlane {
    /// Axis the plane is perpendicular to
    pub axis: PlaneAxis,
    /// Position of the plane along `axis`
    pub offset: f32,
    /// Side length of the (square) plane
    pub extent: f32,
    /// Snapping planes are drawn; plain picking planes are invisible
    pub visible: bool,
}

impl PickingPlane {
    pub fn invisible(axis: PlaneAxis, offset: f32, extent: f32) -> Self {
        Self {
            axis,
            offset,
            extent,
            visible: false,
        }
    }

    pub fn snapping(axis: PlaneAxis, offset: f32, extent: f32) -> Self {
        Self {
            axis,
            offset,
            extent,
            visible: true,
        }
    }

    /// Whether a point on the plane lies inside its finite extent.
    pub fn contains(&self, point: Vec3) -> bool {
        let half = self.extent * 0.5;
        let flat = self.axis.flatten(point);
        flat.x.abs() <= half && flat.y.abs() <= half && flat.z.abs() <= half
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// RGB color, components in 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Geometry a builder asks the scene to construct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Dodecahedron {
        radius: f32,
    },
    /// Axis-aligned box; a zero component gives a flat rectangle.
    Box {
        size: Vec3,
    },
    /// Cylinder around `axis`; zero height gives a disc.
    Cylinder {
        radius: f32,
        height: f32,
        axis: PlaneAxis,
    },
}

/// Where an entity lives while it is in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneLayer {
    /// Throwaway layer for in-progress shapes
    Preview,
    /// The model itself
    Permanent,
}

// ============================================================================
// COLLABORATOR
// ============================================================================

/// Everything a builder needs from the viewport.
pub trait SceneCollaborator {
    /// Install the picking surface, replacing any previous one.
    fn add_picking_plane(&mut self, plane: PickingPlane);

    /// Remove the picking surface if one is installed.
    fn remove_picking_plane(&mut self);

    fn create_geometry(&mut self, primitive: Primitive) -> GeometryId;

    fn create_material(&mut self, color: Color) -> MaterialId;

    /// The caller no longer holds `material`. Entities already using it keep it.
    fn release_material(&mut self, material: MaterialId);

    /// Takes ownership of `geometry`; it is freed with the entity.
    fn create_mesh_entity(&mut self, geometry: GeometryId, material: MaterialId) -> EntityId;

    /// Small marker sphere placed at `point`.
    fn create_point_marker(&mut self, point: Vec3) -> EntityId;

    fn create_curve_entity(&mut self, curve: &CurveData, color: Color) -> EntityId;

    fn set_entity_name(&mut self, entity: EntityId, name: &str);

    /// Attach an external identifier (such as a fitted curve's uuid).
    fn set_entity_tag(&mut self, entity: EntityId, tag: &str);

    fn set_entity_position(&mut self, entity: EntityId, position: Vec3);

    fn add_entity_to_scene(&mut self, entity: EntityId, layer: SceneLayer);

    /// Detach `entity` from the top level of the scene without destroying it.
    fn remove_entity_from_scene(&mut self, entity: EntityId);

    /// Remove `entity` from the scene and free it.
    fn destroy_entity(&mut self, entity: EntityId);

    /// Attach `child` under `parent` in the scene graph.
    fn attach_child(&mut self, parent: EntityId, child: EntityId);

    /// Hits of `ray` against the installed picking plane, nearest first.
    /// Empty when no plane is installed or the ray misses.
    fn pick(&self, ray: &Ray) -> Vec<Intersection>;
}
