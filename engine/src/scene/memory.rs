//! In-Memory Scene
//!
//! A [`SceneCollaborator`] that keeps the scene graph in plain maps. It does
//! no rendering; it is the stand-in viewport for the replay binary and the
//! place tests look to see what a builder did.

use std::collections::{BTreeMap, HashMap};

use glam::Vec3;
use tracing::{debug, warn};

use super::{
    Color, EntityId, GeometryId, MaterialId, PickingPlane, Primitive, SceneCollaborator,
    SceneLayer,
};
use crate::camera::raycast::{Ray, intersect_picking_plane};
use crate::config::ToolConfig;
use crate::fit::CurveData;
use crate::input::Intersection;

/// What an entity is.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Mesh {
        primitive: Primitive,
        material: MaterialId,
    },
    Marker {
        point: Vec3,
        radius: f32,
    },
    Curve {
        points: Vec<Vec3>,
        color: Color,
    },
}

/// One live entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub name: String,
    /// External identifier, empty when unset
    pub tag: String,
    pub position: Vec3,
    /// Parent entity when attached below another entity
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
    /// Top-level layer, `None` when not at the scene root
    pub layer: Option<SceneLayer>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MaterialRecord {
    color: Color,
    released: bool,
}

/// Recording scene graph.
#[derive(Debug, Default)]
pub struct MemoryScene {
    next_id: u64,
    entities: BTreeMap<EntityId, EntityRecord>,
    geometries: HashMap<GeometryId, Primitive>,
    materials: HashMap<MaterialId, MaterialRecord>,
    picking_plane: Option<PickingPlane>,
    marker_radius: f32,
    /// Total entities ever destroyed
    pub destroyed_count: usize,
    /// Total materials ever created
    pub materials_created: usize,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::with_config(&ToolConfig::default())
    }

    pub fn with_config(config: &ToolConfig) -> Self {
        Self {
            marker_radius: config.marker_radius,
            ..Default::default()
        }
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_entity(&mut self, kind: EntityKind, position: Vec3) -> EntityId {
        let id = EntityId(self.next());
        self.entities.insert(
            id,
            EntityRecord {
                kind,
                name: String::new(),
                tag: String::new(),
                position,
                parent: None,
                children: Vec::new(),
                layer: None,
            },
        );
        id
    }

    fn detach_from_parent(&mut self, entity: EntityId) {
        let Some(parent) = self.entities.get_mut(&entity).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(parent) = self.entities.get_mut(&parent) {
            parent.children.retain(|c| *c != entity);
        }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn entity(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Top-level entities on `layer`, in creation order.
    pub fn layer_entities(&self, layer: SceneLayer) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.layer == Some(layer))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn preview_entities(&self) -> Vec<EntityId> {
        self.layer_entities(SceneLayer::Preview)
    }

    pub fn permanent_entities(&self) -> Vec<EntityId> {
        self.layer_entities(SceneLayer::Permanent)
    }

    pub fn children_of(&self, id: EntityId) -> &[EntityId] {
        self.entities
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Top-level entity carrying `tag`.
    pub fn find_by_tag(&self, tag: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, e)| e.layer.is_some() && e.tag == tag)
            .map(|(id, _)| *id)
    }

    /// First top-level entity with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, e)| e.layer.is_some() && e.name == name)
            .map(|(id, _)| *id)
    }

    /// Geometries created but not yet turned into a mesh.
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Live entities, attached or not.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn picking_plane(&self) -> Option<&PickingPlane> {
        self.picking_plane.as_ref()
    }

    pub fn material_color(&self, material: MaterialId) -> Option<Color> {
        self.materials.get(&material).map(|m| m.color)
    }

    pub fn is_material_released(&self, material: MaterialId) -> bool {
        self.materials.get(&material).is_some_and(|m| m.released)
    }

    /// One line per top-level entity, children indented below.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (id, entity) in self.entities.iter().filter(|(_, e)| e.layer.is_some()) {
            self.describe_entity(&mut out, *id, entity, 0);
        }
        out
    }

    fn describe_entity(&self, out: &mut String, id: EntityId, entity: &EntityRecord, depth: usize) {
        let kind = match &entity.kind {
            EntityKind::Mesh { primitive, .. } => format!("{primitive:?}"),
            EntityKind::Marker { point, .. } => {
                format!("Marker ({:.2}, {:.2}, {:.2})", point.x, point.y, point.z)
            }
            EntityKind::Curve { points, .. } => format!("Curve ({} samples)", points.len()),
        };
        let p = entity.position;
        out.push_str(&format!(
            "{}#{} \"{}\" {} at ({:.2}, {:.2}, {:.2})\n",
            "  ".repeat(depth),
            id.0,
            entity.name,
            kind,
            p.x,
            p.y,
            p.z
        ));
        for child in &entity.children {
            if let Some(record) = self.entities.get(child) {
                self.describe_entity(out, *child, record, depth + 1);
            }
        }
    }
}

impl SceneCollaborator for MemoryScene {
    fn add_picking_plane(&mut self, plane: PickingPlane) {
        self.picking_plane = Some(plane);
    }

    fn remove_picking_plane(&mut self) {
        self.picking_plane = None;
    }

    fn create_geometry(&mut self, primitive: Primitive) -> GeometryId {
        let id = GeometryId(self.next());
        self.geometries.insert(id, primitive);
        id
    }

    fn create_material(&mut self, color: Color) -> MaterialId {
        let id = MaterialId(self.next());
        self.materials.insert(
            id,
            MaterialRecord {
                color,
                released: false,
            },
        );
        self.materials_created += 1;
        id
    }

    fn release_material(&mut self, material: MaterialId) {
        if let Some(record) = self.materials.get_mut(&material) {
            record.released = true;
        }
    }

    fn create_mesh_entity(&mut self, geometry: GeometryId, material: MaterialId) -> EntityId {
        let primitive = match self.geometries.remove(&geometry) {
            Some(primitive) => primitive,
            None => {
                warn!(geometry = geometry.0, "[Scene] mesh created from unknown geometry");
                Primitive::Box { size: Vec3::ZERO }
            }
        };
        self.insert_entity(
            EntityKind::Mesh {
                primitive,
                material,
            },
            Vec3::ZERO,
        )
    }

    fn create_point_marker(&mut self, point: Vec3) -> EntityId {
        let radius = self.marker_radius;
        self.insert_entity(EntityKind::Marker { point, radius }, point)
    }

    fn create_curve_entity(&mut self, curve: &CurveData, color: Color) -> EntityId {
        self.insert_entity(
            EntityKind::Curve {
                points: curve.points.clone(),
                color,
            },
            Vec3::ZERO,
        )
    }

    fn set_entity_name(&mut self, entity: EntityId, name: &str) {
        if let Some(record) = self.entities.get_mut(&entity) {
            record.name = name.to_string();
        }
    }

    fn set_entity_tag(&mut self, entity: EntityId, tag: &str) {
        if let Some(record) = self.entities.get_mut(&entity) {
            record.tag = tag.to_string();
        }
    }

    fn set_entity_position(&mut self, entity: EntityId, position: Vec3) {
        if let Some(record) = self.entities.get_mut(&entity) {
            record.position = position;
        }
    }

    fn add_entity_to_scene(&mut self, entity: EntityId, layer: SceneLayer) {
        self.detach_from_parent(entity);
        if let Some(record) = self.entities.get_mut(&entity) {
            record.layer = Some(layer);
        }
    }

    fn remove_entity_from_scene(&mut self, entity: EntityId) {
        if let Some(record) = self.entities.get_mut(&entity) {
            record.layer = None;
        }
    }

    fn destroy_entity(&mut self, entity: EntityId) {
        self.detach_from_parent(entity);
        let Some(record) = self.entities.remove(&entity) else {
            return;
        };
        for child in record.children {
            self.destroy_entity(child);
        }
        self.destroyed_count += 1;
        debug!(entity = entity.0, "[Scene] entity destroyed");
    }

    fn attach_child(&mut self, parent: EntityId, child: EntityId) {
        if parent == child || !self.entities.contains_key(&parent) {
            return;
        }
        self.detach_from_parent(child);
        let Some(record) = self.entities.get_mut(&child) else {
            return;
        };
        record.parent = Some(parent);
        if let Some(parent) = self.entities.get_mut(&parent) {
            parent.children.push(child);
        }
    }

    fn pick(&self, ray: &Ray) -> Vec<Intersection> {
        self.picking_plane
            .as_ref()
            .and_then(|plane| intersect_picking_plane(ray, plane))
            .into_iter()
            .collect()
    }
}
