//! Scene model: materials, meshes and the objects that tie them together.
//!
//! This module provides the minimal scene representation the
//! deduplication pass operates on:
//! - [`Material`] - Surface attributes plus an optional shader graph
//! - [`ShaderGraph`] / [`ShaderNode`] / [`NodeLink`] - Node networks
//! - [`Mesh`] / [`Face`] - Material slots and per-face assignments
//! - [`Scene`] / [`SceneObject`] - The material library and object list

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::util::{Error, Result};

pub mod graph;
pub mod material;
pub mod mesh;

// Re-export material types
pub use material::{BlendMethod, Material, MaterialId};

// Re-export graph types
pub use graph::{
    ImageId, InputSocket, Interpolation, NodeKey, NodeLink, ShaderGraph, ShaderNode, SocketValue,
    IMAGE_TEXTURE, PRINCIPLED_BSDF,
};

// Re-export mesh types
pub use mesh::{Face, FaceEdit, Mesh, ObjectMode};

/// Non-mesh payload or mesh data of a scene object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ObjectData {
    /// Mesh with material slots and faces
    Mesh(Mesh),
    /// Camera, carries no materials
    Camera,
    /// Light, carries no materials
    Light,
    /// Empty or helper object
    Empty,
}

impl ObjectData {
    /// Mesh payload, if this object is a mesh.
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Mutable mesh payload, if this object is a mesh.
    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match self {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

/// An object in the scene: a name, a selection flag and its data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object name.
    pub name: String,
    /// Whether the object is part of the current selection.
    #[serde(default)]
    pub selected: bool,
    /// Object payload.
    pub data: ObjectData,
}

impl SceneObject {
    /// Create a mesh object.
    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            selected: false,
            data: ObjectData::Mesh(mesh),
        }
    }

    /// Create a non-mesh object.
    pub fn other(name: impl Into<String>, data: ObjectData) -> Self {
        Self {
            name: name.into(),
            selected: false,
            data,
        }
    }

    /// Set the selection flag.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// True if the object carries mesh data.
    pub fn is_mesh(&self) -> bool {
        matches!(self.data, ObjectData::Mesh(_))
    }
}

/// A scene: the material library plus the object list.
///
/// Materials are owned by the scene and referenced from mesh slots by
/// [`MaterialId`]. Ids are opaque to the library; documents and callers
/// assign them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Material library.
    #[serde(default)]
    pub materials: Vec<Material>,
    /// Objects in scene order.
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material to the library, returning its id.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = material.id;
        self.materials.push(material);
        id
    }

    /// Add an object to the scene.
    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Look up a material by id.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// True if any object is selected.
    pub fn any_selected(&self) -> bool {
        self.objects.iter().any(|o| o.selected)
    }

    /// Select every object.
    pub fn select_all(&mut self) {
        for obj in &mut self.objects {
            obj.selected = true;
        }
    }

    /// Ids of all materials referenced by at least one slot anywhere in
    /// the scene.
    pub fn referenced_material_ids(&self) -> HashSet<MaterialId> {
        let mut ids = HashSet::new();
        for obj in &self.objects {
            if let Some(mesh) = obj.data.as_mesh() {
                ids.extend(mesh.slots.iter().flatten().copied());
            }
        }
        ids
    }

    /// Remove candidate materials that are no longer referenced by any
    /// slot, returning how many were purged.
    ///
    /// Only materials in `candidates` are considered; a candidate still
    /// referenced somewhere (for example by an unselected mesh) is kept.
    pub fn purge_unused_materials(&mut self, candidates: &HashSet<MaterialId>) -> usize {
        if candidates.is_empty() {
            return 0;
        }
        let referenced = self.referenced_material_ids();
        let before = self.materials.len();
        self.materials.retain(|m| {
            let keep = !candidates.contains(&m.id) || referenced.contains(&m.id);
            if !keep {
                debug!("purging unused material '{}' (id {})", m.name, m.id);
            }
            keep
        });
        before - self.materials.len()
    }

    /// Structural validation: material ids are unique and every slot
    /// reference resolves.
    ///
    /// Node link indices are deliberately not validated here; graph
    /// comparison treats broken links as non-matching instead.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for mat in &self.materials {
            if !seen.insert(mat.id) {
                return Err(Error::invalid(format!("duplicate material id {}", mat.id)));
            }
        }
        for obj in &self.objects {
            if let Some(mesh) = obj.data.as_mesh() {
                for (i, slot) in mesh.slots.iter().enumerate() {
                    if let Some(id) = slot {
                        if !seen.contains(id) {
                            return Err(Error::invalid(format!(
                                "object '{}' slot {} references unknown material {}",
                                obj.name, i, id
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_mesh_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_material(Material::new(MaterialId(1), "A"));
        scene.add_material(Material::new(MaterialId(2), "B"));

        let mut m1 = Mesh::new("cube");
        m1.add_slot(Some(MaterialId(1)));
        let mut m2 = Mesh::new("plane");
        m2.add_slot(Some(MaterialId(2)));

        scene.add_object(SceneObject::mesh("Cube", m1));
        scene.add_object(SceneObject::mesh("Plane", m2));
        scene
    }

    #[test]
    fn test_material_lookup() {
        let scene = two_mesh_scene();
        assert_eq!(scene.material(MaterialId(2)).unwrap().name, "B");
        assert!(scene.material(MaterialId(99)).is_none());
    }

    #[test]
    fn test_purge_only_touches_candidates() {
        let mut scene = two_mesh_scene();
        scene.add_material(Material::new(MaterialId(3), "C"));
        scene.add_material(Material::new(MaterialId(4), "D"));

        // 2 is a candidate but still referenced by "plane"; 3 is an
        // unreferenced candidate; 4 is unreferenced but not a candidate.
        let candidates: HashSet<_> = [MaterialId(2), MaterialId(3)].into_iter().collect();
        assert_eq!(scene.purge_unused_materials(&candidates), 1);
        assert!(scene.material(MaterialId(2)).is_some());
        assert!(scene.material(MaterialId(3)).is_none());
        assert!(scene.material(MaterialId(4)).is_some());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut scene = Scene::new();
        scene.add_material(Material::new(MaterialId(1), "A"));
        scene.add_material(Material::new(MaterialId(1), "A.001"));
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_dangling_slot() {
        let mut scene = Scene::new();
        let mut mesh = Mesh::new("cube");
        mesh.add_slot(Some(MaterialId(42)));
        scene.add_object(SceneObject::mesh("Cube", mesh));
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_empty_slots() {
        let mut scene = Scene::new();
        let mut mesh = Mesh::new("cube");
        mesh.add_slot(None);
        scene.add_object(SceneObject::mesh("Cube", mesh));
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_select_all() {
        let mut scene = two_mesh_scene();
        assert!(!scene.any_selected());
        scene.select_all();
        assert!(scene.any_selected());
        assert!(scene.objects.iter().all(|o| o.selected));
    }
}
