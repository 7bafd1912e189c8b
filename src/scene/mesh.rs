//! Mesh data: material slots and per-face slot assignments.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::scene::material::MaterialId;

/// A polygon's material binding: an index into the owning mesh's slot
/// list.
///
/// Geometry (vertex positions, normals, UVs) is out of scope here; a
/// face is exactly the data the deduplication pass needs to preserve
/// visual correctness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Face {
    /// Slot index this face is shaded by.
    pub material_index: u32,
}

impl Face {
    /// Create a face bound to the given slot index.
    pub fn new(material_index: u32) -> Self {
        Self { material_index }
    }
}

/// Host interaction mode of a mesh object.
///
/// Face data may only be rewritten in [`ObjectMode::Edit`]; the
/// [`FaceEdit`] guard performs the switch and restores the prior mode
/// when dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectMode {
    /// Normal object-level interaction
    #[default]
    Object,
    /// Face-level editing
    Edit,
}

/// A mesh: an ordered material slot list and the faces indexing it.
///
/// Slots may be empty (`None`) and the same material may occupy more
/// than one slot. Interaction mode is runtime state and is not part of
/// the serialized document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mesh {
    /// Mesh name.
    pub name: String,
    /// Ordered material slots; `None` is an empty slot.
    #[serde(default)]
    pub slots: Vec<Option<MaterialId>>,
    /// Faces, each referencing a slot by index.
    #[serde(default)]
    pub faces: Vec<Face>,
    #[serde(skip)]
    mode: ObjectMode,
    #[serde(skip)]
    edit_sessions: u64,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a material slot, returning its index.
    pub fn add_slot(&mut self, material: Option<MaterialId>) -> usize {
        self.slots.push(material);
        self.slots.len() - 1
    }

    /// Append a face bound to the given slot index.
    pub fn add_face(&mut self, material_index: u32) {
        self.faces.push(Face::new(material_index));
    }

    /// Number of material slots.
    #[inline]
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Current interaction mode.
    #[inline]
    pub fn mode(&self) -> ObjectMode {
        self.mode
    }

    /// Number of face-edit sessions entered so far.
    ///
    /// Diagnostic counter; lets callers verify that read-only passes
    /// never switched the mesh into edit mode.
    #[inline]
    pub fn edit_sessions(&self) -> u64 {
        self.edit_sessions
    }

    /// Material shading the given face, resolved through its slot.
    ///
    /// Returns `None` for an out-of-range face index, an out-of-range
    /// slot index or an empty slot.
    pub fn face_material(&self, face: usize) -> Option<MaterialId> {
        let idx = self.faces.get(face)?.material_index as usize;
        self.slots.get(idx).copied().flatten()
    }

    /// Enter edit mode and return a guard exposing mutable face data.
    ///
    /// The prior mode is restored when the guard drops, on every exit
    /// path.
    pub fn edit_faces(&mut self) -> FaceEdit<'_> {
        let prior = self.mode;
        self.mode = ObjectMode::Edit;
        self.edit_sessions += 1;
        trace!(mesh = %self.name, "entering edit mode");
        FaceEdit { mesh: self, prior }
    }
}

/// Scoped edit-mode guard for a mesh's face data.
///
/// Holds the mesh in [`ObjectMode::Edit`] for its lifetime and restores
/// the prior mode on drop.
pub struct FaceEdit<'a> {
    mesh: &'a mut Mesh,
    prior: ObjectMode,
}

impl FaceEdit<'_> {
    /// Mutable access to the face list.
    pub fn faces_mut(&mut self) -> &mut [Face] {
        &mut self.mesh.faces
    }
}

impl Drop for FaceEdit<'_> {
    fn drop(&mut self) {
        trace!(mesh = %self.mesh.name, "restoring {:?} mode", self.prior);
        self.mesh.mode = self.prior;
    }
}
