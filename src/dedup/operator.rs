//! The batch deduplication operator.
//!
//! [`remove_duplicates`] walks the current selection, collapses
//! duplicate material slots per mesh, rewrites face assignments and
//! finally purges material definitions nothing references anymore.
//! The pass is infallible: anything that cannot be resolved is skipped
//! with a log line and the batch continues.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info, warn};

use crate::compare::{GraphCheck, MaterialComparator};
use crate::dedup::group::group_duplicates;
use crate::dedup::remap::SlotRemap;
use crate::scene::material::{Material, MaterialId};
use crate::scene::mesh::Mesh;
use crate::scene::Scene;
use crate::util::DEFAULT_TOLERANCE;

/// Options for a deduplication pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DedupOptions {
    /// Scalar comparison tolerance.
    pub tolerance: f32,
    /// Shader graph comparison mode.
    pub graph_check: GraphCheck,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            graph_check: GraphCheck::default(),
        }
    }
}

/// Outcome of one deduplication pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DedupSummary {
    /// Selected mesh objects visited, including ones left unchanged.
    pub objects_processed: usize,
    /// Duplicate groups found across all meshes.
    pub groups_found: usize,
    /// Material slots removed across all meshes.
    pub slots_removed: usize,
    /// Material definitions purged from the scene library.
    pub materials_purged: usize,
}

impl DedupSummary {
    /// True when the pass changed the scene.
    pub fn changed(&self) -> bool {
        self.slots_removed > 0 || self.materials_purged > 0
    }
}

impl fmt::Display for DedupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slots_removed > 0 {
            write!(
                f,
                "Removed {} duplicate materials from {} objects",
                self.slots_removed, self.objects_processed
            )
        } else {
            write!(f, "No duplicate materials found")
        }
    }
}

/// Remove duplicate materials from every selected mesh object.
///
/// Duplicates are detected per mesh among the materials its slots
/// reference, collapsed onto the first-encountered member of each
/// class, and their slots deleted after faces were rewritten. Material
/// definitions that lost their last slot reference are purged from the
/// scene library afterwards.
pub fn remove_duplicates(scene: &mut Scene, opts: &DedupOptions) -> DedupSummary {
    let cmp = MaterialComparator::new(opts.tolerance).with_graph_check(opts.graph_check);
    let mut summary = DedupSummary::default();
    let mut removed_ids: HashSet<MaterialId> = HashSet::new();

    let selected_meshes = scene
        .objects
        .iter()
        .filter(|o| o.selected && o.is_mesh())
        .count();
    if selected_meshes == 0 {
        debug!("no mesh objects selected, nothing to do");
        return summary;
    }

    let Scene { materials, objects } = &mut *scene;
    for obj in objects.iter_mut().filter(|o| o.selected) {
        let Some(mesh) = obj.data.as_mesh_mut() else {
            debug!("object '{}' is not a mesh, skipping", obj.name);
            continue;
        };
        summary.objects_processed += 1;
        dedup_mesh(mesh, materials, &cmp, &mut summary, &mut removed_ids);
    }

    summary.materials_purged = scene.purge_unused_materials(&removed_ids);
    info!("{}", summary);
    summary
}

/// Collapse duplicate slots on a single mesh.
fn dedup_mesh(
    mesh: &mut Mesh,
    materials: &[Material],
    cmp: &MaterialComparator,
    summary: &mut DedupSummary,
    removed_ids: &mut HashSet<MaterialId>,
) {
    // Slot materials in slot order; empty and unresolvable slots drop
    // out of the comparison but stay in the slot list.
    let mats: Vec<&Material> = mesh
        .slots
        .iter()
        .flatten()
        .filter_map(|id| {
            let found = materials.iter().find(|m| m.id == *id);
            if found.is_none() {
                warn!("mesh '{}': slot references unknown material {}", mesh.name, id);
            }
            found
        })
        .collect();

    if mats.len() < 2 {
        debug!("mesh '{}': fewer than two materials, skipping", mesh.name);
        return;
    }

    let groups = group_duplicates(&mats, cmp);
    if groups.is_empty() {
        debug!("mesh '{}': no duplicate materials", mesh.name);
        return;
    }
    summary.groups_found += groups.len();

    let Some(remap) = SlotRemap::build(&mesh.slots, &groups) else {
        return;
    };

    // Snapshot removed ids before the slot list shrinks; the purge pass
    // checks them against what is still referenced scene-wide.
    removed_ids.extend(
        remap
            .removed_indices()
            .iter()
            .filter_map(|&i| mesh.slots.get(i).copied().flatten()),
    );

    let dangling = mesh
        .faces
        .iter()
        .filter(|f| f.material_index as usize >= mesh.slots.len())
        .count();
    if dangling > 0 {
        warn!(
            "mesh '{}': {} faces reference slots out of range, left untouched",
            mesh.name, dangling
        );
    }

    {
        let mut edit = mesh.edit_faces();
        for face in edit.faces_mut() {
            face.material_index = remap.map_face_index(face.material_index);
        }
    }
    mesh.slots = remap.compact(&mesh.slots);

    summary.slots_removed += remap.num_removed();
    debug!(
        "mesh '{}': removed {} duplicate slots",
        mesh.name,
        remap.num_removed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mesh::ObjectMode;
    use crate::scene::SceneObject;

    fn mat(id: u64, name: &str, roughness: f32) -> Material {
        Material::new(MaterialId(id), name).with_roughness(roughness)
    }

    /// One mesh, two duplicate pairs spread over four slots.
    fn two_pair_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_material(mat(1, "A", 0.2));
        scene.add_material(mat(2, "A.001", 0.2));
        scene.add_material(mat(3, "B", 0.8));
        scene.add_material(mat(4, "B.001", 0.8));

        let mut mesh = Mesh::new("cube");
        for id in 1..=4 {
            mesh.add_slot(Some(MaterialId(id)));
        }
        for idx in [0u32, 1, 2, 3, 1, 3] {
            mesh.add_face(idx);
        }
        scene.add_object(SceneObject::mesh("Cube", mesh).with_selected(true));
        scene
    }

    fn the_mesh(scene: &Scene) -> &Mesh {
        scene.objects[0].data.as_mesh().unwrap()
    }

    #[test]
    fn test_full_pass_collapses_and_purges() {
        let mut scene = two_pair_scene();
        let summary = remove_duplicates(&mut scene, &DedupOptions::default());

        assert_eq!(summary.objects_processed, 1);
        assert_eq!(summary.groups_found, 2);
        assert_eq!(summary.slots_removed, 2);
        assert_eq!(summary.materials_purged, 2);
        assert!(summary.changed());

        let mesh = the_mesh(&scene);
        assert_eq!(
            mesh.slots,
            vec![Some(MaterialId(1)), Some(MaterialId(3))]
        );
        let indices: Vec<_> = mesh.faces.iter().map(|f| f.material_index).collect();
        assert_eq!(indices, vec![0, 0, 1, 1, 0, 1]);

        // Purge removed exactly the collapsed definitions.
        assert!(scene.material(MaterialId(1)).is_some());
        assert!(scene.material(MaterialId(2)).is_none());
        assert!(scene.material(MaterialId(3)).is_some());
        assert!(scene.material(MaterialId(4)).is_none());

        // Mode restored after the rewrite.
        assert_eq!(mesh.mode(), ObjectMode::Object);
    }

    #[test]
    fn test_faces_resolve_to_interchangeable_materials() {
        let mut scene = two_pair_scene();
        let cmp = MaterialComparator::default();

        let before: Vec<Option<Material>> = {
            let mesh = the_mesh(&scene);
            (0..mesh.num_faces())
                .map(|i| mesh.face_material(i).and_then(|id| scene.material(id)).cloned())
                .collect()
        };

        remove_duplicates(&mut scene, &DedupOptions::default());

        let mesh = the_mesh(&scene);
        for (i, old) in before.iter().enumerate() {
            let new = mesh.face_material(i).and_then(|id| scene.material(id));
            let (Some(old), Some(new)) = (old.as_ref(), new) else {
                panic!("face {} lost its material", i);
            };
            let interchangeable =
                old.id == new.id || cmp.materials_equal(Some(old), Some(new));
            assert!(interchangeable, "face {} changed appearance", i);
        }
    }

    #[test]
    fn test_single_material_mesh_untouched() {
        let mut scene = Scene::new();
        scene.add_material(mat(1, "Only", 0.5));
        let mut mesh = Mesh::new("plane");
        mesh.add_slot(Some(MaterialId(1)));
        mesh.add_face(0);
        scene.add_object(SceneObject::mesh("Plane", mesh).with_selected(true));

        let summary = remove_duplicates(&mut scene, &DedupOptions::default());
        assert_eq!(summary.objects_processed, 1);
        assert_eq!(summary.slots_removed, 0);
        assert!(!summary.changed());

        // Skipped before any face edit: the mesh never entered edit mode.
        let mesh = the_mesh(&scene);
        assert_eq!(mesh.edit_sessions(), 0);
        assert_eq!(mesh.num_slots(), 1);
    }

    #[test]
    fn test_empty_selection_is_a_no_op() {
        let mut scene = two_pair_scene();
        scene.objects[0].selected = false;

        let summary = remove_duplicates(&mut scene, &DedupOptions::default());
        assert_eq!(summary, DedupSummary::default());
        assert_eq!(the_mesh(&scene).num_slots(), 4);
        assert_eq!(scene.materials.len(), 4);
    }

    #[test]
    fn test_non_mesh_objects_skipped() {
        let mut scene = two_pair_scene();
        scene.add_object(
            SceneObject::other("Camera", crate::scene::ObjectData::Camera).with_selected(true),
        );

        let summary = remove_duplicates(&mut scene, &DedupOptions::default());
        assert_eq!(summary.objects_processed, 1);
    }

    #[test]
    fn test_duplicates_scoped_per_mesh() {
        // The same duplicate pair split across two meshes, one slot
        // each: neither mesh sees two materials, nothing collapses.
        let mut scene = Scene::new();
        scene.add_material(mat(1, "A", 0.2));
        scene.add_material(mat(2, "A.001", 0.2));

        let mut m1 = Mesh::new("cube");
        m1.add_slot(Some(MaterialId(1)));
        m1.add_face(0);
        let mut m2 = Mesh::new("plane");
        m2.add_slot(Some(MaterialId(2)));
        m2.add_face(0);
        scene.add_object(SceneObject::mesh("Cube", m1).with_selected(true));
        scene.add_object(SceneObject::mesh("Plane", m2).with_selected(true));

        let summary = remove_duplicates(&mut scene, &DedupOptions::default());
        assert_eq!(summary.objects_processed, 2);
        assert_eq!(summary.slots_removed, 0);
        assert_eq!(scene.materials.len(), 2);
    }

    #[test]
    fn test_shared_material_survives_purge() {
        let mut scene = two_pair_scene();
        // Material 2 is also used by an unselected mesh: its slot on
        // the cube goes away, the definition must stay.
        let mut other = Mesh::new("plane");
        other.add_slot(Some(MaterialId(2)));
        other.add_face(0);
        scene.add_object(SceneObject::mesh("Plane", other));

        let summary = remove_duplicates(&mut scene, &DedupOptions::default());
        assert_eq!(summary.slots_removed, 2);
        assert_eq!(summary.materials_purged, 1); // only material 4
        assert!(scene.material(MaterialId(2)).is_some());
        assert!(scene.material(MaterialId(4)).is_none());
    }

    #[test]
    fn test_widened_tolerance_groups_more() {
        let mut scene = Scene::new();
        scene.add_material(mat(1, "A", 0.50));
        scene.add_material(mat(2, "A.001", 0.51));
        let mut mesh = Mesh::new("cube");
        mesh.add_slot(Some(MaterialId(1)));
        mesh.add_slot(Some(MaterialId(2)));
        mesh.add_face(1);
        scene.add_object(SceneObject::mesh("Cube", mesh).with_selected(true));

        let strict = remove_duplicates(&mut scene.clone(), &DedupOptions::default());
        assert_eq!(strict.slots_removed, 0);

        let loose = remove_duplicates(
            &mut scene,
            &DedupOptions {
                tolerance: 0.1,
                ..Default::default()
            },
        );
        assert_eq!(loose.slots_removed, 1);
        assert_eq!(the_mesh(&scene).faces[0].material_index, 0);
    }

    #[test]
    fn test_summary_display() {
        let none = DedupSummary::default();
        assert_eq!(none.to_string(), "No duplicate materials found");

        let some = DedupSummary {
            objects_processed: 2,
            groups_found: 1,
            slots_removed: 3,
            materials_purged: 3,
        };
        assert_eq!(
            some.to_string(),
            "Removed 3 duplicate materials from 2 objects"
        );
    }
}
