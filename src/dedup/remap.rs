//! Slot-list remapping: collapse duplicate slots onto canonicals and
//! compact the list.
//!
//! [`SlotRemap::build`] turns a set of duplicate groups into a single
//! old-index → new-index mapping covering both the collapse and the
//! shift caused by deleting slots. Faces are rewritten through
//! [`SlotRemap::map_face_index`] first; [`SlotRemap::compact`] then
//! produces the shrunk slot list. Applying both leaves every face
//! resolving to a material interchangeable with its previous one.

use tracing::warn;

use crate::dedup::group::DuplicateGroups;
use crate::scene::material::MaterialId;

/// Composed slot-index mapping for one mesh.
#[derive(Clone, Debug)]
pub struct SlotRemap {
    /// Final index for every old slot index.
    forward: Vec<u32>,
    /// Removal mask over old indices.
    removed_mask: Vec<bool>,
    /// Removed old indices, ascending.
    removed: Vec<usize>,
}

impl SlotRemap {
    /// Build the mapping for a slot list under the given groups.
    ///
    /// Groups are resolved to slot positions by identity; the first
    /// slot holding a material wins. A group whose canonical is absent
    /// from the slot list is skipped, as is a duplicate that is absent;
    /// both are logged and processing continues.
    ///
    /// Returns `None` when no slot ends up collapsed, which callers
    /// treat as "nothing to do".
    pub fn build(slots: &[Option<MaterialId>], groups: &DuplicateGroups) -> Option<Self> {
        let n = slots.len();
        let mut collapse: Vec<usize> = (0..n).collect();
        let mut removed_mask = vec![false; n];

        for group in groups {
            let Some(canonical_idx) = slot_of(slots, group.canonical) else {
                warn!(
                    "canonical material {} not in slot list, skipping group",
                    group.canonical
                );
                continue;
            };
            for &dup in &group.duplicates {
                let Some(dup_idx) = slot_of(slots, dup) else {
                    warn!("duplicate material {} not in slot list, skipping", dup);
                    continue;
                };
                if dup_idx == canonical_idx {
                    continue;
                }
                collapse[dup_idx] = canonical_idx;
                removed_mask[dup_idx] = true;
            }
        }

        if !removed_mask.iter().any(|&r| r) {
            return None;
        }

        // Final position of each surviving slot once removed ones shift
        // out. Removed slots resolve through their canonical.
        let mut shifted = vec![0u32; n];
        let mut next = 0u32;
        for i in 0..n {
            shifted[i] = next;
            if !removed_mask[i] {
                next += 1;
            }
        }
        let forward = (0..n).map(|i| shifted[collapse[i]]).collect();
        let removed = (0..n).filter(|&i| removed_mask[i]).collect();

        Some(Self {
            forward,
            removed_mask,
            removed,
        })
    }

    /// Map an old face slot index to its final value.
    ///
    /// Indices outside the slot list pass through unchanged; malformed
    /// face data stays malformed instead of being bent into range.
    #[inline]
    pub fn map_face_index(&self, index: u32) -> u32 {
        self.forward
            .get(index as usize)
            .copied()
            .unwrap_or(index)
    }

    /// Produce the compacted slot list.
    pub fn compact(&self, slots: &[Option<MaterialId>]) -> Vec<Option<MaterialId>> {
        debug_assert_eq!(slots.len(), self.forward.len());
        slots
            .iter()
            .zip(&self.removed_mask)
            .filter(|(_, &removed)| !removed)
            .map(|(slot, _)| *slot)
            .collect()
    }

    /// Old indices of the slots this remap removes, ascending.
    pub fn removed_indices(&self) -> &[usize] {
        &self.removed
    }

    /// Number of slots removed.
    #[inline]
    pub fn num_removed(&self) -> usize {
        self.removed.len()
    }
}

fn slot_of(slots: &[Option<MaterialId>], id: MaterialId) -> Option<usize> {
    slots.iter().position(|s| *s == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::MaterialComparator;
    use crate::dedup::group::group_duplicates;
    use crate::scene::material::Material;

    fn groups_for(materials: &[&Material]) -> DuplicateGroups {
        group_duplicates(materials, &MaterialComparator::default())
    }

    #[test]
    fn test_two_groups_remap_and_compact() {
        let a = Material::new(MaterialId(1), "A").with_roughness(0.2);
        let b = Material::new(MaterialId(2), "B").with_roughness(0.2);
        let c = Material::new(MaterialId(3), "C").with_roughness(0.8);
        let d = Material::new(MaterialId(4), "D").with_roughness(0.8);
        let groups = groups_for(&[&a, &b, &c, &d]);

        let slots = vec![
            Some(MaterialId(1)),
            Some(MaterialId(2)),
            Some(MaterialId(3)),
            Some(MaterialId(4)),
        ];
        let remap = SlotRemap::build(&slots, &groups).unwrap();

        let faces = [0u32, 1, 2, 3, 1, 3];
        let mapped: Vec<_> = faces.iter().map(|&i| remap.map_face_index(i)).collect();
        assert_eq!(mapped, vec![0, 0, 1, 1, 0, 1]);

        assert_eq!(
            remap.compact(&slots),
            vec![Some(MaterialId(1)), Some(MaterialId(3))]
        );
        assert_eq!(remap.removed_indices(), &[1, 3]);
        assert_eq!(remap.num_removed(), 2);
    }

    #[test]
    fn test_empty_slots_survive_compaction() {
        let a = Material::new(MaterialId(1), "A");
        let b = Material::new(MaterialId(2), "B");
        let groups = groups_for(&[&a, &b]);

        let slots = vec![Some(MaterialId(1)), None, Some(MaterialId(2))];
        let remap = SlotRemap::build(&slots, &groups).unwrap();

        // The empty slot keeps its place; only the duplicate goes.
        assert_eq!(remap.compact(&slots), vec![Some(MaterialId(1)), None]);
        assert_eq!(remap.map_face_index(1), 1);
        assert_eq!(remap.map_face_index(2), 0);
    }

    #[test]
    fn test_out_of_range_face_index_passes_through() {
        let a = Material::new(MaterialId(1), "A");
        let b = Material::new(MaterialId(2), "B");
        let groups = groups_for(&[&a, &b]);

        let slots = vec![Some(MaterialId(1)), Some(MaterialId(2))];
        let remap = SlotRemap::build(&slots, &groups).unwrap();
        assert_eq!(remap.map_face_index(7), 7);
    }

    #[test]
    fn test_absent_canonical_skips_group() {
        let a = Material::new(MaterialId(1), "A");
        let b = Material::new(MaterialId(2), "B");
        let groups = groups_for(&[&a, &b]);

        // Slot list does not contain the canonical at all.
        let slots = vec![Some(MaterialId(2)), Some(MaterialId(9))];
        assert!(SlotRemap::build(&slots, &groups).is_none());
    }

    #[test]
    fn test_no_groups_is_none() {
        let slots = vec![Some(MaterialId(1)), Some(MaterialId(2))];
        assert!(SlotRemap::build(&slots, &DuplicateGroups::default()).is_none());
    }

    #[test]
    fn test_canonical_after_duplicate_position() {
        // Canonical sits in a later slot than its duplicate.
        let a = Material::new(MaterialId(1), "A");
        let b = Material::new(MaterialId(2), "B");
        let groups = groups_for(&[&a, &b]);

        let slots = vec![Some(MaterialId(2)), Some(MaterialId(1))];
        let remap = SlotRemap::build(&slots, &groups).unwrap();

        // Slot 0 (the duplicate) collapses onto slot 1, which shifts to 0.
        assert_eq!(remap.map_face_index(0), 0);
        assert_eq!(remap.map_face_index(1), 0);
        assert_eq!(remap.compact(&slots), vec![Some(MaterialId(1))]);
    }
}
