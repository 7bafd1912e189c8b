//! Duplicate grouping: partition a material list into equivalence
//! classes.

use smallvec::SmallVec;
use tracing::debug;

use crate::compare::MaterialComparator;
use crate::scene::material::{Material, MaterialId};

/// One detected class of interchangeable materials.
///
/// The canonical member is the first one encountered in input order;
/// every duplicate can be replaced by it without a visible change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Material the duplicates collapse onto.
    pub canonical: MaterialId,
    /// Duplicates in input order, never empty.
    pub duplicates: SmallVec<[MaterialId; 4]>,
}

/// All duplicate groups found in one pass, in input order.
///
/// Singleton classes (materials with no duplicates) are omitted, so an
/// empty result means there is nothing to collapse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DuplicateGroups {
    groups: Vec<DuplicateGroup>,
}

impl DuplicateGroups {
    /// Number of groups.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no duplicates were found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate groups in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateGroup> {
        self.groups.iter()
    }

    /// Total number of duplicate materials across all groups.
    pub fn total_duplicates(&self) -> usize {
        self.groups.iter().map(|g| g.duplicates.len()).sum()
    }
}

impl<'a> IntoIterator for &'a DuplicateGroups {
    type Item = &'a DuplicateGroup;
    type IntoIter = std::slice::Iter<'a, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Group duplicate materials by pairwise comparison.
///
/// Scans `materials` in order; each unprocessed entry becomes the
/// canonical of its class and every later match joins it. A material
/// classified once never starts or joins another group, keeping the
/// classes disjoint. Quadratic in the input length, which is bounded by
/// a mesh's slot count in practice.
pub fn group_duplicates(
    materials: &[&Material],
    cmp: &MaterialComparator,
) -> DuplicateGroups {
    let mut processed = vec![false; materials.len()];
    let mut groups = Vec::new();

    for i in 0..materials.len() {
        if processed[i] {
            continue;
        }
        let canonical = materials[i];

        let mut duplicates: SmallVec<[MaterialId; 4]> = SmallVec::new();
        for j in (i + 1)..materials.len() {
            if processed[j] {
                continue;
            }
            if cmp.materials_equal(Some(canonical), Some(materials[j])) {
                duplicates.push(materials[j].id);
                mark_processed(&mut processed, materials, materials[j].id);
            }
        }

        if !duplicates.is_empty() {
            // The same material may occupy several input positions;
            // classifying it once covers all of them.
            mark_processed(&mut processed, materials, canonical.id);
            debug!(
                "'{}' (id {}) has {} duplicate(s)",
                canonical.name,
                canonical.id,
                duplicates.len()
            );
            groups.push(DuplicateGroup {
                canonical: canonical.id,
                duplicates,
            });
        }
    }

    DuplicateGroups { groups }
}

fn mark_processed(processed: &mut [bool], materials: &[&Material], id: MaterialId) {
    for (k, mat) in materials.iter().enumerate() {
        if mat.id == id {
            processed[k] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::Material;

    fn plain(id: u64, name: &str, roughness: f32) -> Material {
        Material::new(MaterialId(id), name).with_roughness(roughness)
    }

    #[test]
    fn test_single_class_lowest_index_canonical() {
        let a = plain(1, "Mat", 0.5);
        let b = plain(2, "Mat.001", 0.5);
        let c = plain(3, "Mat.002", 0.5);
        let groups = group_duplicates(&[&a, &b, &c], &MaterialComparator::default());

        assert_eq!(groups.len(), 1);
        let g = groups.iter().next().unwrap();
        assert_eq!(g.canonical, MaterialId(1));
        assert_eq!(g.duplicates.as_slice(), &[MaterialId(2), MaterialId(3)]);
    }

    #[test]
    fn test_two_disjoint_classes() {
        let a = plain(1, "Rough", 0.9);
        let b = plain(2, "Smooth", 0.1);
        let c = plain(3, "Rough.001", 0.9);
        let d = plain(4, "Smooth.001", 0.1);
        let groups = group_duplicates(&[&a, &b, &c, &d], &MaterialComparator::default());

        assert_eq!(groups.len(), 2);
        let collected: Vec<_> = groups.iter().collect();
        assert_eq!(collected[0].canonical, MaterialId(1));
        assert_eq!(collected[0].duplicates.as_slice(), &[MaterialId(3)]);
        assert_eq!(collected[1].canonical, MaterialId(2));
        assert_eq!(collected[1].duplicates.as_slice(), &[MaterialId(4)]);
        assert_eq!(groups.total_duplicates(), 2);
    }

    #[test]
    fn test_no_duplicates_is_empty() {
        let a = plain(1, "A", 0.1);
        let b = plain(2, "B", 0.5);
        let groups = group_duplicates(&[&a, &b], &MaterialComparator::default());
        assert!(groups.is_empty());
        assert_eq!(groups.total_duplicates(), 0);
    }

    #[test]
    fn test_deterministic_over_runs() {
        let a = plain(1, "A", 0.3);
        let b = plain(2, "B", 0.3);
        let c = plain(3, "C", 0.3);
        let cmp = MaterialComparator::default();
        let first = group_duplicates(&[&a, &b, &c], &cmp);
        let second = group_duplicates(&[&a, &b, &c], &cmp);
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_material_in_two_positions_does_not_self_group() {
        let a = plain(1, "A", 0.5);
        let groups = group_duplicates(&[&a, &a], &MaterialComparator::default());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_repeated_entry_cannot_start_second_group() {
        let a = plain(1, "A", 0.5);
        let b = plain(2, "A.001", 0.5);
        // Material 1 occupies positions 0 and 2.
        let groups = group_duplicates(&[&a, &b, &a], &MaterialComparator::default());

        assert_eq!(groups.len(), 1);
        let g = groups.iter().next().unwrap();
        assert_eq!(g.canonical, MaterialId(1));
        assert_eq!(g.duplicates.as_slice(), &[MaterialId(2)]);
    }

    #[test]
    fn test_duplicate_never_becomes_canonical() {
        let a = plain(1, "A", 0.5);
        let b = plain(2, "A.001", 0.5);
        let c = plain(3, "A.002", 0.5);
        let groups = group_duplicates(&[&a, &b, &c], &MaterialComparator::default());

        // b and c both collapse onto a; neither seeds a second group.
        assert_eq!(groups.len(), 1);
    }
}
