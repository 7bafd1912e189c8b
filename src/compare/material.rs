//! Tolerance-aware material comparison.
//!
//! [`MaterialComparator`] decides whether two materials are duplicates:
//! same identity never, equal attributes within tolerance yes. Scalar
//! attributes compare through [`approx_eq`]; flags and enums compare
//! exactly; shader graphs compare per the configured [`GraphCheck`].

use tracing::trace;

use crate::compare::graph::graphs_equal;
use crate::scene::material::Material;
use crate::util::{approx_eq, slice_approx_eq, DEFAULT_TOLERANCE};

/// How shader graphs participate in material comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphCheck {
    /// Node and link counts only. Cheap, and two same-sized graphs with
    /// different wiring will pass; the default trade-off.
    #[default]
    Counts,
    /// Full structural comparison via [`graphs_equal`].
    Structural,
}

/// Policy for optional attributes that are present on only one side.
///
/// Optional attributes model host properties that may not exist on
/// every material. Which absences are forgiven differs per attribute,
/// so each call site states its policy explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresencePolicy {
    /// Absence on either side skips the check
    SkipIfMissing,
    /// Presence must agree; one-sided absence is a mismatch
    RequireMatch,
}

/// Compare two optional scalars under a presence policy.
pub fn optional_scalar_eq(
    a: Option<f32>,
    b: Option<f32>,
    tolerance: f32,
    policy: PresencePolicy,
) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => approx_eq(a, b, tolerance),
        (None, None) => true,
        _ => matches!(policy, PresencePolicy::SkipIfMissing),
    }
}

/// Material duplicate detector.
///
/// Symmetric in its arguments, and a material never matches itself:
/// identity equality is an early "not a duplicate".
#[derive(Clone, Copy, Debug)]
pub struct MaterialComparator {
    tolerance: f32,
    graph_check: GraphCheck,
}

impl Default for MaterialComparator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            graph_check: GraphCheck::default(),
        }
    }
}

impl MaterialComparator {
    /// Create a comparator with the given scalar tolerance.
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            ..Default::default()
        }
    }

    /// Select the graph comparison mode.
    pub fn with_graph_check(mut self, mode: GraphCheck) -> Self {
        self.graph_check = mode;
        self
    }

    /// Scalar tolerance in use.
    #[inline]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// True when `a` and `b` are distinct materials with equal
    /// attributes within tolerance.
    ///
    /// A missing material on either side is never a duplicate.
    pub fn materials_equal(&self, a: Option<&Material>, b: Option<&Material>) -> bool {
        let (Some(a), Some(b)) = (a, b) else {
            return false;
        };
        if a.id == b.id {
            trace!("'{}': same material, not a duplicate of itself", a.name);
            return false;
        }

        let tol = self.tolerance;

        if a.use_nodes != b.use_nodes {
            trace!("'{}' vs '{}': use_nodes differs", a.name, b.name);
            return false;
        }
        if a.blend_method != b.blend_method {
            trace!(
                "'{}' vs '{}': blend_method {:?} vs {:?}",
                a.name,
                b.name,
                a.blend_method,
                b.blend_method
            );
            return false;
        }
        if !approx_eq(a.alpha_threshold, b.alpha_threshold, tol) {
            trace!(
                "'{}' vs '{}': alpha_threshold {} vs {}",
                a.name,
                b.name,
                a.alpha_threshold,
                b.alpha_threshold
            );
            return false;
        }
        if a.show_transparent_back != b.show_transparent_back {
            trace!("'{}' vs '{}': show_transparent_back differs", a.name, b.name);
            return false;
        }
        if a.use_backface_culling != b.use_backface_culling {
            trace!("'{}' vs '{}': use_backface_culling differs", a.name, b.name);
            return false;
        }

        if !slice_approx_eq(&a.diffuse_color, &b.diffuse_color, tol) {
            trace!("'{}' vs '{}': diffuse_color differs", a.name, b.name);
            return false;
        }

        if !optional_scalar_eq(a.metallic, b.metallic, tol, PresencePolicy::SkipIfMissing) {
            trace!("'{}' vs '{}': metallic differs", a.name, b.name);
            return false;
        }
        if !optional_scalar_eq(a.specular, b.specular, tol, PresencePolicy::RequireMatch) {
            trace!("'{}' vs '{}': specular differs", a.name, b.name);
            return false;
        }
        if !optional_scalar_eq(a.roughness, b.roughness, tol, PresencePolicy::SkipIfMissing) {
            trace!("'{}' vs '{}': roughness differs", a.name, b.name);
            return false;
        }

        if a.use_nodes && !self.graphs_match(a, b) {
            trace!("'{}' vs '{}': shader graphs differ", a.name, b.name);
            return false;
        }

        trace!("'{}' and '{}' are duplicates", a.name, b.name);
        true
    }

    /// Graph sub-check; `use_nodes` already agrees on both sides.
    fn graphs_match(&self, a: &Material, b: &Material) -> bool {
        match (&a.graph, &b.graph) {
            (None, None) => true,
            (Some(ga), Some(gb)) => match self.graph_check {
                GraphCheck::Counts => {
                    ga.num_nodes() == gb.num_nodes() && ga.num_links() == gb.num_links()
                }
                GraphCheck::Structural => graphs_equal(Some(ga), Some(gb)),
            },
            _ => false,
        }
    }
}
