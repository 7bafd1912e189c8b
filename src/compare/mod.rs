//! Material and shader-graph equivalence.
//!
//! Everything here answers one question: do two materials shade a
//! surface identically? [`MaterialComparator`] is the entry point;
//! [`graphs_equal`] and [`nodes_equal`] are the structural building
//! blocks it delegates to.

pub mod graph;
pub mod material;

pub use graph::{graphs_equal, nodes_equal};
pub use material::{optional_scalar_eq, GraphCheck, MaterialComparator, PresencePolicy};
