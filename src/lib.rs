//! # Matdedup
//!
//! Duplicate material detection and removal for 3D mesh scenes.
//!
//! Large scenes accumulate near-identical material copies (the
//! `Metal.001`, `Metal.002` pattern left behind by appending and
//! copy-pasting). This crate finds materials that shade identically
//! within a tolerance, collapses each mesh's duplicate slots onto one
//! canonical material, rewrites face assignments so nothing changes
//! visually, and purges the definitions that end up unreferenced.
//!
//! ## Modules
//!
//! - [`util`] - Errors, tolerance comparison, math re-exports
//! - [`scene`] - Materials, shader graphs, meshes, scene objects
//! - [`compare`] - Tolerance-aware material and graph equivalence
//! - [`dedup`] - Grouping, slot remapping and the batch operator
//! - [`io`] - JSON scene documents
//!
//! ## Example
//!
//! ```ignore
//! use matdedup::prelude::*;
//!
//! let mut scene = load_scene("scene.json")?;
//! scene.select_all();
//! let summary = remove_duplicates(&mut scene, &DedupOptions::default());
//! println!("{}", summary);
//! save_scene("scene.json", &scene)?;
//! ```

pub mod compare;
pub mod dedup;
pub mod io;
pub mod scene;
pub mod util;

// Re-export commonly used types
pub use util::{Error, Result, DEFAULT_TOLERANCE};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::compare::{GraphCheck, MaterialComparator};
    pub use crate::dedup::{remove_duplicates, DedupOptions, DedupSummary, SlotRemap};
    pub use crate::io::{load_scene, save_scene};
    pub use crate::scene::{
        BlendMethod, Face, Material, MaterialId, Mesh, ObjectData, Scene, SceneObject,
        ShaderGraph, ShaderNode,
    };
    pub use crate::util::{Error, Result, DEFAULT_TOLERANCE};
}
