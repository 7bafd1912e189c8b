//! Reading and writing scene documents.

pub mod json;

pub use json::{load_scene, save_scene, SCENE_FORMAT_VERSION};
