//! Scene document I/O.
//!
//! Scenes persist as versioned JSON documents. Loading validates the
//! document structurally (unique material ids, resolvable slot
//! references) so the passes downstream can stay infallible.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scene::Scene;
use crate::util::{Error, Result};

/// Current scene document format version.
pub const SCENE_FORMAT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct Document {
    version: u32,
    scene: Scene,
}

/// Borrowing twin of [`Document`] for serialization.
#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    scene: &'a Scene,
}

/// Load and validate a scene document.
pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path)?;
    let doc: Document = serde_json::from_str(&text)?;
    if doc.version > SCENE_FORMAT_VERSION {
        return Err(Error::UnsupportedVersion(doc.version));
    }
    doc.scene.validate()?;

    debug!(
        "loaded {} ({} materials, {} objects)",
        path.display(),
        doc.scene.materials.len(),
        doc.scene.objects.len()
    );
    Ok(doc.scene)
}

/// Validate and save a scene document.
pub fn save_scene(path: impl AsRef<Path>, scene: &Scene) -> Result<()> {
    let path = path.as_ref();
    scene.validate()?;

    let doc = DocumentRef {
        version: SCENE_FORMAT_VERSION,
        scene,
    };
    let text = serde_json::to_string_pretty(&doc)?;
    fs::write(path, text)?;

    debug!("saved {}", path.display());
    Ok(())
}
