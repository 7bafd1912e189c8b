//! Material definitions and surface attributes.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::scene::graph::ShaderGraph;

/// Stable identity of a material definition within a scene.
///
/// Identity is distinct from value equality: two materials with different
/// ids may still be duplicates of each other, while a material is never a
/// duplicate of itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u64);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transparency blending mode of a material surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMethod {
    /// Fully opaque surface
    #[default]
    Opaque,
    /// Binary alpha clipping against a threshold
    Clip,
    /// Hashed (dithered) transparency
    Hashed,
    /// Sorted alpha blending
    Blend,
}

/// A material definition: flat surface attributes plus an optional
/// shader node graph.
///
/// Scalar attributes split into two kinds. Required attributes are
/// always present and always compared. Optional attributes model host
/// properties that may not exist on every material; [`Material::new`]
/// leaves them unset and builder methods opt in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Material {
    /// Stable identity within the owning scene.
    pub id: MaterialId,
    /// Display name, not used for comparison.
    pub name: String,
    /// Whether the shader node graph drives shading.
    #[serde(default)]
    pub use_nodes: bool,
    /// Transparency blending mode.
    #[serde(default)]
    pub blend_method: BlendMethod,
    /// Alpha clip threshold, meaningful for [`BlendMethod::Clip`].
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: f32,
    /// Render the back side of transparent surfaces.
    #[serde(default = "default_true")]
    pub show_transparent_back: bool,
    /// Cull faces pointing away from the viewer.
    #[serde(default)]
    pub use_backface_culling: bool,
    /// Viewport display color, RGB or RGBA.
    #[serde(default = "default_diffuse_color")]
    pub diffuse_color: SmallVec<[f32; 4]>,
    /// Metallic factor, absent when the host does not expose it.
    #[serde(default)]
    pub metallic: Option<f32>,
    /// Specular intensity, absent when the host does not expose it.
    #[serde(default)]
    pub specular: Option<f32>,
    /// Surface roughness, absent when the host does not expose it.
    #[serde(default)]
    pub roughness: Option<f32>,
    /// Shader node graph, present when the material is node-based.
    #[serde(default)]
    pub graph: Option<ShaderGraph>,
}

fn default_alpha_threshold() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}

fn default_diffuse_color() -> SmallVec<[f32; 4]> {
    smallvec![0.8, 0.8, 0.8, 1.0]
}

impl Default for Material {
    fn default() -> Self {
        Self {
            id: MaterialId(0),
            name: String::new(),
            use_nodes: false,
            blend_method: BlendMethod::default(),
            alpha_threshold: default_alpha_threshold(),
            show_transparent_back: default_true(),
            use_backface_culling: false,
            diffuse_color: default_diffuse_color(),
            metallic: None,
            specular: None,
            roughness: None,
            graph: None,
        }
    }
}

impl Material {
    /// Create a material with host-default attributes.
    pub fn new(id: MaterialId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the transparency blending mode.
    pub fn with_blend_method(mut self, method: BlendMethod) -> Self {
        self.blend_method = method;
        self
    }

    /// Set the alpha clip threshold.
    pub fn with_alpha_threshold(mut self, threshold: f32) -> Self {
        self.alpha_threshold = threshold;
        self
    }

    /// Set the viewport display color.
    pub fn with_diffuse_color(mut self, color: impl IntoIterator<Item = f32>) -> Self {
        self.diffuse_color = color.into_iter().collect();
        self
    }

    /// Set the metallic factor.
    pub fn with_metallic(mut self, value: f32) -> Self {
        self.metallic = Some(value);
        self
    }

    /// Set the specular intensity.
    pub fn with_specular(mut self, value: f32) -> Self {
        self.specular = Some(value);
        self
    }

    /// Set the surface roughness.
    pub fn with_roughness(mut self, value: f32) -> Self {
        self.roughness = Some(value);
        self
    }

    /// Enable backface culling.
    pub fn with_backface_culling(mut self, enabled: bool) -> Self {
        self.use_backface_culling = enabled;
        self
    }

    /// Attach a shader node graph and enable node-based shading.
    pub fn with_graph(mut self, graph: ShaderGraph) -> Self {
        self.use_nodes = true;
        self.graph = Some(graph);
        self
    }
}
