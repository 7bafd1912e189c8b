//! Shader node graphs.
//!
//! A [`ShaderGraph`] is a flat list of [`ShaderNode`]s plus a list of
//! [`NodeLink`]s referencing nodes by index. Graphs carry only the data
//! needed to decide whether two materials shade identically; evaluation
//! is out of scope.
//!
//! Nodes are an open set identified by a type tag string. Two tags get
//! type-specific comparison ([`PRINCIPLED_BSDF`] and [`IMAGE_TEXTURE`]);
//! every other tag compares on the common attributes only.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Type tag for principled BSDF shader nodes.
pub const PRINCIPLED_BSDF: &str = "principled_bsdf";

/// Type tag for image texture nodes.
pub const IMAGE_TEXTURE: &str = "image_texture";

/// Identity of an image datablock referenced by a texture node.
///
/// Two texture nodes sample the same pixels exactly when their image
/// ids are equal, so comparison never needs to look at pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u64);

/// Texture sampling interpolation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    #[default]
    Linear,
    Closest,
    Cubic,
    Smart,
}

/// An unconnected input socket's default value.
///
/// Socket values compare exactly, not by tolerance: they are authored
/// constants, and a graph edit that changes one is an intentional
/// shading change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SocketValue {
    /// Single float socket
    Scalar(f32),
    /// Color or vector socket with 3 or 4 components
    Vector(SmallVec<[f32; 4]>),
}

/// A named input socket on a shader node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputSocket {
    /// Socket name as exposed by the node type.
    pub name: String,
    /// Default value used while the socket is unconnected.
    #[serde(default)]
    pub default_value: Option<SocketValue>,
}

impl InputSocket {
    /// Create a socket with no default value.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: None,
        }
    }

    /// Create a socket holding a scalar default.
    pub fn scalar(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            default_value: Some(SocketValue::Scalar(value)),
        }
    }

    /// Create a socket holding a vector or color default.
    pub fn vector(name: impl Into<String>, value: impl IntoIterator<Item = f32>) -> Self {
        Self {
            name: name.into(),
            default_value: Some(SocketValue::Vector(value.into_iter().collect())),
        }
    }
}

/// Structural identity of a node inside its graph.
///
/// A node is keyed by its type tag, its exact editor position and its
/// name. Positions are compared by bit pattern, not by tolerance: a
/// node moved by any amount no longer matches. The two zero encodings
/// (`0.0` and `-0.0`) are folded together so a sign flip alone does not
/// change the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
    /// Node type tag.
    pub node_type: String,
    /// Editor position as raw `f32` bit patterns.
    pub position: [u32; 2],
    /// Node name, empty when the node is unnamed.
    pub name: String,
}

/// Bit pattern of a position component, folding `-0.0` into `0.0`.
#[inline]
fn position_bits(v: f32) -> u32 {
    if v == 0.0 {
        0.0f32.to_bits()
    } else {
        v.to_bits()
    }
}

/// A single shader node.
///
/// `node_type` and `position` are always present. The remaining
/// attributes are optional: an absent attribute means the host did not
/// expose it, and comparison skips any attribute absent on either side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShaderNode {
    /// Node type tag, e.g. [`PRINCIPLED_BSDF`].
    pub node_type: String,
    /// Position in the node editor.
    pub position: Vec2,
    /// Optional node name.
    #[serde(default)]
    pub name: Option<String>,
    /// Editor display color.
    #[serde(default)]
    pub color: Option<[f32; 3]>,
    /// Collapsed state in the editor.
    #[serde(default)]
    pub hide: Option<bool>,
    /// Input sockets in declaration order.
    #[serde(default)]
    pub inputs: Vec<InputSocket>,
    /// Image referenced by an [`IMAGE_TEXTURE`] node.
    #[serde(default)]
    pub image: Option<ImageId>,
    /// Sampling mode of an [`IMAGE_TEXTURE`] node.
    #[serde(default)]
    pub interpolation: Option<Interpolation>,
}

impl ShaderNode {
    /// Create a node of the given type at a position.
    pub fn new(node_type: impl Into<String>, position: Vec2) -> Self {
        Self {
            node_type: node_type.into(),
            position,
            name: None,
            color: None,
            hide: None,
            inputs: Vec::new(),
            image: None,
            interpolation: None,
        }
    }

    /// Set the node name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the editor display color.
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the collapsed state.
    pub fn with_hide(mut self, hide: bool) -> Self {
        self.hide = Some(hide);
        self
    }

    /// Append an input socket.
    pub fn with_input(mut self, socket: InputSocket) -> Self {
        self.inputs.push(socket);
        self
    }

    /// Set the referenced image.
    pub fn with_image(mut self, image: ImageId) -> Self {
        self.image = Some(image);
        self
    }

    /// Set the texture interpolation mode.
    pub fn with_interpolation(mut self, mode: Interpolation) -> Self {
        self.interpolation = Some(mode);
        self
    }

    /// Structural key of this node: (type, exact position, name).
    pub fn key(&self) -> NodeKey {
        NodeKey {
            node_type: self.node_type.clone(),
            position: [position_bits(self.position.x), position_bits(self.position.y)],
            name: self.name.clone().unwrap_or_default(),
        }
    }
}

/// A directed connection between two node sockets.
///
/// Endpoints reference nodes by index into the owning graph's node
/// list. Indices are not validated at construction; comparison treats a
/// link with an out-of-range endpoint as unmatched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeLink {
    /// Index of the source node.
    pub from_node: usize,
    /// Output socket name on the source node.
    pub from_socket: String,
    /// Index of the destination node.
    pub to_node: usize,
    /// Input socket name on the destination node.
    pub to_socket: String,
}

impl NodeLink {
    /// Create a link between two sockets.
    pub fn new(
        from_node: usize,
        from_socket: impl Into<String>,
        to_node: usize,
        to_socket: impl Into<String>,
    ) -> Self {
        Self {
            from_node,
            from_socket: from_socket.into(),
            to_node,
            to_socket: to_socket.into(),
        }
    }
}

/// A shader node graph: nodes plus links.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShaderGraph {
    /// Nodes in insertion order.
    pub nodes: Vec<ShaderNode>,
    /// Links between node sockets.
    pub links: Vec<NodeLink>,
}

impl ShaderGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its index.
    pub fn add_node(&mut self, node: ShaderNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Connect an output socket to an input socket.
    pub fn connect(
        &mut self,
        from_node: usize,
        from_socket: impl Into<String>,
        to_node: usize,
        to_socket: impl Into<String>,
    ) {
        self.links
            .push(NodeLink::new(from_node, from_socket, to_node, to_socket));
    }

    /// Number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links.
    #[inline]
    pub fn num_links(&self) -> usize {
        self.links.len()
    }
}
