//! Structural shader-graph comparison.
//!
//! Two graphs are considered identical when the same set of nodes,
//! keyed by (type, exact position, name), is present on both sides,
//! key-matched nodes agree attribute-wise, and both graphs wire the
//! same endpoints together.
//!
//! Comparison fails closed: a duplicated node key or a link pointing at
//! a nonexistent node makes the graphs compare as different, never as
//! equal.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::scene::graph::{NodeKey, ShaderGraph, ShaderNode, IMAGE_TEXTURE, PRINCIPLED_BSDF};

/// A link endpoint resolved to its node key plus a socket name.
type Endpoint = (NodeKey, String);

/// A fully resolved link: both endpoints by node key, not node index.
///
/// Resolving through keys makes link sets comparable across graphs
/// whose node lists are ordered differently.
#[derive(Debug, PartialEq, Eq, Hash)]
struct LinkKey {
    from: Endpoint,
    to: Endpoint,
}

/// Compare two optional shader graphs structurally.
///
/// Both absent is vacuously equal; exactly one absent is a mismatch.
pub fn graphs_equal(a: Option<&ShaderGraph>, b: Option<&ShaderGraph>) -> bool {
    let (a, b) = match (a, b) {
        (None, None) => return true,
        (Some(a), Some(b)) => (a, b),
        _ => {
            trace!("graph presence differs");
            return false;
        }
    };

    if a.num_nodes() != b.num_nodes() {
        trace!("node counts differ: {} vs {}", a.num_nodes(), b.num_nodes());
        return false;
    }
    if a.num_links() != b.num_links() {
        trace!("link counts differ: {} vs {}", a.num_links(), b.num_links());
        return false;
    }

    let (Some(nodes_a), Some(nodes_b)) = (node_index(a), node_index(b)) else {
        // Ambiguous structural identity: refuse to call the graphs equal.
        trace!("duplicate node key, failing closed");
        return false;
    };

    for (key, node_a) in &nodes_a {
        let Some(node_b) = nodes_b.get(key) else {
            trace!("node {:?} missing from other graph", key);
            return false;
        };
        if !nodes_equal(node_a, node_b) {
            trace!("node {:?} differs", key);
            return false;
        }
    }

    let (Some(links_a), Some(links_b)) = (link_set(a), link_set(b)) else {
        trace!("dangling link endpoint, failing closed");
        return false;
    };
    if links_a != links_b {
        trace!("link sets differ");
        return false;
    }

    true
}

/// Compare two key-matched nodes attribute-wise.
///
/// Optional attributes absent on either side are skipped. Type-specific
/// checks exist for [`PRINCIPLED_BSDF`] and [`IMAGE_TEXTURE`]; all
/// other type tags compare on the common attributes only.
pub fn nodes_equal(a: &ShaderNode, b: &ShaderNode) -> bool {
    if a.node_type != b.node_type {
        return false;
    }

    if let (Some(ca), Some(cb)) = (&a.color, &b.color) {
        if ca != cb {
            return false;
        }
    }
    if let (Some(ha), Some(hb)) = (a.hide, b.hide) {
        if ha != hb {
            return false;
        }
    }

    match a.node_type.as_str() {
        PRINCIPLED_BSDF => {
            // Sockets pair up positionally; the shorter list bounds the
            // comparison. Defaults are authored constants and compare
            // exactly.
            for (sa, sb) in a.inputs.iter().zip(&b.inputs) {
                if let (Some(va), Some(vb)) = (&sa.default_value, &sb.default_value) {
                    if va != vb {
                        return false;
                    }
                }
            }
        }
        IMAGE_TEXTURE => {
            if let (Some(ia), Some(ib)) = (a.image, b.image) {
                if ia != ib {
                    return false;
                }
            }
            if let (Some(ma), Some(mb)) = (a.interpolation, b.interpolation) {
                if ma != mb {
                    return false;
                }
            }
        }
        _ => {}
    }

    true
}

/// Build the key → node map for a graph.
///
/// Returns `None` when two nodes share a key.
fn node_index(graph: &ShaderGraph) -> Option<HashMap<NodeKey, &ShaderNode>> {
    let mut map = HashMap::with_capacity(graph.num_nodes());
    for node in &graph.nodes {
        if map.insert(node.key(), node).is_some() {
            return None;
        }
    }
    Some(map)
}

/// Resolve every link to endpoint keys.
///
/// Returns `None` when a link references a node index outside the node
/// list.
fn link_set(graph: &ShaderGraph) -> Option<HashSet<LinkKey>> {
    let mut set = HashSet::with_capacity(graph.num_links());
    for link in &graph.links {
        let from = graph.nodes.get(link.from_node)?;
        let to = graph.nodes.get(link.to_node)?;
        set.insert(LinkKey {
            from: (from.key(), link.from_socket.clone()),
            to: (to.key(), link.to_socket.clone()),
        });
    }
    Some(set)
}
