//! Resource edges between nodes.
//!
//! An edge records that an output slot of one node feeds an input slot of
//! another. Edges drive the topology; the resource handles themselves live in
//! the nodes' slot bindings.

use core::fmt;
use std::sync::Arc;

use crate::node::NodeId;

/// Length of generated edge ids.
const EDGE_ID_LEN: usize = 12;

/// Identifier of one [`ResourceEdge`].
///
/// Random, so edges from two graphs can be logged side by side without
/// ambiguity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeId(Arc<str>);

impl EdgeId {
    fn generate() -> Self {
        Self(nanoid::nanoid!(EDGE_ID_LEN).into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A connection from an output slot to an input slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEdge {
    /// Unique identifier for this edge.
    pub id: EdgeId,
    /// Producing node.
    pub from: NodeId,
    /// Output slot on the producing node.
    pub output: u32,
    /// Consuming node.
    pub to: NodeId,
    /// Input slot on the consuming node.
    pub input: u32,
}

impl ResourceEdge {
    pub(crate) fn new(from: NodeId, output: u32, to: NodeId, input: u32) -> Self {
        Self {
            id: EdgeId::generate(),
            from,
            output,
            to,
            input,
        }
    }

    /// Returns true if the edge starts or ends at `node`.
    #[must_use]
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}

impl fmt::Display for ResourceEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] -> {}[{}]",
            self.from, self.output, self.to, self.input
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_get_distinct_ids_of_fixed_length() {
        let a = ResourceEdge::new(NodeId::new(0), 0, NodeId::new(1), 0);
        let b = ResourceEdge::new(NodeId::new(0), 0, NodeId::new(1), 0);

        assert_ne!(a.id, b.id);
        assert_eq!(a.id.as_str().len(), EDGE_ID_LEN);
        assert_eq!(a.id.to_string(), a.id.as_str());
    }

    #[test]
    fn edge_display_names_both_slots() {
        let edge = ResourceEdge::new(NodeId::new(0), 1, NodeId::new(2), 0);
        assert_eq!(edge.to_string(), "node_0[1] -> node_2[0]");
    }

    #[test]
    fn touches_either_endpoint() {
        let edge = ResourceEdge::new(NodeId::new(3), 0, NodeId::new(5), 1);
        assert!(edge.touches(NodeId::new(3)));
        assert!(edge.touches(NodeId::new(5)));
        assert!(!edge.touches(NodeId::new(4)));
    }
}
