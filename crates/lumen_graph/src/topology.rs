//! Dependency topology and execution order.

use core::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::edge::ResourceEdge;
use crate::node::NodeId;

/// Producer/consumer adjacency built from a graph's edges.
///
/// Rebuilt on every compile, between the `PreTopologyBuild` and
/// `PostTopologyBuild` phases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    successors: Vec<Vec<NodeId>>,
    in_degree: Vec<usize>,
}

impl Topology {
    /// Builds the topology for `node_count` nodes connected by `edges`.
    ///
    /// Parallel edges between the same pair of nodes collapse into one
    /// dependency.
    #[must_use]
    pub fn build(node_count: usize, edges: &[ResourceEdge]) -> Self {
        let mut successors: Vec<Vec<NodeId>> = vec![Vec::new(); node_count];
        let mut in_degree = vec![0; node_count];

        for edge in edges {
            let Some(next) = successors.get_mut(edge.from.index()) else {
                continue;
            };
            if edge.to.index() >= node_count || next.contains(&edge.to) {
                continue;
            }
            next.push(edge.to);
            in_degree[edge.to.index()] += 1;
        }

        Self {
            successors,
            in_degree,
        }
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.in_degree.len()
    }

    /// Returns the nodes consuming resources produced by `node`.
    #[must_use]
    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        self.successors.get(node.index()).map_or(&[], Vec::as_slice)
    }

    /// Returns the nodes with no producers.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        self.in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(index, _)| NodeId::new(index))
            .collect()
    }

    /// Computes an order in which every producer precedes its consumers.
    ///
    /// Among nodes that are ready at the same time, the one added to the
    /// graph first runs first.
    ///
    /// # Errors
    ///
    /// Returns the nodes that sit on or behind a cycle.
    pub fn execution_order(&self) -> Result<Vec<NodeId>, Vec<NodeId>> {
        let mut in_degree = self.in_degree.clone();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(index, _)| Reverse(index))
            .collect();
        let mut order = Vec::with_capacity(in_degree.len());

        while let Some(Reverse(index)) = ready.pop() {
            order.push(NodeId::new(index));
            for next in &self.successors[index] {
                let degree = &mut in_degree[next.index()];
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(next.index()));
                }
            }
        }

        if order.len() == in_degree.len() {
            Ok(order)
        } else {
            Err(in_degree
                .iter()
                .enumerate()
                .filter(|(_, degree)| **degree > 0)
                .map(|(index, _)| NodeId::new(index))
                .collect())
        }
    }
}
