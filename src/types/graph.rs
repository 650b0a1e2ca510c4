//! Defines the weighted undirected graph the colony searches.
//!
//! The graph is backed by a petgraph [`UnGraph`] plus a [`HashMap`]
//! that maps a node to its index, so the caller can keep talking in
//! terms of its own node type while the colony works on indices.

use std::collections::HashMap;

use ordered_float::OrderedFloat;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::types::edge::Edge;
use crate::types::error::{AcoError, AcoResult};
use crate::types::node::NodeId;

/// A set of nodes plus a symmetric weight for each connected pair.
///
/// Built incrementally by the caller, read-only while a colony runs
/// over it (the colony only ever holds a shared borrow), and cleared
/// wholesale with [`Graph::clear`].
#[derive(Debug, Clone)]
pub struct Graph<N> {
    graph: UnGraph<N, OrderedFloat<f64>>,
    node_indices: HashMap<N, NodeIndex>,
}

impl<N: NodeId> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId> Graph<N> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Graph {
            graph: UnGraph::default(),
            node_indices: HashMap::new(),
        }
    }

    /// Registers a node. Adding a node twice is a no-op.
    pub fn add_node(&mut self, node: N) {
        if !self.node_indices.contains_key(&node) {
            let index = self.graph.add_node(node.clone());
            self.node_indices.insert(node, index);
        }
    }

    /// Connects two registered nodes, replacing any previous weight of
    /// the pair in either orientation.
    ///
    /// # Errors
    /// [`AcoError::InvalidEdge`] for a self-loop, a weight that is not
    /// a positive finite number, or an endpoint that was never added.
    pub fn add_edge(&mut self, a: &N, b: &N, weight: f64) -> AcoResult<()> {
        if a == b {
            return Err(AcoError::InvalidEdge(format!("self-loop on {:?}", a)));
        }
        if !(weight.is_finite() && weight > 0.0) {
            return Err(AcoError::InvalidEdge(format!(
                "weight {} between {:?} and {:?} must be positive",
                weight, a, b
            )));
        }
        let from = self.require_index(a)?;
        let to = self.require_index(b)?;
        self.graph.update_edge(from, to, OrderedFloat(weight));
        Ok(())
    }

    /// Looks up the weight between two nodes, in either orientation.
    ///
    /// # Errors
    /// [`AcoError::EdgeNotFound`] if the pair is not connected or either
    /// node is unknown.
    pub fn weight_of(&self, a: &N, b: &N) -> AcoResult<f64> {
        let from = self.index_of(a);
        let to = self.index_of(b);
        match (from, to) {
            (Some(from), Some(to)) => self
                .edge_between(from, to)
                .map(|edge| self.weight(edge))
                .ok_or_else(|| AcoError::edge_not_found(a, b)),
            _ => Err(AcoError::edge_not_found(a, b)),
        }
    }

    /// Registered nodes, in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.graph.node_weights()
    }

    /// Whether the node was registered.
    pub fn contains_node(&self, node: &N) -> bool {
        self.node_indices.contains_key(node)
    }

    /// Return the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Get all the edges in the graph, in insertion order.
    pub fn edges(&self) -> Vec<Edge<'_, N>> {
        self.graph
            .edge_references()
            .map(|edge| Edge {
                from: &self.graph[edge.source()],
                to: &self.graph[edge.target()],
                weight: *edge.weight(),
            })
            .collect()
    }

    /// Drops every node and edge.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_indices.clear();
    }

    //---------------------------------------------------------------
    // Index-level access for the colony
    //---------------------------------------------------------------

    /// Get the NodeIndex for a given node.
    pub(crate) fn index_of(&self, node: &N) -> Option<NodeIndex> {
        self.node_indices.get(node).cloned()
    }

    pub(crate) fn node(&self, index: NodeIndex) -> &N {
        &self.graph[index]
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub(crate) fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub(crate) fn weight(&self, edge: EdgeIndex) -> f64 {
        self.graph[edge].into_inner()
    }

    pub(crate) fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    fn require_index(&self, node: &N) -> AcoResult<NodeIndex> {
        self.index_of(node)
            .ok_or_else(|| AcoError::InvalidEdge(format!("unknown endpoint {:?}", node)))
    }
}

#[cfg(test)]
mod graph_tests {
    use super::*;

    fn triangle() -> Graph<&'static str> {
        let mut graph = Graph::new();
        for node in ["a", "b", "c"] {
            graph.add_node(node);
        }
        graph.add_edge(&"a", &"b", 1.0).unwrap();
        graph.add_edge(&"b", &"c", 2.0).unwrap();
        graph.add_edge(&"c", &"a", 3.0).unwrap();
        graph
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = Graph::new();
        graph.add_node(7);
        graph.add_node(7);
        graph.add_node(8);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.nodes().copied().collect::<Vec<_>>(), vec![7, 8]);
    }

    #[test]
    fn test_weight_is_symmetric() {
        let graph = triangle();
        assert_eq!(graph.weight_of(&"a", &"b"), Ok(1.0));
        assert_eq!(graph.weight_of(&"b", &"a"), Ok(1.0));
        assert_eq!(graph.weight_of(&"a", &"c"), Ok(3.0));
    }

    /// Re-adding a pair in the other orientation updates the one edge.
    #[test]
    fn test_add_edge_upserts() {
        let mut graph = triangle();
        graph.add_edge(&"b", &"a", 5.0).unwrap();
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.weight_of(&"a", &"b"), Ok(5.0));
    }

    #[test]
    fn test_add_edge_rejects_self_loop() {
        let mut graph = triangle();
        assert!(matches!(
            graph.add_edge(&"a", &"a", 1.0),
            Err(AcoError::InvalidEdge(_))
        ));
    }

    #[test]
    fn test_add_edge_rejects_non_positive_weight() {
        let mut graph = triangle();
        for weight in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                graph.add_edge(&"a", &"b", weight),
                Err(AcoError::InvalidEdge(_))
            ));
        }
        assert_eq!(graph.weight_of(&"a", &"b"), Ok(1.0));
    }

    #[test]
    fn test_add_edge_rejects_unknown_endpoint() {
        let mut graph = triangle();
        assert!(matches!(
            graph.add_edge(&"a", &"z", 1.0),
            Err(AcoError::InvalidEdge(_))
        ));
    }

    #[test]
    fn test_weight_of_missing_edge() {
        let mut graph = triangle();
        graph.add_node("d");
        assert_eq!(
            graph.weight_of(&"a", &"d"),
            Err(AcoError::EdgeNotFound {
                from: "\"a\"".to_string(),
                to: "\"d\"".to_string()
            })
        );
        assert!(graph.weight_of(&"a", &"nowhere").is_err());
    }

    #[test]
    fn test_get_edges() {
        let graph = triangle();
        let edges = graph.edges();
        assert_eq!(edges.len(), 3);
        assert!(edges[0].connects(&"b", &"a"));
        assert_eq!(edges[2].weight, OrderedFloat(3.0));
    }

    #[test]
    fn test_clear() {
        let mut graph = triangle();
        graph.clear();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.contains_node(&"a"));
    }
}
