//! Static desirability of every edge, `1 / weight`.

use petgraph::graph::EdgeIndex;

use crate::types::error::{AcoError, AcoResult};
use crate::types::graph::Graph;
use crate::types::node::NodeId;

/// Read-only table of edge visibilities, computed once per run.
///
/// Indexed by the graph's edge indices, so it is only meaningful for
/// the graph it was built from; the colony keeps both behind the same
/// shared borrow.
#[derive(Debug, Clone)]
pub struct VisibilityTable {
    values: Vec<f64>,
}

impl VisibilityTable {
    /// Computes `1 / weight` for every edge of the graph.
    ///
    /// # Errors
    /// [`AcoError::DegenerateWeight`] if a weight is zero, negative or
    /// not finite. [`Graph::add_edge`] already refuses those.
    pub fn build<N: NodeId>(graph: &Graph<N>) -> AcoResult<Self> {
        let values = graph
            .edge_indices()
            .map(|edge| {
                let weight = graph.weight(edge);
                if weight.is_finite() && weight > 0.0 {
                    Ok(1.0 / weight)
                } else {
                    Err(AcoError::DegenerateWeight(weight))
                }
            })
            .collect::<AcoResult<Vec<f64>>>()?;
        Ok(VisibilityTable { values })
    }

    /// Visibility of `edge`.
    pub fn get(&self, edge: EdgeIndex) -> f64 {
        self.values[edge.index()]
    }

    /// Number of edges covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod visibility_tests {
    use super::*;
    use petgraph::graph::NodeIndex;

    #[test]
    fn test_inverse_weight() {
        let mut graph = Graph::new();
        for node in 0..3 {
            graph.add_node(node);
        }
        graph.add_edge(&0, &1, 2.0).unwrap();
        graph.add_edge(&1, &2, 0.5).unwrap();

        let table = VisibilityTable::build(&graph).unwrap();
        assert_eq!(table.len(), 2);

        let first = graph.edge_between(NodeIndex::new(0), NodeIndex::new(1)).unwrap();
        let second = graph.edge_between(NodeIndex::new(2), NodeIndex::new(1)).unwrap();
        assert!((table.get(first) - 0.5).abs() < 1e-12);
        assert!((table.get(second) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_graph() {
        let graph: Graph<u8> = Graph::new();
        assert!(VisibilityTable::build(&graph).unwrap().is_empty());
    }
}
