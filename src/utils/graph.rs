//! Helper functions for working with graphs.

use crate::types::error::AcoResult;
use crate::types::graph::Graph;
use crate::types::node::{AsLocation, NodeId};

/// Build a graph over located nodes.
///
/// The function will try to connect every node to every other node.
/// However, constraints can be added to the graph to prevent ineligible
/// nodes from being connected.
///
/// For example, if the constraint represents the longest edge the
/// caller is willing to draw, we only want to connect nodes that are
/// within that length. A constraint function is also needed to
/// determine if a connection is valid.
///
/// # Arguments
/// * `nodes` - The nodes to register, in order.
/// * `constraint` - Only nodes within a constraint can be connected.
/// * `constraint_function` - A function that takes two nodes and
///   returns a float to compare against `constraint`.
/// * `cost_function` - A function that computes the weight between
///   two nodes.
///
/// # Errors
/// Whatever [`Graph::add_edge`] rejects, typically a zero weight
/// between two nodes sitting on the same point.
///
/// # Time Complexity
/// *O*(*n^2*) pairs are examined.
pub fn build_complete_graph<N>(
    nodes: &[N],
    constraint: f64,
    constraint_function: fn(&dyn AsLocation, &dyn AsLocation) -> f64,
    cost_function: fn(&dyn AsLocation, &dyn AsLocation) -> f64,
) -> AcoResult<Graph<N>>
where
    N: NodeId + AsLocation,
{
    let mut graph = Graph::new();
    for node in nodes {
        graph.add_node(node.clone());
    }
    for (i, from) in nodes.iter().enumerate() {
        for to in &nodes[i + 1..] {
            if from != to && constraint_function(from, to) <= constraint {
                graph.add_edge(from, to, cost_function(from, to))?;
            }
        }
    }
    debug!(
        "built graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
