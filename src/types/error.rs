//! Error taxonomy shared by the graph model and the colony.

use thiserror::Error;

/// Result alias used by every fallible operation in the crate.
pub type AcoResult<T> = Result<T, AcoError>;

/// Everything that can go wrong while building a graph or running the
/// colony over it.
///
/// None of these are retried internally. The search is stochastic, so
/// re-running a failed optimization is left to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// Malformed edge request: self-loop, non-positive weight or an
    /// endpoint that was never registered.
    #[error("invalid edge: {0}")]
    InvalidEdge(String),

    /// A lookup asked for a pair of nodes that is not connected.
    #[error("no edge between {from} and {to}")]
    EdgeNotFound {
        /// One endpoint, rendered with `Debug`.
        from: String,
        /// The other endpoint, rendered with `Debug`.
        to: String,
    },

    /// A zero or negative weight reached the visibility computation.
    #[error("degenerate edge weight {0}")]
    DegenerateWeight(f64),

    /// Fewer than three nodes; no cycle worth searching for exists.
    #[error("at least 3 nodes are required, got {0}")]
    InsufficientNodes(usize),

    /// A tunable is out of its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AcoError {
    /// Builds an [`AcoError::EdgeNotFound`] from any two debuggable nodes.
    pub(crate) fn edge_not_found(from: &impl std::fmt::Debug, to: &impl std::fmt::Debug) -> Self {
        AcoError::EdgeNotFound {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}
