//! Ant Colony Optimization Library.
//! Approximates the shortest Hamiltonian cycle of a small weighted
//! graph.
//!
//! Build a [`Graph`] node by node and edge by edge, then hand it to
//! [`optimize`] together with an [`AcoConfig`]:
//!
//! ```
//! use aco_tour::{optimize, AcoConfig, Graph};
//!
//! let mut graph = Graph::new();
//! for node in ["a", "b", "c"] {
//!     graph.add_node(node);
//! }
//! graph.add_edge(&"a", &"b", 3.0)?;
//! graph.add_edge(&"b", &"c", 4.0)?;
//! graph.add_edge(&"c", &"a", 5.0)?;
//!
//! let result = optimize(&graph, AcoConfig::new().with_seed(7))?;
//! assert_eq!(result.tour.len(), 3);
//! assert!((result.cost - 12.0).abs() < 1e-9);
//! # Ok::<(), aco_tour::AcoError>(())
//! ```

#[macro_use]
extern crate log;

pub mod types {
    pub mod config;
    pub mod edge;
    pub mod error;
    pub mod graph;
    pub mod location;
    pub mod node;
}

pub mod colony {
    pub mod ant;
    pub mod engine;
    pub mod pheromone;
    pub mod visibility;
}

pub mod utils {
    pub mod euclidean;
    pub mod graph;
}

pub use colony::engine::{optimize, optimize_from, Colony, GenerationReport, TourResult};
pub use types::config::{AcoConfig, HeuristicMode};
pub use types::error::{AcoError, AcoResult};
pub use types::graph::Graph;
pub use types::location::Location;
pub use types::node::{AsLocation, NodeId, Vertex};
