//! Struct definitions and implementations for objects that represent
//! vertices in a graph.
//!
//! The colony never looks inside a node: anything that is
//! `Clone + Eq + Hash + Debug` can be used, which covers plain integers
//! and strings. The front end usually registers clicked points, so a
//! located [`Vertex`] is provided as well.
//!
//! Since Rust doesn't have a built-in way to represent an interface
//! type, we use an [`AsLocation`] trait so that helpers such as
//! [`build_complete_graph`](crate::utils::graph::build_complete_graph)
//! stay agnostic of the concrete node type they are given.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::location::Location;

/// Identity requirements for a graph node.
///
/// Blanket-implemented; there is nothing to implement by hand.
pub trait NodeId: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> NodeId for T {}

/// Gives access to the position of a "Node-like" object.
pub trait AsLocation {
    /// Returns the point this object sits on.
    fn location(&self) -> &Location;
}

//------------------------------------------------------------------
// Structs and Implementations
//------------------------------------------------------------------

/// A vertex registered on the drawing surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    /// Label shown next to the point. Two vertices with the same uid
    /// but different locations are different nodes.
    pub uid: String,

    /// Denotes the position of the vertex.
    pub location: Location,
}

impl Vertex {
    /// Creates a vertex labelled after its coordinates, e.g. `(3, 4)`.
    pub fn at(x: f64, y: f64) -> Self {
        Vertex {
            uid: format!("({}, {})", x, y),
            location: Location::new(x, y),
        }
    }
}

impl AsLocation for Vertex {
    fn location(&self) -> &Location {
        &self.location
    }
}

impl AsLocation for Location {
    fn location(&self) -> &Location {
        self
    }
}

//------------------------------------------------------------------
// Unit Tests
//------------------------------------------------------------------
