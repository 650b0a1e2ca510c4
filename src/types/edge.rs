//! Definition of the `Edge` type.
use ordered_float::OrderedFloat;

/// An edge is a connection between two nodes.
/// The weight represents the cost of travelling it, in either
/// direction: `from` and `to` carry no orientation.
#[derive(Debug, PartialEq, Hash, Eq)]
pub struct Edge<'a, N> {
    /// One end of the edge.
    pub from: &'a N,

    /// The other end of the edge.
    pub to: &'a N,

    /// The weight of the edge.
    pub weight: OrderedFloat<f64>,
}

impl<N: PartialEq> Edge<'_, N> {
    /// Whether this edge joins `a` and `b`, in any order.
    pub fn connects(&self, a: &N, b: &N) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}
