//! Struct definitions and implementations for [`Location`].

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A [`Location`] is a point on the drawing surface the graph was
/// entered on. Typically, this type is used in tandem with the
/// [`Vertex`](`super::node::Vertex`) type.
///
/// Coordinates are wrapped in [`OrderedFloat`] so that a location can
/// be hashed and compared, which lets a point double as node identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Horizontal coordinate.
    pub x: OrderedFloat<f64>,

    /// Vertical coordinate.
    pub y: OrderedFloat<f64>,
}

impl Location {
    /// Creates a location from raw coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Location {
            x: OrderedFloat(x),
            y: OrderedFloat(y),
        }
    }
}

impl From<(f64, f64)> for Location {
    fn from((x, y): (f64, f64)) -> Self {
        Location::new(x, y)
    }
}
