//! Planar distance between two [`Location`]s.

use crate::types::location::Location;

/// Straight-line distance between two points of the drawing surface.
pub fn distance(from: &Location, to: &Location) -> f64 {
    let dx = from.x.into_inner() - to.x.into_inner();
    let dy = from.y.into_inner() - to.y.into_inner();
    dx.hypot(dy)
}
