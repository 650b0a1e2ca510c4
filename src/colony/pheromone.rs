//! Pheromone intensities, evolving generation to generation.

use petgraph::graph::EdgeIndex;

/// Mutable per-run pheromone state, one intensity per edge.
///
/// Indexed like [`VisibilityTable`](super::visibility::VisibilityTable).
/// Ants only read it; the colony writes it between generations.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneTable {
    values: Vec<f64>,
}

impl PheromoneTable {
    /// Every one of `edge_count` edges starts at `initial`.
    pub fn uniform(edge_count: usize, initial: f64) -> Self {
        PheromoneTable {
            values: vec![initial; edge_count],
        }
    }

    /// Current intensity of `edge`.
    pub fn get(&self, edge: EdgeIndex) -> f64 {
        self.values[edge.index()]
    }

    /// Adds `amount` to each listed edge. An edge listed twice is
    /// reinforced twice.
    pub fn deposit(&mut self, edges: &[EdgeIndex], amount: f64) {
        for edge in edges {
            self.values[edge.index()] += amount;
        }
    }

    /// Multiplies every intensity by `1 - rate`, then lifts anything
    /// below `floor` back up to it.
    pub fn evaporate(&mut self, rate: f64, floor: f64) {
        let retain = 1.0 - rate;
        for value in self.values.iter_mut() {
            *value = f64::max(*value * retain, floor);
        }
    }

    /// Smallest intensity in the table, `None` when there are no edges.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Intensities in edge-index order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
