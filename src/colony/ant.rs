//! A single ant and the tour it builds.
//!
//! An ant walks the graph one node at a time. From its current node it
//! scores every unvisited neighbour with
//! `pheromone^alpha * visibility^beta` and draws the next node by
//! roulette wheel over those scores. The walk is over once every node
//! has been visited; the last node then implicitly connects back to the
//! first.
//!
//! Ants own nothing but their [`Trail`]. The graph and both tables are
//! shared borrows, so a whole cohort can read them at once while the
//! colony holds off on updating pheromone until every ant is done.

use petgraph::graph::{EdgeIndex, NodeIndex};
use rand::Rng;

use super::pheromone::PheromoneTable;
use super::visibility::VisibilityTable;
use crate::types::config::{AcoConfig, HeuristicMode};
use crate::types::error::{AcoError, AcoResult};
use crate::types::graph::Graph;
use crate::types::node::NodeId;

//------------------------------------------------------------------
// Trail
//------------------------------------------------------------------

/// An ordered sequence of distinct nodes plus the set of nodes already
/// on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail {
    order: Vec<NodeIndex>,
    visited: Vec<bool>,
}

impl Trail {
    /// An empty trail over a graph of `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Trail {
            order: Vec::with_capacity(node_count),
            visited: vec![false; node_count],
        }
    }

    fn push(&mut self, node: NodeIndex) {
        debug_assert!(!self.visited[node.index()]);
        self.visited[node.index()] = true;
        self.order.push(node);
    }

    /// Whether `node` is already on the trail.
    pub fn contains(&self, node: NodeIndex) -> bool {
        self.visited[node.index()]
    }

    /// Number of nodes visited so far.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether every node of the graph is on the trail.
    pub fn is_complete(&self) -> bool {
        self.order.len() == self.visited.len()
    }

    /// Node the trail started from.
    pub fn first(&self) -> Option<NodeIndex> {
        self.order.first().copied()
    }

    /// Node the ant currently stands on.
    pub fn last(&self) -> Option<NodeIndex> {
        self.order.last().copied()
    }

    /// Visited nodes in visiting order, as graph indices.
    pub fn indices(&self) -> &[NodeIndex] {
        &self.order
    }

    /// The trail in terms of the caller's nodes.
    pub fn to_tour<N: NodeId>(&self, graph: &Graph<N>) -> Vec<N> {
        self.order
            .iter()
            .map(|&index| graph.node(index).clone())
            .collect()
    }

    /// Edges of the closed cycle: each consecutive pair, then last back
    /// to first. Empty for trails shorter than two nodes.
    ///
    /// # Errors
    /// [`AcoError::EdgeNotFound`] on the first pair the graph does not
    /// connect.
    pub fn cycle_edges<N: NodeId>(&self, graph: &Graph<N>) -> AcoResult<Vec<EdgeIndex>> {
        if self.order.len() < 2 {
            return Ok(Vec::new());
        }
        let closing = [self.order[self.order.len() - 1], self.order[0]];
        self.order
            .windows(2)
            .chain(std::iter::once(&closing[..]))
            .map(|pair| {
                graph
                    .edge_between(pair[0], pair[1])
                    .ok_or_else(|| AcoError::edge_not_found(graph.node(pair[0]), graph.node(pair[1])))
            })
            .collect()
    }
}

/// Total weight of the closed cycle a trail describes.
///
/// # Errors
/// [`AcoError::EdgeNotFound`] if the graph lacks an edge the cycle uses.
pub fn tour_length<N: NodeId>(trail: &Trail, graph: &Graph<N>) -> AcoResult<f64> {
    Ok(trail
        .cycle_edges(graph)?
        .into_iter()
        .map(|edge| graph.weight(edge))
        .sum())
}

//------------------------------------------------------------------
// Selection
//------------------------------------------------------------------

/// Run-level parameters of the selection rule.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SelectionParams {
    /// Exponent on pheromone.
    pub alpha: f64,
    /// Exponent on visibility, unused when visibility-blind.
    pub beta: f64,
    /// Whether visibility takes part in the score at all.
    pub heuristic: HeuristicMode,
}

impl SelectionParams {
    /// Unnormalized selection weight of an edge.
    pub fn score(&self, pheromone: f64, visibility: f64) -> f64 {
        match self.heuristic {
            HeuristicMode::Visibility => pheromone.powf(self.alpha) * visibility.powf(self.beta),
            HeuristicMode::VisibilityBlind => pheromone.powf(self.alpha),
        }
    }
}

impl From<&AcoConfig> for SelectionParams {
    fn from(config: &AcoConfig) -> Self {
        SelectionParams {
            alpha: config.alpha,
            beta: config.beta,
            heuristic: config.heuristic,
        }
    }
}

/// Roulette-wheel draw over `candidates` in the order given.
///
/// NaN and negative weights count as zero. Infinite weights dominate:
/// if any candidate scores `+inf`, the draw is uniform among those
/// candidates only. Finite weights are scaled by their maximum before
/// summing, so large but finite scores cannot overflow the total.
///
/// Returns `None` when every weight is zero or when rounding leaves
/// the draw past the last cumulative bound.
pub(crate) fn roulette<R: Rng + ?Sized>(
    candidates: &[(NodeIndex, f64)],
    rng: &mut R,
) -> Option<NodeIndex> {
    let sanitized: Vec<(NodeIndex, f64)> = candidates
        .iter()
        .map(|&(node, weight)| (node, if weight > 0.0 { weight } else { 0.0 }))
        .collect();

    let dominant: Vec<NodeIndex> = sanitized
        .iter()
        .filter(|&&(_, weight)| weight.is_infinite())
        .map(|&(node, _)| node)
        .collect();
    if !dominant.is_empty() {
        return Some(dominant[rng.gen_range(0..dominant.len())]);
    }

    let max = sanitized.iter().map(|&(_, weight)| weight).fold(0.0, f64::max);
    if max <= 0.0 {
        return None;
    }
    let scaled: Vec<(NodeIndex, f64)> = sanitized
        .iter()
        .map(|&(node, weight)| (node, weight / max))
        .collect();
    let total: f64 = scaled.iter().map(|&(_, weight)| weight).sum();
    // Comparing against `draw * total` keeps the last bound equal to
    // the total itself instead of a rounded 1.0.
    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for &(node, weight) in &scaled {
        cumulative += weight;
        if target < cumulative {
            return Some(node);
        }
    }
    None
}

//------------------------------------------------------------------
// Ant
//------------------------------------------------------------------

/// Lifecycle of an [`Ant`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AntState {
    Unstarted,
    Constructing,
    Complete,
}

/// One stochastic tour builder.
#[derive(Debug)]
pub struct Ant<'a, N> {
    graph: &'a Graph<N>,
    pheromone: &'a PheromoneTable,
    visibility: &'a VisibilityTable,
    params: SelectionParams,
    trail: Trail,
    state: AntState,
}

impl<'a, N: NodeId> Ant<'a, N> {
    pub fn new(
        graph: &'a Graph<N>,
        pheromone: &'a PheromoneTable,
        visibility: &'a VisibilityTable,
        params: SelectionParams,
    ) -> Self {
        Ant {
            graph,
            pheromone,
            visibility,
            params,
            trail: Trail::new(graph.node_count()),
            state: AntState::Unstarted,
        }
    }

    pub fn state(&self) -> AntState {
        self.state
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Places the ant on `start`, or on a uniformly drawn node.
    ///
    /// Does nothing unless the ant is still unstarted.
    pub fn start<R: Rng + ?Sized>(&mut self, start: Option<NodeIndex>, rng: &mut R) {
        if self.state != AntState::Unstarted || self.graph.node_count() == 0 {
            return;
        }
        let node = start.unwrap_or_else(|| NodeIndex::new(rng.gen_range(0..self.graph.node_count())));
        self.trail.push(node);
        self.state = if self.trail.is_complete() {
            AntState::Complete
        } else {
            AntState::Constructing
        };
    }

    /// Extends the trail by one node.
    ///
    /// # Errors
    /// [`AcoError::EdgeNotFound`] when the current node has no edge to
    /// any unvisited node.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> AcoResult<AntState> {
        if self.state != AntState::Constructing {
            return Ok(self.state);
        }
        let current = match self.trail.last() {
            Some(current) => current,
            None => return Ok(self.state),
        };
        let next = self.choose_next(current, rng)?;
        self.trail.push(next);
        if self.trail.is_complete() {
            self.state = AntState::Complete;
        }
        Ok(self.state)
    }

    /// Runs the ant from start to completion and hands over its trail.
    pub fn run<R: Rng + ?Sized>(mut self, start: Option<NodeIndex>, rng: &mut R) -> AcoResult<Trail> {
        self.start(start, rng);
        while self.advance(rng)? == AntState::Constructing {}
        Ok(self.trail)
    }

    fn choose_next<R: Rng + ?Sized>(&self, current: NodeIndex, rng: &mut R) -> AcoResult<NodeIndex> {
        let candidates: Vec<(NodeIndex, f64)> = self
            .graph
            .node_indices()
            .filter(|&node| !self.trail.contains(node))
            .filter_map(|node| {
                self.graph.edge_between(current, node).map(|edge| {
                    let weight = self
                        .params
                        .score(self.pheromone.get(edge), self.visibility.get(edge));
                    (node, weight)
                })
            })
            .collect();

        if candidates.is_empty() {
            let unvisited = self
                .graph
                .node_indices()
                .find(|&node| !self.trail.contains(node))
                .unwrap_or(current);
            return Err(AcoError::edge_not_found(
                self.graph.node(current),
                self.graph.node(unvisited),
            ));
        }

        Ok(roulette(&candidates, rng).unwrap_or_else(|| {
            warn!(
                "roulette wheel selected nothing from {:?}, picking uniformly among {} candidates",
                self.graph.node(current),
                candidates.len()
            );
            candidates[rng.gen_range(0..candidates.len())].0
        }))
    }
}

/// Builds one complete trail.
///
/// Every draw comes from `rng`, so a seeded generator reproduces the
/// trail exactly.
///
/// # Errors
/// [`AcoError::EdgeNotFound`] if the walk reaches a node with no edge
/// to any unvisited node.
pub fn build_tour<N: NodeId, R: Rng + ?Sized>(
    graph: &Graph<N>,
    pheromone: &PheromoneTable,
    visibility: &VisibilityTable,
    params: SelectionParams,
    start: Option<NodeIndex>,
    rng: &mut R,
) -> AcoResult<Trail> {
    Ant::new(graph, pheromone, visibility, params).run(start, rng)
}

#[cfg(test)]
mod ant_tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square() -> Graph<u32> {
        let points: [(f64, f64); 4] = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
        let mut graph = Graph::new();
        for id in 0..4 {
            graph.add_node(id);
        }
        for a in 0..4_u32 {
            for b in (a + 1)..4 {
                let (xa, ya) = points[a as usize];
                let (xb, yb) = points[b as usize];
                let weight = ((xa - xb) * (xa - xb) + (ya - yb) * (ya - yb)).sqrt();
                graph.add_edge(&a, &b, weight).unwrap();
            }
        }
        graph
    }

    fn params() -> SelectionParams {
        SelectionParams::from(&AcoConfig::default())
    }

    #[test]
    fn test_trail_visits_every_node_once() {
        let graph = square();
        let visibility = VisibilityTable::build(&graph).unwrap();
        let pheromone = PheromoneTable::uniform(graph.edge_count(), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            let trail = build_tour(&graph, &pheromone, &visibility, params(), None, &mut rng).unwrap();
            assert!(trail.is_complete());
            let mut tour = trail.to_tour(&graph);
            tour.sort();
            assert_eq!(tour, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_fixed_start() {
        let graph = square();
        let visibility = VisibilityTable::build(&graph).unwrap();
        let pheromone = PheromoneTable::uniform(graph.edge_count(), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let start = graph.index_of(&2);

        for _ in 0..10 {
            let trail = build_tour(&graph, &pheromone, &visibility, params(), start, &mut rng).unwrap();
            assert_eq!(trail.first(), start);
        }
    }

    #[test]
    fn test_state_machine() {
        let graph = square();
        let visibility = VisibilityTable::build(&graph).unwrap();
        let pheromone = PheromoneTable::uniform(graph.edge_count(), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let mut ant = Ant::new(&graph, &pheromone, &visibility, params());
        assert_eq!(ant.state(), AntState::Unstarted);
        assert_eq!(ant.advance(&mut rng), Ok(AntState::Unstarted));

        ant.start(None, &mut rng);
        assert_eq!(ant.state(), AntState::Constructing);
        assert_eq!(ant.trail().len(), 1);

        assert_eq!(ant.advance(&mut rng), Ok(AntState::Constructing));
        assert_eq!(ant.advance(&mut rng), Ok(AntState::Constructing));
        assert_eq!(ant.advance(&mut rng), Ok(AntState::Complete));
        assert_eq!(ant.trail().len(), 4);
        assert_eq!(ant.advance(&mut rng), Ok(AntState::Complete));
    }

    #[test]
    fn test_same_seed_same_trail() {
        let graph = square();
        let visibility = VisibilityTable::build(&graph).unwrap();
        let pheromone = PheromoneTable::uniform(graph.edge_count(), 1.0);

        let mut first = ChaCha8Rng::seed_from_u64(99);
        let mut second = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..5 {
            assert_eq!(
                build_tour(&graph, &pheromone, &visibility, params(), None, &mut first),
                build_tour(&graph, &pheromone, &visibility, params(), None, &mut second)
            );
        }
    }

    #[test]
    fn test_tour_length_closes_the_cycle() {
        let graph = square();
        let mut trail = Trail::new(4);
        for id in [0, 1, 2, 3] {
            trail.push(graph.index_of(&id).unwrap());
        }
        assert!((tour_length(&trail, &graph).unwrap() - 4.0).abs() < 1e-12);

        let mut crossing = Trail::new(4);
        for id in [0, 2, 1, 3] {
            crossing.push(graph.index_of(&id).unwrap());
        }
        let expected = 2.0 + 2.0 * 2.0_f64.sqrt();
        assert!((tour_length(&crossing, &graph).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_tour_length_missing_edge() {
        let mut graph: Graph<u32> = Graph::new();
        for id in 0..3 {
            graph.add_node(id);
        }
        graph.add_edge(&0, &1, 1.0).unwrap();
        graph.add_edge(&1, &2, 1.0).unwrap();

        let mut trail = Trail::new(3);
        for id in [0, 1, 2] {
            trail.push(graph.index_of(&id).unwrap());
        }
        assert!(matches!(
            tour_length(&trail, &graph),
            Err(AcoError::EdgeNotFound { .. })
        ));
    }

    /// A node with no edge to the rest of the graph strands the ant.
    #[test]
    fn test_stranded_ant() {
        let mut graph: Graph<u32> = Graph::new();
        for id in 0..3 {
            graph.add_node(id);
        }
        graph.add_edge(&1, &2, 1.0).unwrap();
        let visibility = VisibilityTable::build(&graph).unwrap();
        let pheromone = PheromoneTable::uniform(graph.edge_count(), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = build_tour(&graph, &pheromone, &visibility, params(), graph.index_of(&0), &mut rng);
        assert!(matches!(result, Err(AcoError::EdgeNotFound { .. })));
    }

    #[test]
    fn test_roulette_follows_cumulative_order() {
        let candidates = [
            (NodeIndex::new(0), 1.0),
            (NodeIndex::new(1), 0.0),
            (NodeIndex::new(2), 3.0),
        ];
        // StepRng(0, 0) always draws 0.0, StepRng(MAX, 0) draws just below 1.0.
        assert_eq!(
            roulette(&candidates, &mut StepRng::new(0, 0)),
            Some(NodeIndex::new(0))
        );
        assert_eq!(
            roulette(&candidates, &mut StepRng::new(u64::MAX, 0)),
            Some(NodeIndex::new(2))
        );
    }

    #[test]
    fn test_roulette_degenerate_weights() {
        let zeros = [(NodeIndex::new(0), 0.0), (NodeIndex::new(1), 0.0)];
        assert_eq!(roulette(&zeros, &mut StepRng::new(0, 0)), None);

        let nan = [(NodeIndex::new(0), f64::NAN), (NodeIndex::new(1), 0.0)];
        assert_eq!(roulette(&nan, &mut StepRng::new(0, 0)), None);
    }

    #[test]
    fn test_roulette_nan_counts_as_zero() {
        let candidates = [(NodeIndex::new(0), f64::NAN), (NodeIndex::new(1), 1.0)];
        assert_eq!(
            roulette(&candidates, &mut StepRng::new(0, 0)),
            Some(NodeIndex::new(1))
        );
    }

    #[test]
    fn test_roulette_infinite_weight_dominates() {
        let candidates = [
            (NodeIndex::new(0), 5.0),
            (NodeIndex::new(1), f64::INFINITY),
            (NodeIndex::new(2), 1e300),
        ];
        for state in [0, u64::MAX / 2, u64::MAX] {
            assert_eq!(
                roulette(&candidates, &mut StepRng::new(state, 0)),
                Some(NodeIndex::new(1))
            );
        }
    }

    /// Two finite scores near `f64::MAX` would overflow a plain sum.
    #[test]
    fn test_roulette_large_finite_weights() {
        let candidates = [(NodeIndex::new(0), 1e308), (NodeIndex::new(1), 1e308)];
        assert_eq!(
            roulette(&candidates, &mut StepRng::new(0, 0)),
            Some(NodeIndex::new(0))
        );
        assert_eq!(
            roulette(&candidates, &mut StepRng::new(u64::MAX, 0)),
            Some(NodeIndex::new(1))
        );
    }

    /// A near-zero edge weight makes its score overflow to infinity; the
    /// ant must still take that edge every time.
    #[test]
    fn test_overflowing_score_is_always_chosen() {
        let mut graph: Graph<u32> = Graph::new();
        for id in 0..4 {
            graph.add_node(id);
        }
        for a in 0..4_u32 {
            for b in (a + 1)..4 {
                let weight = if (a, b) == (0, 1) { 1e-200 } else { 1.0 };
                graph.add_edge(&a, &b, weight).unwrap();
            }
        }
        let visibility = VisibilityTable::build(&graph).unwrap();
        let pheromone = PheromoneTable::uniform(graph.edge_count(), 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let start = graph.index_of(&0);

        for _ in 0..300 {
            let trail = build_tour(&graph, &pheromone, &visibility, params(), start, &mut rng).unwrap();
            assert_eq!(trail.to_tour(&graph)[1], 1);
        }
    }

    /// Scores that underflow to zero must not strand the ant.
    #[test]
    fn test_underflow_falls_back_to_uniform_choice() {
        let graph = square();
        let visibility = VisibilityTable::build(&graph).unwrap();
        let pheromone = PheromoneTable::uniform(graph.edge_count(), 1e-300);
        let params = SelectionParams {
            alpha: 10.0,
            beta: 2.0,
            heuristic: HeuristicMode::Visibility,
        };
        assert_eq!(params.score(1e-300, 1.0), 0.0);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let trail = build_tour(&graph, &pheromone, &visibility, params, None, &mut rng).unwrap();
        assert!(trail.is_complete());
    }

    #[test]
    fn test_visibility_blind_score_ignores_distance() {
        let params = SelectionParams {
            alpha: 1.0,
            beta: 2.0,
            heuristic: HeuristicMode::VisibilityBlind,
        };
        assert_eq!(params.score(0.5, 100.0), 0.5);
        assert_eq!(params.score(0.5, 0.01), 0.5);
    }
}
