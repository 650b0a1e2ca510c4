//! The core of the library.
//!
//! The engine module drives the colony: every generation it sends out
//! a cohort of ants over the current pheromone table, reinforces the
//! edges of their tours, evaporates the whole table and keeps the best
//! tour seen so far.

use petgraph::graph::{EdgeIndex, NodeIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::ant::{build_tour, SelectionParams, Trail};
use super::pheromone::PheromoneTable;
use super::visibility::VisibilityTable;
use crate::types::config::AcoConfig;
use crate::types::error::{AcoError, AcoResult};
use crate::types::graph::Graph;
use crate::types::node::NodeId;

/// Fewest nodes that form a cycle worth searching.
pub const MIN_NODES: usize = 3;

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourResult<N> {
    /// Best cycle found, starting node first. The closing edge back to
    /// the first node is implied.
    pub tour: Vec<N>,
    /// Total weight of `tour`, closing edge included.
    pub cost: f64,
    /// Best-so-far cost after each generation.
    pub history: Vec<f64>,
    /// Generations actually run; fewer than configured only after an
    /// early stop.
    pub generations_run: usize,
    /// Number of tours built, ants times generations.
    pub evaluations: usize,
}

/// What one generation did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GenerationReport {
    /// 1-based number of the generation just run.
    pub generation: usize,
    /// Shortest tour of this generation.
    pub generation_best: f64,
    /// Shortest tour of the run so far.
    pub best_cost: f64,
    /// Whether this generation beat the previous best.
    pub improved: bool,
}

#[derive(Debug, Clone)]
struct BestTour {
    trail: Trail,
    cost: f64,
}

/// A colony bound to one graph for one run.
///
/// The colony only borrows the graph, so the graph cannot change while
/// the run is in progress.
#[derive(Debug)]
pub struct Colony<'a, N> {
    graph: &'a Graph<N>,
    config: AcoConfig,
    params: SelectionParams,
    visibility: VisibilityTable,
    pheromone: PheromoneTable,
    start: Option<NodeIndex>,
    rng: ChaCha8Rng,
    best: Option<BestTour>,
    history: Vec<f64>,
    stagnant_generations: usize,
}

impl<'a, N: NodeId> Colony<'a, N> {
    /// Prepares a run: checks the graph size and the configuration,
    /// computes visibility and lays down the initial pheromone.
    ///
    /// # Errors
    /// [`AcoError::InvalidConfig`] for an out-of-range tunable,
    /// [`AcoError::InsufficientNodes`] below three nodes and
    /// [`AcoError::DegenerateWeight`] from the visibility table.
    pub fn new(graph: &'a Graph<N>, config: AcoConfig) -> AcoResult<Self> {
        if graph.node_count() < MIN_NODES {
            return Err(AcoError::InsufficientNodes(graph.node_count()));
        }
        config.validate()?;

        let visibility = VisibilityTable::build(graph)?;
        let pheromone = PheromoneTable::uniform(graph.edge_count(), config.initial_pheromone);
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Colony {
            graph,
            params: SelectionParams::from(&config),
            config,
            visibility,
            pheromone,
            start: None,
            rng,
            best: None,
            history: Vec::new(),
            stagnant_generations: 0,
        })
    }

    /// Makes every ant start from `start`.
    ///
    /// # Errors
    /// [`AcoError::InvalidConfig`] if `start` is not in the graph.
    pub fn with_start(mut self, start: &N) -> AcoResult<Self> {
        let index = self
            .graph
            .index_of(start)
            .ok_or_else(|| AcoError::InvalidConfig(format!("start node {:?} is not in the graph", start)))?;
        self.start = Some(index);
        Ok(self)
    }

    /// Number of generations run so far.
    pub fn generation(&self) -> usize {
        self.history.len()
    }

    /// Whether the configured generations are spent or the run has
    /// stagnated past its limit.
    pub fn is_finished(&self) -> bool {
        if self.generation() >= self.config.generations {
            return true;
        }
        matches!(self.config.stagnation_limit, Some(limit) if self.stagnant_generations >= limit)
    }

    pub fn pheromone(&self) -> &PheromoneTable {
        &self.pheromone
    }

    pub fn visibility(&self) -> &VisibilityTable {
        &self.visibility
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    /// Cost of the best tour so far, `None` before the first generation.
    pub fn best_cost(&self) -> Option<f64> {
        self.best.as_ref().map(|best| best.cost)
    }

    /// Best tour so far, in terms of the caller's nodes.
    pub fn best_tour(&self) -> Option<Vec<N>> {
        self.best.as_ref().map(|best| best.trail.to_tour(self.graph))
    }

    /// Best-so-far cost after each generation.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Runs one generation.
    ///
    /// All ants read the same pheromone table; it is only updated once
    /// the whole cohort is done.
    ///
    /// # Errors
    /// [`AcoError::EdgeNotFound`] if the graph does not admit a closed
    /// tour along some ant's walk.
    pub fn step(&mut self) -> AcoResult<GenerationReport> {
        let generation = self.generation() + 1;

        // One private stream per ant, drawn up front so every ant's
        // randomness depends only on the master seed and its position.
        let seeds: Vec<u64> = (0..self.config.ants_per_generation)
            .map(|_| self.rng.gen())
            .collect();

        let mut tours: Vec<(Trail, Vec<EdgeIndex>, f64)> = Vec::with_capacity(seeds.len());
        for (ant, seed) in seeds.into_iter().enumerate() {
            let mut ant_rng = ChaCha8Rng::seed_from_u64(seed);
            let trail = build_tour(
                self.graph,
                &self.pheromone,
                &self.visibility,
                self.params,
                self.start,
                &mut ant_rng,
            )?;
            let edges = trail.cycle_edges(self.graph)?;
            let length: f64 = edges.iter().map(|&edge| self.graph.weight(edge)).sum();
            trace!("generation {} ant {}: length {}", generation, ant, length);
            tours.push((trail, edges, length));
        }

        for (_, edges, length) in &tours {
            self.pheromone
                .deposit(edges, self.config.pheromone_deposit / length);
        }
        self.pheromone
            .evaporate(self.config.evaporation_rate, self.config.pheromone_floor);

        let mut generation_best: Option<(Trail, f64)> = None;
        for (trail, _, length) in tours {
            if generation_best.as_ref().map_or(true, |(_, best)| length < *best) {
                generation_best = Some((trail, length));
            }
        }
        let (trail, generation_cost) = generation_best.ok_or_else(|| {
            AcoError::InvalidConfig("ants_per_generation must be at least 1".to_string())
        })?;

        let improved = self.best.as_ref().map_or(true, |best| generation_cost < best.cost);
        if improved {
            self.best = Some(BestTour {
                trail,
                cost: generation_cost,
            });
            self.stagnant_generations = 0;
        } else {
            self.stagnant_generations += 1;
        }
        let best_cost = self.best.as_ref().map_or(generation_cost, |best| best.cost);
        self.history.push(best_cost);

        debug!(
            "generation {}: generation best {}, best so far {}",
            generation, generation_cost, best_cost
        );
        Ok(GenerationReport {
            generation,
            generation_best: generation_cost,
            best_cost,
            improved,
        })
    }

    /// Runs generations until [`Colony::is_finished`] and returns the
    /// best tour found.
    pub fn run(mut self) -> AcoResult<TourResult<N>> {
        info!(
            "[1/3] Starting colony: {} nodes, {} edges, {} ants x {} generations",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.config.ants_per_generation,
            self.config.generations
        );

        info!("[2/3] Running generations...");
        while !self.is_finished() {
            self.step()?;
        }
        if self.generation() < self.config.generations {
            info!(
                "Stopped after {} generations without improvement",
                self.stagnant_generations
            );
        }

        info!("[3/3] Collecting the best tour...");
        let best = self.best.take().ok_or_else(|| {
            AcoError::InvalidConfig("generations must be at least 1".to_string())
        })?;
        let generations_run = self.generation();
        let result = TourResult {
            tour: best.trail.to_tour(self.graph),
            cost: best.cost,
            evaluations: generations_run * self.config.ants_per_generation,
            generations_run,
            history: self.history,
        };
        info!("✨Done! Best tour costs {}", result.cost);
        debug!("tour: {:?}", result.tour);
        Ok(result)
    }
}

/// Searches for a short Hamiltonian cycle over `graph`.
///
/// Each ant starts from a uniformly drawn node.
///
/// # Errors
/// See [`Colony::new`] and [`Colony::step`].
pub fn optimize<N: NodeId>(graph: &Graph<N>, config: AcoConfig) -> AcoResult<TourResult<N>> {
    Colony::new(graph, config)?.run()
}

/// Like [`optimize`], but every ant starts from `start`, so the
/// returned tour does too.
///
/// # Errors
/// [`AcoError::InvalidConfig`] if `start` is not in the graph, plus
/// everything [`optimize`] can return.
pub fn optimize_from<N: NodeId>(
    graph: &Graph<N>,
    config: AcoConfig,
    start: &N,
) -> AcoResult<TourResult<N>> {
    Colony::new(graph, config)?.with_start(start)?.run()
}
