//! Tunables of a colony run.

use serde::{Deserialize, Serialize};

use crate::types::error::{AcoError, AcoResult};

/// How an ant scores a candidate edge.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicMode {
    /// `pheromone^alpha * visibility^beta`.
    #[default]
    Visibility,
    /// `pheromone^alpha`; distance only matters through deposits.
    VisibilityBlind,
}

/// Configuration of one optimization run.
///
/// Deserializes from partial documents: any missing field takes its
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoConfig {
    /// Cohort size per generation.
    pub ants_per_generation: usize,
    /// Number of generations to run.
    pub generations: usize,
    /// Fraction of pheromone lost each generation, in (0, 1).
    pub evaporation_rate: f64,
    /// Numerator of the per-tour deposit `pheromone_deposit / length`.
    pub pheromone_deposit: f64,
    /// Exponent on pheromone.
    pub alpha: f64,
    /// Exponent on visibility.
    pub beta: f64,
    /// Lower bound enforced after evaporation.
    pub pheromone_floor: f64,
    /// Uniform starting intensity of every edge.
    pub initial_pheromone: f64,
    /// Selection rule; see [`HeuristicMode`].
    pub heuristic: HeuristicMode,
    /// Stop after this many consecutive generations without a strictly
    /// better tour. `None` runs every generation.
    pub stagnation_limit: Option<usize>,
    /// Seed of the colony's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        AcoConfig {
            ants_per_generation: 10,
            generations: 100,
            evaporation_rate: 0.1,
            pheromone_deposit: 1.0,
            alpha: 1.0,
            beta: 2.0,
            pheromone_floor: 1e-6,
            initial_pheromone: 1.0,
            heuristic: HeuristicMode::Visibility,
            stagnation_limit: None,
            seed: None,
        }
    }
}

impl AcoConfig {
    /// Create a configuration with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ants(mut self, ants_per_generation: usize) -> Self {
        self.ants_per_generation = ants_per_generation;
        self
    }

    #[must_use]
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    #[must_use]
    pub fn with_evaporation_rate(mut self, evaporation_rate: f64) -> Self {
        self.evaporation_rate = evaporation_rate;
        self
    }

    #[must_use]
    pub fn with_pheromone_deposit(mut self, pheromone_deposit: f64) -> Self {
        self.pheromone_deposit = pheromone_deposit;
        self
    }

    /// Set pheromone importance (α).
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set visibility importance (β).
    #[must_use]
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    #[must_use]
    pub fn with_pheromone_floor(mut self, pheromone_floor: f64) -> Self {
        self.pheromone_floor = pheromone_floor;
        self
    }

    #[must_use]
    pub fn with_initial_pheromone(mut self, initial_pheromone: f64) -> Self {
        self.initial_pheromone = initial_pheromone;
        self
    }

    #[must_use]
    pub fn with_heuristic(mut self, heuristic: HeuristicMode) -> Self {
        self.heuristic = heuristic;
        self
    }

    #[must_use]
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every tunable against its accepted range.
    ///
    /// # Errors
    /// [`AcoError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> AcoResult<()> {
        if self.ants_per_generation == 0 {
            return Err(invalid("ants_per_generation must be at least 1"));
        }
        if self.generations == 0 {
            return Err(invalid("generations must be at least 1"));
        }
        if !(self.evaporation_rate > 0.0 && self.evaporation_rate < 1.0) {
            return Err(invalid(format!(
                "evaporation_rate {} is outside (0, 1)",
                self.evaporation_rate
            )));
        }
        for (name, value) in [
            ("pheromone_deposit", self.pheromone_deposit),
            ("pheromone_floor", self.pheromone_floor),
            ("initial_pheromone", self.initial_pheromone),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{} {} must be positive", name, value)));
            }
        }
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{} {} must be non-negative", name, value)));
            }
        }
        if self.stagnation_limit == Some(0) {
            return Err(invalid("stagnation_limit must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AcoError {
    AcoError::InvalidConfig(message.into())
}
