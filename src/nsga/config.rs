//! Multi-objective search configuration.

use serde::{Deserialize, Serialize};

use crate::objective::PenaltyConfig;

/// Configuration for the NSGA-II engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NsgaConfig {
    /// Population size μ (offspring count λ = μ).
    pub population_size: usize,
    /// Number of generations.
    pub generations: usize,
    /// Crossover probability per parent pair.
    pub crossover_rate: f64,
    /// Per-gene mutation probability. `None` derives 1 / chromosome
    /// length at run time.
    pub mutation_rate: Option<f64>,
    /// SBX distribution index.
    pub eta_c: f64,
    /// Polynomial-mutation distribution index.
    pub eta_m: f64,
    /// RNG seed. Fixed seed ⇒ bit-reproducible runs.
    pub seed: u64,
    /// Penalty coefficients for the tardiness objective.
    pub penalty: PenaltyConfig,
}

impl Default for NsgaConfig {
    fn default() -> Self {
        Self {
            population_size: 80,
            generations: 200,
            crossover_rate: 0.9,
            mutation_rate: None,
            eta_c: 20.0,
            eta_m: 20.0,
            seed: 42,
            penalty: PenaltyConfig::default(),
        }
    }
}

impl NsgaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, mu: usize) -> Self {
        self.population_size = mu;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_rate(mut self, p_c: f64) -> Self {
        self.crossover_rate = p_c;
        self
    }

    /// Sets an explicit per-gene mutation probability.
    pub fn with_mutation_rate(mut self, p_m: f64) -> Self {
        self.mutation_rate = Some(p_m);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the penalty configuration.
    pub fn with_penalty(mut self, penalty: PenaltyConfig) -> Self {
        self.penalty = penalty;
        self
    }
}
