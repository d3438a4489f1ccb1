//! Single-objective search configuration.

use serde::{Deserialize, Serialize};

use crate::objective::PenaltyConfig;

use super::operators::{CrossoverKind, MutationKind};

/// Configuration for the adaptive evolutionary search.
///
/// Defaults follow the standard tuning; everything a caller might want
/// to sweep is exposed.
///
/// # Example
/// ```
/// use ffs_optim::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_epochs(50)
///     .with_seed(7);
/// assert_eq!(config.population_size, 60);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    /// Population size N.
    pub population_size: usize,
    /// Number of generations G.
    pub epochs: usize,
    /// Initial crossover probability p_c. Adapted downward to 0.6 on
    /// stagnation.
    pub crossover_rate: f64,
    /// Initial per-gene mutation probability p_m. Adapted upward to 0.5
    /// on stagnation.
    pub mutation_rate: f64,
    /// Tournament size as a fraction of the population (minimum 2).
    pub tournament_fraction: f64,
    /// Keep the incumbent in slot 0 of every generation.
    pub elitism: bool,
    /// RNG seed. Fixed seed ⇒ bit-reproducible runs.
    pub seed: u64,
    /// Fraction of the initial population built by the heuristic seeder.
    pub seed_fraction: f64,
    /// Std deviation of the Gaussian perturbation applied to seeded
    /// individuals.
    pub seed_sigma: f64,
    /// Cap on adjacent-swap positions tried by the incumbent local
    /// search.
    pub local_search_limit: usize,
    /// Crossover operator.
    pub crossover: CrossoverKind,
    /// Mutation operator.
    pub mutation: MutationKind,
    /// Penalty coefficients for the fitness function.
    pub penalty: PenaltyConfig,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            epochs: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            tournament_fraction: 0.2,
            elitism: true,
            seed: 42,
            seed_fraction: 0.5,
            seed_sigma: 0.05,
            local_search_limit: 200,
            crossover: CrossoverKind::Uniform,
            mutation: MutationKind::RandomReset,
            penalty: PenaltyConfig::default(),
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the initial crossover probability.
    pub fn with_crossover_rate(mut self, p_c: f64) -> Self {
        self.crossover_rate = p_c;
        self
    }

    /// Sets the initial per-gene mutation probability.
    pub fn with_mutation_rate(mut self, p_m: f64) -> Self {
        self.mutation_rate = p_m;
        self
    }

    /// Sets the tournament fraction.
    pub fn with_tournament_fraction(mut self, k_frac: f64) -> Self {
        self.tournament_fraction = k_frac;
        self
    }

    /// Enables or disables elitism.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the heuristic-seeded fraction of the initial population.
    pub fn with_seed_fraction(mut self, fraction: f64) -> Self {
        self.seed_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the local-search position cap.
    pub fn with_local_search_limit(mut self, limit: usize) -> Self {
        self.local_search_limit = limit;
        self
    }

    /// Sets the penalty configuration.
    pub fn with_penalty(mut self, penalty: PenaltyConfig) -> Self {
        self.penalty = penalty;
        self
    }
}
