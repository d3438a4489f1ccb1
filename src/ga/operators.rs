//! Genetic operators on bounded real vectors.
//!
//! Runtime-selectable crossover and mutation shared by both engines,
//! plus tournament selection. All operators respect the gene domain
//! `[0, GENE_MAX]`.
//!
//! # Operators
//!
//! | Operator | Use |
//! |----------|-----|
//! | Uniform crossover | Single-objective default |
//! | SBX (η_c = 20) | Multi-objective default |
//! | Random-reset mutation | Single-objective default |
//! | Polynomial mutation (η_m = 20) | Multi-objective default |
//!
//! # References
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous
//!   Search Space"
//! - Deb (2001), "Multi-Objective Optimization using Evolutionary
//!   Algorithms" (polynomial mutation)

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::encoding::{Chromosome, GENE_MAX};

/// Crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverKind {
    /// Gene-wise coin flip between the parents.
    Uniform,
    /// Simulated binary crossover on bounded reals.
    Sbx,
}

/// Mutation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    /// Replace the gene with a fresh uniform draw.
    RandomReset,
    /// Polynomial perturbation around the current value.
    Polynomial,
}

/// Runtime-selectable variation operators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariationOperators {
    /// Crossover strategy.
    pub crossover: CrossoverKind,
    /// Mutation strategy.
    pub mutation: MutationKind,
    /// SBX distribution index.
    pub eta_c: f64,
    /// Polynomial-mutation distribution index.
    pub eta_m: f64,
}

impl Default for VariationOperators {
    fn default() -> Self {
        Self {
            crossover: CrossoverKind::Uniform,
            mutation: MutationKind::RandomReset,
            eta_c: 20.0,
            eta_m: 20.0,
        }
    }
}

impl VariationOperators {
    /// Performs crossover using the configured strategy.
    pub fn crossover<R: Rng>(
        &self,
        p1: &Chromosome,
        p2: &Chromosome,
        rng: &mut R,
    ) -> (Chromosome, Chromosome) {
        match self.crossover {
            CrossoverKind::Uniform => uniform_crossover(p1, p2, rng),
            CrossoverKind::Sbx => sbx_crossover(p1, p2, self.eta_c, rng),
        }
    }

    /// Performs per-gene mutation with probability `p_m` per gene.
    pub fn mutate<R: Rng>(&self, chromosome: &mut Chromosome, p_m: f64, rng: &mut R) {
        match self.mutation {
            MutationKind::RandomReset => random_reset_mutation(chromosome, p_m, rng),
            MutationKind::Polynomial => polynomial_mutation(chromosome, self.eta_m, p_m, rng),
        }
    }
}

/// Tournament selection: sample `k` distinct indices, return the one
/// with the lowest fitness.
pub fn tournament_select<R: Rng>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.clamp(2, fitness.len().max(2)).min(fitness.len());
    let sampled = rand::seq::index::sample(rng, fitness.len(), k);
    sampled
        .iter()
        .min_by(|&a, &b| fitness[a].total_cmp(&fitness[b]))
        .expect("tournament sample is non-empty")
}

/// Gene-wise coin-flip crossover producing two children.
pub fn uniform_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let (a, b) = (p1.genes(), p2.genes());
    let mut c1 = Vec::with_capacity(a.len());
    let mut c2 = Vec::with_capacity(a.len());
    for i in 0..a.len() {
        if rng.random_bool(0.5) {
            c1.push(a[i]);
            c2.push(b[i]);
        } else {
            c1.push(b[i]);
            c2.push(a[i]);
        }
    }
    (Chromosome::new(c1), Chromosome::new(c2))
}

/// Replaces each gene, with probability `p_m`, by a uniform draw in
/// `[0, GENE_MAX)`.
pub fn random_reset_mutation<R: Rng>(chromosome: &mut Chromosome, p_m: f64, rng: &mut R) {
    for g in chromosome.genes_mut() {
        if rng.random_bool(p_m.clamp(0.0, 1.0)) {
            *g = rng.random_range(0.0..GENE_MAX);
        }
    }
}

/// Simulated binary crossover with spread factor
/// `β = (2u)^(1/(η+1))` for `u ≤ 0.5`, `(1/(2(1−u)))^(1/(η+1))`
/// otherwise; children are clipped to the gene bounds.
pub fn sbx_crossover<R: Rng>(
    p1: &Chromosome,
    p2: &Chromosome,
    eta_c: f64,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let (a, b) = (p1.genes(), p2.genes());
    let mut c1 = Vec::with_capacity(a.len());
    let mut c2 = Vec::with_capacity(a.len());
    let exponent = 1.0 / (eta_c + 1.0);

    for i in 0..a.len() {
        let u: f64 = rng.random();
        let beta = if u <= 0.5 {
            (2.0 * u).powf(exponent)
        } else {
            (1.0 / (2.0 * (1.0 - u))).powf(exponent)
        };
        let x = 0.5 * ((1.0 + beta) * a[i] + (1.0 - beta) * b[i]);
        let y = 0.5 * ((1.0 - beta) * a[i] + (1.0 + beta) * b[i]);
        c1.push(x.clamp(0.0, GENE_MAX));
        c2.push(y.clamp(0.0, GENE_MAX));
    }
    (Chromosome::new(c1), Chromosome::new(c2))
}

/// Bounded polynomial mutation, per gene with probability `p_m`.
pub fn polynomial_mutation<R: Rng>(
    chromosome: &mut Chromosome,
    eta_m: f64,
    p_m: f64,
    rng: &mut R,
) {
    let (lo, hi) = (0.0, GENE_MAX);
    let span = hi - lo;
    let exponent = 1.0 / (eta_m + 1.0);

    for g in chromosome.genes_mut() {
        if !rng.random_bool(p_m.clamp(0.0, 1.0)) {
            continue;
        }
        let u: f64 = rng.random();
        let delta = if u < 0.5 {
            let d = (*g - lo) / span;
            let val = 2.0 * u + (1.0 - 2.0 * u) * (1.0 - d).powf(eta_m + 1.0);
            val.powf(exponent) - 1.0
        } else {
            let d = (hi - *g) / span;
            let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * (1.0 - d).powf(eta_m + 1.0);
            1.0 - val.powf(exponent)
        };
        *g = (*g + delta * span).clamp(lo, hi);
    }
}
