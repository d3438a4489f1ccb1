//! Real-valued dual-vector chromosome for flow-shop scheduling.
//!
//! # Encoding
//!
//! A chromosome is a flat vector of `2·O·S` genes in `[0, 1−ε]`:
//! - The first `O·S` genes form the **operation priority vector** (OS).
//!   Only the total order of the values matters; ties break by
//!   lexicographic `(order, stage)`.
//! - The remaining `O·S` genes form the **machine selector vector** (MS).
//!   Gene `o·S + s` partitions `[0, 1)` into `|E_s|` equal buckets and
//!   picks the corresponding machine from the stage's eligibility list.
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to JSSP"

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};
use crate::models::Instance;

/// Gene-domain epsilon keeping values strictly below 1.0.
pub const GENE_EPSILON: f64 = 1e-4;

/// Upper gene bound: `1.0 − ε`.
pub const GENE_MAX: f64 = 1.0 - GENE_EPSILON;

/// A candidate solution: priorities and machine selectors in one vector.
///
/// Search operators work on the flat gene view; the typed
/// [`priorities`](Chromosome::priorities) / [`selectors`](Chromosome::selectors)
/// halves and [`decode`](Chromosome::decode) enforce the encoding
/// invariants at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    genes: Vec<f64>,
}

/// One decoded operation: machine binding and priority key resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedOp {
    /// Order index.
    pub order: usize,
    /// Stage index.
    pub stage: usize,
    /// Assigned machine index.
    pub machine: usize,
    /// Per-unit processing time (seconds).
    pub per_unit_time: f64,
    /// Priority key from the OS half (lower = earlier).
    pub priority: f64,
    /// Total processing time: per-unit × quantity (seconds).
    pub total_time: f64,
}

/// Maps a selector gene onto an index into a stage's eligibility list.
///
/// Equal-width bucket partition of `[0, 1)`; the last bucket absorbs the
/// degenerate value 1.0.
#[inline]
pub fn select_machine_slot(selector: f64, eligible_count: usize) -> usize {
    ((selector * eligible_count as f64) as usize).min(eligible_count - 1)
}

impl Chromosome {
    /// Wraps an existing gene vector.
    pub fn new(genes: Vec<f64>) -> Self {
        Self { genes }
    }

    /// Builds a chromosome from separate priority and selector halves.
    pub fn from_parts(priorities: &[f64], selectors: &[f64]) -> Self {
        let mut genes = Vec::with_capacity(priorities.len() + selectors.len());
        genes.extend_from_slice(priorities);
        genes.extend_from_slice(selectors);
        Self { genes }
    }

    /// Draws a uniform random chromosome for `total_ops` operations.
    pub fn random<R: Rng>(total_ops: usize, rng: &mut R) -> Self {
        let genes = (0..total_ops * 2)
            .map(|_| rng.random_range(0.0..GENE_MAX))
            .collect();
        Self { genes }
    }

    /// Number of genes (`2 · O · S`).
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome holds no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Flat gene view.
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Mutable flat gene view for search operators.
    pub fn genes_mut(&mut self) -> &mut [f64] {
        &mut self.genes
    }

    /// The operation-priority half (first `O·S` genes).
    pub fn priorities(&self) -> &[f64] {
        &self.genes[..self.genes.len() / 2]
    }

    /// The machine-selector half (last `O·S` genes).
    pub fn selectors(&self) -> &[f64] {
        &self.genes[self.genes.len() / 2..]
    }

    /// Clamps every gene into `[0, GENE_MAX]`.
    pub fn clamp_to_bounds(&mut self) {
        for g in &mut self.genes {
            *g = g.clamp(0.0, GENE_MAX);
        }
    }

    /// Decodes the chromosome against an instance.
    ///
    /// Total on well-formed inputs; fails with
    /// [`SchedulingError::IneligibleAssignment`] if the selected machine
    /// has an infinite processing time (an instance precondition
    /// violation, since eligibility lists are validated at build time).
    pub fn decode(&self, instance: &Instance) -> Result<Vec<DecodedOp>> {
        let num_stages = instance.num_stages();
        let total_ops = instance.total_ops();
        debug_assert_eq!(self.genes.len(), total_ops * 2);

        let priorities = self.priorities();
        let selectors = self.selectors();
        let mut ops = Vec::with_capacity(total_ops);

        for order in 0..instance.num_orders() {
            let qty = instance.order(order).quantity as f64;
            for stage in 0..num_stages {
                let idx = order * num_stages + stage;
                let eligible = instance.eligible_machines(stage);
                let slot = select_machine_slot(selectors[idx], eligible.len());
                let machine = eligible[slot];

                let per_unit_time = instance.proc_time(order, stage, machine);
                if !per_unit_time.is_finite() {
                    return Err(SchedulingError::IneligibleAssignment {
                        order,
                        stage,
                        machine,
                    });
                }

                ops.push(DecodedOp {
                    order,
                    stage,
                    machine,
                    per_unit_time,
                    priority: priorities[idx],
                    total_time: per_unit_time * qty,
                });
            }
        }

        Ok(ops)
    }

    /// The machine index chosen for every operation, `O·S` entries in
    /// global operation order.
    pub fn machine_assignment(&self, instance: &Instance) -> Result<Vec<usize>> {
        Ok(self.decode(instance)?.into_iter().map(|op| op.machine).collect())
    }
}
