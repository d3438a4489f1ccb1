//! EDD+SPT heuristic seeding for the initial population.
//!
//! Builds priority vectors from a due-date dispatching rule so part of
//! the initial population starts near a sensible schedule instead of
//! uniform noise:
//!
//! - Orders are ranked by `due_date / weight` ascending (weighted EDD),
//!   ties broken by cheapest total processing time ascending (SPT).
//! - `OS[o·S + s] = rank_o / O + 0.001·s`; the stage offset keeps each
//!   order's stages in their natural order.
//! - Machine selectors draw uniformly from `[0.3, 0.7]`, leaving the
//!   assignment decision to the search.
//!
//! # References
//! - Jackson (1955), EDD minimizes maximum lateness on one machine
//! - Smith (1956), SPT minimizes mean flow time on one machine

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::encoding::{Chromosome, GENE_MAX};
use crate::models::Instance;

/// Builds one EDD+SPT seeded chromosome.
pub fn seed_chromosome<R: Rng>(instance: &Instance, rng: &mut R) -> Chromosome {
    let num_orders = instance.num_orders();
    let num_stages = instance.num_stages();

    // Urgency key: due date scaled down by weight, so heavier orders
    // rank as if they were due earlier.
    let mut ranked: Vec<usize> = (0..num_orders).collect();
    ranked.sort_by(|&a, &b| {
        let key_a = instance.order(a).due_date_days / instance.order(a).weight;
        let key_b = instance.order(b).due_date_days / instance.order(b).weight;
        key_a
            .total_cmp(&key_b)
            .then(instance.min_total_time(a).total_cmp(&instance.min_total_time(b)))
    });

    let mut priorities = vec![0.0; num_orders * num_stages];
    for (rank, &order) in ranked.iter().enumerate() {
        for stage in 0..num_stages {
            let value = rank as f64 / num_orders as f64 + 0.001 * stage as f64;
            priorities[order * num_stages + stage] = value.min(GENE_MAX);
        }
    }

    let selectors: Vec<f64> = (0..num_orders * num_stages)
        .map(|_| rng.random_range(0.3..0.7))
        .collect();

    Chromosome::from_parts(&priorities, &selectors)
}

/// Adds zero-mean Gaussian noise to every gene and clamps to bounds.
///
/// Non-positive or non-finite `sigma` leaves the chromosome unchanged.
pub fn perturb<R: Rng>(chromosome: &mut Chromosome, sigma: f64, rng: &mut R) {
    if !(sigma > 0.0 && sigma.is_finite()) {
        return;
    }
    let noise = Normal::new(0.0, sigma).expect("sigma checked finite and positive");
    for g in chromosome.genes_mut() {
        *g = (*g + noise.sample(rng)).clamp(0.0, GENE_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::sequence;
    use crate::models::{Machine, Order};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn three_order_instance() -> Instance {
        Instance::builder()
            .order(Order::new("late").with_due_date_days(9.0))
            .order(Order::new("soon").with_due_date_days(1.0))
            .order(Order::new("heavy").with_due_date_days(4.0).with_weight(2.0))
            .machine(Machine::new("M1"))
            .machine(Machine::new("M2"))
            .stage("S0", ["M1", "M2"])
            .stage("S1", ["M2"])
            .stage_time("S0", "M1", 5.0)
            .stage_time("S0", "M2", 5.0)
            .stage_time("S1", "M2", 3.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_seed_ranks_by_weighted_due_date() {
        let inst = three_order_instance();
        let mut rng = SmallRng::seed_from_u64(42);
        let ch = seed_chromosome(&inst, &mut rng);

        // Urgency keys: soon 1.0, heavy 4.0/2.0 = 2.0, late 9.0.
        let p = ch.priorities();
        let first_stage = |o: usize| p[o * inst.num_stages()];
        assert!(first_stage(1) < first_stage(2));
        assert!(first_stage(2) < first_stage(0));
    }

    #[test]
    fn test_seed_preserves_stage_order() {
        let inst = three_order_instance();
        let mut rng = SmallRng::seed_from_u64(42);
        let ch = seed_chromosome(&inst, &mut rng);

        let p = ch.priorities();
        for order in 0..inst.num_orders() {
            let s0 = p[order * inst.num_stages()];
            let s1 = p[order * inst.num_stages() + 1];
            assert!(s0 < s1);
        }
    }

    #[test]
    fn test_seed_decodes_without_fallback() {
        let inst = three_order_instance();
        let mut rng = SmallRng::seed_from_u64(42);
        let ch = seed_chromosome(&inst, &mut rng);

        let ops = ch.decode(&inst).unwrap();
        let seq = sequence(ops, inst.num_orders());
        assert!(!seq.precedence_fallback);
        assert_eq!(seq.ops.len(), inst.total_ops());
    }

    #[test]
    fn test_seed_selectors_leave_choice_open() {
        let inst = three_order_instance();
        let mut rng = SmallRng::seed_from_u64(42);
        let ch = seed_chromosome(&inst, &mut rng);
        assert!(ch.selectors().iter().all(|&v| (0.3..0.7).contains(&v)));
    }

    #[test]
    fn test_perturb_stays_in_bounds() {
        let inst = three_order_instance();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = seed_chromosome(&inst, &mut rng);
        let original = ch.clone();

        perturb(&mut ch, 0.05, &mut rng);
        assert!(ch.genes().iter().all(|&g| (0.0..=GENE_MAX).contains(&g)));
        assert_ne!(ch, original);
    }

    #[test]
    fn test_perturb_zero_sigma_is_identity() {
        let inst = three_order_instance();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = seed_chromosome(&inst, &mut rng);
        let original = ch.clone();

        perturb(&mut ch, 0.0, &mut rng);
        assert_eq!(ch, original);
    }
}
