//! NSGA-II search engine.
//!
//! (μ+λ) multi-objective search with binary tournament on
//! (rank, crowding), SBX crossover, polynomial mutation, and front-wise
//! survival with crowding truncation of the last admitted front.
//!
//! Exact gene-level duplicates in the parent ∪ offspring union are set
//! aside before survival and only re-admitted if the distinct solutions
//! cannot fill the population: duplicated extreme points would otherwise
//! collect infinite crowding distance and crowd distinct trade-offs out
//! of the front.
//!
//! # Reference
//! Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//! Algorithm: NSGA-II"

use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

use crate::encoding::Chromosome;
use crate::error::SENTINEL_OBJECTIVES;
use crate::ga::operators::{polynomial_mutation, sbx_crossover};
use crate::ga::{GenerationEvent, SearchObserver};
use crate::models::Instance;
use crate::objective::evaluate_multi;

use super::config::NsgaConfig;
use super::front::{FrontMember, ParetoFront};
use super::sorting::{crowding_distance, fast_non_dominated_sort};

/// Result of a multi-objective run.
#[derive(Debug, Clone)]
pub struct NsgaOutcome {
    /// First non-dominated front of the final population.
    pub front: ParetoFront,
    /// Generations actually executed.
    pub generations_run: usize,
    /// Whether the run stopped on the cancellation flag.
    pub cancelled: bool,
}

/// NSGA-II optimizer over one instance.
pub struct NsgaEngine<'a> {
    instance: &'a Instance,
    config: NsgaConfig,
}

impl<'a> NsgaEngine<'a> {
    /// Creates an engine for the given instance and configuration.
    pub fn new(instance: &'a Instance, config: NsgaConfig) -> Self {
        Self { instance, config }
    }

    /// Runs the search from a uniform random initial population.
    pub fn run(&self) -> NsgaOutcome {
        self.run_with(None, None)
    }

    /// Runs with an optional observer and cancellation flag.
    pub fn run_with(
        &self,
        observer: Option<&mut dyn SearchObserver>,
        cancel: Option<&AtomicBool>,
    ) -> NsgaOutcome {
        let mu = self.config.population_size.max(2);
        let mut rng = SmallRng::seed_from_u64(self.config.seed);
        let population: Vec<Chromosome> = (0..mu)
            .map(|_| Chromosome::random(self.instance.total_ops(), &mut rng))
            .collect();
        self.evolve(population, rng, observer, cancel)
    }

    /// Runs from a caller-supplied initial population.
    pub fn run_from(
        &self,
        initial: Vec<Chromosome>,
        observer: Option<&mut dyn SearchObserver>,
        cancel: Option<&AtomicBool>,
    ) -> NsgaOutcome {
        let rng = SmallRng::seed_from_u64(self.config.seed);
        self.evolve(initial, rng, observer, cancel)
    }

    fn evolve(
        &self,
        mut population: Vec<Chromosome>,
        mut rng: SmallRng,
        mut observer: Option<&mut dyn SearchObserver>,
        cancel: Option<&AtomicBool>,
    ) -> NsgaOutcome {
        let cfg = &self.config;
        let mu = population.len();
        let chromosome_len = self.instance.total_ops() * 2;
        let p_m = cfg
            .mutation_rate
            .unwrap_or(1.0 / chromosome_len.max(1) as f64);

        let mut objectives = self.evaluate_population(&population);
        let (mut rank, mut crowding) = rank_and_crowd(&objectives);

        let mut generations_run = 0;
        let mut cancelled = false;

        for generation in 0..cfg.generations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }

            // Variation: binary tournaments feed SBX + polynomial mutation.
            let mut offspring = Vec::with_capacity(mu);
            while offspring.len() < mu {
                let a = binary_tournament(&rank, &crowding, &mut rng);
                let b = binary_tournament(&rank, &crowding, &mut rng);
                let (mut c1, mut c2) = if rng.random_bool(cfg.crossover_rate.clamp(0.0, 1.0)) {
                    sbx_crossover(&population[a], &population[b], cfg.eta_c, &mut rng)
                } else {
                    (population[a].clone(), population[b].clone())
                };
                polynomial_mutation(&mut c1, cfg.eta_m, p_m, &mut rng);
                polynomial_mutation(&mut c2, cfg.eta_m, p_m, &mut rng);
                offspring.push(c1);
                if offspring.len() < mu {
                    offspring.push(c2);
                }
            }

            let offspring_objectives = self.evaluate_population(&offspring);

            // (μ+λ) survival over the union.
            let mut union = population;
            union.append(&mut offspring);
            let mut union_objectives = objectives;
            union_objectives.extend(offspring_objectives);

            let (survivors, survivor_objectives) =
                select_survivors(union, union_objectives, mu);
            population = survivors;
            objectives = survivor_objectives;
            (rank, crowding) = rank_and_crowd(&objectives);

            generations_run = generation + 1;

            let best_tardiness = objectives
                .iter()
                .map(|o| o[0])
                .fold(f64::INFINITY, f64::min);
            debug!(generation, best_tardiness, "generation complete");
            if let Some(obs) = observer.as_deref_mut() {
                obs.on_generation(&GenerationEvent {
                    generation,
                    best_fitness: best_tardiness,
                    crossover_rate: cfg.crossover_rate,
                    mutation_rate: p_m,
                });
            }
        }

        NsgaOutcome {
            front: extract_first_front(population, objectives),
            generations_run,
            cancelled,
        }
    }

    fn evaluate_population(&self, population: &[Chromosome]) -> Vec<[f64; 3]> {
        population
            .par_iter()
            .map(|ch| {
                evaluate_multi(self.instance, ch, &self.config.penalty)
                    .unwrap_or(SENTINEL_OBJECTIVES)
            })
            .collect()
    }
}

/// Binary tournament: lower rank wins, equal rank breaks by larger
/// crowding distance.
fn binary_tournament<R: Rng>(rank: &[usize], crowding: &[f64], rng: &mut R) -> usize {
    let a = rng.random_range(0..rank.len());
    let b = rng.random_range(0..rank.len());
    if rank[a] < rank[b] || (rank[a] == rank[b] && crowding[a] > crowding[b]) {
        a
    } else {
        b
    }
}

/// Per-individual rank and crowding distance for one population.
fn rank_and_crowd(objectives: &[[f64; 3]]) -> (Vec<usize>, Vec<f64>) {
    let mut rank = vec![0usize; objectives.len()];
    let mut crowding = vec![0.0_f64; objectives.len()];
    for (front_idx, front) in fast_non_dominated_sort(objectives).iter().enumerate() {
        let distances = crowding_distance(front, objectives);
        for (pos, &i) in front.iter().enumerate() {
            rank[i] = front_idx;
            crowding[i] = distances[pos];
        }
    }
    (rank, crowding)
}

/// Front-wise survival selection with crowding truncation.
fn select_survivors(
    union: Vec<Chromosome>,
    union_objectives: Vec<[f64; 3]>,
    mu: usize,
) -> (Vec<Chromosome>, Vec<[f64; 3]>) {
    // Partition into first occurrences and gene-identical duplicates.
    let mut unique_indices: Vec<usize> = Vec::with_capacity(union.len());
    let mut duplicate_indices: Vec<usize> = Vec::new();
    for i in 0..union.len() {
        if unique_indices.iter().any(|&j| union[j] == union[i]) {
            duplicate_indices.push(i);
        } else {
            unique_indices.push(i);
        }
    }

    let unique_objectives: Vec<[f64; 3]> =
        unique_indices.iter().map(|&i| union_objectives[i]).collect();

    let mut chosen: Vec<usize> = Vec::with_capacity(mu);
    for front in fast_non_dominated_sort(&unique_objectives) {
        if chosen.len() + front.len() <= mu {
            chosen.extend(front.iter().map(|&p| unique_indices[p]));
        } else {
            let distances = crowding_distance(&front, &unique_objectives);
            let mut by_crowding: Vec<usize> = (0..front.len()).collect();
            by_crowding.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));
            for &p in by_crowding.iter().take(mu - chosen.len()) {
                chosen.push(unique_indices[front[p]]);
            }
        }
        if chosen.len() == mu {
            break;
        }
    }
    // Duplicates backfill only when distinct solutions run out.
    chosen.extend(duplicate_indices.iter().take(mu - chosen.len()));

    let mut slots: Vec<Option<Chromosome>> = union.into_iter().map(Some).collect();
    let survivors: Vec<Chromosome> = chosen
        .iter()
        .map(|&i| slots[i].take().expect("survivor index chosen once"))
        .collect();
    let survivor_objectives = chosen.iter().map(|&i| union_objectives[i]).collect();
    (survivors, survivor_objectives)
}

/// First non-dominated front of the final population, with crowding.
fn extract_first_front(population: Vec<Chromosome>, objectives: Vec<[f64; 3]>) -> ParetoFront {
    if population.is_empty() {
        return ParetoFront::default();
    }
    let fronts = fast_non_dominated_sort(&objectives);
    let first = &fronts[0];
    let distances = crowding_distance(first, &objectives);

    let mut slots: Vec<Option<Chromosome>> = population.into_iter().map(Some).collect();
    let members = first
        .iter()
        .zip(distances)
        .map(|(&i, crowding)| FrontMember {
            chromosome: slots[i].take().expect("front index unique"),
            objectives: objectives[i],
            crowding,
        })
        .collect();
    ParetoFront { members }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Machine, Order};
    use crate::nsga::sorting::dominates;

    fn flow_instance() -> Instance {
        Instance::builder()
            .order(Order::new("A").with_quantity(2).with_due_date_days(0.3))
            .order(Order::new("B").with_due_date_days(0.1).with_weight(1.2))
            .order(Order::new("C").with_quantity(2).with_due_date_days(0.6))
            .machine(Machine::new("M1"))
            .machine(Machine::new("M2"))
            .stage("S0", ["M1", "M2"])
            .stage("S1", ["M2"])
            .stage_time("S0", "M1", 900.0)
            .stage_time("S0", "M2", 1_100.0)
            .stage_time("S1", "M2", 700.0)
            .build()
            .unwrap()
    }

    /// Single stage, three machines with distinct speeds: picking each
    /// machine yields three mutually incomparable objective triples.
    fn three_way_tradeoff_instance() -> Instance {
        Instance::builder()
            .order(Order::new("A").with_due_date_days(-1.0))
            .machine(Machine::new("M1"))
            .machine(Machine::new("M2"))
            .machine(Machine::new("M3"))
            .stage("S0", ["M1", "M2", "M3"])
            .stage_time("S0", "M1", 10_000.0)
            .stage_time("S0", "M2", 20_000.0)
            .stage_time("S0", "M3", 30_000.0)
            .build()
            .unwrap()
    }

    fn small_config() -> NsgaConfig {
        NsgaConfig::default()
            .with_population_size(12)
            .with_generations(10)
            .with_seed(42)
    }

    #[test]
    fn test_front_is_mutually_non_dominated() {
        let inst = flow_instance();
        let outcome = NsgaEngine::new(&inst, small_config()).run();

        let front = &outcome.front;
        assert!(!front.members.is_empty());
        for a in &front.members {
            for b in &front.members {
                assert!(!dominates(&a.objectives, &b.objectives));
            }
        }
    }

    #[test]
    fn test_hand_constructed_tradeoff_front() {
        let inst = three_way_tradeoff_instance();
        // Selector buckets for three machines: [0,1/3) [1/3,2/3) [2/3,1).
        let candidates = vec![
            Chromosome::from_parts(&[0.5], &[0.1]),
            Chromosome::from_parts(&[0.5], &[0.5]),
            Chromosome::from_parts(&[0.5], &[0.9]),
        ];
        let config = NsgaConfig::default()
            .with_population_size(3)
            .with_generations(1)
            .with_crossover_rate(0.0)
            .with_mutation_rate(0.0)
            .with_seed(42);

        let outcome = NsgaEngine::new(&inst, config).run_from(candidates, None, None);
        let front = &outcome.front;
        assert_eq!(front.members.len(), 3);

        // All three machine choices survive the generation.
        let mut makespans: Vec<f64> = front.members.iter().map(|m| m.objectives[2]).collect();
        makespans.sort_by(f64::total_cmp);
        assert!((makespans[0] - 10_000.0 / 86_400.0).abs() < 1e-9);
        assert!((makespans[1] - 20_000.0 / 86_400.0).abs() < 1e-9);
        assert!((makespans[2] - 30_000.0 / 86_400.0).abs() < 1e-9);

        // Endpoints carry infinite crowding, the middle point finite.
        let mut by_makespan: Vec<&FrontMember> = front.members.iter().collect();
        by_makespan.sort_by(|a, b| a.objectives[2].total_cmp(&b.objectives[2]));
        assert!(by_makespan[0].crowding.is_infinite());
        assert!(by_makespan[1].crowding.is_finite());
        assert!(by_makespan[2].crowding.is_infinite());
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let inst = flow_instance();
        let first = NsgaEngine::new(&inst, small_config()).run();
        let second = NsgaEngine::new(&inst, small_config()).run();

        assert_eq!(first.front.members.len(), second.front.members.len());
        for (a, b) in first.front.members.iter().zip(&second.front.members) {
            assert_eq!(a.chromosome, b.chromosome);
            assert_eq!(a.objectives, b.objectives);
        }
    }

    #[test]
    fn test_population_size_is_preserved() {
        let inst = flow_instance();
        let outcome = NsgaEngine::new(&inst, small_config()).run();
        assert!(outcome.front.members.len() <= small_config().population_size);
        assert_eq!(outcome.generations_run, 10);
        assert!(!outcome.cancelled);
    }

    #[test]
    fn test_cancellation_returns_initial_front() {
        let inst = flow_instance();
        let cancel = AtomicBool::new(true);
        let outcome = NsgaEngine::new(&inst, small_config()).run_with(None, Some(&cancel));

        assert!(outcome.cancelled);
        assert_eq!(outcome.generations_run, 0);
        // The evaluated initial population still yields a front.
        assert!(!outcome.front.members.is_empty());
    }

    #[test]
    fn test_observer_receives_events() {
        struct Counter {
            count: usize,
        }
        impl SearchObserver for Counter {
            fn on_generation(&mut self, _event: &GenerationEvent) {
                self.count += 1;
            }
        }

        let inst = flow_instance();
        let mut counter = Counter { count: 0 };
        let outcome = NsgaEngine::new(&inst, small_config()).run_with(Some(&mut counter), None);
        assert_eq!(counter.count, outcome.generations_run);
    }

    #[test]
    fn test_survivor_selection_truncates_by_crowding() {
        // Five distinct points in one front; survival to μ=3 keeps the
        // extremes and drops the most crowded interior points.
        let chromosomes: Vec<Chromosome> = (0..5)
            .map(|i| Chromosome::new(vec![i as f64 / 10.0; 2]))
            .collect();
        let objectives = vec![
            [0.0, 4.0, 0.0],
            [1.0, 3.0, 1.0],
            [1.1, 2.9, 1.1],
            [1.2, 2.8, 1.2],
            [4.0, 0.0, 4.0],
        ];
        let (survivors, objs) = select_survivors(chromosomes, objectives, 3);
        assert_eq!(survivors.len(), 3);
        // The two extremes always survive.
        assert!(objs.contains(&[0.0, 4.0, 0.0]));
        assert!(objs.contains(&[4.0, 0.0, 4.0]));
    }
}
