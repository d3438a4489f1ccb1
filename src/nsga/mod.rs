//! Multi-objective search (NSGA-II).
//!
//! Optimizes the objective triple `(tardiness + penalty, −utilization,
//! makespan)` with fast non-dominated sorting, crowding-distance
//! diversity, binary tournament on (rank, crowding), SBX crossover and
//! polynomial mutation under a (μ+λ) survival scheme.
//!
//! # Quick Start
//!
//! ```no_run
//! use ffs_optim::models::{Instance, Machine, Order};
//! use ffs_optim::nsga::{NsgaConfig, NsgaEngine};
//!
//! let instance = Instance::builder()
//!     .order(Order::new("A").with_quantity(10).with_due_date_days(2.0))
//!     .machine(Machine::new("M1").with_daily_seconds(28_800.0))
//!     .machine(Machine::new("M2").with_daily_seconds(28_800.0))
//!     .stage("Bonding", ["M1", "M2"])
//!     .stage_time("Bonding", "M1", 30.0)
//!     .stage_time("Bonding", "M2", 36.0)
//!     .build()?;
//!
//! let outcome = NsgaEngine::new(&instance, NsgaConfig::default()).run();
//! if let Some(best) = outcome.front.balanced() {
//!     println!("balanced pick: {:?}", best.objectives);
//! }
//! # Ok::<(), ffs_optim::error::SchedulingError>(())
//! ```
//!
//! # Reference
//! Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//! Algorithm: NSGA-II"

mod config;
mod engine;
mod front;
mod sorting;

pub use config::NsgaConfig;
pub use engine::{NsgaEngine, NsgaOutcome};
pub use front::{FrontMember, ParetoFront};
pub use sorting::{crowding_distance, dominates, fast_non_dominated_sort};
