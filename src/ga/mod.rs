//! Single-objective evolutionary search.
//!
//! An adaptive GA over the real-vector encoding: tournament selection,
//! uniform crossover, random-reset mutation, greedy local search on the
//! incumbent, strict elitism, and stagnation-triggered adaptation of
//! the crossover/mutation rates.
//!
//! # Quick Start
//!
//! ```no_run
//! use ffs_optim::ga::{GaConfig, GaEngine};
//! use ffs_optim::models::{Instance, Machine, Order};
//! use ffs_optim::objective::evaluate_detailed;
//!
//! let instance = Instance::builder()
//!     .order(Order::new("A").with_quantity(10).with_due_date_days(2.0))
//!     .machine(Machine::new("M1").with_daily_seconds(28_800.0))
//!     .stage("Bonding", ["M1"])
//!     .stage_time("Bonding", "M1", 30.0)
//!     .build()?;
//!
//! let config = GaConfig::default().with_seed(42);
//! let outcome = GaEngine::new(&instance, config.clone()).run();
//! let result = evaluate_detailed(&instance, &outcome.best, &config.penalty)?;
//! println!("makespan: {:.2} days", result.kpis.makespan_days);
//! # Ok::<(), ffs_optim::error::SchedulingError>(())
//! ```
//!
//! # Submodules
//!
//! - [`operators`]: selection and runtime-selectable variation operators
//! - [`seeder`]: EDD+SPT warm start for the initial population
//!
//! # References
//!
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"
//! - Eiben et al. (1999), "Parameter Control in Evolutionary Algorithms"

mod config;
mod engine;
pub mod operators;
pub mod seeder;

pub use config::GaConfig;
pub use engine::{GaEngine, GaOutcome};

/// Structured per-generation event emitted to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationEvent {
    /// Zero-based generation index.
    pub generation: usize,
    /// Best-of-run fitness after this generation.
    pub best_fitness: f64,
    /// Crossover probability after adaptation.
    pub crossover_rate: f64,
    /// Mutation probability after adaptation.
    pub mutation_rate: f64,
}

/// Receives structured progress events from a running search.
///
/// The core never writes to any stream; diagnostic emission is the
/// caller's job, and this trait is the hook for it.
pub trait SearchObserver {
    /// Called after every completed generation.
    fn on_generation(&mut self, event: &GenerationEvent);
}
