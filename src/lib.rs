//! Flexible flow shop scheduling optimizer.
//!
//! A deterministic discrete-event schedule simulator driven by
//! population-based metaheuristic search: given orders with due dates
//! and priorities, a fixed stage sequence, and a pool of eligible
//! machines per stage, find (order, stage) → (machine, start time)
//! assignments that minimize weighted tardiness, with secondary
//! objectives on makespan, utilization, and load balance.
//!
//! # Modules
//!
//! - **`models`**: Problem data types: `Order`, `Machine`, `Instance`,
//!   `Schedule`
//! - **`encoding`**: Real-vector chromosome codec and the
//!   precedence-respecting sequencer
//! - **`sim`**: Pure discrete-event simulation and KPI reporting
//! - **`objective`**: Scalar fitness and multi-objective evaluation
//! - **`ga`**: Adaptive single-objective evolutionary search with
//!   EDD+SPT seeding and incumbent local search
//! - **`nsga`**: NSGA-II multi-objective search with Pareto-front
//!   extraction and representative picks
//! - **`error`**: Failure taxonomy shared by all components
//!
//! # Architecture
//!
//! Instance → codec → sequencer → simulator → evaluator form a pure
//! pipeline; the search engines treat it as an oracle and only they
//! hold randomness. The instance is immutable after construction and
//! can be shared by reference across threads; population evaluation is
//! parallel while variation stays serialized on one seeded RNG, so a
//! fixed seed reproduces runs bit-for-bit.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//!   Algorithm: NSGA-II"
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"

pub mod encoding;
pub mod error;
pub mod ga;
pub mod models;
pub mod nsga;
pub mod objective;
pub mod sim;
