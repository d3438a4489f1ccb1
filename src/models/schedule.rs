//! Schedule (solution) model.
//!
//! A schedule is the fully materialized result of simulating one
//! candidate: an ordered list of operation placements plus per-order
//! completion times. All times are seconds from the epoch (t=0).
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

/// Seconds per day, fixed for the days ↔ seconds conversion.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// One scheduled operation: `(order, stage)` placed on a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledOp {
    /// Order index.
    pub order: usize,
    /// Stage index.
    pub stage: usize,
    /// Machine index.
    pub machine: usize,
    /// Start time (seconds).
    pub start: f64,
    /// Finish time (seconds). Always `start + duration`.
    pub finish: f64,
    /// Processing duration (seconds).
    pub duration: f64,
}

/// A complete schedule with per-order completion times.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Scheduled operations, in simulation order.
    pub entries: Vec<ScheduledOp>,
    /// Completion time per order (seconds): finish of the last stage,
    /// 0.0 for orders with no last-stage entry.
    completion: Vec<f64>,
}

impl Schedule {
    /// Creates a schedule from simulated entries and completion times.
    pub fn new(entries: Vec<ScheduledOp>, completion: Vec<f64>) -> Self {
        Self { entries, completion }
    }

    /// Number of scheduled operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Completion time of an order (seconds). 0.0 for orders without a
    /// recorded completion.
    pub fn completion_seconds(&self, order: usize) -> f64 {
        self.completion.get(order).copied().unwrap_or(0.0)
    }

    /// Completion time of an order (days).
    pub fn completion_days(&self, order: usize) -> f64 {
        self.completion_seconds(order) / SECONDS_PER_DAY
    }

    /// Completion times of all orders (seconds).
    pub fn completions(&self) -> &[f64] {
        &self.completion
    }

    /// Makespan: latest completion across orders (seconds).
    pub fn makespan_seconds(&self) -> f64 {
        self.completion.iter().copied().fold(0.0, f64::max)
    }

    /// Makespan in days.
    pub fn makespan_days(&self) -> f64 {
        self.makespan_seconds() / SECONDS_PER_DAY
    }

    /// Entries placed on a machine.
    pub fn entries_for_machine(&self, machine: usize) -> impl Iterator<Item = &ScheduledOp> {
        self.entries.iter().filter(move |e| e.machine == machine)
    }

    /// Entries belonging to an order.
    pub fn entries_for_order(&self, order: usize) -> impl Iterator<Item = &ScheduledOp> {
        self.entries.iter().filter(move |e| e.order == order)
    }

    /// Total processing workload assigned to a machine (seconds).
    pub fn machine_workload(&self, machine: usize) -> f64 {
        self.entries_for_machine(machine).map(|e| e.duration).sum()
    }

    /// Workload of a machine restricted to one stage (seconds).
    pub fn machine_stage_workload(&self, machine: usize, stage: usize) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.machine == machine && e.stage == stage)
            .map(|e| e.duration)
            .sum()
    }
}
