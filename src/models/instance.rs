//! Problem instance model.
//!
//! An [`Instance`] is the immutable description of a flexible flow shop
//! problem: orders, the fixed stage sequence, machines, per-stage machine
//! eligibility, and the per-(order, stage, machine) processing-time
//! tensor. Instances are validated once at construction and never change
//! afterwards, so they can be shared by reference across evaluations and
//! threads.
//!
//! # Capacity
//! Machine capacity is horizon-scaled: daily available time multiplied by
//! the planning horizon in days (latest due date plus a buffer, floored
//! at one day).
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 6
//! (Flexible Flow Shops)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Result, SchedulingError};

use super::{Machine, Order};

/// Immutable flexible-flow-shop problem data.
///
/// Built through [`InstanceBuilder`]; all structural invariants (every
/// stage has eligible machines, every operation has at least one finite
/// processing time, ids are unique) are checked at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    orders: Vec<Order>,
    stage_names: Vec<String>,
    machines: Vec<Machine>,
    /// Eligible machine indices per stage. List order is significant:
    /// it defines the decoder's selector-interval → machine mapping.
    eligible: Vec<Vec<usize>>,
    /// Per-unit processing times, row-major `[order][stage][machine]`.
    /// Ineligible entries hold `f64::INFINITY`.
    proc_times: Vec<f64>,
    /// Horizon-scaled capacity per machine (seconds).
    capacities: Vec<f64>,
    horizon_days: f64,
}

impl Instance {
    /// Starts building an instance.
    pub fn builder() -> InstanceBuilder {
        InstanceBuilder::new()
    }

    /// Number of orders.
    pub fn num_orders(&self) -> usize {
        self.orders.len()
    }

    /// Number of stages.
    pub fn num_stages(&self) -> usize {
        self.stage_names.len()
    }

    /// Number of machines.
    pub fn num_machines(&self) -> usize {
        self.machines.len()
    }

    /// Total operation count `orders × stages`.
    pub fn total_ops(&self) -> usize {
        self.orders.len() * self.stage_names.len()
    }

    /// Global operation index of `(order, stage)`.
    #[inline]
    pub fn op_index(&self, order: usize, stage: usize) -> usize {
        order * self.stage_names.len() + stage
    }

    /// All orders, in input order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Order at the given index.
    pub fn order(&self, order: usize) -> &Order {
        &self.orders[order]
    }

    /// Stage names, in processing order.
    pub fn stage_names(&self) -> &[String] {
        &self.stage_names
    }

    /// All machines, in input order.
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// Machine at the given index.
    pub fn machine(&self, machine: usize) -> &Machine {
        &self.machines[machine]
    }

    /// Resolves a machine id to its index.
    pub fn machine_index(&self, id: &str) -> Option<usize> {
        self.machines.iter().position(|m| m.id == id)
    }

    /// Eligible machine indices for a stage, in mapping order.
    pub fn eligible_machines(&self, stage: usize) -> &[usize] {
        &self.eligible[stage]
    }

    /// Per-unit processing time of `(order, stage)` on `machine`.
    ///
    /// `f64::INFINITY` marks an ineligible combination.
    #[inline]
    pub fn proc_time(&self, order: usize, stage: usize, machine: usize) -> f64 {
        let s = self.stage_names.len();
        let m = self.machines.len();
        self.proc_times[order * s * m + stage * m + machine]
    }

    /// Horizon-scaled capacity of a machine (seconds).
    pub fn capacity(&self, machine: usize) -> f64 {
        self.capacities[machine]
    }

    /// Planning horizon in days.
    pub fn horizon_days(&self) -> f64 {
        self.horizon_days
    }

    /// Cheapest-possible total processing time of an order (seconds):
    /// the sum over stages of the fastest eligible machine, scaled by
    /// quantity. Used as the SPT key by the heuristic seeder.
    pub fn min_total_time(&self, order: usize) -> f64 {
        let qty = self.orders[order].quantity as f64;
        (0..self.num_stages())
            .map(|stage| {
                self.eligible[stage]
                    .iter()
                    .map(|&m| self.proc_time(order, stage, m))
                    .filter(|t| t.is_finite())
                    .fold(f64::INFINITY, f64::min)
            })
            .filter(|t| t.is_finite())
            .sum::<f64>()
            * qty
    }
}

/// Builder for [`Instance`].
///
/// Collects the problem description, then validates everything at once in
/// [`build`](InstanceBuilder::build), reporting all violations together.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    orders: Vec<Order>,
    machines: Vec<Machine>,
    stages: Vec<(String, Vec<String>)>,
    stage_times: Vec<(String, String, f64)>,
    order_times: Vec<(String, String, String, f64)>,
    horizon_buffer_days: f64,
}

impl InstanceBuilder {
    /// Creates an empty builder with a 3-day horizon buffer.
    pub fn new() -> Self {
        Self {
            horizon_buffer_days: 3.0,
            ..Default::default()
        }
    }

    /// Adds an order.
    pub fn order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Adds a machine.
    pub fn machine(mut self, machine: Machine) -> Self {
        self.machines.push(machine);
        self
    }

    /// Appends a stage with its eligible machines.
    ///
    /// The eligibility list order defines how the decoder maps selector
    /// values onto machines, so it is part of the problem definition.
    pub fn stage<I, S>(mut self, name: impl Into<String>, eligible: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stages.push((
            name.into(),
            eligible.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Sets the per-unit processing time of a stage on a machine, applied
    /// to every order.
    pub fn stage_time(
        mut self,
        stage: impl Into<String>,
        machine: impl Into<String>,
        seconds_per_unit: f64,
    ) -> Self {
        self.stage_times
            .push((stage.into(), machine.into(), seconds_per_unit));
        self
    }

    /// Overrides the per-unit processing time for a single order.
    pub fn order_stage_time(
        mut self,
        order: impl Into<String>,
        stage: impl Into<String>,
        machine: impl Into<String>,
        seconds_per_unit: f64,
    ) -> Self {
        self.order_times
            .push((order.into(), stage.into(), machine.into(), seconds_per_unit));
        self
    }

    /// Sets the horizon buffer added to the latest due date.
    pub fn horizon_buffer_days(mut self, days: f64) -> Self {
        self.horizon_buffer_days = days;
        self
    }

    /// Validates the collected data and builds the instance.
    ///
    /// Returns [`SchedulingError::InvalidInstance`] listing every
    /// detected problem.
    pub fn build(self) -> Result<Instance> {
        let mut problems: Vec<String> = Vec::new();

        if self.orders.is_empty() {
            problems.push("no orders".into());
        }
        if self.stages.is_empty() {
            problems.push("no stages".into());
        }
        if self.machines.is_empty() {
            problems.push("no machines".into());
        }

        let mut seen = HashSet::new();
        for o in &self.orders {
            if !seen.insert(o.id.as_str()) {
                problems.push(format!("duplicate order id '{}'", o.id));
            }
            if o.weight <= 0.0 || !o.weight.is_finite() {
                problems.push(format!("order '{}' has non-positive weight", o.id));
            }
        }
        let mut seen = HashSet::new();
        for m in &self.machines {
            if !seen.insert(m.id.as_str()) {
                problems.push(format!("duplicate machine id '{}'", m.id));
            }
            if m.daily_seconds < 0.0 || !m.daily_seconds.is_finite() {
                problems.push(format!("machine '{}' has negative availability", m.id));
            }
        }
        let mut seen = HashSet::new();
        for (name, _) in &self.stages {
            if !seen.insert(name.as_str()) {
                problems.push(format!("duplicate stage name '{}'", name));
            }
        }

        let machine_idx = |id: &str| self.machines.iter().position(|m| m.id == id);
        let stage_idx = |name: &str| self.stages.iter().position(|(n, _)| n == name);
        let order_idx = |id: &str| self.orders.iter().position(|o| o.id == id);

        // Resolve eligibility lists to machine indices.
        let mut eligible: Vec<Vec<usize>> = Vec::with_capacity(self.stages.len());
        for (name, ids) in &self.stages {
            if ids.is_empty() {
                problems.push(format!("stage '{}' has no eligible machines", name));
            }
            let mut resolved = Vec::with_capacity(ids.len());
            for id in ids {
                match machine_idx(id) {
                    Some(idx) => resolved.push(idx),
                    None => problems.push(format!(
                        "stage '{}' references unknown machine '{}'",
                        name, id
                    )),
                }
            }
            eligible.push(resolved);
        }

        let num_orders = self.orders.len();
        let num_stages = self.stages.len();
        let num_machines = self.machines.len();
        let mut proc_times = vec![f64::INFINITY; num_orders * num_stages * num_machines];
        let at = |o: usize, s: usize, m: usize| o * num_stages * num_machines + s * num_machines + m;

        for (stage, machine, secs) in &self.stage_times {
            let (s, m) = match (stage_idx(stage), machine_idx(machine)) {
                (Some(s), Some(m)) => (s, m),
                _ => {
                    problems.push(format!(
                        "processing time references unknown stage '{}' or machine '{}'",
                        stage, machine
                    ));
                    continue;
                }
            };
            if *secs < 0.0 || !secs.is_finite() {
                problems.push(format!(
                    "negative or non-finite time for stage '{}' on '{}'",
                    stage, machine
                ));
                continue;
            }
            if !eligible[s].contains(&m) {
                problems.push(format!(
                    "time given for machine '{}' not eligible at stage '{}'",
                    machine, stage
                ));
                continue;
            }
            for o in 0..num_orders {
                proc_times[at(o, s, m)] = *secs;
            }
        }

        for (order, stage, machine, secs) in &self.order_times {
            let (o, s, m) = match (order_idx(order), stage_idx(stage), machine_idx(machine)) {
                (Some(o), Some(s), Some(m)) => (o, s, m),
                _ => {
                    problems.push(format!(
                        "per-order time references unknown order '{}', stage '{}' or machine '{}'",
                        order, stage, machine
                    ));
                    continue;
                }
            };
            if *secs < 0.0 || !secs.is_finite() {
                problems.push(format!(
                    "negative or non-finite time for order '{}' at stage '{}'",
                    order, stage
                ));
                continue;
            }
            if !eligible[s].contains(&m) {
                problems.push(format!(
                    "time given for machine '{}' not eligible at stage '{}'",
                    machine, stage
                ));
                continue;
            }
            proc_times[at(o, s, m)] = *secs;
        }

        // Every operation needs at least one eligible machine with a
        // finite processing time, otherwise no candidate can decode.
        for o in 0..num_orders {
            for s in 0..num_stages {
                let any_finite = eligible[s]
                    .iter()
                    .any(|&m| proc_times[at(o, s, m)].is_finite());
                if !eligible[s].is_empty() && !any_finite {
                    problems.push(format!(
                        "order '{}' has no finite processing time at stage '{}'",
                        self.orders[o].id, self.stages[s].0
                    ));
                }
            }
        }

        if !problems.is_empty() {
            return Err(SchedulingError::InvalidInstance(problems.join("; ")));
        }

        let max_due = self
            .orders
            .iter()
            .map(|o| o.due_date_days)
            .fold(f64::NEG_INFINITY, f64::max);
        let horizon_days = (max_due.ceil() + self.horizon_buffer_days).max(1.0);
        let capacities = self
            .machines
            .iter()
            .map(|m| m.daily_seconds * horizon_days)
            .collect();

        Ok(Instance {
            orders: self.orders,
            stage_names: self.stages.into_iter().map(|(n, _)| n).collect(),
            machines: self.machines,
            eligible,
            proc_times,
            capacities,
            horizon_days,
        })
    }
}
