//! Schedule quality metrics (KPIs).
//!
//! Computes the reporting indicators from a simulated schedule and its
//! instance. Utilization is measured against raw horizon capacity;
//! overtime slack only enters the search-side penalty terms, never the
//! reported numbers.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total weighted tardiness | Σ w · max(0, completion_days − due) |
//! | On-time delivery rate | Percent of orders with zero tardiness |
//! | Avg tardiness | Unweighted mean tardiness (days) |
//! | Makespan | Latest completion (days) |
//! | Utilization | Machine workload / capacity, percent |
//! | Bottleneck load | Highest machine utilization |
//! | Load balance std | Std deviation of machine utilizations |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Instance, Schedule};

/// Schedule performance indicators.
///
/// Tardiness values are in days, utilizations in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Σ over orders of weight × tardiness (days).
    pub total_weighted_tardiness: f64,
    /// Percent of orders completing on or before their due date.
    pub on_time_delivery_rate: f64,
    /// Unweighted mean tardiness across orders (days).
    pub avg_tardiness: f64,
    /// Latest order completion (days).
    pub makespan_days: f64,
    /// Per-machine utilization in percent of raw capacity.
    pub utilization_by_machine: HashMap<String, f64>,
    /// Mean utilization over machines with positive capacity (percent).
    pub avg_utilization: f64,
    /// Highest machine utilization (percent).
    pub bottleneck_load: f64,
    /// Population standard deviation of machine utilizations (percent).
    pub load_balance_std: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a simulated schedule.
    pub fn calculate(schedule: &Schedule, instance: &Instance) -> Self {
        let num_orders = instance.num_orders();

        let mut total_weighted_tardiness = 0.0;
        let mut tardiness_sum = 0.0;
        let mut on_time = 0usize;

        for order in 0..num_orders {
            let o = instance.order(order);
            let tardiness = (schedule.completion_days(order) - o.due_date_days).max(0.0);
            total_weighted_tardiness += o.weight * tardiness;
            tardiness_sum += tardiness;
            if tardiness == 0.0 {
                on_time += 1;
            }
        }

        let on_time_delivery_rate = if num_orders == 0 {
            100.0
        } else {
            on_time as f64 / num_orders as f64 * 100.0
        };
        let avg_tardiness = if num_orders == 0 {
            0.0
        } else {
            tardiness_sum / num_orders as f64
        };

        let mut utilization_by_machine = HashMap::new();
        let mut utilizations = Vec::new();
        for machine in 0..instance.num_machines() {
            let capacity = instance.capacity(machine);
            if capacity > 0.0 {
                let util = schedule.machine_workload(machine) / capacity * 100.0;
                utilization_by_machine.insert(instance.machine(machine).id.clone(), util);
                utilizations.push(util);
            } else {
                utilization_by_machine.insert(instance.machine(machine).id.clone(), 0.0);
            }
        }

        let avg_utilization = mean(&utilizations);
        let bottleneck_load = utilizations.iter().copied().fold(0.0, f64::max);
        let load_balance_std = std_dev(&utilizations);

        Self {
            total_weighted_tardiness,
            on_time_delivery_rate,
            avg_tardiness,
            makespan_days: schedule.makespan_days(),
            utilization_by_machine,
            avg_utilization,
            bottleneck_load,
            load_balance_std,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}
