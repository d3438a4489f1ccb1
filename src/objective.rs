//! Objective evaluation: scalar fitness and objective triples.
//!
//! Maps a candidate through decode → sequence → simulate and scores the
//! resulting schedule. The scalar fitness is weighted tardiness plus
//! penalty terms; the multi-objective triple is
//! `(tardiness + penalty, −mean utilization, makespan days)`, all three
//! minimized.
//!
//! Evaluation is pure: the search engines call it concurrently across a
//! population and map any error to sentinel fitness.

use serde::{Deserialize, Serialize};

use crate::encoding::{sequence, Chromosome};
use crate::error::Result;
use crate::models::{Instance, Schedule, SECONDS_PER_DAY};
use crate::sim::{simulate, std_dev, ScheduleKpi};

/// Penalty coefficients and thresholds for the fitness function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyConfig {
    /// Coefficient on capacity-overrun seconds.
    pub lambda_cap: f64,
    /// Coefficient on per-stage utilization imbalance.
    pub lambda_bal: f64,
    /// Coefficient on tardiness of high-priority orders.
    pub lambda_urg: f64,
    /// Overtime slack added to capacity before overruns count (seconds).
    pub overtime_slack_seconds: f64,
    /// Weight at or above which an order counts as high-priority.
    pub urgent_weight_threshold: f64,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            lambda_cap: 1e6,
            lambda_bal: 15.0,
            lambda_urg: 4.0,
            overtime_slack_seconds: 7_200.0,
            urgent_weight_threshold: 1.2,
        }
    }
}

/// Full evaluation of one candidate, for final reporting.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Scalar fitness: tardiness + penalty.
    pub fitness: f64,
    /// Weighted tardiness component (days).
    pub weighted_tardiness: f64,
    /// Total penalty component.
    pub penalty: f64,
    /// The multi-objective triple.
    pub objectives: [f64; 3],
    /// The materialized schedule.
    pub schedule: Schedule,
    /// Reporting KPIs.
    pub kpis: ScheduleKpi,
}

/// Decodes, sequences and simulates one candidate.
pub fn decode_and_simulate(instance: &Instance, chromosome: &Chromosome) -> Result<Schedule> {
    let ops = chromosome.decode(instance)?;
    let sequenced = sequence(ops, instance.num_orders());
    Ok(simulate(instance, &sequenced))
}

/// Scalar fitness: weighted tardiness plus penalties. Lower is better.
pub fn evaluate_scalar(
    instance: &Instance,
    chromosome: &Chromosome,
    penalty: &PenaltyConfig,
) -> Result<f64> {
    let schedule = decode_and_simulate(instance, chromosome)?;
    let tardiness = weighted_tardiness(instance, &schedule);
    Ok(tardiness + total_penalty(instance, &schedule, penalty))
}

/// Objective triple `(tardiness + penalty, −mean utilization, makespan
/// days)`; every coordinate is minimized.
pub fn evaluate_multi(
    instance: &Instance,
    chromosome: &Chromosome,
    penalty: &PenaltyConfig,
) -> Result<[f64; 3]> {
    let schedule = decode_and_simulate(instance, chromosome)?;
    Ok(objectives(instance, &schedule, penalty))
}

/// Full evaluation with schedule and KPIs, for final result reporting.
pub fn evaluate_detailed(
    instance: &Instance,
    chromosome: &Chromosome,
    penalty: &PenaltyConfig,
) -> Result<Evaluation> {
    let schedule = decode_and_simulate(instance, chromosome)?;
    let weighted_tardiness = weighted_tardiness(instance, &schedule);
    let total = total_penalty(instance, &schedule, penalty);
    let kpis = ScheduleKpi::calculate(&schedule, instance);
    let objectives = objectives(instance, &schedule, penalty);

    Ok(Evaluation {
        fitness: weighted_tardiness + total,
        weighted_tardiness,
        penalty: total,
        objectives,
        schedule,
        kpis,
    })
}

/// Σ over orders of weight × max(0, completion_days − due_days).
pub fn weighted_tardiness(instance: &Instance, schedule: &Schedule) -> f64 {
    (0..instance.num_orders())
        .map(|order| {
            let o = instance.order(order);
            o.weight * (schedule.completion_days(order) - o.due_date_days).max(0.0)
        })
        .sum()
}

fn objectives(instance: &Instance, schedule: &Schedule, penalty: &PenaltyConfig) -> [f64; 3] {
    let tardiness = weighted_tardiness(instance, schedule);
    let total = total_penalty(instance, schedule, penalty);
    [
        tardiness + total,
        -mean_utilization(instance, schedule),
        schedule.makespan_seconds() / SECONDS_PER_DAY,
    ]
}

/// Mean workload / raw-capacity fraction over machines with capacity.
fn mean_utilization(instance: &Instance, schedule: &Schedule) -> f64 {
    let utils: Vec<f64> = (0..instance.num_machines())
        .filter(|&m| instance.capacity(m) > 0.0)
        .map(|m| schedule.machine_workload(m) / instance.capacity(m))
        .collect();
    if utils.is_empty() {
        0.0
    } else {
        utils.iter().sum::<f64>() / utils.len() as f64
    }
}

fn total_penalty(instance: &Instance, schedule: &Schedule, cfg: &PenaltyConfig) -> f64 {
    capacity_penalty(instance, schedule, cfg)
        + balance_penalty(instance, schedule, cfg)
        + urgency_penalty(instance, schedule, cfg)
}

/// Capacity overrun beyond horizon capacity plus overtime slack.
fn capacity_penalty(instance: &Instance, schedule: &Schedule, cfg: &PenaltyConfig) -> f64 {
    let mut penalty = 0.0;
    for machine in 0..instance.num_machines() {
        let capacity = instance.capacity(machine) + cfg.overtime_slack_seconds;
        let overrun = schedule.machine_workload(machine) - capacity;
        if overrun > 0.0 {
            penalty += cfg.lambda_cap * overrun;
        }
    }
    penalty
}

/// Per-stage utilization spread across the stage's eligible machines.
///
/// Stages with a single eligible machine contribute nothing: there is
/// no balancing decision to make there.
fn balance_penalty(instance: &Instance, schedule: &Schedule, cfg: &PenaltyConfig) -> f64 {
    let mut penalty = 0.0;
    for stage in 0..instance.num_stages() {
        let eligible = instance.eligible_machines(stage);
        if eligible.len() < 2 {
            continue;
        }
        let utils: Vec<f64> = eligible
            .iter()
            .map(|&m| {
                schedule.machine_stage_workload(m, stage)
                    / (instance.capacity(m) + cfg.overtime_slack_seconds)
            })
            .collect();
        penalty += cfg.lambda_bal * std_dev(&utils);
    }
    penalty
}

/// Extra pressure on tardy high-priority orders.
fn urgency_penalty(instance: &Instance, schedule: &Schedule, cfg: &PenaltyConfig) -> f64 {
    let mut penalty = 0.0;
    for order in 0..instance.num_orders() {
        let o = instance.order(order);
        if o.weight < cfg.urgent_weight_threshold {
            continue;
        }
        let tardiness = (schedule.completion_days(order) - o.due_date_days).max(0.0);
        if tardiness > 0.0 {
            penalty += cfg.lambda_urg * o.weight * tardiness;
        }
    }
    penalty
}
