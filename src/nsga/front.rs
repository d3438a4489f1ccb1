//! Pareto front container and representative-solution selection.

use serde::{Deserialize, Serialize};

use crate::encoding::Chromosome;

/// One member of the Pareto front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMember {
    /// The candidate solution.
    pub chromosome: Chromosome,
    /// Its objective triple `(tardiness + penalty, −utilization,
    /// makespan days)`.
    pub objectives: [f64; 3],
    /// Crowding distance within the front.
    pub crowding: f64,
}

/// The non-dominated set returned by the multi-objective engine.
///
/// Members are mutually non-dominated. Representative picks cover the
/// usual planner questions: the most punctual plan, the busiest plant,
/// the shortest campaign, and a balanced compromise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParetoFront {
    /// Front members with their objectives and crowding distances.
    pub members: Vec<FrontMember>,
}

impl ParetoFront {
    /// Number of front members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the front is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member minimizing tardiness + penalty (objective 0).
    pub fn min_tardiness(&self) -> Option<&FrontMember> {
        self.argmin(0)
    }

    /// Member maximizing mean utilization (minimum of the negated
    /// objective 1).
    pub fn max_utilization(&self) -> Option<&FrontMember> {
        self.argmin(1)
    }

    /// Member minimizing makespan (objective 2).
    pub fn min_makespan(&self) -> Option<&FrontMember> {
        self.argmin(2)
    }

    /// Balanced compromise: minimizes the equally-weighted sum of
    /// min-max normalized objective coordinates.
    pub fn balanced(&self) -> Option<&FrontMember> {
        if self.members.is_empty() {
            return None;
        }

        let mut mins = [f64::INFINITY; 3];
        let mut maxs = [f64::NEG_INFINITY; 3];
        for member in &self.members {
            for i in 0..3 {
                mins[i] = mins[i].min(member.objectives[i]);
                maxs[i] = maxs[i].max(member.objectives[i]);
            }
        }

        self.members.iter().min_by(|a, b| {
            let score = |m: &FrontMember| -> f64 {
                (0..3)
                    .map(|i| {
                        if maxs[i] > mins[i] {
                            (m.objectives[i] - mins[i]) / (maxs[i] - mins[i])
                        } else {
                            0.0
                        }
                    })
                    .sum()
            };
            score(a).total_cmp(&score(b))
        })
    }

    fn argmin(&self, objective: usize) -> Option<&FrontMember> {
        self.members
            .iter()
            .min_by(|a, b| a.objectives[objective].total_cmp(&b.objectives[objective]))
    }
}
