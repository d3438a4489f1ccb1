//! Precedence-respecting operation sequencing.
//!
//! Turns decoded operations into a linear order that follows the
//! priority keys as tightly as possible while never placing a stage
//! before its predecessor within the same order.
//!
//! # Algorithm
//!
//! Operations are sorted by ascending priority (ties broken by
//! lexicographic `(order, stage)`), then consumed by repeated scans: the
//! first pending operation whose stage equals its order's stage counter
//! is emitted, the counter advances, and the scan restarts. O((O·S)²),
//! which is fine at the problem sizes this crate targets.

use tracing::warn;

use super::DecodedOp;

/// Result of sequencing: the linear order plus a fallback marker.
#[derive(Debug, Clone)]
pub struct SequencedOps {
    /// Operations in execution order.
    pub ops: Vec<DecodedOp>,
    /// Set when the scan stalled and the remainder was appended in
    /// priority order. Cannot happen for correctly decoded inputs.
    pub precedence_fallback: bool,
}

/// Sequences decoded operations under intra-order stage precedence.
pub fn sequence(ops: Vec<DecodedOp>, num_orders: usize) -> SequencedOps {
    let mut pending = ops;
    pending.sort_by(|a, b| {
        a.priority
            .total_cmp(&b.priority)
            .then(a.order.cmp(&b.order))
            .then(a.stage.cmp(&b.stage))
    });

    let mut emitted = Vec::with_capacity(pending.len());
    let mut stage_counter = vec![0usize; num_orders];

    while !pending.is_empty() {
        match pending
            .iter()
            .position(|op| op.stage == stage_counter[op.order])
        {
            Some(pos) => {
                let op = pending.remove(pos);
                stage_counter[op.order] += 1;
                emitted.push(op);
            }
            None => {
                // Stalled scan: emit the rest as-is rather than failing.
                warn!(
                    remaining = pending.len(),
                    "precedence scan stalled, appending remainder in priority order"
                );
                emitted.append(&mut pending);
                return SequencedOps {
                    ops: emitted,
                    precedence_fallback: true,
                };
            }
        }
    }

    SequencedOps {
        ops: emitted,
        precedence_fallback: false,
    }
}
