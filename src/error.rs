//! Error taxonomy for the scheduling core.
//!
//! Construction-time problems (`InvalidInstance`) are fatal and propagate
//! to the caller. Errors hit during candidate evaluation
//! (`IneligibleAssignment`, `EvaluationFailure`) are recovered inside the
//! search loops: the affected individual receives sentinel fitness and
//! the generation continues.

use thiserror::Error;

/// Sentinel fitness assigned to individuals whose evaluation failed.
pub const SENTINEL_FITNESS: f64 = 1e10;

/// Sentinel objective triple for failed multi-objective evaluations.
pub const SENTINEL_OBJECTIVES: [f64; 3] = [1e10, 0.0, 1e10];

/// Errors produced by the scheduling core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulingError {
    /// A structural precondition was violated at instance construction.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// The decoder selected a machine with infinite processing time.
    #[error("operation (order {order}, stage {stage}) assigned ineligible machine {machine}")]
    IneligibleAssignment {
        /// Order index of the offending operation.
        order: usize,
        /// Stage index of the offending operation.
        stage: usize,
        /// Machine index the selector mapped to.
        machine: usize,
    },

    /// A transient evaluation failure, wrapping the underlying cause.
    #[error("evaluation failed: {0}")]
    EvaluationFailure(String),

    /// Cooperative cancellation was requested.
    ///
    /// The engines never return this as `Err`; run outcomes carry a
    /// `cancelled` flag together with the best-so-far state.
    #[error("search cancelled")]
    Cancelled,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchedulingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = SchedulingError::InvalidInstance("no machines".into());
        assert_eq!(e.to_string(), "invalid instance: no machines");

        let e = SchedulingError::IneligibleAssignment {
            order: 2,
            stage: 1,
            machine: 0,
        };
        assert!(e.to_string().contains("order 2"));
        assert!(e.to_string().contains("machine 0"));
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(SENTINEL_FITNESS, 1e10);
        assert_eq!(SENTINEL_OBJECTIVES, [1e10, 0.0, 1e10]);
    }
}
