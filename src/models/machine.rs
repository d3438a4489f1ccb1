//! Machine model.
//!
//! Machines are the processing resources of the flow shop. Each machine
//! advertises a daily available time; the instance builder scales it by
//! the planning horizon into a total capacity.

use serde::{Deserialize, Serialize};

/// A machine that can process operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    /// Unique machine identifier.
    pub id: String,
    /// Available processing time per day (seconds).
    pub daily_seconds: f64,
}

impl Machine {
    /// Creates a machine with 24h daily availability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            daily_seconds: 86_400.0,
        }
    }

    /// Sets the daily available time in seconds.
    pub fn with_daily_seconds(mut self, seconds: f64) -> Self {
        self.daily_seconds = seconds;
        self
    }

    /// Sets the daily available time in minutes.
    pub fn with_daily_minutes(mut self, minutes: f64) -> Self {
        self.daily_seconds = minutes * 60.0;
        self
    }
}
