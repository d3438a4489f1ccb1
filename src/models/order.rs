//! Order (production job) model.
//!
//! An order is a unit of demand: a product quantity with a due date and
//! a priority weight. Every order traverses the same stage sequence of
//! the flow shop.
//!
//! # Time Representation
//! Due dates are fractional days relative to the scheduling epoch (t=0).
//! Negative values mean the order was already due when planning started.
//! The consumer defines what t=0 means (e.g., the planning anchor date).

use serde::{Deserialize, Serialize};

/// An order (production job) to be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: String,
    /// Product quantity. Zero is allowed and yields zero-duration
    /// operations that still occupy sequence positions.
    pub quantity: u32,
    /// Due date in fractional days from the epoch. May be negative.
    pub due_date_days: f64,
    /// Priority weight (> 0). Scales tardiness in the objective.
    pub weight: f64,
}

impl Order {
    /// Creates a new order with quantity 1, due date 0 and weight 1.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            quantity: 1,
            due_date_days: 0.0,
            weight: 1.0,
        }
    }

    /// Sets the product quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the due date (fractional days from the epoch).
    pub fn with_due_date_days(mut self, days: f64) -> Self {
        self.due_date_days = days;
        self
    }

    /// Sets the priority weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the weight from a priority class under the given profile.
    pub fn with_priority_class(mut self, class: PriorityClass, profile: WeightProfile) -> Self {
        self.weight = profile.weight_for(class);
        self
    }
}

/// Coarse priority classification of an order.
///
/// Parsing vendor-specific priority strings into classes happens outside
/// the core; only the class → weight mapping is defined here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityClass {
    /// Rush order (e.g., "P1").
    Urgent,
    /// Default priority.
    Normal,
    /// Deprioritized order (e.g., "P4").
    Low,
}

/// Priority-class → weight profile.
///
/// Two profiles exist in practice, differing only in how hard urgent
/// orders are pushed. The choice is a configuration decision; the core
/// never assumes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightProfile {
    /// Urgent 1.2, normal 1.0, low 0.8.
    #[default]
    Standard,
    /// Urgent 1.4, normal 1.0, low 0.8.
    Elevated,
}

impl WeightProfile {
    /// Returns the tardiness weight for a priority class.
    pub fn weight_for(&self, class: PriorityClass) -> f64 {
        match (self, class) {
            (WeightProfile::Standard, PriorityClass::Urgent) => 1.2,
            (WeightProfile::Elevated, PriorityClass::Urgent) => 1.4,
            (_, PriorityClass::Normal) => 1.0,
            (_, PriorityClass::Low) => 0.8,
        }
    }
}
