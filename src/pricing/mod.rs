//! Delivery pricing engine
//!
//! Pure and synchronous: turns a [`ShipmentRequest`] into a [`CostBreakdown`]
//! without touching storage or configuration.

pub mod calculator;
pub mod models;

pub use calculator::compute_cost;
pub use models::{parse_amount, CostBreakdown, ShipmentRequest, Urgency};

/// Errors raised by the pricing engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// A numeric field is non-numeric, not strictly positive or so large that
    /// the cost overflows, or the urgency is unknown
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl PricingError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidInput { field, .. } => field,
        }
    }
}
