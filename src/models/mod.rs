//! Records owned by the store and the request bodies that create or patch them

pub mod client;
pub mod delivery;
pub mod order;

pub use client::{Client, ClientPatch, NewClient};
pub use delivery::{Delivery, DeliveryStatus};
pub use order::{Order, OrderSummary};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    error::AppError,
    pricing::{ShipmentRequest, Urgency},
};

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Pricing-relevant fields of a create or update body; any may be omitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ShipmentPatch {
    pub urgency: Option<Urgency>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub distance_km: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub weight_kg: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub rate_per_km: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub rate_per_kg: Option<Decimal>,
}

impl ShipmentPatch {
    /// True if no pricing field was supplied
    pub fn is_empty(&self) -> bool {
        self.urgency.is_none()
            && self.distance_km.is_none()
            && self.weight_kg.is_none()
            && self.rate_per_km.is_none()
            && self.rate_per_kg.is_none()
    }

    /// Merge by field: supplied values win, the rest come from `current`
    pub fn merge_onto(&self, current: &ShipmentRequest) -> ShipmentRequest {
        ShipmentRequest {
            distance_km: self.distance_km.unwrap_or(current.distance_km),
            rate_per_km: self.rate_per_km.unwrap_or(current.rate_per_km),
            weight_kg: self.weight_kg.unwrap_or(current.weight_kg),
            rate_per_kg: self.rate_per_kg.unwrap_or(current.rate_per_kg),
            urgency: self.urgency.unwrap_or(current.urgency),
        }
    }

    /// Every field is mandatory when creating a record from scratch
    pub fn require_all(&self) -> Result<ShipmentRequest, AppError> {
        let mut missing = Vec::new();
        if self.urgency.is_none() {
            missing.push("urgency");
        }
        if self.distance_km.is_none() {
            missing.push("distance_km");
        }
        if self.weight_kg.is_none() {
            missing.push("weight_kg");
        }
        if self.rate_per_km.is_none() {
            missing.push("rate_per_km");
        }
        if self.rate_per_kg.is_none() {
            missing.push("rate_per_kg");
        }

        match (
            self.urgency,
            self.distance_km,
            self.weight_kg,
            self.rate_per_km,
            self.rate_per_kg,
        ) {
            (
                Some(urgency),
                Some(distance_km),
                Some(weight_kg),
                Some(rate_per_km),
                Some(rate_per_kg),
            ) => Ok(ShipmentRequest {
                distance_km,
                rate_per_km,
                weight_kg,
                rate_per_kg,
                urgency,
            }),
            _ => Err(missing_fields(&missing)),
        }
    }
}

pub(crate) fn missing_fields(fields: &[&str]) -> AppError {
    AppError::Validation(format!("Missing required fields: {}", fields.join(", ")))
}

/// Trim and bound a free-text field
pub(crate) fn check_text(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}
