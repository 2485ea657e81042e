//! Data access over SQLite
//!
//! Each store wraps the shared pool and issues parameterized statements.
//! Referential rules (client before order, order before delivery, no delete
//! while dependents exist) are checked by the handlers through the
//! `exists`/`count_*` queries exposed here.

pub mod clients;
pub mod deliveries;
pub mod orders;

pub use clients::ClientStore;
pub use deliveries::DeliveryStore;
pub use orders::OrderStore;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    error::AppError,
    pricing::{ShipmentRequest, Urgency},
};

pub(crate) fn parse_uuid(column: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|e| AppError::Internal(format!("Corrupt {} '{}': {}", column, raw, e)))
}

pub(crate) fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(raw)
        .map_err(|e| AppError::Internal(format!("Corrupt {} '{}': {}", column, raw, e)))
}

pub(crate) fn parse_urgency(raw: &str) -> Result<Urgency, AppError> {
    raw.parse()
        .map_err(|e| AppError::Internal(format!("Corrupt urgency '{}': {}", raw, e)))
}

pub(crate) fn datetime_from_millis(millis: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::Internal(format!("Timestamp out of range: {}", millis)))
}

/// Shipment columns shared by `orders` and `deliveries`
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ShipmentColumns {
    pub urgency: String,
    pub distance_km: String,
    pub weight_kg: String,
    pub rate_per_km: String,
    pub rate_per_kg: String,
}

impl TryFrom<ShipmentColumns> for ShipmentRequest {
    type Error = AppError;

    fn try_from(row: ShipmentColumns) -> Result<Self, Self::Error> {
        Ok(ShipmentRequest {
            distance_km: parse_decimal("distance_km", &row.distance_km)?,
            rate_per_km: parse_decimal("rate_per_km", &row.rate_per_km)?,
            weight_kg: parse_decimal("weight_kg", &row.weight_kg)?,
            rate_per_kg: parse_decimal("rate_per_kg", &row.rate_per_kg)?,
            urgency: parse_urgency(&row.urgency)?,
        })
    }
}
