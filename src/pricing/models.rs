use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use super::PricingError;

/// Delivery speed requested for a shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: "URGENT", "Urgent" and "urgent" are all accepted
impl FromStr for Urgency {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "urgent" => Ok(Self::Urgent),
            _ => Err(PricingError::invalid(
                "urgency",
                format!("'{}' is not one of: normal, urgent", s),
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Urgency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Shipment attributes that drive the price of a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub distance_km: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate_per_km: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub weight_kg: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate_per_kg: Decimal,
    pub urgency: Urgency,
}

impl ShipmentRequest {
    /// Build a request from textual inputs (CLI arguments, form fields)
    ///
    /// Every numeric field must parse as a decimal and be strictly positive.
    pub fn parse(
        distance_km: &str,
        rate_per_km: &str,
        weight_kg: &str,
        rate_per_kg: &str,
        urgency: &str,
    ) -> Result<Self, PricingError> {
        let request = Self {
            distance_km: parse_amount("distance_km", distance_km)?,
            rate_per_km: parse_amount("rate_per_km", rate_per_km)?,
            weight_kg: parse_amount("weight_kg", weight_kg)?,
            rate_per_kg: parse_amount("rate_per_kg", rate_per_kg)?,
            urgency: urgency.parse()?,
        };
        request.validate()?;
        Ok(request)
    }

    /// Reject zero or negative numeric fields
    pub fn validate(&self) -> Result<(), PricingError> {
        for (field, value) in [
            ("distance_km", self.distance_km),
            ("rate_per_km", self.rate_per_km),
            ("weight_kg", self.weight_kg),
            ("rate_per_kg", self.rate_per_kg),
        ] {
            ensure_positive(field, value)?;
        }
        Ok(())
    }
}

/// Parse a decimal amount, naming the offending field on failure
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, PricingError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| PricingError::invalid(field, format!("'{}' is not a number", raw)))
}

pub(crate) fn ensure_positive(field: &'static str, value: Decimal) -> Result<(), PricingError> {
    if value <= Decimal::ZERO {
        return Err(PricingError::invalid(
            field,
            format!("must be greater than zero, got {}", value),
        ));
    }
    Ok(())
}

/// Itemized price of a delivery
///
/// `final_cost == distance_cost + weight_cost + surcharge - discount + extra_fee`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub distance_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub weight_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub surcharge: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub extra_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_cost: Decimal,
}
