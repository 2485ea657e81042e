use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::ShipmentPatch;
use crate::{
    error::AppError,
    pricing::{CostBreakdown, ShipmentRequest},
};

/// Lifecycle of a delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryStatus {
    #[default]
    Calculated,
    InTransit,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calculated => "calculated",
            Self::InTransit => "inTransit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calculated" => Ok(Self::Calculated),
            "inTransit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::Validation(format!(
                "Invalid status '{}': use calculated, inTransit, delivered or cancelled",
                other
            ))),
        }
    }
}

/// Fulfillment record of an order, with a snapshot of its priced shipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub id: Uuid,
    pub order_id: Uuid,
    #[serde(flatten)]
    pub shipment: ShipmentRequest,
    /// Always equal to `compute_cost(&shipment)`
    pub costs: CostBreakdown,
    pub status: DeliveryStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Body of `POST /deliveries`
///
/// Omitted shipment fields are taken from the order.
#[derive(Debug, Deserialize)]
pub struct CreateDeliveryRequest {
    pub order_id: Option<Uuid>,
    pub status: Option<DeliveryStatus>,
    #[serde(flatten)]
    pub shipment: ShipmentPatch,
}

/// Body of `PUT /deliveries/:id`; omitted fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDeliveryRequest {
    pub order_id: Option<Uuid>,
    pub status: Option<DeliveryStatus>,
    #[serde(flatten)]
    pub shipment: ShipmentPatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_storage_form() {
        for status in [
            DeliveryStatus::Calculated,
            DeliveryStatus::InTransit,
            DeliveryStatus::Delivered,
            DeliveryStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<DeliveryStatus>().unwrap(), status);
        }
        assert!("shipped".parse::<DeliveryStatus>().is_err());
    }

    #[test]
    fn test_status_json_uses_camel_case() {
        let status: DeliveryStatus = serde_json::from_str("\"inTransit\"").unwrap();
        assert_eq!(status, DeliveryStatus::InTransit);
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        assert!(serde_json::from_str::<DeliveryStatus>("\"in_transit\"").is_err());
    }

    #[test]
    fn test_update_request_with_status_only() {
        let req: UpdateDeliveryRequest =
            serde_json::from_str(r#"{"status": "delivered"}"#).unwrap();
        assert_eq!(req.status, Some(DeliveryStatus::Delivered));
        assert!(req.shipment.is_empty());
        assert!(req.order_id.is_none());
    }
}
