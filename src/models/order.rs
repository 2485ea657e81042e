use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ShipmentPatch;
use crate::pricing::ShipmentRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    pub order_date: DateTime<Utc>,
    #[serde(flatten)]
    pub shipment: ShipmentRequest,
    /// Final cost computed by the pricing engine from `shipment`
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order as listed, with the owning client's name
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    pub client_name: String,
}

/// Body of `POST /orders`
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub client_id: Option<Uuid>,
    /// Defaults to the time of the request
    pub order_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub shipment: ShipmentPatch,
}

/// Body of `PUT /orders/:id`; omitted fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
    pub client_id: Option<Uuid>,
    pub order_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub shipment: ShipmentPatch,
}
