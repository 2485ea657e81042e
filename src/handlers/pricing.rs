use axum::{routing::post, Json, Router};

use super::{common::AppJson, AppState};
use crate::{
    error::AppError,
    pricing::{compute_cost, CostBreakdown, ShipmentRequest},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/quote", post(quote))
}

/// POST /pricing/quote
///
/// Prices a shipment without persisting anything.
async fn quote(AppJson(req): AppJson<ShipmentRequest>) -> Result<Json<CostBreakdown>, AppError> {
    Ok(Json(compute_cost(&req)?))
}
