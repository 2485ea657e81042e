use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use super::{
    common::{parse_id, AppJson, DeleteResponse},
    AppState,
};
use crate::{
    error::AppError,
    models::{
        delivery::{CreateDeliveryRequest, UpdateDeliveryRequest},
        missing_fields, now_millis, Delivery,
    },
    pricing::compute_cost,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_deliveries).post(create_delivery))
        .route(
            "/:id",
            get(get_delivery).put(update_delivery).delete(delete_delivery),
        )
}

/// GET /deliveries
async fn list_deliveries(State(state): State<AppState>) -> Result<Json<Vec<Delivery>>, AppError> {
    Ok(Json(state.deliveries.list().await?))
}

/// GET /deliveries/:id
async fn get_delivery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Delivery>, AppError> {
    let id = parse_id("delivery", &id)?;
    let delivery = state
        .deliveries
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Delivery", id))?;
    Ok(Json(delivery))
}

/// POST /deliveries
///
/// Shipment fields left out of the body are taken from the order.
async fn create_delivery(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateDeliveryRequest>,
) -> Result<(StatusCode, Json<Delivery>), AppError> {
    let order_id = req.order_id.ok_or_else(|| missing_fields(&["order_id"]))?;
    let order = state
        .orders
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order", order_id))?;

    let shipment = req.shipment.merge_onto(&order.shipment);
    let costs = compute_cost(&shipment)?;
    let now = now_millis();
    let delivery = Delivery {
        id: Uuid::new_v4(),
        order_id,
        shipment,
        costs,
        status: req.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    state.deliveries.insert(&delivery).await?;
    info!(
        delivery_id = %delivery.id,
        order_id = %order_id,
        final_cost = %delivery.costs.final_cost,
        "Delivery created"
    );

    Ok((StatusCode::CREATED, Json(delivery)))
}

/// PUT /deliveries/:id
///
/// Costs are recomputed only when a pricing field is supplied.
async fn update_delivery(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UpdateDeliveryRequest>,
) -> Result<Json<Delivery>, AppError> {
    let id = parse_id("delivery", &id)?;
    let current = state
        .deliveries
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Delivery", id))?;

    if let Some(order_id) = patch.order_id {
        if order_id != current.order_id && !state.orders.exists(order_id).await? {
            return Err(AppError::not_found("Order", order_id));
        }
    }

    let shipment = patch.shipment.merge_onto(&current.shipment);
    let costs = if patch.shipment.is_empty() {
        current.costs
    } else {
        compute_cost(&shipment)?
    };

    let delivery = Delivery {
        order_id: patch.order_id.unwrap_or(current.order_id),
        shipment,
        costs,
        status: patch.status.unwrap_or(current.status),
        updated_at: now_millis(),
        ..current
    };

    if !state.deliveries.update(&delivery).await? {
        return Err(AppError::not_found("Delivery", id));
    }
    info!(
        delivery_id = %delivery.id,
        status = %delivery.status,
        final_cost = %delivery.costs.final_cost,
        "Delivery updated"
    );

    Ok(Json(delivery))
}

/// DELETE /deliveries/:id
async fn delete_delivery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id("delivery", &id)?;
    if !state.deliveries.delete(id).await? {
        return Err(AppError::not_found("Delivery", id));
    }
    info!(delivery_id = %id, "Delivery deleted");

    Ok(DeleteResponse::new(id))
}
