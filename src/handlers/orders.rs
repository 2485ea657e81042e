use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::{
    common::{parse_id, AppJson, DeleteResponse},
    AppState,
};
use crate::{
    error::AppError,
    models::{
        missing_fields,
        order::{CreateOrderRequest, UpdateOrderRequest},
        Delivery, Order, OrderSummary,
    },
    pricing::CostBreakdown,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/:id",
            get(get_order).put(update_order).delete(delete_order),
        )
}

/// Response of `POST /orders`
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order: Order,
    pub delivery: Delivery,
    pub costs: CostBreakdown,
}

/// GET /orders
async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderSummary>>, AppError> {
    Ok(Json(state.orders.list().await?))
}

/// GET /orders/:id
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let id = parse_id("order", &id)?;
    let order = state
        .orders
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Order", id))?;
    Ok(Json(order))
}

/// POST /orders
async fn create_order(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let client_id = req.client_id.ok_or_else(|| missing_fields(&["client_id"]))?;
    let shipment = req.shipment.require_all()?;

    if !state.clients.exists(client_id).await? {
        return Err(AppError::not_found("Client", client_id));
    }

    let order_date = req.order_date.unwrap_or_else(Utc::now);
    let (order, delivery) = state
        .orders
        .create_with_delivery(client_id, order_date, shipment)
        .await?;

    info!(
        order_id = %order.id,
        client_id = %client_id,
        delivery_id = %delivery.id,
        total = %order.total,
        "Order created"
    );

    let costs = delivery.costs;
    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order,
            delivery,
            costs,
        }),
    ))
}

/// PUT /orders/:id
///
/// Changing any pricing field reprices the order and all of its deliveries.
async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UpdateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let id = parse_id("order", &id)?;
    let current = state
        .orders
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Order", id))?;

    if let Some(client_id) = patch.client_id {
        if client_id != current.client_id && !state.clients.exists(client_id).await? {
            return Err(AppError::not_found("Client", client_id));
        }
    }

    let reprice = !patch.shipment.is_empty();
    let merged = Order {
        client_id: patch.client_id.unwrap_or(current.client_id),
        order_date: patch.order_date.unwrap_or(current.order_date),
        shipment: patch.shipment.merge_onto(&current.shipment),
        ..current
    };

    let (order, repriced) = state
        .orders
        .update(merged, reprice)
        .await?
        .ok_or_else(|| AppError::not_found("Order", id))?;

    info!(
        order_id = %order.id,
        total = %order.total,
        deliveries_repriced = repriced,
        "Order updated"
    );

    Ok(Json(order))
}

/// DELETE /orders/:id
async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id("order", &id)?;
    if !state.orders.exists(id).await? {
        return Err(AppError::not_found("Order", id));
    }

    let deliveries = state.orders.count_deliveries(id).await?;
    if deliveries > 0 {
        return Err(AppError::Conflict(format!(
            "Order has {} delivery(ies); delete them first",
            deliveries
        )));
    }

    if !state.orders.delete(id).await? {
        return Err(AppError::not_found("Order", id));
    }
    info!(order_id = %id, "Order deleted");

    Ok(DeleteResponse::new(id))
}
