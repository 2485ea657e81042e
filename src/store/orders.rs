use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{datetime_from_millis, deliveries, parse_decimal, parse_uuid, ShipmentColumns};
use crate::{
    error::AppError,
    models::{now_millis, Delivery, DeliveryStatus, Order, OrderSummary},
    pricing::{compute_cost, ShipmentRequest},
};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    client_id: String,
    order_date: i64,
    #[sqlx(flatten)]
    shipment: ShipmentColumns,
    total: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: parse_uuid("order id", &row.id)?,
            client_id: parse_uuid("client id", &row.client_id)?,
            order_date: datetime_from_millis(row.order_date)?,
            shipment: ShipmentRequest::try_from(row.shipment)?,
            total: parse_decimal("total", &row.total)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    #[sqlx(flatten)]
    order: OrderRow,
    client_name: String,
}

/// Order records
///
/// An order's `total` and the breakdown of each of its deliveries are always
/// recomputed together, in the same transaction, from the order's shipment.
#[derive(Clone)]
pub struct OrderStore {
    db_pool: SqlitePool,
}

impl OrderStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// All orders with the name of the client that placed them
    pub async fn list(&self) -> Result<Vec<OrderSummary>, AppError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r#"
            SELECT o.id, o.client_id, o.order_date, o.urgency, o.distance_km, o.weight_kg,
                   o.rate_per_km, o.rate_per_kg, o.total, o.created_at, o.updated_at,
                   c.name AS client_name
            FROM orders o
            INNER JOIN clients c ON c.id = o.client_id
            ORDER BY o.order_date ASC, o.created_at ASC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(OrderSummary {
                    order: Order::try_from(row.order)?,
                    client_name: row.client_name,
                })
            })
            .collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, client_id, order_date, urgency, distance_km, weight_kg,
                   rate_per_km, rate_per_kg, total, created_at, updated_at
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.db_pool)
        .await?
        .map(Order::try_from)
        .transpose()
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.db_pool)
            .await?;
        Ok(count > 0)
    }

    /// Price the shipment, then insert the order and its first delivery atomically
    pub async fn create_with_delivery(
        &self,
        client_id: Uuid,
        order_date: DateTime<Utc>,
        shipment: ShipmentRequest,
    ) -> Result<(Order, Delivery), AppError> {
        let costs = compute_cost(&shipment)?;
        let now = now_millis();
        let order_date = datetime_from_millis(order_date.timestamp_millis())?;

        let order = Order {
            id: Uuid::new_v4(),
            client_id,
            order_date,
            shipment,
            total: costs.final_cost,
            created_at: now,
            updated_at: now,
        };
        let delivery = Delivery {
            id: Uuid::new_v4(),
            order_id: order.id,
            shipment,
            costs,
            status: DeliveryStatus::default(),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db_pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, client_id, order_date, urgency, distance_km, weight_kg,
                rate_per_km, rate_per_kg, total, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(order.id.to_string())
        .bind(order.client_id.to_string())
        .bind(order.order_date.timestamp_millis())
        .bind(shipment.urgency.as_str())
        .bind(shipment.distance_km.to_string())
        .bind(shipment.weight_kg.to_string())
        .bind(shipment.rate_per_km.to_string())
        .bind(shipment.rate_per_kg.to_string())
        .bind(order.total.to_string())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        deliveries::insert_row(&mut *tx, &delivery).await?;

        tx.commit().await?;

        Ok((order, delivery))
    }

    /// Persist `order` with a freshly computed total
    ///
    /// When `reprice_deliveries` is set, every delivery of the order receives the
    /// order's shipment and new breakdown in the same transaction. Returns the
    /// stored order and the number of deliveries repriced, or `None` if the
    /// order no longer exists.
    ///
    /// Repricing discards shipment fields a delivery set for itself: they are
    /// replaced by the order's, whatever their previous values.
    pub async fn update(
        &self,
        order: Order,
        reprice_deliveries: bool,
    ) -> Result<Option<(Order, u64)>, AppError> {
        let costs = compute_cost(&order.shipment)?;
        let now = now_millis();
        let order = Order {
            order_date: datetime_from_millis(order.order_date.timestamp_millis())?,
            total: costs.final_cost,
            updated_at: now,
            ..order
        };

        let mut tx = self.db_pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET client_id = ?, order_date = ?, urgency = ?, distance_km = ?, weight_kg = ?,
                rate_per_km = ?, rate_per_kg = ?, total = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(order.client_id.to_string())
        .bind(order.order_date.timestamp_millis())
        .bind(order.shipment.urgency.as_str())
        .bind(order.shipment.distance_km.to_string())
        .bind(order.shipment.weight_kg.to_string())
        .bind(order.shipment.rate_per_km.to_string())
        .bind(order.shipment.rate_per_kg.to_string())
        .bind(order.total.to_string())
        .bind(now)
        .bind(order.id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let repriced = if reprice_deliveries {
            deliveries::reprice_for_order(&mut *tx, order.id, &order.shipment, &costs, now)
                .await?
        } else {
            0
        };

        tx.commit().await?;

        Ok(Some((order, repriced)))
    }

    /// Number of deliveries attached to the order
    pub async fn count_deliveries(&self, id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM deliveries WHERE order_id = ?")
            .bind(id.to_string())
            .fetch_one(&self.db_pool)
            .await?;
        Ok(count)
    }

    /// Returns false if no row was deleted
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
