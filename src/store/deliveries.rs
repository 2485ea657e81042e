use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use super::{parse_decimal, parse_uuid, ShipmentColumns};
use crate::{
    error::AppError,
    models::{Delivery, DeliveryStatus},
    pricing::{CostBreakdown, ShipmentRequest},
};

#[derive(Debug, sqlx::FromRow)]
struct DeliveryRow {
    id: String,
    order_id: String,
    #[sqlx(flatten)]
    shipment: ShipmentColumns,
    distance_cost: String,
    weight_cost: String,
    base_cost: String,
    surcharge: String,
    discount: String,
    extra_fee: String,
    final_cost: String,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<DeliveryRow> for Delivery {
    type Error = AppError;

    fn try_from(row: DeliveryRow) -> Result<Self, Self::Error> {
        Ok(Delivery {
            id: parse_uuid("delivery id", &row.id)?,
            order_id: parse_uuid("order id", &row.order_id)?,
            shipment: ShipmentRequest::try_from(row.shipment)?,
            costs: CostBreakdown {
                distance_cost: parse_decimal("distance_cost", &row.distance_cost)?,
                weight_cost: parse_decimal("weight_cost", &row.weight_cost)?,
                base_cost: parse_decimal("base_cost", &row.base_cost)?,
                surcharge: parse_decimal("surcharge", &row.surcharge)?,
                discount: parse_decimal("discount", &row.discount)?,
                extra_fee: parse_decimal("extra_fee", &row.extra_fee)?,
                final_cost: parse_decimal("final_cost", &row.final_cost)?,
            },
            status: row.status.parse::<DeliveryStatus>().map_err(|_| {
                AppError::Internal(format!("Corrupt delivery status '{}'", row.status))
            })?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_DELIVERY: &str = r#"
    SELECT id, order_id, urgency, distance_km, weight_kg, rate_per_km, rate_per_kg,
           distance_cost, weight_cost, base_cost, surcharge, discount, extra_fee, final_cost,
           status, created_at, updated_at
    FROM deliveries
"#;

/// Insert a delivery row; usable inside a transaction
pub(crate) async fn insert_row<'e, E>(executor: E, delivery: &Delivery) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let shipment = &delivery.shipment;
    let costs = &delivery.costs;

    sqlx::query(
        r#"
        INSERT INTO deliveries (
            id, order_id, urgency, distance_km, weight_kg, rate_per_km, rate_per_kg,
            distance_cost, weight_cost, base_cost, surcharge, discount, extra_fee, final_cost,
            status, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(delivery.id.to_string())
    .bind(delivery.order_id.to_string())
    .bind(shipment.urgency.as_str())
    .bind(shipment.distance_km.to_string())
    .bind(shipment.weight_kg.to_string())
    .bind(shipment.rate_per_km.to_string())
    .bind(shipment.rate_per_kg.to_string())
    .bind(costs.distance_cost.to_string())
    .bind(costs.weight_cost.to_string())
    .bind(costs.base_cost.to_string())
    .bind(costs.surcharge.to_string())
    .bind(costs.discount.to_string())
    .bind(costs.extra_fee.to_string())
    .bind(costs.final_cost.to_string())
    .bind(delivery.status.as_str())
    .bind(delivery.created_at)
    .bind(delivery.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Overwrite shipment snapshot and breakdown of every delivery of an order,
/// including deliveries whose shipment was set independently
pub(crate) async fn reprice_for_order<'e, E>(
    executor: E,
    order_id: Uuid,
    shipment: &ShipmentRequest,
    costs: &CostBreakdown,
    now: i64,
) -> Result<u64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE deliveries
        SET urgency = ?, distance_km = ?, weight_kg = ?, rate_per_km = ?, rate_per_kg = ?,
            distance_cost = ?, weight_cost = ?, base_cost = ?, surcharge = ?, discount = ?,
            extra_fee = ?, final_cost = ?, updated_at = ?
        WHERE order_id = ?
        "#,
    )
    .bind(shipment.urgency.as_str())
    .bind(shipment.distance_km.to_string())
    .bind(shipment.weight_kg.to_string())
    .bind(shipment.rate_per_km.to_string())
    .bind(shipment.rate_per_kg.to_string())
    .bind(costs.distance_cost.to_string())
    .bind(costs.weight_cost.to_string())
    .bind(costs.base_cost.to_string())
    .bind(costs.surcharge.to_string())
    .bind(costs.discount.to_string())
    .bind(costs.extra_fee.to_string())
    .bind(costs.final_cost.to_string())
    .bind(now)
    .bind(order_id.to_string())
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Delivery records
#[derive(Clone)]
pub struct DeliveryStore {
    db_pool: SqlitePool,
}

impl DeliveryStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    pub async fn list(&self) -> Result<Vec<Delivery>, AppError> {
        let sql = format!("{} ORDER BY created_at ASC", SELECT_DELIVERY);
        let rows = sqlx::query_as::<_, DeliveryRow>(&sql)
            .fetch_all(&self.db_pool)
            .await?;

        rows.into_iter().map(Delivery::try_from).collect()
    }

    pub async fn list_for_order(&self, order_id: Uuid) -> Result<Vec<Delivery>, AppError> {
        let sql = format!(
            "{} WHERE order_id = ? ORDER BY created_at ASC",
            SELECT_DELIVERY
        );
        let rows = sqlx::query_as::<_, DeliveryRow>(&sql)
            .bind(order_id.to_string())
            .fetch_all(&self.db_pool)
            .await?;

        rows.into_iter().map(Delivery::try_from).collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Delivery>, AppError> {
        let sql = format!("{} WHERE id = ?", SELECT_DELIVERY);
        sqlx::query_as::<_, DeliveryRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.db_pool)
            .await?
            .map(Delivery::try_from)
            .transpose()
    }

    pub async fn insert(&self, delivery: &Delivery) -> Result<(), AppError> {
        insert_row(&self.db_pool, delivery).await?;
        Ok(())
    }

    /// Overwrite order reference, snapshot, breakdown and status
    pub async fn update(&self, delivery: &Delivery) -> Result<bool, AppError> {
        let shipment = &delivery.shipment;
        let costs = &delivery.costs;

        let result = sqlx::query(
            r#"
            UPDATE deliveries
            SET order_id = ?, urgency = ?, distance_km = ?, weight_kg = ?, rate_per_km = ?,
                rate_per_kg = ?, distance_cost = ?, weight_cost = ?, base_cost = ?,
                surcharge = ?, discount = ?, extra_fee = ?, final_cost = ?, status = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(delivery.order_id.to_string())
        .bind(shipment.urgency.as_str())
        .bind(shipment.distance_km.to_string())
        .bind(shipment.weight_kg.to_string())
        .bind(shipment.rate_per_km.to_string())
        .bind(shipment.rate_per_kg.to_string())
        .bind(costs.distance_cost.to_string())
        .bind(costs.weight_cost.to_string())
        .bind(costs.base_cost.to_string())
        .bind(costs.surcharge.to_string())
        .bind(costs.discount.to_string())
        .bind(costs.extra_fee.to_string())
        .bind(costs.final_cost.to_string())
        .bind(delivery.status.as_str())
        .bind(delivery.updated_at)
        .bind(delivery.id.to_string())
        .execute(&self.db_pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns false if no row was deleted
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM deliveries WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::connect_in_memory,
        models::{now_millis, NewClient},
        pricing::{compute_cost, Urgency},
        store::{ClientStore, OrderStore},
    };
    use rust_decimal_macros::dec;

    async fn seed_order(pool: &SqlitePool) -> Uuid {
        let client = ClientStore::new(pool.clone())
            .insert(NewClient {
                name: "Ana".to_string(),
                cpf: "123.123.123-12".to_string(),
                phone: "1199998888".to_string(),
                email: "ana@example.com".to_string(),
                address: "Rua A, 1".to_string(),
            })
            .await
            .unwrap();

        let shipment = ShipmentRequest {
            distance_km: dec!(10),
            rate_per_km: dec!(2),
            weight_kg: dec!(5),
            rate_per_kg: dec!(3),
            urgency: Urgency::Normal,
        };
        let (order, _) = OrderStore::new(pool.clone())
            .create_with_delivery(client.id, chrono::Utc::now(), shipment)
            .await
            .unwrap();
        order.id
    }

    fn delivery_for(order_id: Uuid, urgency: Urgency) -> Delivery {
        let shipment = ShipmentRequest {
            distance_km: dec!(200),
            rate_per_km: dec!(3),
            weight_kg: dec!(10),
            rate_per_kg: dec!(5),
            urgency,
        };
        let now = now_millis();
        Delivery {
            id: Uuid::new_v4(),
            order_id,
            shipment,
            costs: compute_cost(&shipment).unwrap(),
            status: DeliveryStatus::InTransit,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_preserves_breakdown() {
        let pool = connect_in_memory().await.unwrap();
        let order_id = seed_order(&pool).await;
        let store = DeliveryStore::new(pool);

        let delivery = delivery_for(order_id, Urgency::Urgent);
        store.insert(&delivery).await.unwrap();

        let fetched = store.get(delivery.id).await.unwrap().unwrap();
        assert_eq!(fetched, delivery);
        assert_eq!(fetched.costs.final_cost, dec!(702));
        assert_eq!(fetched.status, DeliveryStatus::InTransit);

        // the delivery created with the order plus this one
        assert_eq!(store.list_for_order(order_id).await.unwrap().len(), 2);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = connect_in_memory().await.unwrap();
        let order_id = seed_order(&pool).await;
        let store = DeliveryStore::new(pool);

        let mut delivery = delivery_for(order_id, Urgency::Normal);
        store.insert(&delivery).await.unwrap();

        delivery.status = DeliveryStatus::Delivered;
        assert!(store.update(&delivery).await.unwrap());
        assert_eq!(
            store.get(delivery.id).await.unwrap().unwrap().status,
            DeliveryStatus::Delivered
        );

        assert!(store.delete(delivery.id).await.unwrap());
        assert!(!store.delete(delivery.id).await.unwrap());
        assert!(store.get(delivery.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reprice_for_order_touches_every_delivery() {
        let pool = connect_in_memory().await.unwrap();
        let order_id = seed_order(&pool).await;
        let store = DeliveryStore::new(pool.clone());
        store
            .insert(&delivery_for(order_id, Urgency::Normal))
            .await
            .unwrap();

        let shipment = ShipmentRequest {
            distance_km: dec!(10),
            rate_per_km: dec!(1),
            weight_kg: dec!(60),
            rate_per_kg: dec!(1),
            urgency: Urgency::Normal,
        };
        let costs = compute_cost(&shipment).unwrap();
        let updated = reprice_for_order(&pool, order_id, &shipment, &costs, now_millis())
            .await
            .unwrap();
        assert_eq!(updated, 2);

        for delivery in store.list_for_order(order_id).await.unwrap() {
            assert_eq!(delivery.shipment, shipment);
            assert_eq!(delivery.costs.final_cost, dec!(85));
        }
    }
}
