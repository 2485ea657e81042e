pub mod clients;
pub mod common;
pub mod deliveries;
pub mod health;
pub mod orders;
pub mod pricing;

use sqlx::SqlitePool;

use crate::store::{ClientStore, DeliveryStore, OrderStore};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub clients: ClientStore,
    pub orders: OrderStore,
    pub deliveries: DeliveryStore,
}

impl AppState {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self {
            clients: ClientStore::new(db_pool.clone()),
            orders: OrderStore::new(db_pool.clone()),
            deliveries: DeliveryStore::new(db_pool.clone()),
            db_pool,
        }
    }
}
