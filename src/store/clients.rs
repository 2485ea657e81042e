use sqlx::SqlitePool;
use uuid::Uuid;

use super::parse_uuid;
use crate::{
    error::AppError,
    models::{now_millis, Client, NewClient},
};

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: String,
    name: String,
    cpf: String,
    phone: String,
    email: String,
    address: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<ClientRow> for Client {
    type Error = AppError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Ok(Client {
            id: parse_uuid("client id", &row.id)?,
            name: row.name,
            cpf: row.cpf,
            phone: row.phone,
            email: row.email,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Client records
#[derive(Clone)]
pub struct ClientStore {
    db_pool: SqlitePool,
}

impl ClientStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    pub async fn list(&self) -> Result<Vec<Client>, AppError> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, cpf, phone, email, address, created_at, updated_at
            FROM clients
            ORDER BY created_at ASC, name ASC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        rows.into_iter().map(Client::try_from).collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, cpf, phone, email, address, created_at, updated_at
            FROM clients
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.db_pool)
        .await?
        .map(Client::try_from)
        .transpose()
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.db_pool)
            .await?;
        Ok(count > 0)
    }

    /// Id of the client holding this CPF, if any
    pub async fn find_id_by_cpf(&self, cpf: &str) -> Result<Option<Uuid>, AppError> {
        let id: Option<String> = sqlx::query_scalar("SELECT id FROM clients WHERE cpf = ?")
            .bind(cpf)
            .fetch_optional(&self.db_pool)
            .await?;
        id.map(|id| parse_uuid("client id", &id)).transpose()
    }

    /// Id of the client holding this email, if any
    pub async fn find_id_by_email(&self, email: &str) -> Result<Option<Uuid>, AppError> {
        let id: Option<String> = sqlx::query_scalar("SELECT id FROM clients WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db_pool)
            .await?;
        id.map(|id| parse_uuid("client id", &id)).transpose()
    }

    pub async fn insert(&self, client: NewClient) -> Result<Client, AppError> {
        let id = Uuid::new_v4();
        let now = now_millis();

        sqlx::query(
            r#"
            INSERT INTO clients (id, name, cpf, phone, email, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&client.name)
        .bind(&client.cpf)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.address)
        .bind(now)
        .bind(now)
        .execute(&self.db_pool)
        .await?;

        Ok(Client {
            id,
            name: client.name,
            cpf: client.cpf,
            phone: client.phone,
            email: client.email,
            address: client.address,
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrite every mutable field; returns `None` if the client is gone
    pub async fn update(&self, id: Uuid, client: NewClient) -> Result<Option<Client>, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET name = ?, cpf = ?, phone = ?, email = ?, address = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&client.name)
        .bind(&client.cpf)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.address)
        .bind(now_millis())
        .bind(id.to_string())
        .execute(&self.db_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Number of orders placed by the client
    pub async fn count_orders(&self, id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE client_id = ?")
            .bind(id.to_string())
            .fetch_one(&self.db_pool)
            .await?;
        Ok(count)
    }

    /// Returns false if no row was deleted
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    fn new_client(cpf: &str, email: &str) -> NewClient {
        NewClient {
            name: "João Lima".to_string(),
            cpf: cpf.to_string(),
            phone: "11912345678".to_string(),
            email: email.to_string(),
            address: "Av. Paulista, 1000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_get_list() {
        let store = ClientStore::new(connect_in_memory().await.unwrap());

        let created = store
            .insert(new_client("111.222.333-44", "joao@example.com"))
            .await
            .unwrap();
        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(store.exists(created.id).await.unwrap());
        assert!(!store.exists(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_lookup_by_unique_fields() {
        let store = ClientStore::new(connect_in_memory().await.unwrap());
        let created = store
            .insert(new_client("111.222.333-44", "joao@example.com"))
            .await
            .unwrap();

        assert_eq!(
            store.find_id_by_cpf("111.222.333-44").await.unwrap(),
            Some(created.id)
        );
        assert_eq!(
            store.find_id_by_email("joao@example.com").await.unwrap(),
            Some(created.id)
        );
        assert_eq!(store.find_id_by_cpf("999.999.999-99").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_cpf_is_rejected_by_schema() {
        let store = ClientStore::new(connect_in_memory().await.unwrap());
        store
            .insert(new_client("111.222.333-44", "a@example.com"))
            .await
            .unwrap();

        let err = store
            .insert(new_client("111.222.333-44", "b@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = ClientStore::new(connect_in_memory().await.unwrap());
        let created = store
            .insert(new_client("111.222.333-44", "joao@example.com"))
            .await
            .unwrap();

        let mut changed = new_client("111.222.333-44", "joao@example.com");
        changed.phone = "1144445555".to_string();
        let updated = store.update(created.id, changed).await.unwrap().unwrap();
        assert_eq!(updated.phone, "1144445555");

        assert!(store
            .update(Uuid::new_v4(), new_client("000.000.000-00", "x@y.z"))
            .await
            .unwrap()
            .is_none());

        assert_eq!(store.count_orders(created.id).await.unwrap(), 0);
        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.get(created.id).await.unwrap().is_none());
    }
}
