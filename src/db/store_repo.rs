// src/db/store_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::stores::Store};

const STORE_COLUMNS: &str = "id, client_id, name, location, created_at, updated_at";

#[derive(Clone)]
pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Usado pelo controle de acesso para resolver o dono da loja
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Store>, AppError> {
        let maybe_store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_store)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Store>, AppError> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE client_id = $1 ORDER BY name ASC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stores)
    }

    pub async fn create(
        &self,
        client_id: Uuid,
        name: &str,
        location: Option<&str>,
    ) -> Result<Store, AppError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            r#"
            INSERT INTO stores (client_id, name, location)
            VALUES ($1, $2, $3)
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(name)
        .bind(location)
        .fetch_one(&self.pool)
        .await?;
        Ok(store)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        location: Option<&str>,
    ) -> Result<Option<Store>, AppError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            r#"
            UPDATE stores
            SET name = COALESCE($2, name),
                location = COALESCE($3, location),
                updated_at = now()
            WHERE id = $1
            RETURNING {STORE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(location)
        .fetch_optional(&self.pool)
        .await?;
        Ok(store)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
