// src/db/client_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::clients::Client};

// O repositório de tenants, responsável pela tabela 'clients'
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let maybe_client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, contact_email, contact_phone, created_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_client)
    }

    pub async fn list_all(&self) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT id, name, contact_email, contact_phone, created_at FROM clients ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(clients)
    }

    pub async fn create(
        &self,
        name: &str,
        contact_email: Option<&str>,
        contact_phone: Option<&str>,
    ) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, contact_email, contact_phone)
            VALUES ($1, $2, $3)
            RETURNING id, name, contact_email, contact_phone, created_at
            "#,
        )
        .bind(name)
        .bind(contact_email)
        .bind(contact_phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(client)
    }

    // Atualização parcial: campos None mantêm o valor atual
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        contact_email: Option<&str>,
        contact_phone: Option<&str>,
    ) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = COALESCE($2, name),
                contact_email = COALESCE($3, contact_email),
                contact_phone = COALESCE($4, contact_phone)
            WHERE id = $1
            RETURNING id, name, contact_email, contact_phone, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(contact_email)
        .bind(contact_phone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
