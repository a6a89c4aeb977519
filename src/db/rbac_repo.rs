// src/db/rbac_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::rbac::{PageAccess, PageAccessEntry, PermissionAuditEntry, SystemRole},
};

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_roles(&self) -> Result<Vec<SystemRole>, AppError> {
        let roles = sqlx::query_as::<_, SystemRole>(
            "SELECT id, name, description, created_at FROM system_roles ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    pub async fn find_role_by_id(&self, id: Uuid) -> Result<Option<SystemRole>, AppError> {
        let role = sqlx::query_as::<_, SystemRole>(
            "SELECT id, name, description, created_at FROM system_roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    pub async fn list_page_access(&self, role_id: Uuid) -> Result<Vec<PageAccess>, AppError> {
        let pages = sqlx::query_as::<_, PageAccess>(
            r#"
            SELECT id, role_id, page, can_view, can_create, can_edit, can_delete
            FROM page_access
            WHERE role_id = $1
            ORDER BY page ASC
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(pages)
    }

    // As três operações abaixo recebem um executor genérico para que o
    // serviço possa envolvê-las em uma única transação (o replace
    // delete-então-insert não pode deixar janela sem permissões).

    pub async fn delete_page_access<'e, E>(
        &self,
        executor: E,
        role_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM page_access WHERE role_id = $1")
            .bind(role_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_page_access<'e, E>(
        &self,
        executor: E,
        role_id: Uuid,
        entry: &PageAccessEntry,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO page_access (role_id, page, can_view, can_create, can_edit, can_delete)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(role_id)
        .bind(&entry.page)
        .bind(entry.can_view)
        .bind(entry.can_create)
        .bind(entry.can_edit)
        .bind(entry.can_delete)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn insert_audit<'e, E>(
        &self,
        executor: E,
        role_id: Uuid,
        changed_by: Uuid,
        summary: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "INSERT INTO permission_audit_log (role_id, changed_by, summary) VALUES ($1, $2, $3)",
        )
        .bind(role_id)
        .bind(changed_by)
        .bind(summary)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list_audit(&self) -> Result<Vec<PermissionAuditEntry>, AppError> {
        let entries = sqlx::query_as::<_, PermissionAuditEntry>(
            r#"
            SELECT id, role_id, changed_by, summary, created_at
            FROM permission_audit_log
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
