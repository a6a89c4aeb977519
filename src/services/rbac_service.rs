// src/services/rbac_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RbacRepository,
    models::rbac::{PageAccess, PageAccessEntry, PermissionAuditEntry, SystemRole},
};

#[derive(Clone)]
pub struct RbacService {
    repo: RbacRepository,
    pool: PgPool,
}

impl RbacService {
    pub fn new(repo: RbacRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_roles(&self) -> Result<Vec<SystemRole>, AppError> {
        self.repo.list_roles().await
    }

    pub async fn list_page_access(&self, role_id: Uuid) -> Result<Vec<PageAccess>, AppError> {
        self.repo
            .find_role_by_id(role_id)
            .await?
            .ok_or(AppError::RoleNotFound)?;

        self.repo.list_page_access(role_id).await
    }

    // Substitui a matriz de páginas de um papel. O delete-então-insert e o
    // registro de auditoria ficam na MESMA transação: ou tudo entra, ou a
    // matriz antiga permanece (sem janela com papel sem permissões).
    pub async fn replace_page_access(
        &self,
        role_id: Uuid,
        entries: Vec<PageAccessEntry>,
        changed_by: Uuid,
    ) -> Result<Vec<PageAccess>, AppError> {
        self.repo
            .find_role_by_id(role_id)
            .await?
            .ok_or(AppError::RoleNotFound)?;

        // 1. Inicia transação
        let mut tx = self.pool.begin().await?;

        // 2. Remove a matriz atual
        self.repo.delete_page_access(&mut *tx, role_id).await?;

        // 3. Insere a nova
        for entry in &entries {
            self.repo.insert_page_access(&mut *tx, role_id, entry).await?;
        }

        // 4. Auditoria na mesma transação
        let summary = format!("Acesso de {} página(s) redefinido", entries.len());
        self.repo
            .insert_audit(&mut *tx, role_id, changed_by, &summary)
            .await?;

        // 5. Commit
        tx.commit().await?;

        tracing::info!(
            "🔐 Permissões do papel {} redefinidas ({} páginas)",
            role_id,
            entries.len()
        );

        self.repo.list_page_access(role_id).await
    }

    pub async fn list_audit(&self) -> Result<Vec<PermissionAuditEntry>, AppError> {
        self.repo.list_audit().await
    }
}
