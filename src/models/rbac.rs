// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::UserRole;

// ---
// 1. SystemRole (o "Papel")
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemRole {
    pub id: Uuid,
    pub name: UserRole,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---
// 2. PageAccess (uma linha da matriz papel x página)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageAccess {
    pub id: Uuid,
    pub role_id: Uuid,
    pub page: String,
    pub can_view: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

// Entrada enviada no replace da matriz
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageAccessEntry {
    #[validate(length(min = 1, message = "O nome da página é obrigatório."))]
    pub page: String,
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_create: bool,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
}

// ---
// 3. Auditoria de alterações de permissão
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionAuditEntry {
    pub id: Uuid,
    pub role_id: Uuid,
    pub changed_by: Uuid,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}
