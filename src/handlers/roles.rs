// src/handlers/roles.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::rbac::{PageAccess, PageAccessEntry, PermissionAuditEntry, SystemRole},
    services::access,
};

// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    responses((status = 200, body = [SystemRole])),
    security(("api_jwt" = [])),
    tag = "Roles"
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<SystemRole>>, AppError> {
    access::ensure_super_admin(user.role)?;

    let roles = app_state.rbac_service.list_roles().await?;
    Ok(Json(roles))
}

// GET /api/roles/{id}/pages
#[utoipa::path(
    get,
    path = "/api/roles/{id}/pages",
    params(("id" = Uuid, Path, description = "ID do papel")),
    responses((status = 200, body = [PageAccess])),
    security(("api_jwt" = [])),
    tag = "Roles"
)]
pub async fn list_page_access(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PageAccess>>, AppError> {
    access::ensure_super_admin(user.role)?;

    let pages = app_state.rbac_service.list_page_access(id).await?;
    Ok(Json(pages))
}

// PUT /api/roles/{id}/pages — substitui a matriz inteira do papel.
// O serviço faz o delete+insert+auditoria em uma única transação.
#[utoipa::path(
    put,
    path = "/api/roles/{id}/pages",
    params(("id" = Uuid, Path, description = "ID do papel")),
    request_body = [PageAccessEntry],
    responses((status = 200, body = [PageAccess])),
    security(("api_jwt" = [])),
    tag = "Roles"
)]
pub async fn replace_page_access(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(entries): Json<Vec<PageAccessEntry>>,
) -> Result<Json<Vec<PageAccess>>, AppError> {
    access::ensure_super_admin(user.role)?;

    for entry in &entries {
        entry.validate().map_err(AppError::ValidationError)?;
    }

    let pages = app_state
        .rbac_service
        .replace_page_access(id, entries, user.id)
        .await?;
    Ok(Json(pages))
}

// GET /api/roles/audit
#[utoipa::path(
    get,
    path = "/api/roles/audit",
    responses((status = 200, body = [PermissionAuditEntry])),
    security(("api_jwt" = [])),
    tag = "Roles"
)]
pub async fn list_audit(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<PermissionAuditEntry>>, AppError> {
    access::ensure_super_admin(user.role)?;

    let entries = app_state.rbac_service.list_audit().await?;
    Ok(Json(entries))
}
