// src/handlers/stores.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::stores::Store,
    services::access,
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStorePayload {
    // Só super_admin pode criar loja para outro tenant
    pub client_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O nome da loja é obrigatório."))]
    pub name: String,

    pub location: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStorePayload {
    #[validate(length(min = 1, message = "O nome da loja não pode ser vazio."))]
    pub name: Option<String>,

    pub location: Option<String>,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/stores",
    request_body = CreateStorePayload,
    responses((status = 201, body = Store)),
    security(("api_jwt" = [])),
    tag = "Stores"
)]
pub async fn create_store(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateStorePayload>,
) -> Result<impl IntoResponse, AppError> {
    access::ensure_admin(user.role)?;
    payload.validate().map_err(AppError::ValidationError)?;

    // O tenant vem do token; o corpo só vale para super_admin
    let client_id = access::effective_client_id(user.role, user.client_id, payload.client_id)?;

    let store = app_state
        .store_repo
        .create(client_id, &payload.name, payload.location.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(store)))
}

// Lista as lojas de um cliente. Um client_user de outro tenant recebe 403.
#[utoipa::path(
    get,
    path = "/api/stores/client/{clientId}",
    params(("clientId" = Uuid, Path, description = "ID do cliente dono das lojas")),
    responses((status = 200, body = [Store]), (status = 403, description = "Acesso negado")),
    security(("api_jwt" = [])),
    tag = "Stores"
)]
pub async fn list_stores_by_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<Store>>, AppError> {
    access::ensure_client_scope(user.role, user.client_id, client_id)?;

    let stores = app_state.store_repo.list_by_client(client_id).await?;
    Ok(Json(stores))
}

#[utoipa::path(
    put,
    path = "/api/stores/{id}",
    params(("id" = Uuid, Path, description = "ID da loja")),
    request_body = UpdateStorePayload,
    responses((status = 200, body = Store)),
    security(("api_jwt" = [])),
    tag = "Stores"
)]
pub async fn update_store(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStorePayload>,
) -> Result<Json<Store>, AppError> {
    access::ensure_admin(user.role)?;
    payload.validate().map_err(AppError::ValidationError)?;

    // Resolve o dono da loja antes de qualquer escrita
    let store = app_state
        .store_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::StoreNotFound)?;
    access::ensure_client_scope(user.role, user.client_id, store.client_id)?;

    let store = app_state
        .store_repo
        .update(id, payload.name.as_deref(), payload.location.as_deref())
        .await?
        .ok_or(AppError::StoreNotFound)?;

    Ok(Json(store))
}

#[utoipa::path(
    delete,
    path = "/api/stores/{id}",
    params(("id" = Uuid, Path, description = "ID da loja")),
    responses((status = 204, description = "Removida")),
    security(("api_jwt" = [])),
    tag = "Stores"
)]
pub async fn delete_store(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    access::ensure_admin(user.role)?;

    let store = app_state
        .store_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::StoreNotFound)?;
    access::ensure_client_scope(user.role, user.client_id, store.client_id)?;

    app_state.store_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
