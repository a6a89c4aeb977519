// src/handlers/clients.rs

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
    models::clients::Client,
    services::access,
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub name: String,

    #[validate(email(message = "O e-mail de contato é inválido."))]
    pub contact_email: Option<String>,

    pub contact_phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientPayload {
    #[validate(length(min = 1, message = "O nome do cliente não pode ser vazio."))]
    pub name: Option<String>,

    #[validate(email(message = "O e-mail de contato é inválido."))]
    pub contact_email: Option<String>,

    pub contact_phone: Option<String>,
}

// ---
// Handlers (gestão de tenants: só super_admin)
// ---

#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = CreateClientPayload,
    responses((status = 201, body = Client), (status = 403, description = "Acesso negado")),
    security(("api_jwt" = [])),
    tag = "Clients"
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    access::ensure_super_admin(user.role)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let client = app_state
        .client_repo
        .create(
            &payload.name,
            payload.contact_email.as_deref(),
            payload.contact_phone.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    get,
    path = "/api/clients",
    responses((status = 200, body = [Client])),
    security(("api_jwt" = [])),
    tag = "Clients"
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Client>>, AppError> {
    access::ensure_super_admin(user.role)?;

    let clients = app_state.client_repo.list_all().await?;
    Ok(Json(clients))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, body = Client), (status = 404, description = "Não encontrado")),
    security(("api_jwt" = [])),
    tag = "Clients"
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    // O próprio tenant pode se consultar; outros, só super_admin
    access::ensure_client_scope(user.role, user.client_id, id)?;

    let client = app_state
        .client_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::ClientNotFound)?;

    Ok(Json(client))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = UpdateClientPayload,
    responses((status = 200, body = Client)),
    security(("api_jwt" = [])),
    tag = "Clients"
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientPayload>,
) -> Result<Json<Client>, AppError> {
    access::ensure_super_admin(user.role)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let client = app_state
        .client_repo
        .update(
            id,
            payload.name.as_deref(),
            payload.contact_email.as_deref(),
            payload.contact_phone.as_deref(),
        )
        .await?
        .ok_or(AppError::ClientNotFound)?;

    Ok(Json(client))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 204, description = "Removido")),
    security(("api_jwt" = [])),
    tag = "Clients"
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    access::ensure_super_admin(user.role)?;

    let deleted = app_state.client_repo.delete(id).await?;
    if !deleted {
        return Err(AppError::ClientNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
