// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bcrypt::hash;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{User, UserRole},
    services::access,
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    // Só super_admin pode criar usuário em outro tenant
    pub client_id: Option<Uuid>,

    #[validate(length(min = 3, message = "O nome de usuário deve ter no mínimo 3 caracteres."))]
    pub username: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    pub role: UserRole,
    pub store_id: Option<Uuid>,
}

// ---
// Handlers (gestão de usuários: admin do tenant ou super_admin)
// ---

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, body = User),
        (status = 409, description = "Usuário ou e-mail duplicado")
    ),
    security(("api_jwt" = [])),
    tag = "Users"
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    access::ensure_admin(user.role)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let client_id = access::effective_client_id(user.role, user.client_id, payload.client_id)?;

    // Apenas super_admin pode conceder o papel super_admin
    if payload.role == UserRole::SuperAdmin {
        access::ensure_super_admin(user.role)?;
    }

    // Lotação em loja precisa apontar para uma loja do mesmo tenant
    if let Some(store_id) = payload.store_id {
        let store = app_state
            .store_repo
            .find_by_id(store_id)
            .await?
            .ok_or(AppError::StoreNotFound)?;
        if store.client_id != client_id {
            return Err(AppError::AccessDenied);
        }
    }

    // Hashing fora do runtime async
    let password_clone = payload.password.clone();
    let password_hash =
        tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

    let created = app_state
        .user_repo
        .create(
            client_id,
            &payload.username,
            &payload.email,
            &password_hash,
            payload.role,
            payload.store_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/users/client/{clientId}",
    params(("clientId" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, body = [User]), (status = 403, description = "Acesso negado")),
    security(("api_jwt" = [])),
    tag = "Users"
)]
pub async fn list_users_by_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<User>>, AppError> {
    access::ensure_admin(user.role)?;
    access::ensure_client_scope(user.role, user.client_id, client_id)?;

    let users = app_state.user_repo.list_by_client(client_id).await?;
    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_payload_requires_valid_fields() {
        let payload = CreateUserPayload {
            client_id: None,
            username: "jo".to_string(),
            email: "nao-e-email".to_string(),
            password: "123".to_string(),
            role: UserRole::ClientUser,
            store_id: None,
        };

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
