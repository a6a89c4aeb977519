// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::{AuthResponse, LoginPayload, RegisterPayload, User, ValidateClientPayload},
        clients::Client,
    },
};

// O `required` do payload já barra a ausência; isto mantém o handler sem
// caminho de pânico caso o atributo mude.
fn required_client_id(client_id: Option<Uuid>) -> Result<Uuid, AppError> {
    client_id.ok_or_else(|| AppError::InvalidRequest("O campo 'clientId' é obrigatório.".to_string()))
}

// Confirma que o tenant existe antes da tela de login
#[utoipa::path(
    post,
    path = "/api/auth/validate-client",
    request_body = ValidateClientPayload,
    responses(
        (status = 200, body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    tag = "Auth"
)]
pub async fn validate_client(
    State(app_state): State<AppState>,
    Json(payload): Json<ValidateClientPayload>,
) -> Result<Json<Client>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let client = app_state
        .auth_service
        .validate_client(required_client_id(payload.client_id)?)
        .await?;

    Ok(Json(client))
}

// Handler de registro
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 200, body = AuthResponse),
        (status = 409, description = "Usuário ou e-mail duplicado")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .register_user(
            required_client_id(payload.client_id)?,
            &payload.username,
            &payload.email,
            &payload.password,
            payload.store_id,
        )
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login_user(
            required_client_id(payload.client_id)?,
            &payload.username_or_email,
            &payload.password,
        )
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses((status = 200, body = User)),
    security(("api_jwt" = [])),
    tag = "Auth"
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_client_id_fails_validation() {
        let payload = LoginPayload {
            client_id: None,
            username_or_email: "maria".to_string(),
            password: "123456".to_string(),
        };

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("client_id"));
    }

    // Mesmo sem a validação do payload, o handler responde 400 em vez de
    // entrar em pânico.
    #[test]
    fn missing_client_id_becomes_invalid_request() {
        let err = required_client_id(None).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let id = Uuid::new_v4();
        assert_eq!(required_client_id(Some(id)).unwrap(), id);
    }
}
