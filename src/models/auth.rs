// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Papéis do sistema
// ---
// super_admin enxerga todos os tenants; os demais ficam restritos ao
// próprio client_id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    ClientUser,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub client_id: Uuid,
    pub username: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: UserRole,

    // Lotação opcional em uma loja
    pub store_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// Payloads de autenticação
// ---

// Valida se o tenant existe antes da tela de login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateClientPayload {
    #[validate(required(message = "O campo 'clientId' é obrigatório."))]
    pub client_id: Option<Uuid>,
}

// Dados para login: tenant + usuário-ou-email + senha
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(required(message = "O campo 'clientId' é obrigatório."))]
    pub client_id: Option<Uuid>,

    #[validate(length(min = 1, message = "Informe o nome de usuário ou e-mail."))]
    pub username_or_email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(required(message = "O campo 'clientId' é obrigatório."))]
    pub client_id: Option<Uuid>,

    #[validate(length(min = 3, message = "O nome de usuário deve ter no mínimo 3 caracteres."))]
    pub username: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    pub store_id: Option<Uuid>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT.
// Carrega o escopo do tenant: client_id vem SEMPRE daqui, nunca do corpo
// da requisição.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,       // Subject (ID do usuário)
    pub role: UserRole,  // Papel no momento da emissão
    pub client_id: Uuid, // Tenant do usuário
    pub exp: usize,      // Expiration time (quando o token expira)
    pub iat: usize,      // Issued At (quando o token foi criado)
}
