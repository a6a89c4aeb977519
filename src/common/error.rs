use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro único, com `thiserror` para melhor ergonomia.
// Cada variante mapeia para um status HTTP no IntoResponse abaixo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    InvalidRequest(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    AccessDenied,

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Loja não encontrada")]
    StoreNotFound,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Papel não encontrado")]
    RoleNotFound,

    #[error("Registro não encontrado")]
    RecordNotFound,

    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Número de referência já existe")]
    ReferenceAlreadyExists,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidRequest(msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Usuário ou senha inválidos.")
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::AccessDenied => (
                StatusCode::FORBIDDEN,
                "Você não tem acesso aos dados deste cliente.",
            ),

            AppError::ClientNotFound => (StatusCode::NOT_FOUND, "Cliente não encontrado."),
            AppError::StoreNotFound => (StatusCode::NOT_FOUND, "Loja não encontrada."),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::RoleNotFound => (StatusCode::NOT_FOUND, "Papel não encontrado."),
            AppError::RecordNotFound => (StatusCode::NOT_FOUND, "Registro não encontrado."),

            AppError::UsernameAlreadyExists => {
                (StatusCode::CONFLICT, "Este nome de usuário já está em uso.")
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::ReferenceAlreadyExists => (
                StatusCode::CONFLICT,
                "Já existe um lançamento com este número de referência.",
            ),
            AppError::UniqueConstraintViolation(_) => {
                (StatusCode::CONFLICT, "Registro duplicado.")
            }

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O detalhe vai para o log via `tracing`, nunca para o corpo da resposta.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
