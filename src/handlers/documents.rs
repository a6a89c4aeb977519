// src/handlers/documents.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use base64::Engine;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    services::storage::sanitize_file_name,
};

// ---
// Payload: o arquivo chega em base64 no corpo JSON
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentPayload {
    #[validate(length(min = 1, message = "O nome do arquivo é obrigatório."))]
    pub file_name: String,

    #[validate(length(min = 1, message = "O content-type é obrigatório."))]
    pub content_type: String,

    #[validate(length(min = 1, message = "O conteúdo do arquivo é obrigatório."))]
    pub data: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentResponse {
    pub url: String,
}

// POST /api/documents
// Grava o comprovante e devolve a URL pública; o vínculo com o lançamento
// é feito depois, pelo campo documentUrl do create/update. Se o insert
// posterior falhar, o objeto fica órfão (não há compensação).
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = UploadDocumentPayload,
    responses((status = 201, body = UploadDocumentResponse)),
    security(("api_jwt" = [])),
    tag = "Documents"
)]
pub async fn upload_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UploadDocumentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&payload.data)
        .map_err(|_| {
            AppError::InvalidRequest("O campo 'data' não é um base64 válido.".to_string())
        })?;

    // Caminho por tenant, com nome único para não sobrescrever
    let path = format!(
        "{}/{}-{}",
        user.client_id,
        Uuid::new_v4(),
        sanitize_file_name(&payload.file_name)
    );

    let url = app_state
        .storage
        .put(&path, &bytes, &payload.content_type)
        .await?;

    tracing::info!("📎 Documento gravado em {}", path);

    Ok((StatusCode::CREATED, Json(UploadDocumentResponse { url })))
}
