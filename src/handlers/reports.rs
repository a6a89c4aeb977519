// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{reports::ReportTotals, transactions::parse_store_filter, transactions::TransactionFilter},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    // super_admin pode escolher o tenant
    pub client_id: Option<Uuid>,
    // UUID da loja ou "all" (= sem filtro)
    pub store_id: Option<String>,
    // Intervalo inclusivo, aplicado à coluna de data de CADA livro
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// GET /api/reports/totals
// Totais de vendas/compras/despesas do período e a receita bruta derivada.
#[utoipa::path(
    get,
    path = "/api/reports/totals",
    params(ReportQuery),
    responses((status = 200, body = ReportTotals)),
    security(("api_jwt" = [])),
    tag = "Reports"
)]
pub async fn get_totals(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportTotals>, AppError> {
    let filter = TransactionFilter {
        store_id: parse_store_filter(query.store_id.as_deref())?,
        search: None,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let totals = app_state
        .report_service
        .totals(&user, query.client_id, filter)
        .await?;

    Ok(Json(totals))
}
