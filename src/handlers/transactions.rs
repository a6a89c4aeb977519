// src/handlers/transactions.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::transactions::{
        parse_store_filter, ListQuery, NewTransaction, Page, Pagination, PaymentMethod,
        TaggedTransaction, TransactionFilter, TransactionKind, TransactionRecord,
        TransactionUpdate,
    },
};

// ---
// Validação customizada
// ---
// A rejeição de valores negativos acontece aqui, ANTES de qualquer
// chamada de persistência.
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads (comuns aos três livros)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
    // Só super_admin pode lançar em outro tenant
    pub client_id: Option<Uuid>,

    pub store_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O número de referência é obrigatório."))]
    pub reference_no: String,

    #[serde(default)]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,

    pub payment_method: PaymentMethod,

    pub document_url: Option<String>,

    // Data do lançamento no livro correspondente (YYYY-MM-DD)
    pub entry_date: NaiveDate,
}

// Distingue campo ausente (mantém o valor atual) de `null` explícito
// (limpa a coluna): o desserializador só roda quando o campo está presente.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionPayload {
    // `"storeId": null` desvincula o lançamento da loja
    #[serde(default, deserialize_with = "double_option")]
    pub store_id: Option<Option<Uuid>>,

    #[validate(length(min = 1, message = "O número de referência não pode ser vazio."))]
    pub reference_no: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Option<Decimal>,

    pub payment_method: Option<PaymentMethod>,

    // `"documentUrl": null` remove o comprovante vinculado
    #[serde(default, deserialize_with = "double_option")]
    pub document_url: Option<Option<String>>,

    pub entry_date: Option<NaiveDate>,
}

impl UpdateTransactionPayload {
    fn into_update(self) -> TransactionUpdate {
        TransactionUpdate {
            store_id: self.store_id,
            reference_no: self.reference_no,
            description: self.description,
            amount: self.amount,
            payment_method: self.payment_method,
            document_url: self.document_url,
            entry_date: self.entry_date,
        }
    }
}

// Escopo opcional de tenant para rotas por referência (só super_admin)
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ScopeQuery {
    pub client_id: Option<Uuid>,
}

fn build_filter(query: &ListQuery) -> Result<TransactionFilter, AppError> {
    Ok(TransactionFilter {
        store_id: parse_store_filter(query.store_id.as_deref())?,
        search: query.search.clone().filter(|s| !s.is_empty()),
        start_date: query.start_date,
        end_date: query.end_date,
    })
}

// ---
// Implementações genéricas (o livro entra por parâmetro)
// ---

async fn create_transaction(
    app_state: AppState,
    user: AuthenticatedUser,
    kind: TransactionKind,
    payload: CreateTransactionPayload,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let data = NewTransaction {
        // client_id definitivo é resolvido pelo serviço a partir do token
        client_id: user.0.client_id,
        store_id: payload.store_id,
        reference_no: payload.reference_no,
        description: payload.description,
        amount: payload.amount,
        payment_method: payload.payment_method,
        document_url: payload.document_url,
        entry_date: payload.entry_date,
    };

    let record = app_state
        .transaction_service
        .create(kind, &user.0, payload.client_id, data)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_transactions(
    app_state: AppState,
    user: AuthenticatedUser,
    kind: TransactionKind,
    query: ListQuery,
) -> Result<Json<Page<TransactionRecord>>, AppError> {
    let filter = build_filter(&query)?;
    let pagination = Pagination::new(query.page, query.page_size);

    let page = app_state
        .transaction_service
        .list(kind, &user.0, query.client_id, filter, pagination)
        .await?;

    Ok(Json(page))
}

async fn get_transaction(
    app_state: AppState,
    user: AuthenticatedUser,
    kind: TransactionKind,
    id: Uuid,
) -> Result<Json<TransactionRecord>, AppError> {
    let record = app_state
        .transaction_service
        .get_by_id(kind, &user.0, id)
        .await?;
    Ok(Json(record))
}

async fn update_transaction(
    app_state: AppState,
    user: AuthenticatedUser,
    kind: TransactionKind,
    id: Uuid,
    payload: UpdateTransactionPayload,
) -> Result<Json<TransactionRecord>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let record = app_state
        .transaction_service
        .update_by_id(kind, &user.0, id, payload.into_update())
        .await?;
    Ok(Json(record))
}

async fn delete_transaction(
    app_state: AppState,
    user: AuthenticatedUser,
    kind: TransactionKind,
    id: Uuid,
) -> Result<StatusCode, AppError> {
    app_state
        .transaction_service
        .delete_by_id(kind, &user.0, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_transaction_by_reference(
    app_state: AppState,
    user: AuthenticatedUser,
    kind: TransactionKind,
    scope: ScopeQuery,
    reference_no: String,
) -> Result<Json<TransactionRecord>, AppError> {
    let record = app_state
        .transaction_service
        .get_by_reference(kind, &user.0, scope.client_id, &reference_no)
        .await?;
    Ok(Json(record))
}

async fn update_transaction_by_reference(
    app_state: AppState,
    user: AuthenticatedUser,
    kind: TransactionKind,
    scope: ScopeQuery,
    reference_no: String,
    payload: UpdateTransactionPayload,
) -> Result<Json<TransactionRecord>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let record = app_state
        .transaction_service
        .update_by_reference(
            kind,
            &user.0,
            scope.client_id,
            &reference_no,
            payload.into_update(),
        )
        .await?;
    Ok(Json(record))
}

async fn delete_transaction_by_reference(
    app_state: AppState,
    user: AuthenticatedUser,
    kind: TransactionKind,
    scope: ScopeQuery,
    reference_no: String,
) -> Result<StatusCode, AppError> {
    app_state
        .transaction_service
        .delete_by_reference(kind, &user.0, scope.client_id, &reference_no)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Vendas
// ---

#[utoipa::path(post, path = "/api/sales", request_body = CreateTransactionPayload,
    responses((status = 201, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Sales")]
pub async fn create_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    create_transaction(app_state, user, TransactionKind::Sale, payload).await
}

#[utoipa::path(get, path = "/api/sales", params(ListQuery),
    responses((status = 200)), security(("api_jwt" = [])), tag = "Sales")]
pub async fn list_sales(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<TransactionRecord>>, AppError> {
    list_transactions(app_state, user, TransactionKind::Sale, query).await
}

#[utoipa::path(get, path = "/api/sales/{id}", params(("id" = Uuid, Path)),
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Sales")]
pub async fn get_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionRecord>, AppError> {
    get_transaction(app_state, user, TransactionKind::Sale, id).await
}

#[utoipa::path(put, path = "/api/sales/{id}", params(("id" = Uuid, Path)),
    request_body = UpdateTransactionPayload,
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Sales")]
pub async fn update_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionPayload>,
) -> Result<Json<TransactionRecord>, AppError> {
    update_transaction(app_state, user, TransactionKind::Sale, id, payload).await
}

#[utoipa::path(delete, path = "/api/sales/{id}", params(("id" = Uuid, Path)),
    responses((status = 204)), security(("api_jwt" = [])), tag = "Sales")]
pub async fn delete_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_transaction(app_state, user, TransactionKind::Sale, id).await
}

#[utoipa::path(get, path = "/api/sales/ref/{reference}", params(("reference" = String, Path), ScopeQuery),
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Sales")]
pub async fn get_sale_by_reference(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(reference): Path<String>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<TransactionRecord>, AppError> {
    get_transaction_by_reference(app_state, user, TransactionKind::Sale, scope, reference).await
}

#[utoipa::path(put, path = "/api/sales/ref/{reference}", params(("reference" = String, Path), ScopeQuery),
    request_body = UpdateTransactionPayload,
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Sales")]
pub async fn update_sale_by_reference(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(reference): Path<String>,
    Query(scope): Query<ScopeQuery>,
    Json(payload): Json<UpdateTransactionPayload>,
) -> Result<Json<TransactionRecord>, AppError> {
    update_transaction_by_reference(
        app_state,
        user,
        TransactionKind::Sale,
        scope,
        reference,
        payload,
    )
    .await
}

#[utoipa::path(delete, path = "/api/sales/ref/{reference}", params(("reference" = String, Path), ScopeQuery),
    responses((status = 204)), security(("api_jwt" = [])), tag = "Sales")]
pub async fn delete_sale_by_reference(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(reference): Path<String>,
    Query(scope): Query<ScopeQuery>,
) -> Result<StatusCode, AppError> {
    delete_transaction_by_reference(app_state, user, TransactionKind::Sale, scope, reference).await
}

// ---
// Compras
// ---

#[utoipa::path(post, path = "/api/purchases", request_body = CreateTransactionPayload,
    responses((status = 201, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Purchases")]
pub async fn create_purchase(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    create_transaction(app_state, user, TransactionKind::Purchase, payload).await
}

#[utoipa::path(get, path = "/api/purchases", params(ListQuery),
    responses((status = 200)), security(("api_jwt" = [])), tag = "Purchases")]
pub async fn list_purchases(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<TransactionRecord>>, AppError> {
    list_transactions(app_state, user, TransactionKind::Purchase, query).await
}

#[utoipa::path(get, path = "/api/purchases/{id}", params(("id" = Uuid, Path)),
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Purchases")]
pub async fn get_purchase(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionRecord>, AppError> {
    get_transaction(app_state, user, TransactionKind::Purchase, id).await
}

#[utoipa::path(put, path = "/api/purchases/{id}", params(("id" = Uuid, Path)),
    request_body = UpdateTransactionPayload,
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Purchases")]
pub async fn update_purchase(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionPayload>,
) -> Result<Json<TransactionRecord>, AppError> {
    update_transaction(app_state, user, TransactionKind::Purchase, id, payload).await
}

#[utoipa::path(delete, path = "/api/purchases/{id}", params(("id" = Uuid, Path)),
    responses((status = 204)), security(("api_jwt" = [])), tag = "Purchases")]
pub async fn delete_purchase(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_transaction(app_state, user, TransactionKind::Purchase, id).await
}

#[utoipa::path(get, path = "/api/purchases/ref/{reference}", params(("reference" = String, Path), ScopeQuery),
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Purchases")]
pub async fn get_purchase_by_reference(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(reference): Path<String>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<TransactionRecord>, AppError> {
    get_transaction_by_reference(app_state, user, TransactionKind::Purchase, scope, reference)
        .await
}

#[utoipa::path(put, path = "/api/purchases/ref/{reference}", params(("reference" = String, Path), ScopeQuery),
    request_body = UpdateTransactionPayload,
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Purchases")]
pub async fn update_purchase_by_reference(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(reference): Path<String>,
    Query(scope): Query<ScopeQuery>,
    Json(payload): Json<UpdateTransactionPayload>,
) -> Result<Json<TransactionRecord>, AppError> {
    update_transaction_by_reference(
        app_state,
        user,
        TransactionKind::Purchase,
        scope,
        reference,
        payload,
    )
    .await
}

#[utoipa::path(delete, path = "/api/purchases/ref/{reference}", params(("reference" = String, Path), ScopeQuery),
    responses((status = 204)), security(("api_jwt" = [])), tag = "Purchases")]
pub async fn delete_purchase_by_reference(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(reference): Path<String>,
    Query(scope): Query<ScopeQuery>,
) -> Result<StatusCode, AppError> {
    delete_transaction_by_reference(app_state, user, TransactionKind::Purchase, scope, reference)
        .await
}

// ---
// Despesas
// ---

#[utoipa::path(post, path = "/api/expenses", request_body = CreateTransactionPayload,
    responses((status = 201, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Expenses")]
pub async fn create_expense(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    create_transaction(app_state, user, TransactionKind::Expense, payload).await
}

#[utoipa::path(get, path = "/api/expenses", params(ListQuery),
    responses((status = 200)), security(("api_jwt" = [])), tag = "Expenses")]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<TransactionRecord>>, AppError> {
    list_transactions(app_state, user, TransactionKind::Expense, query).await
}

#[utoipa::path(get, path = "/api/expenses/{id}", params(("id" = Uuid, Path)),
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Expenses")]
pub async fn get_expense(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionRecord>, AppError> {
    get_transaction(app_state, user, TransactionKind::Expense, id).await
}

#[utoipa::path(put, path = "/api/expenses/{id}", params(("id" = Uuid, Path)),
    request_body = UpdateTransactionPayload,
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Expenses")]
pub async fn update_expense(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionPayload>,
) -> Result<Json<TransactionRecord>, AppError> {
    update_transaction(app_state, user, TransactionKind::Expense, id, payload).await
}

#[utoipa::path(delete, path = "/api/expenses/{id}", params(("id" = Uuid, Path)),
    responses((status = 204)), security(("api_jwt" = [])), tag = "Expenses")]
pub async fn delete_expense(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_transaction(app_state, user, TransactionKind::Expense, id).await
}

#[utoipa::path(get, path = "/api/expenses/ref/{reference}", params(("reference" = String, Path), ScopeQuery),
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Expenses")]
pub async fn get_expense_by_reference(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(reference): Path<String>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<TransactionRecord>, AppError> {
    get_transaction_by_reference(app_state, user, TransactionKind::Expense, scope, reference)
        .await
}

#[utoipa::path(put, path = "/api/expenses/ref/{reference}", params(("reference" = String, Path), ScopeQuery),
    request_body = UpdateTransactionPayload,
    responses((status = 200, body = TransactionRecord)), security(("api_jwt" = [])), tag = "Expenses")]
pub async fn update_expense_by_reference(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(reference): Path<String>,
    Query(scope): Query<ScopeQuery>,
    Json(payload): Json<UpdateTransactionPayload>,
) -> Result<Json<TransactionRecord>, AppError> {
    update_transaction_by_reference(
        app_state,
        user,
        TransactionKind::Expense,
        scope,
        reference,
        payload,
    )
    .await
}

#[utoipa::path(delete, path = "/api/expenses/ref/{reference}", params(("reference" = String, Path), ScopeQuery),
    responses((status = 204)), security(("api_jwt" = [])), tag = "Expenses")]
pub async fn delete_expense_by_reference(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(reference): Path<String>,
    Query(scope): Query<ScopeQuery>,
) -> Result<StatusCode, AppError> {
    delete_transaction_by_reference(app_state, user, TransactionKind::Expense, scope, reference)
        .await
}

// ---
// Listagem combinada dos três livros
// ---

#[utoipa::path(get, path = "/api/transactions", params(ListQuery),
    responses((status = 200)), security(("api_jwt" = [])), tag = "Transactions")]
pub async fn list_all_transactions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<TaggedTransaction>>, AppError> {
    let filter = build_filter(&query)?;
    let pagination = Pagination::new(query.page, query.page_size);

    let page = app_state
        .transaction_service
        .list_combined(&user.0, query.client_id, filter, pagination)
        .await?;

    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    // A compra com valor negativo tem de falhar na validação do payload,
    // antes de qualquer chamada de persistência.
    #[test]
    fn negative_amount_is_rejected_at_the_boundary() {
        let payload = CreateTransactionPayload {
            client_id: None,
            store_id: None,
            reference_no: "NF-001".to_string(),
            description: "Compra de insumos".to_string(),
            amount: Decimal::from_str_exact("-10.00").unwrap(),
            payment_method: PaymentMethod::Cash,
            document_url: None,
            entry_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount"));
    }

    #[test]
    fn zero_amount_is_accepted() {
        let payload = CreateTransactionPayload {
            client_id: None,
            store_id: None,
            reference_no: "NF-002".to_string(),
            description: String::new(),
            amount: Decimal::ZERO,
            payment_method: PaymentMethod::Pix,
            document_url: None,
            entry_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };

        assert!(payload.validate().is_ok());
    }

    #[test]
    fn update_payload_maps_only_present_fields() {
        let payload = UpdateTransactionPayload {
            store_id: None,
            reference_no: Some("NF-003".to_string()),
            description: None,
            amount: Some(Decimal::from_str_exact("42.00").unwrap()),
            payment_method: None,
            document_url: None,
            entry_date: None,
        };

        let update = payload.into_update();
        assert!(update.store_id.is_none());
        assert_eq!(update.reference_no.as_deref(), Some("NF-003"));
        assert!(update.description.is_none());
        assert!(update.amount.is_some());
        assert!(update.payment_method.is_none());
    }

    // `null` explícito limpa a coluna; campo ausente mantém o valor atual.
    #[test]
    fn explicit_null_clears_store_and_document() {
        let payload: UpdateTransactionPayload =
            serde_json::from_str(r#"{"storeId": null, "documentUrl": null}"#).unwrap();

        let update = payload.into_update();
        assert_eq!(update.store_id, Some(None));
        assert_eq!(update.document_url, Some(None));
    }

    #[test]
    fn omitted_store_and_document_are_kept() {
        let payload: UpdateTransactionPayload = serde_json::from_str("{}").unwrap();

        let update = payload.into_update();
        assert!(update.store_id.is_none());
        assert!(update.document_url.is_none());
    }

    #[test]
    fn present_store_and_document_are_replaced() {
        let store_id = Uuid::new_v4();
        let payload: UpdateTransactionPayload = serde_json::from_str(&format!(
            r#"{{"storeId": "{store_id}", "documentUrl": "http://localhost:3000/files/a.pdf"}}"#
        ))
        .unwrap();

        let update = payload.into_update();
        assert_eq!(update.store_id, Some(Some(store_id)));
        assert_eq!(
            update.document_url,
            Some(Some("http://localhost:3000/files/a.pdf".to_string()))
        );
    }
}
