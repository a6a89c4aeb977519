// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::validate_client,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Stores ---
        handlers::stores::create_store,
        handlers::stores::list_stores_by_client,
        handlers::stores::update_store,
        handlers::stores::delete_store,

        // --- Users ---
        handlers::users::create_user,
        handlers::users::list_users_by_client,

        // --- Roles ---
        handlers::roles::list_roles,
        handlers::roles::list_page_access,
        handlers::roles::replace_page_access,
        handlers::roles::list_audit,

        // --- Sales ---
        handlers::transactions::create_sale,
        handlers::transactions::list_sales,
        handlers::transactions::get_sale,
        handlers::transactions::update_sale,
        handlers::transactions::delete_sale,
        handlers::transactions::get_sale_by_reference,
        handlers::transactions::update_sale_by_reference,
        handlers::transactions::delete_sale_by_reference,

        // --- Purchases ---
        handlers::transactions::create_purchase,
        handlers::transactions::list_purchases,
        handlers::transactions::get_purchase,
        handlers::transactions::update_purchase,
        handlers::transactions::delete_purchase,
        handlers::transactions::get_purchase_by_reference,
        handlers::transactions::update_purchase_by_reference,
        handlers::transactions::delete_purchase_by_reference,

        // --- Expenses ---
        handlers::transactions::create_expense,
        handlers::transactions::list_expenses,
        handlers::transactions::get_expense,
        handlers::transactions::update_expense,
        handlers::transactions::delete_expense,
        handlers::transactions::get_expense_by_reference,
        handlers::transactions::update_expense_by_reference,
        handlers::transactions::delete_expense_by_reference,

        // --- Transactions (combinado) ---
        handlers::transactions::list_all_transactions,

        // --- Reports ---
        handlers::reports::get_totals,

        // --- Documents ---
        handlers::documents::upload_document,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::ValidateClientPayload,
            models::auth::LoginPayload,
            models::auth::RegisterPayload,
            models::auth::AuthResponse,

            // --- Clients ---
            models::clients::Client,
            handlers::clients::CreateClientPayload,
            handlers::clients::UpdateClientPayload,

            // --- Stores ---
            models::stores::Store,
            handlers::stores::CreateStorePayload,
            handlers::stores::UpdateStorePayload,

            // --- Users ---
            handlers::users::CreateUserPayload,

            // --- Transactions ---
            models::transactions::TransactionKind,
            models::transactions::PaymentMethod,
            models::transactions::TransactionRecord,
            models::transactions::TaggedTransaction,
            handlers::transactions::CreateTransactionPayload,
            handlers::transactions::UpdateTransactionPayload,

            // --- Reports ---
            models::reports::ReportTotals,

            // --- Roles ---
            models::rbac::SystemRole,
            models::rbac::PageAccess,
            models::rbac::PageAccessEntry,
            models::rbac::PermissionAuditEntry,

            // --- Documents ---
            handlers::documents::UploadDocumentPayload,
            handlers::documents::UploadDocumentResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Clients", description = "Gestão de Clientes (Tenants)"),
        (name = "Stores", description = "Gestão de Lojas"),
        (name = "Users", description = "Gestão de Usuários"),
        (name = "Roles", description = "Papéis e Acesso por Página"),
        (name = "Sales", description = "Livro de Vendas"),
        (name = "Purchases", description = "Livro de Compras"),
        (name = "Expenses", description = "Livro de Despesas"),
        (name = "Transactions", description = "Listagem Combinada dos Lançamentos"),
        (name = "Reports", description = "Totais e Receita Bruta"),
        (name = "Documents", description = "Upload de Comprovantes")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
