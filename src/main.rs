//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/validate-client", post(handlers::auth::validate_client))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::get_me).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        );

    // Gestão de clientes (tenants) — restrita ao super_admin nos handlers
    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        );

    let store_routes = Router::new()
        .route("/", post(handlers::stores::create_store))
        .route(
            "/client/{clientId}",
            get(handlers::stores::list_stores_by_client),
        )
        .route(
            "/{id}",
            put(handlers::stores::update_store).delete(handlers::stores::delete_store),
        );

    let user_routes = Router::new()
        .route("/", post(handlers::users::create_user))
        .route(
            "/client/{clientId}",
            get(handlers::users::list_users_by_client),
        );

    let role_routes = Router::new()
        .route("/", get(handlers::roles::list_roles))
        .route("/audit", get(handlers::roles::list_audit))
        .route(
            "/{id}/pages",
            get(handlers::roles::list_page_access).put(handlers::roles::replace_page_access),
        );

    // Os três livros têm a mesma forma de rota; só muda o handler
    let sales_routes = Router::new()
        .route(
            "/",
            post(handlers::transactions::create_sale).get(handlers::transactions::list_sales),
        )
        .route(
            "/{id}",
            get(handlers::transactions::get_sale)
                .put(handlers::transactions::update_sale)
                .delete(handlers::transactions::delete_sale),
        )
        .route(
            "/ref/{reference}",
            get(handlers::transactions::get_sale_by_reference)
                .put(handlers::transactions::update_sale_by_reference)
                .delete(handlers::transactions::delete_sale_by_reference),
        );

    let purchase_routes = Router::new()
        .route(
            "/",
            post(handlers::transactions::create_purchase)
                .get(handlers::transactions::list_purchases),
        )
        .route(
            "/{id}",
            get(handlers::transactions::get_purchase)
                .put(handlers::transactions::update_purchase)
                .delete(handlers::transactions::delete_purchase),
        )
        .route(
            "/ref/{reference}",
            get(handlers::transactions::get_purchase_by_reference)
                .put(handlers::transactions::update_purchase_by_reference)
                .delete(handlers::transactions::delete_purchase_by_reference),
        );

    let expense_routes = Router::new()
        .route(
            "/",
            post(handlers::transactions::create_expense)
                .get(handlers::transactions::list_expenses),
        )
        .route(
            "/{id}",
            get(handlers::transactions::get_expense)
                .put(handlers::transactions::update_expense)
                .delete(handlers::transactions::delete_expense),
        )
        .route(
            "/ref/{reference}",
            get(handlers::transactions::get_expense_by_reference)
                .put(handlers::transactions::update_expense_by_reference)
                .delete(handlers::transactions::delete_expense_by_reference),
        );

    // Tudo que não é auth exige token
    let protected_routes = Router::new()
        .nest("/api/clients", client_routes)
        .nest("/api/stores", store_routes)
        .nest("/api/users", user_routes)
        .nest("/api/roles", role_routes)
        .nest("/api/sales", sales_routes)
        .nest("/api/purchases", purchase_routes)
        .nest("/api/expenses", expense_routes)
        .route(
            "/api/transactions",
            get(handlers::transactions::list_all_transactions),
        )
        .route("/api/reports/totals", get(handlers::reports::get_totals))
        .route("/api/documents", post(handlers::documents::upload_document))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
