// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        ClientRepository, RbacRepository, StoreRepository, TransactionRepository, UserRepository,
    },
    services::{
        auth::AuthService,
        rbac_service::RbacService,
        report_service::ReportService,
        storage::{DocumentStorage, LocalDiskStorage},
        transaction_service::TransactionService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,

    pub client_repo: ClientRepository,
    pub store_repo: StoreRepository,
    pub user_repo: UserRepository,

    pub auth_service: AuthService,
    pub transaction_service: TransactionService,
    pub report_service: ReportService,
    pub rbac_service: RbacService,

    pub storage: Arc<dyn DocumentStorage>,
}

impl AppState {
    // Carrega as configurações e monta o estado. Sem credenciais reais a
    // aplicação NÃO sobe: não existe fallback em memória.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        // Armazenamento de documentos (disco local por padrão)
        let storage_root =
            env::var("STORAGE_ROOT").unwrap_or_else(|_| "./uploads".to_string());
        let storage_base_url = env::var("STORAGE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/files".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let client_repo = ClientRepository::new(db_pool.clone());
        let store_repo = StoreRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());
        let transaction_repo = TransactionRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            client_repo.clone(),
            user_repo.clone(),
            jwt_secret.clone(),
        );
        let transaction_service =
            TransactionService::new(transaction_repo.clone(), store_repo.clone());
        let report_service = ReportService::new(transaction_repo);
        let rbac_service = RbacService::new(rbac_repo, db_pool.clone());

        let storage: Arc<dyn DocumentStorage> =
            Arc::new(LocalDiskStorage::new(storage_root.into(), storage_base_url));

        Ok(Self {
            db_pool,
            jwt_secret,
            client_repo,
            store_repo,
            user_repo,
            auth_service,
            transaction_service,
            report_service,
            rbac_service,
            storage,
        })
    }
}
