// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

const USER_COLUMNS: &str =
    "id, client_id, username, email, password_hash, role, store_id, created_at, updated_at";

// O repositório de usuários, responsável pela tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Login aceita nome de usuário OU e-mail, sempre dentro do tenant
    pub async fn find_by_login(
        &self,
        client_id: Uuid,
        username_or_email: &str,
    ) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE client_id = $1 AND (username = $2 OR email = $2)
            "#
        ))
        .bind(client_id)
        .bind(username_or_email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE client_id = $1 ORDER BY username ASC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    // Cria um novo usuário, com tratamento específico para duplicidade
    // de nome de usuário e de e-mail dentro do tenant.
    pub async fn create(
        &self,
        client_id: Uuid,
        username: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
        store_id: Option<Uuid>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (client_id, username, email, password_hash, role, store_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(store_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    if let Some(constraint) = db_err.constraint() {
                        return match constraint {
                            // Nomes dos índices criados na migration
                            "users_client_username_key" => AppError::UsernameAlreadyExists,
                            "users_client_email_key" => AppError::EmailAlreadyExists,

                            // Fallback (caso surjam outras chaves únicas no futuro)
                            _ => AppError::UniqueConstraintViolation(constraint.to_string()),
                        };
                    }
                }
            }
            e.into()
        })?;

        Ok(user)
    }
}
