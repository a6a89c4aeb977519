// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, UserRepository},
    models::{
        auth::{Claims, User, UserRole},
        clients::Client,
    },
};

// Tokens valem 24 horas a partir da emissão
const TOKEN_TTL_HOURS: i64 = 24;

// Hash de sacrifício: quando o usuário não existe, verificamos a senha
// contra ele mesmo assim, para que o tempo de resposta não revele se a
// conta existe.
const DUMMY_HASH: &str = "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

// ---
// Assinatura e decodificação, separadas do serviço para serem testáveis
// sem pool de banco.
// ---

pub fn sign_token(jwt_secret: &str, user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::hours(TOKEN_TTL_HOURS);

    let claims = Claims {
        sub: user.id,
        role: user.role,
        client_id: user.client_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )?)
}

pub fn decode_token(jwt_secret: &str, token: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &validation,
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data.claims)
}

#[derive(Clone)]
pub struct AuthService {
    client_repo: ClientRepository,
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(
        client_repo: ClientRepository,
        user_repo: UserRepository,
        jwt_secret: String,
    ) -> Self {
        Self {
            client_repo,
            user_repo,
            jwt_secret,
        }
    }

    // Confirma que o tenant existe antes da tela de login
    pub async fn validate_client(&self, client_id: Uuid) -> Result<Client, AppError> {
        self.client_repo
            .find_by_id(client_id)
            .await?
            .ok_or(AppError::ClientNotFound)
    }

    pub async fn register_user(
        &self,
        client_id: Uuid,
        username: &str,
        email: &str,
        password: &str,
        store_id: Option<Uuid>,
    ) -> Result<String, AppError> {
        // O tenant precisa existir
        self.client_repo
            .find_by_id(client_id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        // Hashing fora do runtime async (bcrypt é CPU-bound)
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let new_user = self
            .user_repo
            .create(
                client_id,
                username,
                email,
                &hashed_password,
                UserRole::ClientUser,
                store_id,
            )
            .await?;

        sign_token(&self.jwt_secret, &new_user)
    }

    // Login: (tenant, usuário-ou-email, senha) -> token assinado.
    // Conta inexistente e senha errada respondem exatamente igual.
    pub async fn login_user(
        &self,
        client_id: Uuid,
        username_or_email: &str,
        password: &str,
    ) -> Result<String, AppError> {
        self.client_repo
            .find_by_id(client_id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        let maybe_user = self
            .user_repo
            .find_by_login(client_id, username_or_email)
            .await?;

        let Some(user) = maybe_user else {
            // Mesmo custo de bcrypt do caminho feliz
            let password_clone = password.to_owned();
            let _ = tokio::task::spawn_blocking(move || verify(&password_clone, DUMMY_HASH)).await;
            return Err(AppError::InvalidCredentials);
        };

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em uma thread separada
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        sign_token(&self.jwt_secret, &user)
    }

    // Valida assinatura/expiração e refaz a busca do usuário: a existência
    // da linha é o único mecanismo de revogação.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            username: "maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "irrelevante".to_string(),
            role: UserRole::Admin,
            store_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn token_claims_round_trip() {
        let user = sample_user();
        let token = sign_token("segredo-de-teste", &user).unwrap();
        let claims = decode_token("segredo-de-teste", &token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, user.role);
        assert_eq!(claims.client_id, user.client_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let user = sample_user();
        let token = sign_token("segredo-a", &user).unwrap();
        let err = decode_token("segredo-b", &token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = sample_user();
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            role: user.role,
            client_id: user.client_id,
            exp: (now - chrono::Duration::hours(1)).timestamp() as usize,
            iat: (now - chrono::Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("segredo-de-teste".as_ref()),
        )
        .unwrap();

        let err = decode_token("segredo-de-teste", &token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = decode_token("segredo-de-teste", "nao-e-um-jwt").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
