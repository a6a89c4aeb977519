// src/services/access.rs

// Controle de acesso por tenant. As regras são funções puras de propósito
// único, aplicadas antes de QUALQUER leitura/escrita em lojas, lançamentos
// e usuários. O client_id do principal vem sempre do token; o corpo da
// requisição nunca decide escopo (só o super_admin pode escolher tenant).

use uuid::Uuid;

use crate::{common::error::AppError, models::auth::UserRole};

// Regra central: super_admin enxerga tudo; os demais só o próprio tenant.
pub fn ensure_client_scope(
    role: UserRole,
    principal_client_id: Uuid,
    target_client_id: Uuid,
) -> Result<(), AppError> {
    if role == UserRole::SuperAdmin || principal_client_id == target_client_id {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}

// Resolve o tenant efetivo de uma operação. Um client_id explícito na
// requisição só é aceito vindo de um super_admin; para os demais papéis,
// qualquer valor divergente do token é negado em vez de ignorado.
pub fn effective_client_id(
    role: UserRole,
    principal_client_id: Uuid,
    requested: Option<Uuid>,
) -> Result<Uuid, AppError> {
    match requested {
        None => Ok(principal_client_id),
        Some(requested) => {
            ensure_client_scope(role, principal_client_id, requested)?;
            Ok(requested)
        }
    }
}

pub fn ensure_super_admin(role: UserRole) -> Result<(), AppError> {
    if role == UserRole::SuperAdmin {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}

// admin do tenant ou super_admin
pub fn ensure_admin(role: UserRole) -> Result<(), AppError> {
    match role {
        UserRole::SuperAdmin | UserRole::Admin => Ok(()),
        UserRole::ClientUser => Err(AppError::AccessDenied),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_client_is_allowed_for_any_role() {
        let client = Uuid::new_v4();
        for role in [UserRole::SuperAdmin, UserRole::Admin, UserRole::ClientUser] {
            assert!(ensure_client_scope(role, client, client).is_ok());
        }
    }

    #[test]
    fn cross_client_is_denied_for_non_super_admin() {
        let mine = Uuid::new_v4();
        let other = Uuid::new_v4();
        for role in [UserRole::Admin, UserRole::ClientUser] {
            let err = ensure_client_scope(role, mine, other).unwrap_err();
            assert!(matches!(err, AppError::AccessDenied));
        }
    }

    #[test]
    fn super_admin_has_no_client_restriction() {
        let mine = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(ensure_client_scope(UserRole::SuperAdmin, mine, other).is_ok());
    }

    #[test]
    fn effective_client_defaults_to_the_token() {
        let mine = Uuid::new_v4();
        assert_eq!(
            effective_client_id(UserRole::ClientUser, mine, None).unwrap(),
            mine
        );
    }

    #[test]
    fn requested_client_is_honored_only_for_super_admin() {
        let mine = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert_eq!(
            effective_client_id(UserRole::SuperAdmin, mine, Some(other)).unwrap(),
            other
        );

        let err = effective_client_id(UserRole::Admin, mine, Some(other)).unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));

        // Pedir o próprio tenant explicitamente continua válido
        assert_eq!(
            effective_client_id(UserRole::ClientUser, mine, Some(mine)).unwrap(),
            mine
        );
    }

    #[test]
    fn role_gates() {
        assert!(ensure_super_admin(UserRole::SuperAdmin).is_ok());
        assert!(ensure_super_admin(UserRole::Admin).is_err());
        assert!(ensure_admin(UserRole::Admin).is_ok());
        assert!(ensure_admin(UserRole::ClientUser).is_err());
    }
}
