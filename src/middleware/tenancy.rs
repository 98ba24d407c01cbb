// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Session};

// Cabeçalho usado pelo super administrador para escolher o condomínio
pub const CONDOMINIUM_ID_HEADER: &str = "x-condominium-id";

/// Condomínio em que a requisição atua.
///
/// Funcionários e síndicos ficam presos ao condomínio da sessão; o super
/// administrador precisa informar `x-condominium-id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CondominiumScope(pub Uuid);

impl CondominiumScope {
    pub fn resolve(session: &Session, header: Option<&str>) -> Result<Self, AppError> {
        if let Some(condominium_id) = session.condominium_id {
            return Ok(CondominiumScope(condominium_id));
        }

        if !session.is_super_admin() {
            return Err(AppError::Forbidden("Usuário sem condomínio vinculado.".into()));
        }

        let raw = header.ok_or_else(|| {
            AppError::BadRequest("O cabeçalho X-Condominium-ID é obrigatório.".into())
        })?;
        let condominium_id = Uuid::parse_str(raw.trim()).map_err(|_| {
            AppError::BadRequest("Cabeçalho X-Condominium-ID inválido (não é um UUID).".into())
        })?;

        Ok(CondominiumScope(condominium_id))
    }
}

impl<S> FromRequestParts<S> for CondominiumScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or(AppError::InvalidToken)?;

        let header = match parts.headers.get(CONDOMINIUM_ID_HEADER) {
            Some(value) => Some(value.to_str().map_err(|_| {
                AppError::BadRequest("Cabeçalho X-Condominium-ID contém caracteres inválidos.".into())
            })?),
            None => None,
        };

        CondominiumScope::resolve(session, header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    fn session(role: Role, condominium_id: Option<Uuid>) -> Session {
        Session {
            subject_id: Uuid::new_v4(),
            name: "Teste".into(),
            role,
            condominium_id,
        }
    }

    #[test]
    fn staff_is_pinned_to_session_condominium() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4().to_string();

        let scope = CondominiumScope::resolve(&session(Role::Doorman, Some(own)), Some(&other))
            .expect("escopo");
        assert_eq!(scope, CondominiumScope(own));
    }

    #[test]
    fn super_admin_picks_condominium_by_header() {
        let target = Uuid::new_v4();
        let admin = session(Role::SuperAdministrator, None);

        let scope = CondominiumScope::resolve(&admin, Some(&target.to_string())).expect("escopo");
        assert_eq!(scope, CondominiumScope(target));

        assert!(matches!(
            CondominiumScope::resolve(&admin, None),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            CondominiumScope::resolve(&admin, Some("abc")),
            Err(AppError::BadRequest(_))
        ));
    }
}
