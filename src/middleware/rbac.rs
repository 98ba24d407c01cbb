// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Role, Session},
};

/// 1. O Trait que define um conjunto de papéis autorizados
pub trait RoleSet: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
    fn description() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<R>(pub Session, PhantomData<R>);

impl<R> RequireRole<R> {
    pub fn session(&self) -> &Session {
        &self.0
    }
}

// 3. Implementação do FromRequestParts
impl<R, S> FromRequestParts<S> for RequireRole<R>
where
    R: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        if !R::allows(session.role) {
            return Err(AppError::Forbidden(format!(
                "Acesso restrito a {}.",
                R::description()
            )));
        }

        Ok(RequireRole(session, PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

/// Qualquer usuário autenticado (portaria, zeladoria, administração).
pub struct AnyStaff;
impl RoleSet for AnyStaff {
    fn allows(_role: Role) -> bool { true }
    fn description() -> &'static str { "funcionários" }
}

/// Administrador, síndico ou super administrador.
pub struct CondoAdmins;
impl RoleSet for CondoAdmins {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Administrator | Role::Syndic | Role::SuperAdministrator)
    }
    fn description() -> &'static str { "administradores do condomínio" }
}

pub struct SuperAdminOnly;
impl RoleSet for SuperAdminOnly {
    fn allows(role: Role) -> bool { role == Role::SuperAdministrator }
    fn description() -> &'static str { "super administradores" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Doorman, true, false, false)]
    #[case(Role::Caretaker, true, false, false)]
    #[case(Role::Administrator, true, true, false)]
    #[case(Role::Syndic, true, true, false)]
    #[case(Role::SuperAdministrator, true, true, true)]
    fn role_sets(
        #[case] role: Role,
        #[case] staff: bool,
        #[case] admins: bool,
        #[case] super_admin: bool,
    ) {
        assert_eq!(AnyStaff::allows(role), staff);
        assert_eq!(CondoAdmins::allows(role), admins);
        assert_eq!(SuperAdminOnly::allows(role), super_admin);
    }
}
