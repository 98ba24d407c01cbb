// src/services/super_admin_service.rs

use uuid::Uuid;

use crate::{
    common::{cpf::Cpf, error::AppError},
    db::SuperAdminRepository,
    models::super_admin::SuperAdmin,
    services::auth::{checked_password, hash_password},
};

#[derive(Clone)]
pub struct SuperAdminService {
    repo: SuperAdminRepository,
}

impl SuperAdminService {
    pub fn new(repo: SuperAdminRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<SuperAdmin>, AppError> {
        self.repo.list().await
    }

    pub async fn create(&self, cpf: &str, password: &str, name: &str) -> Result<SuperAdmin, AppError> {
        let cpf = Cpf::parse(cpf)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("O nome é obrigatório.".into()));
        }
        let password_hash = hash_password(checked_password(password)?).await?;

        let admin = self.repo.create(cpf.as_str(), &password_hash, name).await?;
        tracing::info!("🛡️ Super administrador {} cadastrado", admin.name);
        Ok(admin)
    }

    /// Um super administrador não pode desativar a própria conta.
    pub async fn set_active(
        &self,
        requester_id: Uuid,
        id: Uuid,
        active: bool,
    ) -> Result<SuperAdmin, AppError> {
        if !active && requester_id == id {
            return Err(AppError::BadRequest(
                "Você não pode desativar o próprio acesso.".into(),
            ));
        }

        self.repo
            .set_active(id, active)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Super administrador".into()))
    }
}
