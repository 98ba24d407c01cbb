// src/services/employee_service.rs

use uuid::Uuid;

use crate::{
    common::{cpf::Cpf, error::AppError},
    db::EmployeeRepository,
    models::employee::{Employee, EmployeeRole},
    services::auth::{checked_password, hash_password},
};

fn checked_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("O nome é obrigatório.".into()));
    }
    Ok(name)
}

#[derive(Clone)]
pub struct EmployeeService {
    repo: EmployeeRepository,
}

impl EmployeeService {
    pub fn new(repo: EmployeeRepository) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        condominium_id: Uuid,
        cpf: &str,
        password: &str,
        name: &str,
        role: EmployeeRole,
    ) -> Result<Employee, AppError> {
        let cpf = Cpf::parse(cpf)?;
        let name = checked_name(name)?;
        let password_hash = hash_password(checked_password(password)?).await?;

        let employee = self
            .repo
            .create(condominium_id, cpf.as_str(), &password_hash, name, role)
            .await?;
        tracing::info!("👷 Funcionário {} cadastrado como {:?}", employee.name, employee.role);
        Ok(employee)
    }

    /// A senha só é trocada quando informada.
    pub async fn update(
        &self,
        condominium_id: Uuid,
        id: Uuid,
        cpf: &str,
        name: &str,
        role: EmployeeRole,
        password: Option<&str>,
    ) -> Result<Employee, AppError> {
        let cpf = Cpf::parse(cpf)?;
        let name = checked_name(name)?;
        let password_hash = match password.filter(|p| !p.trim().is_empty()) {
            Some(p) => Some(hash_password(checked_password(p)?).await?),
            None => None,
        };

        self.repo
            .update(condominium_id, id, cpf.as_str(), name, role, password_hash.as_deref())
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Funcionário".into()))
    }

    pub async fn set_active(
        &self,
        condominium_id: Uuid,
        id: Uuid,
        active: bool,
    ) -> Result<Employee, AppError> {
        self.repo
            .set_active(condominium_id, id, active)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Funcionário".into()))
    }

    pub async fn delete(&self, condominium_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(condominium_id, id).await? {
            return Err(AppError::ResourceNotFound("Funcionário".into()));
        }
        Ok(())
    }

    pub async fn list(
        &self,
        condominium_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Employee>, AppError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repo.list(condominium_id, search).await
    }
}
