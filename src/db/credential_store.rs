// src/db/credential_store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{stores::CredentialStore, CondominiumRepository, EmployeeRepository, SuperAdminRepository},
    models::{condominium::Condominium, employee::Employee, super_admin::SuperAdmin},
};

/// Junta os três repositórios consultados no login.
#[derive(Clone)]
pub struct PgCredentialStore {
    super_admins: SuperAdminRepository,
    employees: EmployeeRepository,
    condominiums: CondominiumRepository,
}

impl PgCredentialStore {
    pub fn new(
        super_admins: SuperAdminRepository,
        employees: EmployeeRepository,
        condominiums: CondominiumRepository,
    ) -> Self {
        Self { super_admins, employees, condominiums }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn active_super_admin_by_cpf(&self, cpf: &str) -> Result<Option<SuperAdmin>, AppError> {
        self.super_admins.find_active_by_cpf(cpf).await
    }

    async fn active_employee_by_cpf(&self, cpf: &str) -> Result<Option<Employee>, AppError> {
        self.employees.find_active_by_cpf(cpf).await
    }

    async fn condominiums_by_syndic_cpf(&self, cpf: &str) -> Result<Vec<Condominium>, AppError> {
        self.condominiums.find_by_syndic_cpf(cpf).await
    }

    async fn super_admin_by_id(&self, id: Uuid) -> Result<Option<SuperAdmin>, AppError> {
        self.super_admins.find_by_id(id).await
    }

    async fn employee_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        self.employees.find_by_id(id).await
    }

    async fn condominium_by_id(&self, id: Uuid) -> Result<Option<Condominium>, AppError> {
        self.condominiums.find_by_id(id).await
    }
}
