// src/db/stores.rs
//
// Contratos de persistência usados pelos serviços de autenticação e de entregas.
// As implementações Postgres ficam nos repositórios; os testes usam versões em memória.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        condominium::Condominium,
        delivery::{Delivery, DeliveryDetail, DeliveryFilter, NewDelivery},
        employee::Employee,
        resident::Resident,
        super_admin::SuperAdmin,
    },
};

/// Consultas necessárias para resolver credenciais e revalidar sessões.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn active_super_admin_by_cpf(&self, cpf: &str) -> Result<Option<SuperAdmin>, AppError>;

    async fn active_employee_by_cpf(&self, cpf: &str) -> Result<Option<Employee>, AppError>;

    /// Um mesmo síndico pode administrar mais de um condomínio.
    async fn condominiums_by_syndic_cpf(&self, cpf: &str) -> Result<Vec<Condominium>, AppError>;

    async fn super_admin_by_id(&self, id: Uuid) -> Result<Option<SuperAdmin>, AppError>;

    async fn employee_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError>;

    async fn condominium_by_id(&self, id: Uuid) -> Result<Option<Condominium>, AppError>;
}

/// Busca de moradores para o cadastro de entregas.
#[async_trait]
pub trait ResidentDirectory: Send + Sync {
    /// Moradores ativos do apartamento; bloco só filtra quando informado.
    async fn find_by_apartment(
        &self,
        condominium_id: Uuid,
        apartment: &str,
        block: Option<&str>,
    ) -> Result<Vec<Resident>, AppError>;

    async fn find_active(
        &self,
        condominium_id: Uuid,
        resident_id: Uuid,
    ) -> Result<Option<Resident>, AppError>;
}

#[async_trait]
pub trait DeliveryStore: Send + Sync {
    /// Falha com `UniqueConstraintViolation` se o código já estiver em uma entrega pendente.
    async fn insert(&self, new_delivery: &NewDelivery) -> Result<Delivery, AppError>;

    async fn detail(
        &self,
        condominium_id: Uuid,
        delivery_id: Uuid,
    ) -> Result<Option<DeliveryDetail>, AppError>;

    /// A entrega pendente com o código, ou a mais recente com ele se não houver pendente.
    async fn latest_by_code(
        &self,
        condominium_id: Uuid,
        code: &str,
    ) -> Result<Option<DeliveryDetail>, AppError>;

    /// Update condicional: só altera se ainda estiver pendente. `None` = nada alterado.
    async fn confirm_pickup(
        &self,
        condominium_id: Uuid,
        code: &str,
        note: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<Option<Delivery>, AppError>;

    /// pendente -> cancelada. `None` = não estava pendente (ou não existe).
    async fn cancel(
        &self,
        condominium_id: Uuid,
        delivery_id: Uuid,
    ) -> Result<Option<Delivery>, AppError>;

    async fn mark_message_sent(&self, delivery_id: Uuid) -> Result<(), AppError>;

    async fn mark_reminder_sent(&self, delivery_id: Uuid, at: DateTime<Utc>)
    -> Result<(), AppError>;

    async fn list(
        &self,
        condominium_id: Uuid,
        filter: &DeliveryFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<DeliveryDetail>, AppError>;
}
