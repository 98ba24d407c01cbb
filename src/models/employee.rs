// src/models/employee.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "employee_role")]
pub enum EmployeeRole {
    #[serde(rename = "porteiro")]
    #[sqlx(rename = "porteiro")]
    Doorman,
    #[serde(rename = "zelador")]
    #[sqlx(rename = "zelador")]
    Caretaker,
    #[serde(rename = "administrador")]
    #[sqlx(rename = "administrador")]
    Administrator,
    #[serde(rename = "sindico")]
    #[sqlx(rename = "sindico")]
    Syndic,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub condominium_id: Uuid,
    #[schema(example = "11144477735")]
    pub cpf: String,
    #[serde(skip)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,
    #[schema(example = "João da Portaria")]
    pub name: String,
    pub role: EmployeeRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
