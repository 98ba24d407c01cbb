// src/models/condominium.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condominium {
    pub id: Uuid,
    #[schema(example = "Residencial das Flores")]
    pub name: String,
    pub address: String,
    pub city: String,
    #[schema(example = "01310-100")]
    pub postal_code: String,
    pub phone: Option<String>,
    pub syndic_name: Option<String>,
    pub syndic_cpf: Option<String>,
    #[serde(skip)] // Nunca sai na API
    #[schema(ignore)]
    pub syndic_password_hash: Option<String>,
    pub syndic_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Versão enxuta devolvida no login e nas mensagens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CondominiumSummary {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: Option<String>,
}

impl From<&Condominium> for CondominiumSummary {
    fn from(c: &Condominium) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            address: c.address.clone(),
            city: c.city.clone(),
            phone: c.phone.clone(),
        }
    }
}
