// src/models/resident.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: Uuid,
    pub condominium_id: Uuid,
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[schema(example = "101")]
    pub apartment: String,
    #[schema(example = "A")]
    pub block: Option<String>,
    #[schema(example = "(11) 99999-1111")]
    pub phone: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// "A-101" quando há bloco, senão só o apartamento.
pub fn apartment_label(apartment: &str, block: Option<&str>) -> String {
    match block.map(str::trim).filter(|b| !b.is_empty()) {
        Some(block) => format!("{}-{}", block, apartment),
        None => apartment.to_string(),
    }
}

/// Linha válida da importação em lote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResident {
    pub name: String,
    pub apartment: String,
    pub block: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RejectedLine {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkImportResult {
    pub inserted: usize,
    pub rejected: Vec<RejectedLine>,
}
