// src/models/delivery.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::resident::apartment_label;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "delivery_status")]
pub enum DeliveryStatus {
    #[serde(rename = "pendente")]
    #[sqlx(rename = "pendente")]
    Pending,
    #[serde(rename = "retirada")]
    #[sqlx(rename = "retirada")]
    PickedUp,
    #[serde(rename = "cancelada")]
    #[sqlx(rename = "cancelada")]
    Cancelled,
}

impl DeliveryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "Pendente",
            DeliveryStatus::PickedUp => "Retirada",
            DeliveryStatus::Cancelled => "Cancelada",
        }
    }
}

// ---
// Entrega (uma encomenda para um morador)
// ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: Uuid,
    pub condominium_id: Uuid,
    pub resident_id: Uuid,
    pub employee_id: Option<Uuid>,
    #[schema(example = "48213")]
    pub pickup_code: String,
    pub status: DeliveryStatus,
    pub arrived_at: DateTime<Utc>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub pickup_note: Option<String>,
    pub photo_url: Option<String>,
    pub last_reminder_at: Option<DateTime<Utc>>,
    pub message_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entrega com os dados do morador, funcionário e condomínio (JOIN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub delivery: Delivery,
    pub resident_name: String,
    pub resident_apartment: String,
    pub resident_block: Option<String>,
    pub resident_phone: String,
    pub employee_name: Option<String>,
    pub condominium_name: String,
}

impl DeliveryDetail {
    pub fn apartment_label(&self) -> String {
        apartment_label(&self.resident_apartment, self.resident_block.as_deref())
    }

    /// Dias completos desde a chegada na portaria.
    pub fn days_pending(&self, now: DateTime<Utc>) -> i64 {
        (now - self.delivery.arrived_at).num_days().max(0)
    }
}

/// Dados para inserir uma nova entrega.
#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub condominium_id: Uuid,
    pub resident_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub pickup_code: String,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub enum ReminderState {
    #[serde(rename = "enviado")]
    Sent,
    #[serde(rename = "nao_enviado")]
    NotSent,
}

// ---
// Filtros tipados (montados em SQL no repositório)
// ---
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeliveryFilter {
    pub status: Option<DeliveryStatus>,
    /// Início do período (inclusivo), pela data de chegada
    pub date_from: Option<NaiveDate>,
    /// Fim do período (inclusivo)
    pub date_to: Option<NaiveDate>,
    /// Código, morador, apartamento, bloco ou funcionário
    pub search: Option<String>,
    pub employee_id: Option<Uuid>,
    pub resident_id: Option<Uuid>,
    pub reminder: Option<ReminderState>,
    /// Apenas entregas pendentes há pelo menos N dias
    pub min_days_pending: Option<i64>,
}

impl DeliveryFilter {
    pub fn pending() -> Self {
        Self {
            status: Some(DeliveryStatus::Pending),
            ..Self::default()
        }
    }

    /// Termo de busca normalizado (sem espaços nas pontas, vazio vira None).
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
