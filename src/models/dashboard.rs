// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::condominium::CondominiumSummary;

// 1. Painel do condomínio (os cards do topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CondominiumDashboard {
    pub condominium: CondominiumSummary,
    pub employees: i64,
    pub residents: i64,
    pub deliveries_today: i64,
    pub pending: i64,
    pub picked_up: i64,
    /// Percentual retiradas / (retiradas + pendentes), arredondado
    pub pickup_rate: i64,
}

// 2. Visão geral do super administrador
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CondominiumOverview {
    pub condominium_id: Uuid,
    pub name: String,
    pub city: String,
    pub employees: i64,
    pub residents: i64,
    pub pending: i64,
    pub picked_up: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub condominiums: i64,
    pub employees: i64,
    pub residents: i64,
    pub deliveries: i64,
    pub per_condominium: Vec<CondominiumOverview>,
}

// 3. Totais do relatório filtrado
#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total: usize,
    pub pending: usize,
    pub picked_up: usize,
    pub cancelled: usize,
    pub reminders_sent: usize,
}

pub fn pickup_rate(picked_up: i64, pending: i64) -> i64 {
    let total = picked_up + pending;
    if total == 0 {
        return 0;
    }
    ((picked_up as f64 / total as f64) * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pickup_rate_rounds_and_handles_empty() {
        assert_eq!(pickup_rate(0, 0), 0);
        assert_eq!(pickup_rate(1, 2), 33);
        assert_eq!(pickup_rate(2, 1), 67);
        assert_eq!(pickup_rate(5, 0), 100);
    }
}
