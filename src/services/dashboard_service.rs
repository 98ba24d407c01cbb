// src/services/dashboard_service.rs

use chrono::{DateTime, Duration, NaiveTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CondominiumRepository, DashboardRepository},
    models::{
        condominium::CondominiumSummary,
        dashboard::{pickup_rate, AdminOverview, CondominiumDashboard},
    },
    services::messages::brasilia,
};

/// Início e fim (exclusivo) do dia corrente no horário de Brasília, em UTC.
pub fn local_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let offset = brasilia();
    let local_midnight = now.with_timezone(&offset).date_naive().and_time(NaiveTime::MIN);
    let start = (local_midnight - Duration::seconds(offset.local_minus_utc() as i64)).and_utc();
    (start, start + Duration::days(1))
}

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    condominiums: CondominiumRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, condominiums: CondominiumRepository) -> Self {
        Self { repo, condominiums }
    }

    pub async fn condominium(&self, condominium_id: Uuid) -> Result<CondominiumDashboard, AppError> {
        let condominium = self
            .condominiums
            .find_by_id(condominium_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Condomínio".into()))?;

        let (day_start, day_end) = local_day_bounds(Utc::now());
        let counts = self.repo.condominium_counts(condominium_id, day_start, day_end).await?;

        Ok(CondominiumDashboard {
            condominium: CondominiumSummary::from(&condominium),
            employees: counts.employees,
            residents: counts.residents,
            deliveries_today: counts.deliveries_today,
            pending: counts.pending,
            picked_up: counts.picked_up,
            pickup_rate: pickup_rate(counts.picked_up, counts.pending),
        })
    }

    pub async fn admin_overview(&self) -> Result<AdminOverview, AppError> {
        let totals = self.repo.global_counts().await?;
        let per_condominium = self.repo.per_condominium().await?;

        Ok(AdminOverview {
            condominiums: totals.condominiums,
            employees: totals.employees,
            residents: totals.residents,
            deliveries: totals.deliveries,
            per_condominium,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_bounds_follow_brasilia_midnight() {
        // 01:30 UTC de 11/03 ainda é 10/03 em Brasília
        let now = Utc.with_ymd_and_hms(2025, 3, 11, 1, 30, 0).single().expect("data");
        let (start, end) = local_day_bounds(now);

        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 10, 3, 0, 0).single().expect("data"));
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 11, 3, 0, 0).single().expect("data"));
    }
}
