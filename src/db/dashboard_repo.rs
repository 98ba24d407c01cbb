// src/db/dashboard_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::{common::error::AppError, models::dashboard::CondominiumOverview};

/// Contadores brutos do painel do condomínio.
#[derive(Debug, Default)]
pub struct CondominiumCounts {
    pub employees: i64,
    pub residents: i64,
    pub deliveries_today: i64,
    pub pending: i64,
    pub picked_up: i64,
}

#[derive(Debug, Default)]
pub struct GlobalCounts {
    pub condominiums: i64,
    pub employees: i64,
    pub residents: i64,
    pub deliveries: i64,
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Resumo do condomínio (um snapshot só, dentro de uma transação)
    pub async fn condominium_counts(
        &self,
        condominium_id: Uuid,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<CondominiumCounts, AppError> {
        let mut tx = self.pool.begin().await?;

        let employees: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE condominium_id = $1")
                .bind(condominium_id)
                .fetch_one(&mut *tx)
                .await?;

        let residents: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM residents WHERE condominium_id = $1")
                .bind(condominium_id)
                .fetch_one(&mut *tx)
                .await?;

        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE arrived_at >= $2 AND arrived_at < $3) AS today,
                COUNT(*) FILTER (WHERE status = 'pendente') AS pending,
                COUNT(*) FILTER (WHERE status = 'retirada') AS picked_up
            FROM deliveries
            WHERE condominium_id = $1
            "#,
        )
        .bind(condominium_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CondominiumCounts {
            employees,
            residents,
            deliveries_today: row.try_get("today")?,
            pending: row.try_get("pending")?,
            picked_up: row.try_get("picked_up")?,
        })
    }

    // 2. Visão geral do super administrador
    pub async fn global_counts(&self) -> Result<GlobalCounts, AppError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM condominiums) AS condominiums,
                (SELECT COUNT(*) FROM employees) AS employees,
                (SELECT COUNT(*) FROM residents) AS residents,
                (SELECT COUNT(*) FROM deliveries) AS deliveries
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(GlobalCounts {
            condominiums: row.try_get("condominiums")?,
            employees: row.try_get("employees")?,
            residents: row.try_get("residents")?,
            deliveries: row.try_get("deliveries")?,
        })
    }

    pub async fn per_condominium(&self) -> Result<Vec<CondominiumOverview>, AppError> {
        let rows = sqlx::query_as::<_, CondominiumOverview>(
            r#"
            SELECT
                c.id AS condominium_id,
                c.name,
                c.city,
                (SELECT COUNT(*) FROM employees e WHERE e.condominium_id = c.id) AS employees,
                (SELECT COUNT(*) FROM residents r WHERE r.condominium_id = c.id) AS residents,
                (SELECT COUNT(*) FROM deliveries d
                    WHERE d.condominium_id = c.id AND d.status = 'pendente') AS pending,
                (SELECT COUNT(*) FROM deliveries d
                    WHERE d.condominium_id = c.id AND d.status = 'retirada') AS picked_up
            FROM condominiums c
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
