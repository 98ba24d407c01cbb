// src/db/delivery_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::{like_pattern, stores::DeliveryStore},
    models::delivery::{
        Delivery, DeliveryDetail, DeliveryFilter, DeliveryStatus, NewDelivery, ReminderState,
    },
};

// Entrega + morador + funcionário + condomínio. O funcionário pode ser nulo
// (registrada por síndico ou super administrador).
const DETAIL_SELECT: &str = r#"
    SELECT
        d.*,
        r.name AS resident_name,
        r.apartment AS resident_apartment,
        r.block AS resident_block,
        r.phone AS resident_phone,
        e.name AS employee_name,
        c.name AS condominium_name
    FROM deliveries d
    JOIN residents r ON r.id = d.resident_id
    JOIN condominiums c ON c.id = d.condominium_id
    LEFT JOIN employees e ON e.id = d.employee_id
"#;

#[derive(Clone)]
pub struct DeliveryRepository {
    pool: PgPool,
}

impl DeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Traduz o filtro tipado em cláusulas WHERE (sempre presas ao condomínio).
fn push_filter(
    qb: &mut QueryBuilder<'_, Postgres>,
    condominium_id: Uuid,
    filter: &DeliveryFilter,
    now: DateTime<Utc>,
) {
    qb.push(" WHERE d.condominium_id = ").push_bind(condominium_id);

    if let Some(status) = filter.status {
        qb.push(" AND d.status = ").push_bind(status);
    }

    if let Some(from) = filter.date_from {
        qb.push(" AND d.arrived_at >= ").push_bind(start_of_day(from));
    }

    // Fim do período inclusivo: até o início do dia seguinte
    if let Some(to) = filter.date_to {
        qb.push(" AND d.arrived_at < ")
            .push_bind(start_of_day(to) + Duration::days(1));
    }

    if let Some(employee_id) = filter.employee_id {
        qb.push(" AND d.employee_id = ").push_bind(employee_id);
    }

    if let Some(resident_id) = filter.resident_id {
        qb.push(" AND d.resident_id = ").push_bind(resident_id);
    }

    match filter.reminder {
        Some(ReminderState::Sent) => {
            qb.push(" AND d.last_reminder_at IS NOT NULL");
        }
        Some(ReminderState::NotSent) => {
            qb.push(" AND d.last_reminder_at IS NULL AND d.status = ")
                .push_bind(DeliveryStatus::Pending);
        }
        None => {}
    }

    if let Some(days) = filter.min_days_pending {
        qb.push(" AND d.status = ")
            .push_bind(DeliveryStatus::Pending)
            .push(" AND d.arrived_at <= ")
            .push_bind(now - Duration::days(days.max(0)));
    }

    if let Some(term) = filter.search_term() {
        let pattern = like_pattern(term);
        qb.push(" AND (d.pickup_code ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR r.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR r.apartment ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR COALESCE(r.block, '') ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR COALESCE(e.name, '') ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl DeliveryStore for DeliveryRepository {
    async fn insert(&self, new_delivery: &NewDelivery) -> Result<Delivery, AppError> {
        sqlx::query_as::<_, Delivery>(
            r#"
            INSERT INTO deliveries (
                condominium_id, resident_id, employee_id, pickup_code, notes, photo_url
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new_delivery.condominium_id)
        .bind(new_delivery.resident_id)
        .bind(new_delivery.employee_id)
        .bind(&new_delivery.pickup_code)
        .bind(&new_delivery.notes)
        .bind(&new_delivery.photo_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Código de retirada já em uso."))
    }

    async fn detail(
        &self,
        condominium_id: Uuid,
        delivery_id: Uuid,
    ) -> Result<Option<DeliveryDetail>, AppError> {
        let sql = format!("{DETAIL_SELECT} WHERE d.condominium_id = $1 AND d.id = $2");
        let detail = sqlx::query_as::<_, DeliveryDetail>(&sql)
            .bind(condominium_id)
            .bind(delivery_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(detail)
    }

    async fn latest_by_code(
        &self,
        condominium_id: Uuid,
        code: &str,
    ) -> Result<Option<DeliveryDetail>, AppError> {
        let sql = format!(
            "{DETAIL_SELECT} WHERE d.condominium_id = $1 AND d.pickup_code = $2 \
             ORDER BY (d.status = 'pendente') DESC, d.arrived_at DESC LIMIT 1"
        );
        let detail = sqlx::query_as::<_, DeliveryDetail>(&sql)
            .bind(condominium_id)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(detail)
    }

    async fn confirm_pickup(
        &self,
        condominium_id: Uuid,
        code: &str,
        note: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<Option<Delivery>, AppError> {
        // Check-and-set em um único UPDATE: duas confirmações simultâneas não passam juntas
        let delivery = sqlx::query_as::<_, Delivery>(
            r#"
            UPDATE deliveries SET
                status = 'retirada',
                picked_up_at = $4,
                pickup_note = $3,
                updated_at = now()
            WHERE condominium_id = $1
              AND pickup_code = $2
              AND status = 'pendente'
            RETURNING *
            "#,
        )
        .bind(condominium_id)
        .bind(code)
        .bind(note)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(delivery)
    }

    async fn cancel(
        &self,
        condominium_id: Uuid,
        delivery_id: Uuid,
    ) -> Result<Option<Delivery>, AppError> {
        let delivery = sqlx::query_as::<_, Delivery>(
            r#"
            UPDATE deliveries SET status = 'cancelada', updated_at = now()
            WHERE condominium_id = $1 AND id = $2 AND status = 'pendente'
            RETURNING *
            "#,
        )
        .bind(condominium_id)
        .bind(delivery_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(delivery)
    }

    async fn mark_message_sent(&self, delivery_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE deliveries SET message_sent = TRUE, updated_at = now() WHERE id = $1")
            .bind(delivery_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn mark_reminder_sent(
        &self,
        delivery_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE deliveries SET last_reminder_at = $2, updated_at = now() WHERE id = $1",
        )
        .bind(delivery_id)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(
        &self,
        condominium_id: Uuid,
        filter: &DeliveryFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<DeliveryDetail>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(DETAIL_SELECT);
        push_filter(&mut qb, condominium_id, filter, now);
        qb.push(" ORDER BY d.arrived_at DESC");

        let deliveries = qb
            .build_query_as::<DeliveryDetail>()
            .fetch_all(&self.pool)
            .await?;

        Ok(deliveries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_always_scopes_by_condominium_and_binds_search() {
        let filter = DeliveryFilter {
            search: Some("  maria ".into()),
            reminder: Some(ReminderState::NotSent),
            ..DeliveryFilter::default()
        };
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(DETAIL_SELECT);
        push_filter(&mut qb, Uuid::new_v4(), &filter, Utc::now());
        let sql = qb.sql().to_string();

        assert!(sql.contains("WHERE d.condominium_id = $1"));
        assert!(sql.contains("d.last_reminder_at IS NULL AND d.status = $2"));
        assert!(sql.contains("d.pickup_code ILIKE $3"));
        assert!(sql.contains("COALESCE(e.name, '') ILIKE $7"));
    }

    #[test]
    fn date_range_is_inclusive_of_the_last_day() {
        let to = NaiveDate::from_ymd_opt(2025, 3, 10).expect("data válida");
        assert_eq!(
            start_of_day(to) + Duration::days(1),
            NaiveDate::from_ymd_opt(2025, 3, 11)
                .expect("data válida")
                .and_hms_opt(0, 0, 0)
                .expect("hora válida")
                .and_utc()
        );
    }
}
