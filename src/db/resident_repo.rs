// src/db/resident_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{like_pattern, stores::ResidentDirectory},
    models::resident::{NewResident, Resident},
};

#[derive(Clone)]
pub struct ResidentRepository {
    pool: PgPool,
}

impl ResidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        condominium_id: Uuid,
        resident: &NewResident,
    ) -> Result<Resident, AppError> {
        let created = sqlx::query_as::<_, Resident>(
            r#"
            INSERT INTO residents (condominium_id, name, apartment, block, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(condominium_id)
        .bind(&resident.name)
        .bind(&resident.apartment)
        .bind(&resident.block)
        .bind(&resident.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Importação em lote: tudo ou nada.
    pub async fn create_many(
        &self,
        condominium_id: Uuid,
        residents: &[NewResident],
    ) -> Result<usize, AppError> {
        if residents.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO residents (condominium_id, name, apartment, block, phone) ");
        qb.push_values(residents, |mut row, r| {
            row.push_bind(condominium_id)
                .push_bind(&r.name)
                .push_bind(&r.apartment)
                .push_bind(&r.block)
                .push_bind(&r.phone);
        });
        let result = qb.build().execute(&mut *tx).await?;

        tx.commit().await?;

        Ok(result.rows_affected() as usize)
    }

    pub async fn update(
        &self,
        condominium_id: Uuid,
        id: Uuid,
        resident: &NewResident,
        active: bool,
    ) -> Result<Option<Resident>, AppError> {
        let updated = sqlx::query_as::<_, Resident>(
            r#"
            UPDATE residents SET
                name = $3, apartment = $4, block = $5, phone = $6, active = $7,
                updated_at = now()
            WHERE condominium_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(condominium_id)
        .bind(id)
        .bind(&resident.name)
        .bind(&resident.apartment)
        .bind(&resident.block)
        .bind(&resident.phone)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, condominium_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM residents WHERE condominium_id = $1 AND id = $2")
            .bind(condominium_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(
        &self,
        condominium_id: Uuid,
        search: Option<&str>,
        active: Option<bool>,
    ) -> Result<Vec<Resident>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM residents WHERE condominium_id = ");
        qb.push_bind(condominium_id);

        if let Some(active) = active {
            qb.push(" AND active = ").push_bind(active);
        }

        if let Some(term) = search {
            let pattern = like_pattern(term);
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR apartment ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR COALESCE(block, '') ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR phone ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY block NULLS FIRST, apartment, name");

        let residents = qb
            .build_query_as::<Resident>()
            .fetch_all(&self.pool)
            .await?;

        Ok(residents)
    }
}

#[async_trait]
impl ResidentDirectory for ResidentRepository {
    async fn find_by_apartment(
        &self,
        condominium_id: Uuid,
        apartment: &str,
        block: Option<&str>,
    ) -> Result<Vec<Resident>, AppError> {
        let residents = sqlx::query_as::<_, Resident>(
            r#"
            SELECT * FROM residents
            WHERE condominium_id = $1
              AND active = TRUE
              AND apartment = $2
              AND ($3::text IS NULL OR LOWER(block) = LOWER($3))
            ORDER BY name
            "#,
        )
        .bind(condominium_id)
        .bind(apartment.trim())
        .bind(block.map(str::trim).filter(|b| !b.is_empty()))
        .fetch_all(&self.pool)
        .await?;

        Ok(residents)
    }

    async fn find_active(
        &self,
        condominium_id: Uuid,
        resident_id: Uuid,
    ) -> Result<Option<Resident>, AppError> {
        let resident = sqlx::query_as::<_, Resident>(
            "SELECT * FROM residents WHERE condominium_id = $1 AND id = $2 AND active = TRUE",
        )
        .bind(condominium_id)
        .bind(resident_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(resident)
    }
}
