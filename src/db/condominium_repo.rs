// src/db/condominium_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{common::error::AppError, db::like_pattern, models::condominium::Condominium};

/// Campos gravados na criação e na edição (senha do síndico já em hash).
#[derive(Debug, Clone)]
pub struct CondominiumFields {
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: Option<String>,
    pub syndic_name: Option<String>,
    pub syndic_cpf: Option<String>,
    pub syndic_phone: Option<String>,
}

#[derive(Clone)]
pub struct CondominiumRepository {
    pool: PgPool,
}

impl CondominiumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        fields: &CondominiumFields,
        syndic_password_hash: Option<&str>,
    ) -> Result<Condominium, AppError> {
        let condominium = sqlx::query_as::<_, Condominium>(
            r#"
            INSERT INTO condominiums (
                name, address, city, postal_code, phone,
                syndic_name, syndic_cpf, syndic_password_hash, syndic_phone
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.postal_code)
        .bind(&fields.phone)
        .bind(&fields.syndic_name)
        .bind(&fields.syndic_cpf)
        .bind(syndic_password_hash)
        .bind(&fields.syndic_phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(condominium)
    }

    /// Atualiza os dados; sem hash novo a senha do síndico é mantida,
    /// a menos que o CPF do síndico mude (aí ela é apagada).
    pub async fn update(
        &self,
        id: Uuid,
        fields: &CondominiumFields,
        syndic_password_hash: Option<&str>,
    ) -> Result<Option<Condominium>, AppError> {
        let condominium = sqlx::query_as::<_, Condominium>(
            r#"
            UPDATE condominiums SET
                name = $2, address = $3, city = $4, postal_code = $5, phone = $6,
                syndic_name = $7, syndic_cpf = $8,
                syndic_password_hash = CASE
                    WHEN $9::text IS NOT NULL THEN $9
                    WHEN syndic_cpf IS DISTINCT FROM $8 THEN NULL
                    ELSE syndic_password_hash
                END,
                syndic_phone = $10,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.postal_code)
        .bind(&fields.phone)
        .bind(&fields.syndic_name)
        .bind(&fields.syndic_cpf)
        .bind(syndic_password_hash)
        .bind(&fields.syndic_phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(condominium)
    }

    /// Remove o condomínio; funcionários, moradores e entregas saem junto (ON DELETE CASCADE).
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM condominiums WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Condominium>, AppError> {
        let condominium =
            sqlx::query_as::<_, Condominium>("SELECT * FROM condominiums WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(condominium)
    }

    pub async fn find_by_syndic_cpf(&self, cpf: &str) -> Result<Vec<Condominium>, AppError> {
        let condominiums = sqlx::query_as::<_, Condominium>(
            r#"
            SELECT * FROM condominiums
            WHERE syndic_cpf = $1 AND syndic_password_hash IS NOT NULL
            ORDER BY name ASC
            "#,
        )
        .bind(cpf)
        .fetch_all(&self.pool)
        .await?;

        Ok(condominiums)
    }

    /// Lista com busca opcional por nome, cidade ou endereço.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Condominium>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM condominiums");

        if let Some(term) = search {
            let pattern = like_pattern(term);
            qb.push(" WHERE (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR city ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR address ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY name ASC");

        let condominiums = qb
            .build_query_as::<Condominium>()
            .fetch_all(&self.pool)
            .await?;

        Ok(condominiums)
    }
}
