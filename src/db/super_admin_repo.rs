// src/db/super_admin_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::super_admin::SuperAdmin,
};

#[derive(Clone)]
pub struct SuperAdminRepository {
    pool: PgPool,
}

impl SuperAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        cpf: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<SuperAdmin, AppError> {
        sqlx::query_as::<_, SuperAdmin>(
            r#"
            INSERT INTO super_admins (cpf, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(cpf)
        .bind(password_hash)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe um super administrador com este CPF."))
    }

    pub async fn list(&self) -> Result<Vec<SuperAdmin>, AppError> {
        let admins = sqlx::query_as::<_, SuperAdmin>("SELECT * FROM super_admins ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(admins)
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<SuperAdmin>, AppError> {
        let admin = sqlx::query_as::<_, SuperAdmin>(
            "UPDATE super_admins SET active = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SuperAdmin>, AppError> {
        let admin = sqlx::query_as::<_, SuperAdmin>("SELECT * FROM super_admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn find_active_by_cpf(&self, cpf: &str) -> Result<Option<SuperAdmin>, AppError> {
        let admin = sqlx::query_as::<_, SuperAdmin>(
            "SELECT * FROM super_admins WHERE cpf = $1 AND active = TRUE",
        )
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }
}
