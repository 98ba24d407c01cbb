// src/db/employee_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::like_pattern,
    models::employee::{Employee, EmployeeRole},
};

// O repositório de funcionários, sempre filtrado pelo condomínio
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        condominium_id: Uuid,
        cpf: &str,
        password_hash: &str,
        name: &str,
        role: EmployeeRole,
    ) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (condominium_id, cpf, password_hash, name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(condominium_id)
        .bind(cpf)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe um funcionário com este CPF."))
    }

    /// Edição; a senha só muda quando um novo hash é informado.
    pub async fn update(
        &self,
        condominium_id: Uuid,
        id: Uuid,
        cpf: &str,
        name: &str,
        role: EmployeeRole,
        password_hash: Option<&str>,
    ) -> Result<Option<Employee>, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                cpf = $3, name = $4, role = $5,
                password_hash = COALESCE($6, password_hash),
                updated_at = now()
            WHERE condominium_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(condominium_id)
        .bind(id)
        .bind(cpf)
        .bind(name)
        .bind(role)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe um funcionário com este CPF."))
    }

    pub async fn set_active(
        &self,
        condominium_id: Uuid,
        id: Uuid,
        active: bool,
    ) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET active = $3, updated_at = now()
            WHERE condominium_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(condominium_id)
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn delete(&self, condominium_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE condominium_id = $1 AND id = $2")
            .bind(condominium_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    pub async fn find_active_by_cpf(&self, cpf: &str) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE cpf = $1 AND active = TRUE",
        )
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Lista com busca por nome, CPF ou cargo (sem diferenciar maiúsculas).
    pub async fn list(
        &self,
        condominium_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<Employee>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM employees WHERE condominium_id = ");
        qb.push_bind(condominium_id);

        if let Some(term) = search {
            let pattern = like_pattern(term);
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR cpf ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR role::text ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY name ASC");

        let employees = qb
            .build_query_as::<Employee>()
            .fetch_all(&self.pool)
            .await?;

        Ok(employees)
    }
}
