// src/handlers/employees.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::{ActivePayload, SearchQuery},
    middleware::{
        rbac::{CondoAdmins, RequireRole},
        tenancy::CondominiumScope,
    },
    models::employee::{Employee, EmployeeRole},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    #[schema(example = "João da Portaria")]
    pub name: String,
    #[schema(example = "111.444.777-35")]
    pub cpf: String,
    #[validate(length(min = 3, message = "A senha deve ter no mínimo 3 caracteres"))]
    pub password: String,
    pub role: EmployeeRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub name: String,
    pub cpf: String,
    pub role: EmployeeRole,
    /// Em branco mantém a senha atual
    pub password: Option<String>,
}

// GET /api/employees
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Funcionários",
    params(
        SearchQuery,
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses((status = 200, description = "Funcionários do condomínio", body = Vec<Employee>)),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let employees = app_state
        .employee_service
        .list(scope.0, query.search.as_deref())
        .await?;

    Ok(Json(employees))
}

// POST /api/employees
#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Funcionários",
    request_body = CreateEmployeePayload,
    params(("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")),
    responses(
        (status = 201, description = "Funcionário criado", body = Employee),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CPF já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let employee = app_state
        .employee_service
        .create(scope.0, &payload.cpf, &payload.password, &payload.name, payload.role)
        .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

// PUT /api/employees/{id}
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Funcionários",
    request_body = UpdateEmployeePayload,
    params(
        ("id" = Uuid, Path, description = "ID do funcionário"),
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 200, description = "Funcionário atualizado", body = Employee),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let employee = app_state
        .employee_service
        .update(
            scope.0,
            id,
            &payload.cpf,
            &payload.name,
            payload.role,
            payload.password.as_deref(),
        )
        .await?;

    Ok(Json(employee))
}

// PATCH /api/employees/{id}/active
#[utoipa::path(
    patch,
    path = "/api/employees/{id}/active",
    tag = "Funcionários",
    request_body = ActivePayload,
    params(
        ("id" = Uuid, Path, description = "ID do funcionário"),
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses((status = 200, description = "Situação alterada", body = Employee)),
    security(("api_jwt" = []))
)]
pub async fn set_employee_active(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActivePayload>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state
        .employee_service
        .set_active(scope.0, id, payload.active)
        .await?;

    Ok(Json(employee))
}

// DELETE /api/employees/{id}
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Funcionários",
    params(
        ("id" = Uuid, Path, description = "ID do funcionário"),
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 204, description = "Funcionário excluído"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.employee_service.delete(scope.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
