// src/handlers/super_admins.rs

use axum::{
    extract::{Path, State},
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
    handlers::ActivePayload,
    middleware::rbac::{RequireRole, SuperAdminOnly},
    models::super_admin::SuperAdmin,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSuperAdminPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub name: String,
    #[schema(example = "111.444.777-35")]
    pub cpf: String,
    #[validate(length(min = 3, message = "A senha deve ter no mínimo 3 caracteres"))]
    pub password: String,
}

// GET /api/super-admins
#[utoipa::path(
    get,
    path = "/api/super-admins",
    tag = "Super administradores",
    responses((status = 200, description = "Super administradores", body = Vec<SuperAdmin>)),
    security(("api_jwt" = []))
)]
pub async fn list_super_admins(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    let admins = app_state.super_admin_service.list().await?;
    Ok(Json(admins))
}

// POST /api/super-admins
#[utoipa::path(
    post,
    path = "/api/super-admins",
    tag = "Super administradores",
    request_body = CreateSuperAdminPayload,
    responses(
        (status = 201, description = "Super administrador criado", body = SuperAdmin),
        (status = 409, description = "CPF já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_super_admin(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
    Json(payload): Json<CreateSuperAdminPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let admin = app_state
        .super_admin_service
        .create(&payload.cpf, &payload.password, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(admin)))
}

// PATCH /api/super-admins/{id}/active
#[utoipa::path(
    patch,
    path = "/api/super-admins/{id}/active",
    tag = "Super administradores",
    request_body = ActivePayload,
    params(("id" = Uuid, Path, description = "ID do super administrador")),
    responses(
        (status = 200, description = "Situação alterada", body = SuperAdmin),
        (status = 400, description = "Tentativa de desativar a própria conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_super_admin_active(
    State(app_state): State<AppState>,
    guard: RequireRole<SuperAdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActivePayload>,
) -> Result<impl IntoResponse, AppError> {
    let admin = app_state
        .super_admin_service
        .set_active(guard.session().subject_id, id, payload.active)
        .await?;

    Ok(Json(admin))
}
