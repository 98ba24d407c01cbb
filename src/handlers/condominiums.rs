// src/handlers/condominiums.rs

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
    db::condominium_repo::CondominiumFields,
    handlers::SearchQuery,
    middleware::{
        rbac::{AnyStaff, RequireRole, SuperAdminOnly},
        tenancy::CondominiumScope,
    },
    models::condominium::Condominium,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CondominiumPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    #[schema(example = "Residencial das Flores")]
    pub name: String,
    #[validate(length(min = 1, message = "O endereço é obrigatório"))]
    pub address: String,
    #[validate(length(min = 1, message = "A cidade é obrigatória"))]
    pub city: String,
    #[validate(length(min = 1, message = "O CEP é obrigatório"))]
    #[schema(example = "01310-100")]
    pub postal_code: String,
    pub phone: Option<String>,
    pub syndic_name: Option<String>,
    #[schema(example = "529.982.247-25")]
    pub syndic_cpf: Option<String>,
    /// Em branco na edição mantém a senha atual
    pub syndic_password: Option<String>,
    pub syndic_phone: Option<String>,
}

impl CondominiumPayload {
    fn into_parts(self) -> (CondominiumFields, Option<String>) {
        let fields = CondominiumFields {
            name: self.name,
            address: self.address,
            city: self.city,
            postal_code: self.postal_code,
            phone: self.phone,
            syndic_name: self.syndic_name,
            syndic_cpf: self.syndic_cpf,
            syndic_phone: self.syndic_phone,
        };
        (fields, self.syndic_password)
    }
}

// GET /api/condominiums
#[utoipa::path(
    get,
    path = "/api/condominiums",
    tag = "Condomínios",
    params(SearchQuery),
    responses(
        (status = 200, description = "Lista de condomínios", body = Vec<Condominium>),
        (status = 403, description = "Apenas super administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_condominiums(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let condominiums = app_state
        .condominium_service
        .list(query.search.as_deref())
        .await?;

    Ok(Json(condominiums))
}

// POST /api/condominiums
#[utoipa::path(
    post,
    path = "/api/condominiums",
    tag = "Condomínios",
    request_body = CondominiumPayload,
    responses(
        (status = 201, description = "Condomínio criado", body = Condominium),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_condominium(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
    Json(payload): Json<CondominiumPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let (fields, syndic_password) = payload.into_parts();

    let condominium = app_state
        .condominium_service
        .create(fields, syndic_password.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(condominium)))
}

// GET /api/condominiums/current
#[utoipa::path(
    get,
    path = "/api/condominiums/current",
    tag = "Condomínios",
    responses(
        (status = 200, description = "Condomínio da sessão", body = Condominium),
        (status = 404, description = "Condomínio não encontrado")
    ),
    params(
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_current_condominium(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyStaff>,
    scope: CondominiumScope,
) -> Result<impl IntoResponse, AppError> {
    let condominium = app_state.condominium_service.get(scope.0).await?;
    Ok(Json(condominium))
}

// GET /api/condominiums/{id}
#[utoipa::path(
    get,
    path = "/api/condominiums/{id}",
    tag = "Condomínios",
    params(("id" = Uuid, Path, description = "ID do condomínio")),
    responses(
        (status = 200, description = "Condomínio", body = Condominium),
        (status = 404, description = "Condomínio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_condominium(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let condominium = app_state.condominium_service.get(id).await?;
    Ok(Json(condominium))
}

// PUT /api/condominiums/{id}
#[utoipa::path(
    put,
    path = "/api/condominiums/{id}",
    tag = "Condomínios",
    params(("id" = Uuid, Path, description = "ID do condomínio")),
    request_body = CondominiumPayload,
    responses(
        (status = 200, description = "Condomínio atualizado", body = Condominium),
        (status = 404, description = "Condomínio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_condominium(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CondominiumPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let (fields, syndic_password) = payload.into_parts();

    let condominium = app_state
        .condominium_service
        .update(id, fields, syndic_password.as_deref())
        .await?;

    Ok(Json(condominium))
}

// DELETE /api/condominiums/{id}
#[utoipa::path(
    delete,
    path = "/api/condominiums/{id}",
    tag = "Condomínios",
    params(("id" = Uuid, Path, description = "ID do condomínio")),
    responses(
        (status = 204, description = "Condomínio e dados vinculados excluídos"),
        (status = 404, description = "Condomínio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_condominium(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.condominium_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
