// src/handlers/residents.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{AnyStaff, CondoAdmins, RequireRole},
        tenancy::CondominiumScope,
    },
    models::resident::{BulkImportResult, NewResident, Resident},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResidentPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[validate(length(min = 1, message = "O apartamento é obrigatório"))]
    #[schema(example = "101")]
    pub apartment: String,
    #[schema(example = "A")]
    pub block: Option<String>,
    #[validate(length(min = 8, message = "Telefone inválido"))]
    #[schema(example = "5511999991111")]
    pub phone: String,
    /// Só usado na edição
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ResidentPayload {
    fn into_parts(self) -> (NewResident, bool) {
        let resident = NewResident {
            name: self.name,
            apartment: self.apartment,
            block: self.block,
            phone: self.phone,
        };
        (resident, self.active)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResidentListQuery {
    /// Nome, apartamento, bloco ou telefone
    pub search: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    #[param(example = "101")]
    pub apartment: String,
    #[param(example = "A")]
    pub block: Option<String>,
}

// GET /api/residents
#[utoipa::path(
    get,
    path = "/api/residents",
    tag = "Moradores",
    params(
        ResidentListQuery,
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses((status = 200, description = "Moradores do condomínio", body = Vec<Resident>)),
    security(("api_jwt" = []))
)]
pub async fn list_residents(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Query(query): Query<ResidentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let residents = app_state
        .resident_service
        .list(scope.0, query.search.as_deref(), query.active)
        .await?;

    Ok(Json(residents))
}

// GET /api/residents/lookup
#[utoipa::path(
    get,
    path = "/api/residents/lookup",
    tag = "Moradores",
    params(
        LookupQuery,
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 200, description = "Moradores ativos do apartamento", body = Vec<Resident>),
        (status = 400, description = "Apartamento não informado")
    ),
    security(("api_jwt" = []))
)]
pub async fn lookup_residents(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyStaff>,
    scope: CondominiumScope,
    Query(query): Query<LookupQuery>,
) -> Result<impl IntoResponse, AppError> {
    let residents = app_state
        .delivery_service
        .find_residents(scope.0, &query.apartment, query.block.as_deref())
        .await?;

    Ok(Json(residents))
}

// POST /api/residents
#[utoipa::path(
    post,
    path = "/api/residents",
    tag = "Moradores",
    request_body = ResidentPayload,
    params(("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")),
    responses(
        (status = 201, description = "Morador criado", body = Resident),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_resident(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Json(payload): Json<ResidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let (resident, _) = payload.into_parts();

    let created = app_state.resident_service.create(scope.0, resident).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// POST /api/residents/import
#[utoipa::path(
    post,
    path = "/api/residents/import",
    tag = "Moradores",
    request_body(
        content = String,
        content_type = "text/plain",
        description = "Planilha separada por ';' com cabeçalho nome;apartamento;telefone[;bloco]"
    ),
    params(("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")),
    responses(
        (status = 200, description = "Resultado da importação", body = BulkImportResult),
        (status = 400, description = "Cabeçalho inválido ou arquivo vazio")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_residents(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state.resident_service.bulk_import(scope.0, &body).await?;
    Ok(Json(result))
}

// PUT /api/residents/{id}
#[utoipa::path(
    put,
    path = "/api/residents/{id}",
    tag = "Moradores",
    request_body = ResidentPayload,
    params(
        ("id" = Uuid, Path, description = "ID do morador"),
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 200, description = "Morador atualizado", body = Resident),
        (status = 404, description = "Morador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_resident(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let (resident, active) = payload.into_parts();

    let updated = app_state
        .resident_service
        .update(scope.0, id, resident, active)
        .await?;

    Ok(Json(updated))
}

// DELETE /api/residents/{id}
#[utoipa::path(
    delete,
    path = "/api/residents/{id}",
    tag = "Moradores",
    params(
        ("id" = Uuid, Path, description = "ID do morador"),
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 204, description = "Morador excluído"),
        (status = 404, description = "Morador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_resident(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.resident_service.delete(scope.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
