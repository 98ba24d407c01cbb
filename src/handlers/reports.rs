// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{CondoAdmins, RequireRole},
        tenancy::CondominiumScope,
    },
    models::{
        dashboard::ReportSummary,
        delivery::{DeliveryDetail, DeliveryFilter},
    },
};

// GET /api/reports/deliveries
#[utoipa::path(
    get,
    path = "/api/reports/deliveries",
    tag = "Relatórios",
    params(
        DeliveryFilter,
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 200, description = "Entregas filtradas, mais recentes primeiro", body = Vec<DeliveryDetail>),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_deliveries(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Query(filter): Query<DeliveryFilter>,
) -> Result<impl IntoResponse, AppError> {
    let deliveries = app_state.report_service.list(scope.0, &filter).await?;
    Ok(Json(deliveries))
}

// GET /api/reports/deliveries.csv
#[utoipa::path(
    get,
    path = "/api/reports/deliveries.csv",
    tag = "Relatórios",
    params(
        DeliveryFilter,
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 200, description = "CSV (';', UTF-8 com BOM)", content_type = "text/csv", body = String)
    ),
    security(("api_jwt" = []))
)]
pub async fn export_deliveries_csv(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Query(filter): Query<DeliveryFilter>,
) -> Result<impl IntoResponse, AppError> {
    let export = app_state.report_service.export_csv(scope.0, &filter).await?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ),
    ];

    Ok((headers, export.content))
}

// GET /api/reports/summary
#[utoipa::path(
    get,
    path = "/api/reports/summary",
    tag = "Relatórios",
    params(
        DeliveryFilter,
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses((status = 200, description = "Totais do período filtrado", body = ReportSummary)),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
    Query(filter): Query<DeliveryFilter>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.report_service.summary(scope.0, &filter).await?;
    Ok(Json(summary))
}
