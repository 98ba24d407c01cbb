// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{CondoAdmins, RequireRole, SuperAdminOnly},
        tenancy::CondominiumScope,
    },
    models::dashboard::{AdminOverview, CondominiumDashboard},
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")),
    responses(
        (status = 200, description = "Cards do painel do condomínio", body = CondominiumDashboard)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    _guard: RequireRole<CondoAdmins>,
    scope: CondominiumScope,
) -> Result<impl IntoResponse, AppError> {
    let dashboard = app_state.dashboard_service.condominium(scope.0).await?;
    Ok(Json(dashboard))
}

// GET /api/admin/overview
#[utoipa::path(
    get,
    path = "/api/admin/overview",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Totais gerais e por condomínio", body = AdminOverview)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_admin_overview(
    State(app_state): State<AppState>,
    _guard: RequireRole<SuperAdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    let overview = app_state.dashboard_service.admin_overview().await?;
    Ok(Json(overview))
}
