// src/handlers/reminders.rs

use axum::{
    extract::{Query, State},
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
        rbac::{AnyStaff, RequireRole},
        tenancy::CondominiumScope,
    },
    services::{
        messages::{ReminderKind, ReminderTemplate},
        reminder_service::{PendingReminder, ReminderBatchResult},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReminderListQuery {
    /// Dias mínimos aguardando retirada (padrão 0)
    pub min_days: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendRemindersPayload {
    #[validate(length(min = 1, message = "Selecione ao menos uma entrega"))]
    pub delivery_ids: Vec<Uuid>,
    pub template: ReminderKind,
    /// Obrigatória quando template = personalizado
    pub custom_message: Option<String>,
}

// GET /api/reminders
#[utoipa::path(
    get,
    path = "/api/reminders",
    tag = "Lembretes",
    params(
        ReminderListQuery,
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses((status = 200, description = "Entregas pendentes com dias de espera", body = Vec<PendingReminder>)),
    security(("api_jwt" = []))
)]
pub async fn list_reminders(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyStaff>,
    scope: CondominiumScope,
    Query(query): Query<ReminderListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reminders = app_state
        .reminder_service
        .list(scope.0, query.min_days, query.search)
        .await?;

    Ok(Json(reminders))
}

// POST /api/reminders/send
#[utoipa::path(
    post,
    path = "/api/reminders/send",
    tag = "Lembretes",
    request_body = SendRemindersPayload,
    params(("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")),
    responses(
        (status = 200, description = "Resumo do envio", body = ReminderBatchResult),
        (status = 400, description = "Lote vazio ou mensagem personalizada ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_reminders(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyStaff>,
    scope: CondominiumScope,
    Json(payload): Json<SendRemindersPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let template = ReminderTemplate::from_request(payload.template, payload.custom_message)?;

    let result = app_state
        .reminder_service
        .send(scope.0, &payload.delivery_ids, &template)
        .await?;

    Ok(Json(result))
}
