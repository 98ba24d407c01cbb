// src/handlers/deliveries.rs

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
    handlers::SearchQuery,
    middleware::{
        rbac::{AnyStaff, RequireRole},
        tenancy::CondominiumScope,
    },
    models::delivery::DeliveryDetail,
    services::delivery_service::{NotifiedDelivery, RegisterDelivery},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeliveryPayload {
    pub resident_id: Uuid,
    #[validate(length(max = 500, message = "Observações muito longas"))]
    #[schema(example = "Caixa grande, Mercado Livre")]
    pub notes: Option<String>,
    #[validate(url(message = "URL da foto inválida"))]
    pub photo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupPayload {
    /// Quem retirou, documento conferido etc.
    #[validate(length(max = 500, message = "Descrição muito longa"))]
    #[schema(example = "Retirado pela filha")]
    pub note: Option<String>,
}

// POST /api/deliveries
#[utoipa::path(
    post,
    path = "/api/deliveries",
    tag = "Entregas",
    request_body = RegisterDeliveryPayload,
    params(("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")),
    responses(
        (status = 201, description = "Entrega registrada (notified indica se o WhatsApp saiu)", body = NotifiedDelivery),
        (status = 404, description = "Morador não encontrado no condomínio")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_delivery(
    State(app_state): State<AppState>,
    guard: RequireRole<AnyStaff>,
    scope: CondominiumScope,
    Json(payload): Json<RegisterDeliveryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let registered = app_state
        .delivery_service
        .register(
            scope.0,
            guard.session(),
            RegisterDelivery {
                resident_id: payload.resident_id,
                notes: payload.notes,
                photo_url: payload.photo_url,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(registered)))
}

// GET /api/deliveries/pending
#[utoipa::path(
    get,
    path = "/api/deliveries/pending",
    tag = "Entregas",
    params(
        SearchQuery,
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses((status = 200, description = "Entregas aguardando retirada", body = Vec<DeliveryDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_pending(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyStaff>,
    scope: CondominiumScope,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let deliveries = app_state
        .delivery_service
        .list_pending(scope.0, query.search)
        .await?;

    Ok(Json(deliveries))
}

// GET /api/deliveries/code/{code}
#[utoipa::path(
    get,
    path = "/api/deliveries/code/{code}",
    tag = "Entregas",
    params(
        ("code" = String, Path, description = "Código de retirada (5 dígitos)"),
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 200, description = "Entrega pendente", body = DeliveryDetail),
        (status = 404, description = "Código não encontrado"),
        (status = 409, description = "Encomenda já retirada ou cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_code(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyStaff>,
    scope: CondominiumScope,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = app_state
        .delivery_service
        .find_pending_by_code(scope.0, &code)
        .await?;

    Ok(Json(delivery))
}

// POST /api/deliveries/code/{code}/pickup
#[utoipa::path(
    post,
    path = "/api/deliveries/code/{code}/pickup",
    tag = "Entregas",
    request_body = PickupPayload,
    params(
        ("code" = String, Path, description = "Código de retirada (5 dígitos)"),
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 200, description = "Retirada confirmada", body = NotifiedDelivery),
        (status = 404, description = "Código não encontrado"),
        (status = 409, description = "Encomenda já retirada ou cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_pickup(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyStaff>,
    scope: CondominiumScope,
    Path(code): Path<String>,
    payload: Option<Json<PickupPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.unwrap_or_default();
    payload.validate()?;

    let confirmed = app_state
        .delivery_service
        .confirm_pickup(scope.0, &code, payload.note)
        .await?;

    Ok(Json(confirmed))
}

// POST /api/deliveries/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/deliveries/{id}/cancel",
    tag = "Entregas",
    params(
        ("id" = Uuid, Path, description = "ID da entrega"),
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 200, description = "Entrega cancelada", body = DeliveryDetail),
        (status = 404, description = "Entrega não encontrada"),
        (status = 409, description = "Entrega não está pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_delivery(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyStaff>,
    scope: CondominiumScope,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = app_state.delivery_service.cancel(scope.0, id).await?;
    Ok(Json(delivery))
}

// GET /api/deliveries/{id}
#[utoipa::path(
    get,
    path = "/api/deliveries/{id}",
    tag = "Entregas",
    params(
        ("id" = Uuid, Path, description = "ID da entrega"),
        ("x-condominium-id" = Option<Uuid>, Header, description = "Obrigatório para super administradores")
    ),
    responses(
        (status = 200, description = "Detalhe da entrega", body = DeliveryDetail),
        (status = 404, description = "Entrega não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_delivery(
    State(app_state): State<AppState>,
    _guard: RequireRole<AnyStaff>,
    scope: CondominiumScope,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = app_state.delivery_service.get(scope.0, id).await?;
    Ok(Json(delivery))
}
