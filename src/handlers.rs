use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub mod auth;
pub mod condominiums;
pub mod dashboard;
pub mod deliveries;
pub mod employees;
pub mod reminders;
pub mod reports;
pub mod residents;
pub mod super_admins;

/// Busca livre usada nas listagens.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivePayload {
    pub active: bool,
}
