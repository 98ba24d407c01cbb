//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

#[cfg(test)]
mod test_support;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG tem prioridade; sem ele, nível info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Tudo abaixo exige Bearer válido; papel e condomínio são checados nos extratores
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_me))
        // --- Condomínios ---
        .route(
            "/condominiums",
            get(handlers::condominiums::list_condominiums)
                .post(handlers::condominiums::create_condominium),
        )
        .route(
            "/condominiums/current",
            get(handlers::condominiums::get_current_condominium),
        )
        .route(
            "/condominiums/{id}",
            get(handlers::condominiums::get_condominium)
                .put(handlers::condominiums::update_condominium)
                .delete(handlers::condominiums::delete_condominium),
        )
        // --- Funcionários ---
        .route(
            "/employees",
            get(handlers::employees::list_employees).post(handlers::employees::create_employee),
        )
        .route(
            "/employees/{id}",
            put(handlers::employees::update_employee)
                .delete(handlers::employees::delete_employee),
        )
        .route(
            "/employees/{id}/active",
            patch(handlers::employees::set_employee_active),
        )
        // --- Moradores ---
        .route(
            "/residents",
            get(handlers::residents::list_residents).post(handlers::residents::create_resident),
        )
        .route("/residents/lookup", get(handlers::residents::lookup_residents))
        .route("/residents/import", post(handlers::residents::import_residents))
        .route(
            "/residents/{id}",
            put(handlers::residents::update_resident)
                .delete(handlers::residents::delete_resident),
        )
        // --- Entregas ---
        .route("/deliveries", post(handlers::deliveries::register_delivery))
        .route("/deliveries/pending", get(handlers::deliveries::list_pending))
        .route("/deliveries/code/{code}", get(handlers::deliveries::find_by_code))
        .route(
            "/deliveries/code/{code}/pickup",
            post(handlers::deliveries::confirm_pickup),
        )
        .route("/deliveries/{id}", get(handlers::deliveries::get_delivery))
        .route(
            "/deliveries/{id}/cancel",
            post(handlers::deliveries::cancel_delivery),
        )
        // --- Lembretes ---
        .route("/reminders", get(handlers::reminders::list_reminders))
        .route("/reminders/send", post(handlers::reminders::send_reminders))
        // --- Relatórios e painel ---
        .route("/reports/deliveries", get(handlers::reports::list_deliveries))
        .route(
            "/reports/deliveries.csv",
            get(handlers::reports::export_deliveries_csv),
        )
        .route("/reports/summary", get(handlers::reports::get_summary))
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/admin/overview", get(handlers::dashboard::get_admin_overview))
        // --- Super administradores ---
        .route(
            "/super-admins",
            get(handlers::super_admins::list_super_admins)
                .post(handlers::super_admins::create_super_admin),
        )
        .route(
            "/super-admins/{id}/active",
            patch(handlers::super_admins::set_super_admin_active),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .with_state(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
