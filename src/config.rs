// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CondominiumRepository, DashboardRepository, DeliveryRepository, EmployeeRepository,
        PgCredentialStore, ResidentRepository, SuperAdminRepository,
    },
    services::{
        auth::AuthService,
        condominium_service::CondominiumService,
        dashboard_service::DashboardService,
        delivery_service::DeliveryService,
        employee_service::EmployeeService,
        notification_service::{Notifier, WebhookNotifier},
        reminder_service::ReminderService,
        report_service::ReportService,
        resident_service::ResidentService,
        super_admin_service::SuperAdminService,
    },
};

/// Variáveis de ambiente lidas na inicialização.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bind_addr: String,
    pub webhook_primary_url: String,
    pub webhook_fallback_url: Option<String>,
    pub webhook_timeout_secs: u64,
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{} deve ser definida", name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} inválida: '{}'", name, raw)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours: parsed_or("JWT_TTL_HOURS", 12)?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            webhook_primary_url: required("WEBHOOK_PRIMARY_URL")?,
            webhook_fallback_url: optional("WEBHOOK_FALLBACK_URL"),
            webhook_timeout_secs: parsed_or("WEBHOOK_TIMEOUT_SECS", 10)?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub condominium_service: CondominiumService,
    pub employee_service: EmployeeService,
    pub resident_service: ResidentService,
    pub delivery_service: DeliveryService,
    pub reminder_service: ReminderService,
    pub report_service: ReportService,
    pub dashboard_service: DashboardService,
    pub super_admin_service: SuperAdminService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let condominium_repo = CondominiumRepository::new(db_pool.clone());
        let employee_repo = EmployeeRepository::new(db_pool.clone());
        let resident_repo = ResidentRepository::new(db_pool.clone());
        let delivery_repo = Arc::new(DeliveryRepository::new(db_pool.clone()));
        let super_admin_repo = SuperAdminRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let credentials = Arc::new(PgCredentialStore::new(
            super_admin_repo.clone(),
            employee_repo.clone(),
            condominium_repo.clone(),
        ));

        let notifier: Arc<dyn Notifier> = Arc::new(
            WebhookNotifier::new(
                config.webhook_primary_url.clone(),
                config.webhook_fallback_url.clone(),
                Duration::from_secs(config.webhook_timeout_secs),
            )
            .context("Falha ao criar o cliente HTTP do webhook")?,
        );

        let auth_service = AuthService::new(
            credentials,
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.jwt_ttl_hours),
        );
        let delivery_service = DeliveryService::new(
            delivery_repo.clone(),
            Arc::new(resident_repo.clone()),
            notifier.clone(),
        );
        let reminder_service = ReminderService::new(delivery_repo.clone(), notifier);
        let report_service = ReportService::new(delivery_repo);

        Ok(Self {
            db_pool,
            auth_service,
            condominium_service: CondominiumService::new(condominium_repo.clone()),
            employee_service: EmployeeService::new(employee_repo),
            resident_service: ResidentService::new(resident_repo),
            delivery_service,
            reminder_service,
            report_service,
            dashboard_service: DashboardService::new(dashboard_repo, condominium_repo),
            super_admin_service: SuperAdminService::new(super_admin_repo),
        })
    }
}
