// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Condomínios ---
        handlers::condominiums::list_condominiums,
        handlers::condominiums::create_condominium,
        handlers::condominiums::get_current_condominium,
        handlers::condominiums::get_condominium,
        handlers::condominiums::update_condominium,
        handlers::condominiums::delete_condominium,

        // --- Funcionários ---
        handlers::employees::list_employees,
        handlers::employees::create_employee,
        handlers::employees::update_employee,
        handlers::employees::set_employee_active,
        handlers::employees::delete_employee,

        // --- Moradores ---
        handlers::residents::list_residents,
        handlers::residents::lookup_residents,
        handlers::residents::create_resident,
        handlers::residents::import_residents,
        handlers::residents::update_resident,
        handlers::residents::delete_resident,

        // --- Entregas ---
        handlers::deliveries::register_delivery,
        handlers::deliveries::list_pending,
        handlers::deliveries::find_by_code,
        handlers::deliveries::confirm_pickup,
        handlers::deliveries::cancel_delivery,
        handlers::deliveries::get_delivery,

        // --- Lembretes ---
        handlers::reminders::list_reminders,
        handlers::reminders::send_reminders,

        // --- Relatórios ---
        handlers::reports::list_deliveries,
        handlers::reports::export_deliveries_csv,
        handlers::reports::get_summary,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::dashboard::get_admin_overview,

        // --- Super administradores ---
        handlers::super_admins::list_super_admins,
        handlers::super_admins::create_super_admin,
        handlers::super_admins::set_super_admin_active,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Session,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Cadastros ---
            models::condominium::Condominium,
            models::condominium::CondominiumSummary,
            models::employee::EmployeeRole,
            models::employee::Employee,
            models::resident::Resident,
            models::resident::RejectedLine,
            models::resident::BulkImportResult,
            models::super_admin::SuperAdmin,

            // --- Entregas ---
            models::delivery::DeliveryStatus,
            models::delivery::Delivery,
            models::delivery::DeliveryDetail,
            models::delivery::ReminderState,
            services::delivery_service::NotifiedDelivery,
            services::reminder_service::PendingReminder,
            services::reminder_service::ReminderBatchResult,
            services::messages::ReminderKind,

            // --- Dashboard ---
            models::dashboard::CondominiumDashboard,
            models::dashboard::CondominiumOverview,
            models::dashboard::AdminOverview,
            models::dashboard::ReportSummary,

            // --- Payloads ---
            handlers::ActivePayload,
            handlers::condominiums::CondominiumPayload,
            handlers::employees::CreateEmployeePayload,
            handlers::employees::UpdateEmployeePayload,
            handlers::residents::ResidentPayload,
            handlers::deliveries::RegisterDeliveryPayload,
            handlers::deliveries::PickupPayload,
            handlers::reminders::SendRemindersPayload,
            handlers::super_admins::CreateSuperAdminPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login por CPF e sessão"),
        (name = "Condomínios", description = "Cadastro de condomínios (super administrador)"),
        (name = "Funcionários", description = "Porteiros, zeladores e administradores"),
        (name = "Moradores", description = "Cadastro e importação de moradores"),
        (name = "Entregas", description = "Registro, retirada e cancelamento de encomendas"),
        (name = "Lembretes", description = "Avisos de encomendas aguardando retirada"),
        (name = "Relatórios", description = "Consultas filtradas e exportação CSV"),
        (name = "Dashboard", description = "Indicadores do condomínio e visão geral"),
        (name = "Super administradores", description = "Gestão das contas globais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
