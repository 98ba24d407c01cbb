pub mod auth;
pub mod condominium_service;
pub mod dashboard_service;
pub mod delivery_service;
pub mod employee_service;
pub mod messages;
pub mod notification_service;
pub mod reminder_service;
pub mod report_service;
pub mod resident_service;
pub mod super_admin_service;
