pub mod stores;

pub mod condominium_repo;
pub use condominium_repo::CondominiumRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod resident_repo;
pub use resident_repo::ResidentRepository;
pub mod delivery_repo;
pub use delivery_repo::DeliveryRepository;
pub mod super_admin_repo;
pub use super_admin_repo::SuperAdminRepository;
pub mod credential_store;
pub use credential_store::PgCredentialStore;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;

/// Padrão ILIKE "contém", escapando os curingas digitados pelo usuário.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" flores "), "%flores%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
