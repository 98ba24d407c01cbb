pub mod auth;
pub mod condominium;
pub mod dashboard;
pub mod delivery;
pub mod employee;
pub mod resident;
pub mod super_admin;
