pub mod cpf;
pub mod csv;
pub mod error;
