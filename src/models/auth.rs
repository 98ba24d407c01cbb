// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::condominium::CondominiumSummary;
use crate::models::employee::EmployeeRole;

// ---
// Papel efetivo da sessão
// ---
// Inclui os papéis virtuais: super administrador (tabela própria) e síndico
// (credenciais guardadas no próprio condomínio).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "porteiro")]
    Doorman,
    #[serde(rename = "zelador")]
    Caretaker,
    #[serde(rename = "administrador")]
    Administrator,
    #[serde(rename = "sindico")]
    Syndic,
    #[serde(rename = "super_administrador")]
    SuperAdministrator,
}

impl From<EmployeeRole> for Role {
    fn from(role: EmployeeRole) -> Self {
        match role {
            EmployeeRole::Doorman => Role::Doorman,
            EmployeeRole::Caretaker => Role::Caretaker,
            EmployeeRole::Administrator => Role::Administrator,
            EmployeeRole::Syndic => Role::Syndic,
        }
    }
}

/// Usuário autenticado, reconstruído a cada requisição a partir do JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// ID do funcionário, do super administrador ou do condomínio (síndico)
    pub subject_id: Uuid,
    pub name: String,
    pub role: Role,
    pub condominium_id: Option<Uuid>,
}

impl Session {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdministrator
    }

    /// ID a gravar em `deliveries.employee_id`; usuários virtuais não têm linha em `employees`.
    pub fn employee_id(&self) -> Option<Uuid> {
        match self.role {
            Role::SuperAdministrator => None,
            Role::Syndic if Some(self.subject_id) == self.condominium_id => None,
            _ => Some(self.subject_id),
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "CPF e senha são obrigatórios."))]
    #[schema(example = "111.444.777-35")]
    pub cpf: String,
    #[validate(length(min = 1, message = "CPF e senha são obrigatórios."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: Session,
    pub condominium: Option<CondominiumSummary>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,         // Subject (ID do usuário)
    pub role: Role,
    pub cid: Option<Uuid>, // Condomínio da sessão
    // CPF do síndico no momento do login; trocar o síndico derruba o token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scpf: Option<String>,
    pub exp: usize,        // Expiration time
    pub iat: usize,        // Issued At
}
