// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::{cpf::Cpf, error::AppError},
    db::stores::CredentialStore,
    models::{
        auth::{AuthResponse, Claims, Role, Session},
        condominium::{Condominium, CondominiumSummary},
        employee::Employee,
        super_admin::SuperAdmin,
    },
};

const SYNDIC_DEFAULT_NAME: &str = "Síndico";

/// Resultado da resolução de credenciais, na ordem super admin -> funcionário -> síndico.
#[derive(Debug)]
pub enum CredentialMatch {
    SuperAdmin(SuperAdmin),
    Employee {
        employee: Employee,
        condominium: Option<Condominium>,
    },
    Syndic(Condominium),
    Unauthenticated,
}

impl CredentialMatch {
    #[cfg(test)]
    pub fn role(&self) -> Option<Role> {
        match self {
            CredentialMatch::SuperAdmin(_) => Some(Role::SuperAdministrator),
            CredentialMatch::Employee { employee, .. } => Some(employee.role.into()),
            CredentialMatch::Syndic(_) => Some(Role::Syndic),
            CredentialMatch::Unauthenticated => None,
        }
    }

    /// Sessão + condomínio a devolver no login.
    fn into_session(self) -> Option<(Session, Option<CondominiumSummary>)> {
        match self {
            CredentialMatch::SuperAdmin(admin) => Some((super_admin_session(&admin), None)),
            CredentialMatch::Employee { employee, condominium } => Some((
                employee_session(&employee),
                condominium.as_ref().map(CondominiumSummary::from),
            )),
            CredentialMatch::Syndic(condominium) => Some((
                syndic_session(&condominium),
                Some(CondominiumSummary::from(&condominium)),
            )),
            CredentialMatch::Unauthenticated => None,
        }
    }
}

fn super_admin_session(admin: &SuperAdmin) -> Session {
    Session {
        subject_id: admin.id,
        name: admin.name.clone(),
        role: Role::SuperAdministrator,
        condominium_id: None,
    }
}

fn employee_session(employee: &Employee) -> Session {
    Session {
        subject_id: employee.id,
        name: employee.name.clone(),
        role: employee.role.into(),
        condominium_id: Some(employee.condominium_id),
    }
}

// O síndico virtual usa o ID do condomínio como identificador
fn syndic_session(condominium: &Condominium) -> Session {
    Session {
        subject_id: condominium.id,
        name: condominium
            .syndic_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| SYNDIC_DEFAULT_NAME.to_string()),
        role: Role::Syndic,
        condominium_id: Some(condominium.id),
    }
}

pub const MIN_PASSWORD_LEN: usize = 3;

/// Senha sem espaços nas pontas, com o tamanho mínimo.
pub fn checked_password(password: &str) -> Result<&str, AppError> {
    let password = password.trim();
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "A senha deve ter no mínimo {} caracteres.",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(password)
}

/// Gera o hash bcrypt numa thread separada.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

/// Executa a verificação da senha num thread separado.
pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let password_hash_clone = password_hash.to_owned();
    let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt_secret: String,
    token_ttl: chrono::Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt_secret: String, token_ttl: chrono::Duration) -> Self {
        Self { store, jwt_secret, token_ttl }
    }

    /// Tenta super admin, depois funcionário, depois síndico do condomínio.
    pub async fn resolve_credentials(
        &self,
        cpf: &Cpf,
        password: &str,
    ) -> Result<CredentialMatch, AppError> {
        if let Some(admin) = self.store.active_super_admin_by_cpf(cpf.as_str()).await? {
            if verify_password(password, &admin.password_hash).await? {
                return Ok(CredentialMatch::SuperAdmin(admin));
            }
        }

        if let Some(employee) = self.store.active_employee_by_cpf(cpf.as_str()).await? {
            if verify_password(password, &employee.password_hash).await? {
                let condominium = self.store.condominium_by_id(employee.condominium_id).await?;
                return Ok(CredentialMatch::Employee { employee, condominium });
            }
        }

        for condominium in self.store.condominiums_by_syndic_cpf(cpf.as_str()).await? {
            let Some(stored_hash) = condominium.syndic_password_hash.as_deref() else {
                continue;
            };
            if verify_password(password, stored_hash).await? {
                return Ok(CredentialMatch::Syndic(condominium));
            }
        }

        Ok(CredentialMatch::Unauthenticated)
    }

    pub async fn login(&self, cpf: &str, password: &str) -> Result<AuthResponse, AppError> {
        if cpf.trim().is_empty() || password.trim().is_empty() {
            return Err(AppError::BadRequest("CPF e senha são obrigatórios.".into()));
        }
        // Formato inválido nem chega ao banco
        let cpf = Cpf::parse(cpf)?;
        let password = password.trim();

        let matched = self.resolve_credentials(&cpf, password).await?;
        let syndic_cpf = match &matched {
            CredentialMatch::Syndic(condominium) => condominium.syndic_cpf.clone(),
            _ => None,
        };
        let Some((user, condominium)) = matched.into_session() else {
            tracing::info!("🔒 Login recusado para CPF final {}", &cpf.as_str()[7..]);
            return Err(AppError::InvalidCredentials);
        };

        tracing::info!("✅ Login de {} ({:?})", user.name, user.role);
        let token = self.create_token(&user, syndic_cpf)?;

        Ok(AuthResponse { token, user, condominium })
    }

    /// Decodifica o token e confere se o usuário continua ativo.
    pub async fn validate_token(&self, token: &str) -> Result<Session, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;
        let claims = token_data.claims;

        let session = match claims.role {
            Role::SuperAdministrator => self
                .store
                .super_admin_by_id(claims.sub)
                .await?
                .filter(|admin| admin.active)
                .map(|admin| super_admin_session(&admin)),
            Role::Syndic if claims.cid == Some(claims.sub) => self
                .store
                .condominium_by_id(claims.sub)
                .await?
                .filter(|c| {
                    c.syndic_password_hash.is_some()
                        && c.syndic_cpf.is_some()
                        && c.syndic_cpf == claims.scpf
                })
                .map(|c| syndic_session(&c)),
            _ => self
                .store
                .employee_by_id(claims.sub)
                .await?
                .filter(|employee| employee.active)
                .map(|employee| employee_session(&employee)),
        };

        session.ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, session: &Session, syndic_cpf: Option<String>) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: session.subject_id,
            role: session.role,
            cid: session.condominium_id,
            scpf: syndic_cpf,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::EmployeeRole;
    use crate::test_support::{condominium, employee, super_admin, InMemoryCredentials};
    use std::sync::atomic::Ordering;

    fn service(store: Arc<InMemoryCredentials>) -> AuthService {
        AuthService::new(store, "segredo-de-teste".into(), chrono::Duration::hours(1))
    }

    #[tokio::test]
    async fn super_admin_wins_over_employee_with_same_cpf() {
        let condo = condominium("Residencial Aurora");
        let store = Arc::new(InMemoryCredentials::default());
        store.add_super_admin(super_admin("11144477735", "abc"));
        store.add_employee(employee(&condo, "11144477735", "abc", EmployeeRole::Doorman));
        store.add_condominium(condo);

        let response = service(store).login("111.444.777-35", "abc").await.expect("login");

        assert_eq!(response.user.role, Role::SuperAdministrator);
        assert_eq!(response.user.condominium_id, None);
        assert!(response.condominium.is_none());
    }

    #[tokio::test]
    async fn employee_login_attaches_condominium() {
        let condo = condominium("Residencial Aurora");
        let store = Arc::new(InMemoryCredentials::default());
        store.add_employee(employee(&condo, "11144477735", "abc", EmployeeRole::Doorman));
        store.add_condominium(condo.clone());

        let response = service(store).login("11144477735", " abc ").await.expect("login");

        assert_eq!(response.user.role, Role::Doorman);
        assert_eq!(response.user.condominium_id, Some(condo.id));
        assert_eq!(response.condominium.map(|c| c.name), Some("Residencial Aurora".into()));
    }

    #[tokio::test]
    async fn syndic_login_uses_condominium_credentials() {
        let mut condo = condominium("Residencial Aurora");
        condo.syndic_cpf = Some("52998224725".into());
        condo.syndic_password_hash = Some(bcrypt::hash("sindico123", 4).expect("hash"));
        condo.syndic_name = None;
        let store = Arc::new(InMemoryCredentials::default());
        store.add_condominium(condo.clone());

        let svc = service(store);
        let response = svc.login("529.982.247-25", "sindico123").await.expect("login");

        assert_eq!(response.user.role, Role::Syndic);
        assert_eq!(response.user.name, "Síndico");
        assert_eq!(response.user.subject_id, condo.id);
        assert_eq!(response.user.employee_id(), None);

        let session = svc.validate_token(&response.token).await.expect("token válido");
        assert_eq!(session, response.user);
    }

    #[tokio::test]
    async fn wrong_password_falls_through_to_next_kind() {
        let mut condo = condominium("Residencial Aurora");
        condo.syndic_cpf = Some("11144477735".into());
        condo.syndic_password_hash = Some(bcrypt::hash("outra", 4).expect("hash"));
        let store = Arc::new(InMemoryCredentials::default());
        store.add_employee(employee(&condo, "11144477735", "abc", EmployeeRole::Administrator));
        store.add_condominium(condo);

        let matched = service(store)
            .resolve_credentials(&Cpf::parse("11144477735").expect("cpf"), "outra")
            .await
            .expect("resolve");

        assert_eq!(matched.role(), Some(Role::Syndic));
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_share_the_same_error() {
        let condo = condominium("Residencial Aurora");
        let store = Arc::new(InMemoryCredentials::default());
        store.add_employee(employee(&condo, "11144477735", "abc", EmployeeRole::Doorman));
        store.add_condominium(condo);
        let svc = service(store);

        let wrong_password = svc.login("11144477735", "xyz").await.expect_err("deve falhar");
        let unknown = svc.login("52998224725", "abc").await.expect_err("deve falhar");

        assert_eq!(wrong_password.to_string(), "CPF ou senha incorretos.");
        assert_eq!(unknown.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn inactive_employee_cannot_log_in() {
        let condo = condominium("Residencial Aurora");
        let mut inactive = employee(&condo, "11144477735", "abc", EmployeeRole::Doorman);
        inactive.active = false;
        let store = Arc::new(InMemoryCredentials::default());
        store.add_employee(inactive);
        store.add_condominium(condo);

        let err = service(store).login("11144477735", "abc").await.expect_err("inativo");
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn malformed_cpf_is_rejected_before_any_lookup() {
        let store = Arc::new(InMemoryCredentials::default());
        let svc = service(store.clone());

        for cpf in ["1234567890", "11111111111", "abc"] {
            let err = svc.login(cpf, "abc").await.expect_err("cpf inválido");
            assert!(matches!(err, AppError::InvalidCpf(_)));
        }
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn token_of_deactivated_employee_is_rejected() {
        let condo = condominium("Residencial Aurora");
        let emp = employee(&condo, "11144477735", "abc", EmployeeRole::Caretaker);
        let store = Arc::new(InMemoryCredentials::default());
        store.add_employee(emp.clone());
        store.add_condominium(condo);
        let svc = service(store.clone());

        let response = svc.login("11144477735", "abc").await.expect("login");
        store.deactivate_employee(emp.id);

        let err = svc.validate_token(&response.token).await.expect_err("revogado");
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn replacing_the_syndic_revokes_the_previous_session() {
        let mut condo = condominium("Residencial Aurora");
        condo.syndic_cpf = Some("52998224725".into());
        condo.syndic_password_hash = Some(bcrypt::hash("sindico123", 4).expect("hash"));
        let store = Arc::new(InMemoryCredentials::default());
        store.add_condominium(condo.clone());
        let svc = service(store.clone());

        let old = svc.login("52998224725", "sindico123").await.expect("login");

        // Só o CPF muda; o hash continua lá
        store.update_condominium(condo.id, |c| c.syndic_cpf = Some("11144477735".into()));
        let err = svc.validate_token(&old.token).await.expect_err("revogado");
        assert!(matches!(err, AppError::InvalidToken));

        // Como o repositório grava a troca: sem senha nova, o hash sai junto
        store.update_condominium(condo.id, |c| c.syndic_password_hash = None);
        let err = svc.login("11144477735", "sindico123").await.expect_err("sem senha");
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let svc = service(Arc::new(InMemoryCredentials::default()));
        let err = svc.validate_token("nao.e.jwt").await.expect_err("inválido");
        assert!(matches!(err, AppError::InvalidToken));
    }
}
