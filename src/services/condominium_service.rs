// src/services/condominium_service.rs

use uuid::Uuid;

use crate::{
    common::{cpf::Cpf, error::AppError},
    db::{condominium_repo::CondominiumFields, CondominiumRepository},
    models::condominium::Condominium,
    services::auth::{checked_password, hash_password},
};

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Normaliza os campos do síndico: CPF validado, textos vazios viram `None`.
fn normalize_fields(mut fields: CondominiumFields) -> Result<CondominiumFields, AppError> {
    fields.name = fields.name.trim().to_string();
    fields.phone = non_empty(fields.phone);
    fields.syndic_name = non_empty(fields.syndic_name);
    fields.syndic_phone = non_empty(fields.syndic_phone);
    fields.syndic_cpf = match non_empty(fields.syndic_cpf) {
        Some(cpf) => Some(Cpf::parse(&cpf)?.as_str().to_string()),
        None => None,
    };
    Ok(fields)
}

/// Troca de síndico sem senha nova: o CPF novo herdaria a senha do anterior.
fn replaces_syndic_with_password(current: &Condominium, next_cpf: &str) -> bool {
    current.syndic_password_hash.is_some() && current.syndic_cpf.as_deref() != Some(next_cpf)
}

#[derive(Clone)]
pub struct CondominiumService {
    repo: CondominiumRepository,
}

impl CondominiumService {
    pub fn new(repo: CondominiumRepository) -> Self {
        Self { repo }
    }

    async fn syndic_hash(
        fields: &CondominiumFields,
        syndic_password: Option<&str>,
    ) -> Result<Option<String>, AppError> {
        let Some(password) = syndic_password.filter(|p| !p.trim().is_empty()) else {
            return Ok(None);
        };
        let password = checked_password(password)?;
        if fields.syndic_cpf.is_none() {
            return Err(AppError::BadRequest(
                "Informe o CPF do síndico para definir a senha.".into(),
            ));
        }
        Ok(Some(hash_password(password).await?))
    }

    pub async fn create(
        &self,
        fields: CondominiumFields,
        syndic_password: Option<&str>,
    ) -> Result<Condominium, AppError> {
        let fields = normalize_fields(fields)?;
        let hash = Self::syndic_hash(&fields, syndic_password).await?;

        let condominium = self.repo.create(&fields, hash.as_deref()).await?;
        tracing::info!("🏢 Condomínio '{}' criado ({})", condominium.name, condominium.id);
        Ok(condominium)
    }

    pub async fn update(
        &self,
        id: Uuid,
        fields: CondominiumFields,
        syndic_password: Option<&str>,
    ) -> Result<Condominium, AppError> {
        let fields = normalize_fields(fields)?;
        let hash = Self::syndic_hash(&fields, syndic_password).await?;

        if hash.is_none() {
            let current = self.get(id).await?;
            if let Some(next_cpf) = fields
                .syndic_cpf
                .as_deref()
                .filter(|cpf| replaces_syndic_with_password(&current, cpf))
            {
                return Err(AppError::BadRequest(format!(
                    "Informe a senha do novo síndico (CPF {}).",
                    Cpf::parse(next_cpf)?.formatted()
                )));
            }
        }

        self.repo
            .update(id, &fields, hash.as_deref())
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Condomínio".into()))
    }

    /// Exclui o condomínio com funcionários, moradores e entregas.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::ResourceNotFound("Condomínio".into()));
        }
        tracing::info!("🗑️ Condomínio {} excluído", id);
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Condominium, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Condomínio".into()))
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Condominium>, AppError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repo.list(search).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::condominium;

    fn fields() -> CondominiumFields {
        CondominiumFields {
            name: "  Residencial Aurora ".into(),
            address: "Rua das Flores, 100".into(),
            city: "São Paulo".into(),
            postal_code: "01310-100".into(),
            phone: Some("".into()),
            syndic_name: Some(" Carlos ".into()),
            syndic_cpf: Some("529.982.247-25".into()),
            syndic_phone: None,
        }
    }

    #[test]
    fn normalizes_syndic_fields() {
        let normalized = normalize_fields(fields()).expect("válido");

        assert_eq!(normalized.name, "Residencial Aurora");
        assert_eq!(normalized.phone, None);
        assert_eq!(normalized.syndic_name.as_deref(), Some("Carlos"));
        assert_eq!(normalized.syndic_cpf.as_deref(), Some("52998224725"));
    }

    #[test]
    fn rejects_malformed_syndic_cpf() {
        let mut invalid = fields();
        invalid.syndic_cpf = Some("123".into());

        assert!(matches!(normalize_fields(invalid), Err(AppError::InvalidCpf(_))));
    }

    #[tokio::test]
    async fn syndic_password_requires_cpf() {
        let mut without_cpf = fields();
        without_cpf.syndic_cpf = None;

        let err = CondominiumService::syndic_hash(&without_cpf, Some("segredo"))
            .await
            .expect_err("sem cpf");
        assert!(matches!(err, AppError::BadRequest(_)));

        let none = CondominiumService::syndic_hash(&without_cpf, Some("   ")).await.expect("vazio");
        assert_eq!(none, None);
    }

    #[tokio::test]
    async fn syndic_password_follows_minimum_length() {
        let valid = normalize_fields(fields()).expect("válido");

        let err = CondominiumService::syndic_hash(&valid, Some(" x "))
            .await
            .expect_err("curta");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn new_syndic_cpf_cannot_inherit_the_previous_password() {
        let mut current = condominium("Residencial Aurora");
        current.syndic_cpf = Some("52998224725".into());
        current.syndic_password_hash = Some("hash-antigo".into());

        assert!(replaces_syndic_with_password(&current, "11144477735"));
        assert!(!replaces_syndic_with_password(&current, "52998224725"));

        current.syndic_password_hash = None;
        assert!(!replaces_syndic_with_password(&current, "11144477735"));
    }
}
