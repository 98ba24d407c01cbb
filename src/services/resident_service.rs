// src/services/resident_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ResidentRepository,
    models::resident::{BulkImportResult, NewResident, RejectedLine, Resident},
};

const MAX_IMPORT_ROWS: usize = 1000;

/// Valida e normaliza os campos digitados; bloco vazio vira `None`.
pub fn normalize_resident(resident: NewResident) -> Result<NewResident, String> {
    let name = resident.name.trim().to_string();
    let apartment = resident.apartment.trim().to_string();
    let phone = resident.phone.trim().to_string();
    let block = resident
        .block
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty());

    let mut missing = Vec::new();
    if name.is_empty() {
        missing.push("nome");
    }
    if apartment.is_empty() {
        missing.push("apartamento");
    }
    if phone.is_empty() {
        missing.push("telefone");
    }
    if !missing.is_empty() {
        return Err(format!("Campo(s) obrigatório(s) vazio(s): {}", missing.join(", ")));
    }

    Ok(NewResident { name, apartment, block, phone })
}

fn unquote(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
        .trim()
}

/// Lê a planilha (texto separado por ';'). Colunas localizadas pelo cabeçalho:
/// `nome`, `apartamento`, `telefone` obrigatórias, `bloco` opcional.
pub fn parse_import(text: &str) -> Result<(Vec<NewResident>, Vec<RejectedLine>), AppError> {
    let text = text.trim_start_matches('\u{FEFF}');
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Err(AppError::BadRequest("Arquivo vazio.".into()));
    };
    let columns: Vec<String> = header.split(';').map(|c| unquote(c).to_lowercase()).collect();
    let position = |name: &str| columns.iter().position(|c| c == name);

    let (Some(name_col), Some(apartment_col), Some(phone_col)) =
        (position("nome"), position("apartamento"), position("telefone"))
    else {
        return Err(AppError::BadRequest(
            "Cabeçalho deve conter as colunas nome, apartamento e telefone.".into(),
        ));
    };
    let block_col = position("bloco");

    let mut valid = Vec::new();
    let mut rejected = Vec::new();

    for (index, line) in lines {
        let line_number = index + 1;
        let cells: Vec<&str> = line.split(';').map(unquote).collect();
        let cell = |i: usize| cells.get(i).copied().unwrap_or_default().to_string();

        let candidate = NewResident {
            name: cell(name_col),
            apartment: cell(apartment_col),
            block: block_col.map(|i| cell(i)),
            phone: cell(phone_col),
        };

        match normalize_resident(candidate) {
            Ok(resident) => valid.push(resident),
            Err(reason) => rejected.push(RejectedLine { line: line_number, reason }),
        }
    }

    if valid.len() + rejected.len() > MAX_IMPORT_ROWS {
        return Err(AppError::BadRequest(format!(
            "Máximo de {} moradores por importação.",
            MAX_IMPORT_ROWS
        )));
    }

    Ok((valid, rejected))
}

#[derive(Clone)]
pub struct ResidentService {
    repo: ResidentRepository,
}

impl ResidentService {
    pub fn new(repo: ResidentRepository) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        condominium_id: Uuid,
        resident: NewResident,
    ) -> Result<Resident, AppError> {
        let resident = normalize_resident(resident).map_err(AppError::BadRequest)?;
        self.repo.create(condominium_id, &resident).await
    }

    pub async fn update(
        &self,
        condominium_id: Uuid,
        id: Uuid,
        resident: NewResident,
        active: bool,
    ) -> Result<Resident, AppError> {
        let resident = normalize_resident(resident).map_err(AppError::BadRequest)?;
        self.repo
            .update(condominium_id, id, &resident, active)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Morador".into()))
    }

    pub async fn delete(&self, condominium_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(condominium_id, id).await? {
            return Err(AppError::ResourceNotFound("Morador".into()));
        }
        Ok(())
    }

    pub async fn list(
        &self,
        condominium_id: Uuid,
        search: Option<&str>,
        active: Option<bool>,
    ) -> Result<Vec<Resident>, AppError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.repo.list(condominium_id, search, active).await
    }

    /// Insere as linhas válidas numa transação e devolve as rejeitadas.
    pub async fn bulk_import(
        &self,
        condominium_id: Uuid,
        text: &str,
    ) -> Result<BulkImportResult, AppError> {
        let (valid, rejected) = parse_import(text)?;
        let inserted = self.repo.create_many(condominium_id, &valid).await?;

        tracing::info!(
            "📋 Importação de moradores: {} inseridos, {} rejeitados",
            inserted,
            rejected.len()
        );
        Ok(BulkImportResult { inserted, rejected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_by_header_name() {
        let text = "\u{FEFF}Telefone;Nome;Bloco;Apartamento\r\n\
                    5511999991111;Maria Souza;A;101\r\n\
                    \r\n\
                    \"5511988887777\";\" João \";;202\r\n";

        let (valid, rejected) = parse_import(text).expect("planilha válida");

        assert!(rejected.is_empty());
        assert_eq!(
            valid,
            vec![
                NewResident {
                    name: "Maria Souza".into(),
                    apartment: "101".into(),
                    block: Some("A".into()),
                    phone: "5511999991111".into(),
                },
                NewResident {
                    name: "João".into(),
                    apartment: "202".into(),
                    block: None,
                    phone: "5511988887777".into(),
                },
            ]
        );
    }

    #[test]
    fn reports_incomplete_rows_with_line_numbers() {
        let text = "nome;apartamento;telefone\nMaria;101;5511999991111\n;102;\nJosé;103";

        let (valid, rejected) = parse_import(text).expect("planilha válida");

        assert_eq!(valid.len(), 1);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].line, 3);
        assert_eq!(rejected[0].reason, "Campo(s) obrigatório(s) vazio(s): nome, telefone");
        assert_eq!(rejected[1].line, 4);
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let err = parse_import("nome;bloco\nMaria;A").expect_err("cabeçalho incompleto");
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = parse_import("  \n").expect_err("vazio");
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
