// src/services/report_service.rs

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::{csv::CsvBuilder, error::AppError},
    db::stores::DeliveryStore,
    models::{
        dashboard::ReportSummary,
        delivery::{DeliveryDetail, DeliveryFilter, DeliveryStatus},
    },
    services::messages::{format_date, format_date_time},
};

pub const CSV_HEADERS: [&str; 10] = [
    "Código",
    "Morador",
    "Apartamento",
    "Funcionário",
    "Status",
    "Data Entrega",
    "Data Retirada",
    "Status Lembrete",
    "Data Último Lembrete",
    "Observações",
];

/// Arquivo CSV pronto para download.
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

pub fn csv_filename(day: NaiveDate) -> String {
    format!("relatorio_entregas_{}.csv", day.format("%Y-%m-%d"))
}

fn reminder_status(detail: &DeliveryDetail) -> String {
    if detail.delivery.status != DeliveryStatus::Pending {
        return "N/A".into();
    }
    match detail.delivery.last_reminder_at {
        Some(at) => format!("Enviado em {}", format_date(at)),
        None => "Não enviado".into(),
    }
}

// Observações da entrega + descrição da retirada, separadas por " | "
fn combined_notes(detail: &DeliveryDetail) -> String {
    let mut parts = Vec::new();
    if let Some(notes) = detail.delivery.notes.as_deref().filter(|n| !n.is_empty()) {
        parts.push(notes.to_string());
    }
    if let Some(note) = detail.delivery.pickup_note.as_deref().filter(|n| !n.is_empty()) {
        parts.push(format!("Retirada: {}", note));
    }
    parts.join(" | ")
}

pub fn to_csv(rows: &[DeliveryDetail]) -> String {
    let mut csv = CsvBuilder::new(&CSV_HEADERS);

    for row in rows {
        let d = &row.delivery;
        csv.push_record(&[
            d.pickup_code.clone(),
            row.resident_name.clone(),
            row.apartment_label(),
            row.employee_name.clone().unwrap_or_default(),
            d.status.label().to_string(),
            format_date_time(d.arrived_at),
            d.picked_up_at.map(format_date_time).unwrap_or_default(),
            reminder_status(row),
            d.last_reminder_at.map(format_date_time).unwrap_or_default(),
            combined_notes(row),
        ]);
    }

    csv.finish()
}

pub fn summarize(rows: &[DeliveryDetail]) -> ReportSummary {
    rows.iter().fold(ReportSummary::default(), |mut acc, row| {
        acc.total += 1;
        match row.delivery.status {
            DeliveryStatus::Pending => acc.pending += 1,
            DeliveryStatus::PickedUp => acc.picked_up += 1,
            DeliveryStatus::Cancelled => acc.cancelled += 1,
        }
        if row.delivery.last_reminder_at.is_some() {
            acc.reminders_sent += 1;
        }
        acc
    })
}

#[derive(Clone)]
pub struct ReportService {
    deliveries: Arc<dyn DeliveryStore>,
}

impl ReportService {
    pub fn new(deliveries: Arc<dyn DeliveryStore>) -> Self {
        Self { deliveries }
    }

    pub async fn list(
        &self,
        condominium_id: Uuid,
        filter: &DeliveryFilter,
    ) -> Result<Vec<DeliveryDetail>, AppError> {
        if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "A data inicial deve ser anterior à data final.".into(),
                ));
            }
        }
        self.deliveries.list(condominium_id, filter, Utc::now()).await
    }

    pub async fn summary(
        &self,
        condominium_id: Uuid,
        filter: &DeliveryFilter,
    ) -> Result<ReportSummary, AppError> {
        let rows = self.list(condominium_id, filter).await?;
        Ok(summarize(&rows))
    }

    pub async fn export_csv(
        &self,
        condominium_id: Uuid,
        filter: &DeliveryFilter,
    ) -> Result<CsvExport, AppError> {
        let rows = self.list(condominium_id, filter).await?;
        tracing::info!("📄 Exportando relatório com {} entregas", rows.len());

        Ok(CsvExport {
            filename: csv_filename(Utc::now().date_naive()),
            content: to_csv(&rows),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::detail_fixture;
    use chrono::TimeZone;

    fn record_count(csv: &str) -> usize {
        csv.split("\r\n").count()
    }

    #[test]
    fn csv_has_header_plus_one_record_per_row() {
        let rows: Vec<DeliveryDetail> = (0..3)
            .map(|i| {
                let mut d = detail_fixture(&format!("1000{}", i), "Maria Souza", "101", Some("A"));
                d.delivery.notes = Some("linha 1\nlinha 2".into());
                d
            })
            .collect();

        let csv = to_csv(&rows);

        assert!(csv.starts_with('\u{FEFF}'));
        assert!(csv.contains(&CSV_HEADERS.join(";")));
        // As quebras de linha internas ficam entre aspas e não viram registros
        assert_eq!(csv.matches("\r\n").count(), 3);
        assert_eq!(record_count(&csv), 4);
    }

    #[test]
    fn empty_report_is_only_the_header() {
        assert_eq!(record_count(&to_csv(&[])), 1);
    }

    #[test]
    fn row_formats_dates_notes_and_reminder() {
        let mut d = detail_fixture("48213", "Souza; Maria", "101", Some("A"));
        d.employee_name = Some("João".into());
        d.delivery.arrived_at = Utc.with_ymd_and_hms(2025, 3, 10, 15, 5, 0).single().expect("data");
        d.delivery.notes = Some("Caixa".into());
        d.delivery.pickup_note = Some("Vizinho".into());
        d.delivery.status = DeliveryStatus::PickedUp;
        d.delivery.picked_up_at =
            Some(Utc.with_ymd_and_hms(2025, 3, 11, 12, 0, 0).single().expect("data"));

        let csv = to_csv(&[d]);
        let row = csv.split("\r\n").nth(1).expect("linha");

        assert_eq!(
            row,
            "48213;\"Souza; Maria\";A-101;João;Retirada;10/03/2025 12:05;11/03/2025 09:00;N/A;;Caixa | Retirada: Vizinho"
        );
    }

    #[test]
    fn reminder_status_of_pending_rows() {
        let mut d = detail_fixture("48213", "Maria", "101", None);
        assert_eq!(reminder_status(&d), "Não enviado");

        d.delivery.last_reminder_at =
            Some(Utc.with_ymd_and_hms(2025, 3, 12, 13, 0, 0).single().expect("data"));
        assert_eq!(reminder_status(&d), "Enviado em 12/03/2025");
    }

    #[test]
    fn summary_counts_each_status() {
        let mut rows = vec![
            detail_fixture("10001", "A", "1", None),
            detail_fixture("10002", "B", "2", None),
            detail_fixture("10003", "C", "3", None),
        ];
        rows[1].delivery.status = DeliveryStatus::PickedUp;
        rows[2].delivery.status = DeliveryStatus::Cancelled;
        rows[0].delivery.last_reminder_at = Some(Utc::now());

        assert_eq!(
            summarize(&rows),
            ReportSummary { total: 3, pending: 1, picked_up: 1, cancelled: 1, reminders_sent: 1 }
        );
    }

    #[test]
    fn filename_uses_iso_date() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 5).expect("data");
        assert_eq!(csv_filename(day), "relatorio_entregas_2025-01-05.csv");
    }
}
