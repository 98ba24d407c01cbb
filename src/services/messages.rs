// src/services/messages.rs
//
// Textos enviados por WhatsApp. Datas e horas no fuso de Brasília.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{common::error::AppError, models::delivery::DeliveryDetail};

const FOOTER: &str = "Não responda esta mensagem, este é um atendimento automático.";
const DEFAULT_CONDOMINIUM: &str = "Condomínio";

// Brasília não tem mais horário de verão: UTC-3 fixo
const BRASILIA_OFFSET_SECS: i32 = 3 * 3600;

pub fn brasilia() -> FixedOffset {
    FixedOffset::west_opt(BRASILIA_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// dd/mm/aaaa
pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&brasilia()).format("%d/%m/%Y").to_string()
}

/// HH:MM
pub fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&brasilia()).format("%H:%M").to_string()
}

/// dd/mm/aaaa HH:MM
pub fn format_date_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&brasilia()).format("%d/%m/%Y %H:%M").to_string()
}

fn condominium_name(name: &str) -> &str {
    if name.trim().is_empty() {
        DEFAULT_CONDOMINIUM
    } else {
        name
    }
}

fn days_word(days: i64) -> &'static str {
    if days == 1 { "dia" } else { "dias" }
}

pub fn new_delivery(detail: &DeliveryDetail, at: DateTime<Utc>) -> String {
    format!(
        "🏢 *{condo}*\n\n📦 *Nova Encomenda Chegou!*\n\nOlá *{name}*, você tem uma nova encomenda!\n\n\
         📅 Data: {date}\n⏰ Hora: {time}\n🔑 Código de retirada: *{code}*\n\n\
         Para retirar, apresente este código na portaria.\n\n{FOOTER}",
        condo = condominium_name(&detail.condominium_name),
        name = detail.resident_name,
        date = format_date(at),
        time = format_time(at),
        code = detail.delivery.pickup_code,
    )
}

pub fn pickup_confirmed(detail: &DeliveryDetail, at: DateTime<Utc>) -> String {
    let note = detail
        .delivery
        .pickup_note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| format!("\n📝 {}", n))
        .unwrap_or_default();

    format!(
        "🏢 *{condo}*\n\n✅ *Encomenda Retirada*\n\nOlá *{name}*, sua encomenda foi retirada com sucesso!\n\n\
         📅 Data: {date}\n⏰ Hora: {time}\n🔑 Código: {code}{note}\n\n{FOOTER}",
        condo = condominium_name(&detail.condominium_name),
        name = detail.resident_name,
        date = format_date(at),
        time = format_time(at),
        code = detail.delivery.pickup_code,
    )
}

/// Modelo escolhido na tela de lembretes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Padrao,
    Urgente,
    Personalizado,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderTemplate {
    Padrao,
    Urgente,
    /// Texto livre com [NOME], [CODIGO], [APARTAMENTO], [DIAS], [DATA], [CONDOMINIO]
    Personalizado(String),
}

impl ReminderTemplate {
    pub fn from_request(kind: ReminderKind, custom_message: Option<String>) -> Result<Self, AppError> {
        match kind {
            ReminderKind::Padrao => Ok(Self::Padrao),
            ReminderKind::Urgente => Ok(Self::Urgente),
            ReminderKind::Personalizado => custom_message
                .filter(|m| !m.trim().is_empty())
                .map(Self::Personalizado)
                .ok_or_else(|| AppError::BadRequest("Mensagem personalizada é obrigatória.".into())),
        }
    }
}

pub fn reminder(template: &ReminderTemplate, detail: &DeliveryDetail, now: DateTime<Utc>) -> String {
    let condo = condominium_name(&detail.condominium_name);
    let days = detail.days_pending(now);
    let apartment = detail.apartment_label();

    match template {
        ReminderTemplate::Padrao => format!(
            "🏢 *{condo}*\n\n📦 *Lembrete de Encomenda*\n\nOlá *{name}*, você tem uma encomenda \
             aguardando retirada na portaria há {days} {word}.\n\n🔑 Código: {code}\n\
             🏠 Apartamento: {apartment}\n📅 Recebida em: {date}\n\n\
             Por favor, retire sua encomenda o quanto antes.\n\n{FOOTER}",
            name = detail.resident_name,
            word = days_word(days),
            code = detail.delivery.pickup_code,
            date = format_date(detail.delivery.arrived_at),
        ),
        ReminderTemplate::Urgente => format!(
            "⚠️ *{condo}* - URGENTE\n\n📦 *Encomenda Aguardando Retirada*\n\n*{name}*, sua encomenda \
             está na portaria há {days} {word} e precisa ser retirada urgentemente.\n\n\
             🔑 Código: {code}\n🏠 Apartamento: {apartment}\n\n⏰ Por favor, retire hoje mesmo!\n\n{FOOTER}",
            name = detail.resident_name,
            word = days_word(days),
            code = detail.delivery.pickup_code,
        ),
        ReminderTemplate::Personalizado(text) => text
            .replace("[NOME]", &detail.resident_name)
            .replace("[CODIGO]", &detail.delivery.pickup_code)
            .replace("[APARTAMENTO]", &apartment)
            .replace("[DIAS]", &days.to_string())
            .replace("[DATA]", &format_date(detail.delivery.arrived_at))
            .replace("[CONDOMINIO]", condo),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::detail_fixture;
    use chrono::{Duration, TimeZone};

    #[test]
    fn dates_are_rendered_in_brasilia_time() {
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 2, 30, 0).single().expect("data");
        assert_eq!(format_date(at), "09/03/2025");
        assert_eq!(format_time(at), "23:30");
        assert_eq!(format_date_time(at), "09/03/2025 23:30");
    }

    #[test]
    fn new_delivery_message_carries_code_and_name() {
        let detail = detail_fixture("48213", "Maria Souza", "101", Some("A"));
        let text = new_delivery(&detail, Utc::now());

        assert!(text.contains("Olá *Maria Souza*"));
        assert!(text.contains("Código de retirada: *48213*"));
        assert!(text.ends_with(FOOTER));
    }

    #[test]
    fn pickup_message_only_lists_note_when_present() {
        let mut detail = detail_fixture("48213", "Maria Souza", "101", None);
        assert!(!pickup_confirmed(&detail, Utc::now()).contains("📝"));

        detail.delivery.pickup_note = Some("Retirado pelo filho".into());
        assert!(pickup_confirmed(&detail, Utc::now()).contains("📝 Retirado pelo filho"));
    }

    #[test]
    fn custom_reminder_replaces_every_placeholder() {
        let mut detail = detail_fixture("48213", "Maria Souza", "101", Some("A"));
        let now = Utc::now();
        detail.delivery.arrived_at = now - Duration::days(3) - Duration::hours(1);
        let template = ReminderTemplate::Personalizado(
            "[NOME] ([APARTAMENTO]) código [CODIGO], [DIAS] dias em [CONDOMINIO]. [NOME]!".into(),
        );

        let text = reminder(&template, &detail, now);

        assert_eq!(
            text,
            "Maria Souza (A-101) código 48213, 3 dias em Residencial Aurora. Maria Souza!"
        );
    }

    #[test]
    fn custom_template_requires_text() {
        let err = ReminderTemplate::from_request(ReminderKind::Personalizado, Some("  ".into()))
            .expect_err("vazio");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(
            ReminderTemplate::from_request(ReminderKind::Urgente, Some("ignorado".into())).ok(),
            Some(ReminderTemplate::Urgente)
        );
    }

    #[test]
    fn standard_reminder_uses_singular_for_one_day() {
        let mut detail = detail_fixture("48213", "Maria Souza", "101", None);
        let now = Utc::now();
        detail.delivery.arrived_at = now - Duration::hours(30);

        let text = reminder(&ReminderTemplate::Padrao, &detail, now);
        assert!(text.contains("há 1 dia."));
        assert!(text.contains("🏠 Apartamento: 101"));
    }
}
