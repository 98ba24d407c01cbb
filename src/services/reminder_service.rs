// src/services/reminder_service.rs

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::DeliveryStore,
    models::delivery::{DeliveryDetail, DeliveryFilter, DeliveryStatus},
    services::{
        messages::ReminderTemplate,
        notification_service::{Notifier, OutboundMessage},
    },
};

/// Limite de entregas por lote de lembretes.
pub const MAX_REMINDER_BATCH: usize = 100;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingReminder {
    #[serde(flatten)]
    pub delivery: DeliveryDetail,
    pub days_pending: i64,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderBatchResult {
    pub requested: usize,
    pub sent: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct ReminderService {
    deliveries: Arc<dyn DeliveryStore>,
    notifier: Arc<dyn Notifier>,
}

impl ReminderService {
    pub fn new(deliveries: Arc<dyn DeliveryStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { deliveries, notifier }
    }

    /// Pendentes há pelo menos `min_days` dias, mais antigas primeiro.
    pub async fn list(
        &self,
        condominium_id: Uuid,
        min_days: Option<i64>,
        search: Option<String>,
    ) -> Result<Vec<PendingReminder>, AppError> {
        let now = Utc::now();
        let filter = DeliveryFilter {
            min_days_pending: Some(min_days.unwrap_or(0).max(0)),
            search,
            ..DeliveryFilter::pending()
        };

        let mut reminders: Vec<PendingReminder> = self
            .deliveries
            .list(condominium_id, &filter, now)
            .await?
            .into_iter()
            .map(|delivery| PendingReminder {
                days_pending: delivery.days_pending(now),
                delivery,
            })
            .collect();
        reminders.sort_by(|a, b| b.days_pending.cmp(&a.days_pending));

        Ok(reminders)
    }

    /// Envia um lembrete por entrega; cada falha é contada e o lote continua.
    /// IDs repetidos recebem um único lembrete.
    pub async fn send(
        &self,
        condominium_id: Uuid,
        delivery_ids: &[Uuid],
        template: &ReminderTemplate,
    ) -> Result<ReminderBatchResult, AppError> {
        let mut seen = HashSet::new();
        let unique_ids: Vec<Uuid> = delivery_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        if unique_ids.is_empty() {
            return Err(AppError::BadRequest("Selecione ao menos uma entrega.".into()));
        }
        if unique_ids.len() > MAX_REMINDER_BATCH {
            return Err(AppError::BadRequest(format!(
                "Máximo de {} entregas por envio.",
                MAX_REMINDER_BATCH
            )));
        }

        let mut result = ReminderBatchResult {
            requested: unique_ids.len(),
            ..Default::default()
        };

        for id in unique_ids {
            let now = Utc::now();
            let detail = match self.deliveries.detail(condominium_id, id).await {
                Ok(Some(d)) if d.delivery.status == DeliveryStatus::Pending => d,
                Ok(_) => {
                    tracing::warn!("Lembrete ignorado: entrega {} não está pendente", id);
                    result.failed += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Lembrete da entrega {} não enviado: {}", id, e);
                    result.failed += 1;
                    continue;
                }
            };

            let message = OutboundMessage::reminder(&detail, template, now);
            match self.notifier.send(&message).await {
                Ok(()) => {
                    // A mensagem já saiu; falha ao gravar só fica no log
                    if let Err(e) = self.deliveries.mark_reminder_sent(id, now).await {
                        tracing::warn!("Lembrete da entrega {} enviado mas não registrado: {}", id, e);
                    }
                    result.sent += 1;
                }
                Err(e) => {
                    tracing::warn!("Lembrete da entrega {} não enviado: {}", id, e);
                    result.failed += 1;
                }
            }
        }

        tracing::info!(
            "🔔 Lembretes: {} enviados, {} falharam de {}",
            result.sent,
            result.failed,
            result.requested
        );
        Ok(result)
    }
}
