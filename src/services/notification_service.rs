// src/services/notification_service.rs

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{models::delivery::DeliveryDetail, services::messages};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Delivery,
    Withdrawal,
    Reminder,
}

/// Dados estruturados que acompanham a mensagem (o gateway monta a mídia com eles).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "morador")]
    pub resident: String,
    #[serde(rename = "apartamento")]
    pub apartment: String,
    #[serde(rename = "bloco")]
    pub block: Option<String>,
    #[serde(rename = "observacoes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "foto_url")]
    pub photo_url: Option<String>,
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "condominio")]
    pub condominium: String,
    #[serde(rename = "dias_pendente", skip_serializing_if = "Option::is_none")]
    pub days_pending: Option<i64>,
}

impl MessageData {
    fn from_detail(detail: &DeliveryDetail, at: DateTime<Utc>) -> Self {
        Self {
            code: detail.delivery.pickup_code.clone(),
            resident: detail.resident_name.clone(),
            apartment: detail.resident_apartment.clone(),
            block: detail.resident_block.clone(),
            notes: None,
            description: None,
            photo_url: detail.delivery.photo_url.clone(),
            date: messages::format_date(at),
            time: messages::format_time(at),
            condominium: detail.condominium_name.clone(),
            days_pending: None,
        }
    }
}

/// Corpo enviado ao webhook de WhatsApp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub to: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_data: Option<MessageData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal_data: Option<MessageData>,
    pub timestamp: DateTime<Utc>,
}

impl OutboundMessage {
    pub fn new_delivery(detail: &DeliveryDetail, at: DateTime<Utc>) -> Self {
        let mut data = MessageData::from_detail(detail, at);
        data.notes = detail.delivery.notes.clone();

        Self {
            to: detail.resident_phone.clone(),
            message: messages::new_delivery(detail, at),
            kind: MessageKind::Delivery,
            delivery_data: Some(data),
            withdrawal_data: None,
            timestamp: at,
        }
    }

    pub fn pickup_confirmed(detail: &DeliveryDetail, at: DateTime<Utc>) -> Self {
        let mut data = MessageData::from_detail(detail, at);
        data.description = detail.delivery.pickup_note.clone();

        Self {
            to: detail.resident_phone.clone(),
            message: messages::pickup_confirmed(detail, at),
            kind: MessageKind::Withdrawal,
            delivery_data: None,
            withdrawal_data: Some(data),
            timestamp: at,
        }
    }

    pub fn reminder(
        detail: &DeliveryDetail,
        template: &messages::ReminderTemplate,
        now: DateTime<Utc>,
    ) -> Self {
        let mut data = MessageData::from_detail(detail, detail.delivery.arrived_at);
        data.days_pending = Some(detail.days_pending(now));

        Self {
            to: detail.resident_phone.clone(),
            message: messages::reminder(template, detail, now),
            kind: MessageKind::Reminder,
            delivery_data: Some(data),
            withdrawal_data: None,
            timestamp: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("falha de transporte: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook respondeu HTTP {0}")]
    Status(u16),
}

/// Canal de saída das notificações. Falhas nunca desfazem a operação que as disparou.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError>;
}

/// Envia para o webhook principal e, se falhar, tenta o reserva uma única vez.
pub struct WebhookNotifier {
    client: reqwest::Client,
    primary_url: String,
    fallback_url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(
        primary_url: String,
        fallback_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, primary_url, fallback_url })
    }

    async fn post(&self, url: &str, message: &OutboundMessage) -> Result<(), NotifyError> {
        let response = self.client.post(url).json(message).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        let primary_error = match self.post(&self.primary_url, message).await {
            Ok(()) => {
                tracing::info!("📨 Mensagem {:?} enviada para {}", message.kind, message.to);
                return Ok(());
            }
            Err(e) => e,
        };

        let Some(fallback_url) = self.fallback_url.as_deref() else {
            return Err(primary_error);
        };

        tracing::warn!("Webhook principal falhou ({}), tentando o reserva", primary_error);
        self.post(fallback_url, message).await?;
        tracing::info!("📨 Mensagem {:?} enviada pelo webhook reserva", message.kind);
        Ok(())
    }
}
