// src/services/delivery_service.rs

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::{DeliveryStore, ResidentDirectory},
    models::{
        auth::Session,
        delivery::{DeliveryDetail, DeliveryFilter, DeliveryStatus, NewDelivery},
        resident::Resident,
    },
    services::notification_service::{Notifier, OutboundMessage},
};

// Colisões são raras (90 mil códigos por condomínio); poucas tentativas bastam
const MAX_CODE_ATTEMPTS: usize = 5;

/// Código numérico de 5 dígitos (10000..=99999).
pub fn generate_pickup_code<R: Rng>(rng: &mut R) -> String {
    rng.gen_range(10_000..=99_999u32).to_string()
}

fn validate_code(code: &str) -> Result<&str, AppError> {
    let code = code.trim();
    if code.len() != 5 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::BadRequest("O código de retirada deve ter 5 dígitos.".into()));
    }
    Ok(code)
}

fn clean(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Dados informados pela portaria ao registrar uma encomenda.
#[derive(Debug, Clone, Default)]
pub struct RegisterDelivery {
    pub resident_id: Uuid,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}

/// Resultado de uma operação que dispara WhatsApp.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotifiedDelivery {
    pub delivery: DeliveryDetail,
    /// `false` quando o webhook falhou; a operação em si foi concluída
    pub notified: bool,
}

#[derive(Clone)]
pub struct DeliveryService {
    deliveries: Arc<dyn DeliveryStore>,
    residents: Arc<dyn ResidentDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl DeliveryService {
    pub fn new(
        deliveries: Arc<dyn DeliveryStore>,
        residents: Arc<dyn ResidentDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { deliveries, residents, notifier }
    }

    pub async fn find_residents(
        &self,
        condominium_id: Uuid,
        apartment: &str,
        block: Option<&str>,
    ) -> Result<Vec<Resident>, AppError> {
        if apartment.trim().is_empty() {
            return Err(AppError::BadRequest("Informe o apartamento.".into()));
        }
        self.residents.find_by_apartment(condominium_id, apartment, block).await
    }

    /// Registra a encomenda com um código novo e avisa o morador.
    pub async fn register(
        &self,
        condominium_id: Uuid,
        session: &Session,
        payload: RegisterDelivery,
    ) -> Result<NotifiedDelivery, AppError> {
        let resident = self
            .residents
            .find_active(condominium_id, payload.resident_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Morador".into()))?;

        let mut new_delivery = NewDelivery {
            condominium_id,
            resident_id: resident.id,
            employee_id: session.employee_id(),
            pickup_code: String::new(),
            notes: clean(payload.notes),
            photo_url: clean(payload.photo_url),
        };

        let mut attempt = 0;
        let delivery = loop {
            attempt += 1;
            new_delivery.pickup_code = generate_pickup_code(&mut rand::thread_rng());
            match self.deliveries.insert(&new_delivery).await {
                Ok(delivery) => break delivery,
                Err(AppError::UniqueConstraintViolation(_)) if attempt < MAX_CODE_ATTEMPTS => {
                    tracing::warn!("Código {} já pendente, gerando outro", new_delivery.pickup_code);
                }
                Err(e) => return Err(e),
            }
        };

        tracing::info!(
            "📦 Entrega {} registrada para {} (código {})",
            delivery.id,
            resident.name,
            delivery.pickup_code
        );

        let mut detail = self
            .deliveries
            .detail(condominium_id, delivery.id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Entrega".into()))?;

        let message = OutboundMessage::new_delivery(&detail, Utc::now());
        let notified = match self.notifier.send(&message).await {
            Ok(()) => {
                if let Err(e) = self.deliveries.mark_message_sent(delivery.id).await {
                    tracing::warn!("Não foi possível marcar a mensagem como enviada: {}", e);
                }
                detail.delivery.message_sent = true;
                true
            }
            Err(e) => {
                tracing::warn!("WhatsApp da entrega {} não enviado: {}", delivery.id, e);
                false
            }
        };

        Ok(NotifiedDelivery { delivery: detail, notified })
    }

    /// Entrega pendente com o código; 404 se não existe, 409 se já saiu.
    pub async fn find_pending_by_code(
        &self,
        condominium_id: Uuid,
        code: &str,
    ) -> Result<DeliveryDetail, AppError> {
        let code = validate_code(code)?;
        let detail = self
            .deliveries
            .latest_by_code(condominium_id, code)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Encomenda".into()))?;

        match detail.delivery.status {
            DeliveryStatus::Pending => Ok(detail),
            DeliveryStatus::PickedUp => Err(AppError::PickupAlreadyConfirmed),
            DeliveryStatus::Cancelled => Err(AppError::DeliveryCancelled),
        }
    }

    /// pendente -> retirada em um único update condicional; só então notifica.
    pub async fn confirm_pickup(
        &self,
        condominium_id: Uuid,
        code: &str,
        note: Option<String>,
    ) -> Result<NotifiedDelivery, AppError> {
        let code = validate_code(code)?;
        let note = clean(note);
        let now = Utc::now();

        let Some(updated) = self
            .deliveries
            .confirm_pickup(condominium_id, code, note.as_deref(), now)
            .await?
        else {
            // Nada mudou: descobre o motivo para devolver 404 ou 409
            return Err(match self.deliveries.latest_by_code(condominium_id, code).await? {
                None => AppError::ResourceNotFound("Encomenda".into()),
                Some(d) if d.delivery.status == DeliveryStatus::Cancelled => {
                    AppError::DeliveryCancelled
                }
                Some(_) => AppError::PickupAlreadyConfirmed,
            });
        };

        tracing::info!("✅ Entrega {} retirada (código {})", updated.id, code);

        let detail = self
            .deliveries
            .detail(condominium_id, updated.id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Entrega".into()))?;

        let message = OutboundMessage::pickup_confirmed(&detail, now);
        let notified = match self.notifier.send(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("WhatsApp de retirada {} não enviado: {}", updated.id, e);
                false
            }
        };

        Ok(NotifiedDelivery { delivery: detail, notified })
    }

    pub async fn cancel(&self, condominium_id: Uuid, id: Uuid) -> Result<DeliveryDetail, AppError> {
        if self.deliveries.cancel(condominium_id, id).await?.is_none() {
            let existing = self
                .deliveries
                .detail(condominium_id, id)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound("Entrega".into()))?;
            return Err(match existing.delivery.status {
                DeliveryStatus::Cancelled => AppError::DeliveryCancelled,
                _ => AppError::PickupAlreadyConfirmed,
            });
        }

        tracing::info!("🚫 Entrega {} cancelada", id);
        self.get(condominium_id, id).await
    }

    pub async fn get(&self, condominium_id: Uuid, id: Uuid) -> Result<DeliveryDetail, AppError> {
        self.deliveries
            .detail(condominium_id, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Entrega".into()))
    }

    pub async fn list_pending(
        &self,
        condominium_id: Uuid,
        search: Option<String>,
    ) -> Result<Vec<DeliveryDetail>, AppError> {
        let filter = DeliveryFilter {
            search,
            ..DeliveryFilter::pending()
        };
        self.deliveries.list(condominium_id, &filter, Utc::now()).await
    }
}
