// src/test_support.rs
//
// Fixtures e implementações em memória dos contratos de `db::stores`,
// usadas pelos testes dos serviços (sem Postgres).

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::stores::{CredentialStore, DeliveryStore, ResidentDirectory},
    models::{
        condominium::Condominium,
        delivery::{Delivery, DeliveryDetail, DeliveryFilter, DeliveryStatus, NewDelivery, ReminderState},
        employee::{Employee, EmployeeRole},
        resident::Resident,
        super_admin::SuperAdmin,
    },
    services::notification_service::{Notifier, NotifyError, OutboundMessage},
};

// Custo mínimo do bcrypt para os testes não ficarem lentos
const TEST_BCRYPT_COST: u32 = 4;

pub fn condominium(name: &str) -> Condominium {
    let now = Utc::now();
    Condominium {
        id: Uuid::new_v4(),
        name: name.to_string(),
        address: "Rua das Flores, 100".into(),
        city: "São Paulo".into(),
        postal_code: "01310-100".into(),
        phone: Some("(11) 3333-4444".into()),
        syndic_name: Some("Carlos Lima".into()),
        syndic_cpf: None,
        syndic_password_hash: None,
        syndic_phone: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn employee(condo: &Condominium, cpf: &str, password: &str, role: EmployeeRole) -> Employee {
    let now = Utc::now();
    Employee {
        id: Uuid::new_v4(),
        condominium_id: condo.id,
        cpf: cpf.to_string(),
        password_hash: bcrypt::hash(password, TEST_BCRYPT_COST).expect("hash"),
        name: "João da Portaria".into(),
        role,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn super_admin(cpf: &str, password: &str) -> SuperAdmin {
    let now = Utc::now();
    SuperAdmin {
        id: Uuid::new_v4(),
        cpf: cpf.to_string(),
        password_hash: bcrypt::hash(password, TEST_BCRYPT_COST).expect("hash"),
        name: "Admin Geral".into(),
        active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn resident(condo: &Condominium, name: &str, apartment: &str, block: Option<&str>) -> Resident {
    let now = Utc::now();
    Resident {
        id: Uuid::new_v4(),
        condominium_id: condo.id,
        name: name.to_string(),
        apartment: apartment.to_string(),
        block: block.map(str::to_string),
        phone: "5511999991111".into(),
        active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Entrega pendente pronta, sem store por trás.
pub fn detail_fixture(code: &str, name: &str, apartment: &str, block: Option<&str>) -> DeliveryDetail {
    let now = Utc::now();
    DeliveryDetail {
        delivery: Delivery {
            id: Uuid::new_v4(),
            condominium_id: Uuid::new_v4(),
            resident_id: Uuid::new_v4(),
            employee_id: None,
            pickup_code: code.to_string(),
            status: DeliveryStatus::Pending,
            arrived_at: now,
            picked_up_at: None,
            notes: None,
            pickup_note: None,
            photo_url: None,
            last_reminder_at: None,
            message_sent: false,
            created_at: now,
            updated_at: now,
        },
        resident_name: name.to_string(),
        resident_apartment: apartment.to_string(),
        resident_block: block.map(str::to_string),
        resident_phone: "5511999991111".into(),
        employee_name: None,
        condominium_name: "Residencial Aurora".into(),
    }
}

// ---
// Credenciais
// ---
#[derive(Default)]
pub struct InMemoryCredentials {
    super_admins: Mutex<Vec<SuperAdmin>>,
    employees: Mutex<Vec<Employee>>,
    condominiums: Mutex<Vec<Condominium>>,
    /// Quantas consultas chegaram ao "banco"
    pub lookups: AtomicUsize,
}

impl InMemoryCredentials {
    pub fn add_super_admin(&self, admin: SuperAdmin) {
        self.super_admins.lock().unwrap().push(admin);
    }

    pub fn add_employee(&self, employee: Employee) {
        self.employees.lock().unwrap().push(employee);
    }

    pub fn add_condominium(&self, condominium: Condominium) {
        self.condominiums.lock().unwrap().push(condominium);
    }

    /// Altera um condomínio direto no "banco" (ex.: troca de síndico).
    pub fn update_condominium<F: FnOnce(&mut Condominium)>(&self, id: Uuid, f: F) {
        if let Some(c) = self.condominiums.lock().unwrap().iter_mut().find(|c| c.id == id) {
            f(c);
        }
    }

    pub fn deactivate_employee(&self, id: Uuid) {
        for e in self.employees.lock().unwrap().iter_mut().filter(|e| e.id == id) {
            e.active = false;
        }
    }

    fn touch(&self) {
        self.lookups.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentials {
    async fn active_super_admin_by_cpf(&self, cpf: &str) -> Result<Option<SuperAdmin>, AppError> {
        self.touch();
        let admins = self.super_admins.lock().unwrap();
        Ok(admins.iter().find(|a| a.cpf == cpf && a.active).cloned())
    }

    async fn active_employee_by_cpf(&self, cpf: &str) -> Result<Option<Employee>, AppError> {
        self.touch();
        let employees = self.employees.lock().unwrap();
        Ok(employees.iter().find(|e| e.cpf == cpf && e.active).cloned())
    }

    async fn condominiums_by_syndic_cpf(&self, cpf: &str) -> Result<Vec<Condominium>, AppError> {
        self.touch();
        let condominiums = self.condominiums.lock().unwrap();
        Ok(condominiums
            .iter()
            .filter(|c| c.syndic_cpf.as_deref() == Some(cpf) && c.syndic_password_hash.is_some())
            .cloned()
            .collect())
    }

    async fn super_admin_by_id(&self, id: Uuid) -> Result<Option<SuperAdmin>, AppError> {
        self.touch();
        Ok(self.super_admins.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn employee_by_id(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        self.touch();
        Ok(self.employees.lock().unwrap().iter().find(|e| e.id == id).cloned())
    }

    async fn condominium_by_id(&self, id: Uuid) -> Result<Option<Condominium>, AppError> {
        self.touch();
        Ok(self.condominiums.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }
}

// ---
// Entregas + moradores
// ---
#[derive(Default)]
pub struct InMemoryDeliveries {
    condominiums: Mutex<Vec<Condominium>>,
    residents: Mutex<Vec<Resident>>,
    employees: Mutex<Vec<Employee>>,
    deliveries: Mutex<Vec<Delivery>>,
    /// Próximos N inserts falham como colisão de código
    pub forced_collisions: AtomicUsize,
    pub insert_attempts: AtomicUsize,
    /// Simula erro do banco ao gravar o lembrete
    pub reminder_marks_fail: AtomicBool,
}

impl InMemoryDeliveries {
    pub fn add_condominium(&self, condominium: Condominium) {
        self.condominiums.lock().unwrap().push(condominium);
    }

    pub fn add_resident(&self, resident: Resident) {
        self.residents.lock().unwrap().push(resident);
    }

    pub fn add_employee(&self, employee: Employee) {
        self.employees.lock().unwrap().push(employee);
    }

    pub fn all(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Ajusta uma entrega direto no "banco" (ex.: envelhecer a data de chegada).
    pub fn update<F: FnOnce(&mut Delivery)>(&self, id: Uuid, f: F) {
        if let Some(d) = self.deliveries.lock().unwrap().iter_mut().find(|d| d.id == id) {
            f(d);
        }
    }

    fn to_detail(&self, delivery: &Delivery) -> Option<DeliveryDetail> {
        let residents = self.residents.lock().unwrap();
        let resident = residents.iter().find(|r| r.id == delivery.resident_id)?;
        let condominiums = self.condominiums.lock().unwrap();
        let condominium = condominiums.iter().find(|c| c.id == delivery.condominium_id)?;
        let employee_name = delivery.employee_id.and_then(|id| {
            self.employees
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.name.clone())
        });

        Some(DeliveryDetail {
            delivery: delivery.clone(),
            resident_name: resident.name.clone(),
            resident_apartment: resident.apartment.clone(),
            resident_block: resident.block.clone(),
            resident_phone: resident.phone.clone(),
            employee_name,
            condominium_name: condominium.name.clone(),
        })
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_filter(detail: &DeliveryDetail, filter: &DeliveryFilter, now: DateTime<Utc>) -> bool {
    let d = &detail.delivery;
    if filter.status.is_some_and(|s| s != d.status) {
        return false;
    }
    if let Some(from) = filter.date_from {
        if d.arrived_at < from.and_time(NaiveTime::MIN).and_utc() {
            return false;
        }
    }
    if let Some(to) = filter.date_to {
        if d.arrived_at >= to.and_time(NaiveTime::MIN).and_utc() + Duration::days(1) {
            return false;
        }
    }
    if filter.employee_id.is_some() && filter.employee_id != d.employee_id {
        return false;
    }
    if filter.resident_id.is_some_and(|id| id != d.resident_id) {
        return false;
    }
    match filter.reminder {
        Some(ReminderState::Sent) if d.last_reminder_at.is_none() => return false,
        Some(ReminderState::NotSent)
            if d.last_reminder_at.is_some() || d.status != DeliveryStatus::Pending =>
        {
            return false;
        }
        _ => {}
    }
    if let Some(days) = filter.min_days_pending {
        if d.status != DeliveryStatus::Pending || d.arrived_at > now - Duration::days(days.max(0)) {
            return false;
        }
    }
    if let Some(term) = filter.search_term() {
        let hit = contains_ci(&d.pickup_code, term)
            || contains_ci(&detail.resident_name, term)
            || contains_ci(&detail.resident_apartment, term)
            || detail.resident_block.as_deref().is_some_and(|b| contains_ci(b, term))
            || detail.employee_name.as_deref().is_some_and(|e| contains_ci(e, term));
        if !hit {
            return false;
        }
    }
    true
}

#[async_trait]
impl ResidentDirectory for InMemoryDeliveries {
    async fn find_by_apartment(
        &self,
        condominium_id: Uuid,
        apartment: &str,
        block: Option<&str>,
    ) -> Result<Vec<Resident>, AppError> {
        let block = block.map(str::trim).filter(|b| !b.is_empty());
        let residents = self.residents.lock().unwrap();
        Ok(residents
            .iter()
            .filter(|r| r.condominium_id == condominium_id && r.active)
            .filter(|r| r.apartment == apartment.trim())
            .filter(|r| match block {
                Some(b) => r.block.as_deref().is_some_and(|rb| rb.eq_ignore_ascii_case(b)),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn find_active(
        &self,
        condominium_id: Uuid,
        resident_id: Uuid,
    ) -> Result<Option<Resident>, AppError> {
        let residents = self.residents.lock().unwrap();
        Ok(residents
            .iter()
            .find(|r| r.condominium_id == condominium_id && r.id == resident_id && r.active)
            .cloned())
    }
}

#[async_trait]
impl DeliveryStore for InMemoryDeliveries {
    async fn insert(&self, new_delivery: &NewDelivery) -> Result<Delivery, AppError> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        let forced = self
            .forced_collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        let mut deliveries = self.deliveries.lock().unwrap();
        let clash = deliveries.iter().any(|d| {
            d.condominium_id == new_delivery.condominium_id
                && d.pickup_code == new_delivery.pickup_code
                && d.status == DeliveryStatus::Pending
        });
        if forced || clash {
            return Err(AppError::UniqueConstraintViolation("Código de retirada já em uso.".into()));
        }

        let now = Utc::now();
        let delivery = Delivery {
            id: Uuid::new_v4(),
            condominium_id: new_delivery.condominium_id,
            resident_id: new_delivery.resident_id,
            employee_id: new_delivery.employee_id,
            pickup_code: new_delivery.pickup_code.clone(),
            status: DeliveryStatus::Pending,
            arrived_at: now,
            picked_up_at: None,
            notes: new_delivery.notes.clone(),
            pickup_note: None,
            photo_url: new_delivery.photo_url.clone(),
            last_reminder_at: None,
            message_sent: false,
            created_at: now,
            updated_at: now,
        };
        deliveries.push(delivery.clone());
        Ok(delivery)
    }

    async fn detail(
        &self,
        condominium_id: Uuid,
        delivery_id: Uuid,
    ) -> Result<Option<DeliveryDetail>, AppError> {
        let found = self
            .deliveries
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.condominium_id == condominium_id && d.id == delivery_id)
            .cloned();
        Ok(found.and_then(|d| self.to_detail(&d)))
    }

    async fn latest_by_code(
        &self,
        condominium_id: Uuid,
        code: &str,
    ) -> Result<Option<DeliveryDetail>, AppError> {
        let found = self
            .deliveries
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.condominium_id == condominium_id && d.pickup_code == code)
            .max_by_key(|d| (d.status == DeliveryStatus::Pending, d.arrived_at))
            .cloned();
        Ok(found.and_then(|d| self.to_detail(&d)))
    }

    async fn confirm_pickup(
        &self,
        condominium_id: Uuid,
        code: &str,
        note: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<Option<Delivery>, AppError> {
        let mut deliveries = self.deliveries.lock().unwrap();
        let Some(d) = deliveries.iter_mut().find(|d| {
            d.condominium_id == condominium_id
                && d.pickup_code == code
                && d.status == DeliveryStatus::Pending
        }) else {
            return Ok(None);
        };
        d.status = DeliveryStatus::PickedUp;
        d.picked_up_at = Some(at);
        d.pickup_note = note.map(str::to_string);
        d.updated_at = at;
        Ok(Some(d.clone()))
    }

    async fn cancel(
        &self,
        condominium_id: Uuid,
        delivery_id: Uuid,
    ) -> Result<Option<Delivery>, AppError> {
        let mut deliveries = self.deliveries.lock().unwrap();
        let Some(d) = deliveries.iter_mut().find(|d| {
            d.condominium_id == condominium_id
                && d.id == delivery_id
                && d.status == DeliveryStatus::Pending
        }) else {
            return Ok(None);
        };
        d.status = DeliveryStatus::Cancelled;
        Ok(Some(d.clone()))
    }

    async fn mark_message_sent(&self, delivery_id: Uuid) -> Result<(), AppError> {
        self.update(delivery_id, |d| d.message_sent = true);
        Ok(())
    }

    async fn mark_reminder_sent(&self, delivery_id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        if self.reminder_marks_fail.load(Ordering::SeqCst) {
            return Err(AppError::InternalServerError(anyhow::anyhow!("falha simulada")));
        }
        self.update(delivery_id, |d| d.last_reminder_at = Some(at));
        Ok(())
    }

    async fn list(
        &self,
        condominium_id: Uuid,
        filter: &DeliveryFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<DeliveryDetail>, AppError> {
        let scoped: Vec<Delivery> = self
            .deliveries
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.condominium_id == condominium_id)
            .cloned()
            .collect();

        let mut details: Vec<DeliveryDetail> = scoped
            .iter()
            .filter_map(|d| self.to_detail(d))
            .filter(|detail| matches_filter(detail, filter, now))
            .collect();
        details.sort_by(|a, b| b.delivery.arrived_at.cmp(&a.delivery.arrived_at));
        Ok(details)
    }
}

// ---
// Notificações
// ---
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OutboundMessage>>,
    pub failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            failing: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Status(502));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
