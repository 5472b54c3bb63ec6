//! In-memory repositories.
//!
//! [`MemoryStore`] implements every repository port over mutex-guarded maps
//! keyed by id, so iteration order matches primary-key order. It mirrors the
//! relational constraints of the SQL schema: unique user e-mails, foreign
//! keys checked on write and cascading deletes. The server uses it when no
//! database URL is configured; HTTP tests use it for realistic fixtures.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    DeliveryProblemRepository, DeliveryRepository, DeliverymanRepository, ListFilter,
    PersistenceError, RecipientRepository, UserRepository,
};
use crate::domain::{
    Delivery, DeliveryChanges, DeliveryId, DeliveryProblem, DeliveryProblemChanges,
    DeliverySnapshot, Deliveryman, DeliverymanChanges, DeliverymanId, Email, NewDelivery,
    NewDeliveryProblem, NewDeliveryman, NewRecipient, NewUser, ProblemId, ProblemWithDelivery,
    Recipient, RecipientChanges, RecipientId, User, UserChanges, UserId,
};

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

// Derived `Default` would require `T: Default`.
impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn get(&self, id: i32) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn page(&self, filter: &ListFilter, text: impl Fn(&T) -> &str) -> Vec<T> {
        self.rows
            .values()
            .filter(|row| filter.matches(text(row)))
            .skip(filter.page.offset_usize())
            .take(filter.page.limit_usize())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Default)]
struct State {
    users: Table<User>,
    deliverymen: Table<Deliveryman>,
    recipients: Table<Recipient>,
    deliveries: Table<Delivery>,
    problems: Table<DeliveryProblem>,
}

impl State {
    fn remove_deliveries_where(&mut self, predicate: impl Fn(&Delivery) -> bool) {
        let doomed: Vec<i32> = self
            .deliveries
            .rows
            .iter()
            .filter(|(_, delivery)| predicate(delivery))
            .map(|(id, _)| *id)
            .collect();
        for id in doomed {
            self.remove_delivery(id);
        }
    }

    fn remove_delivery(&mut self, id: i32) -> bool {
        let removed = self.deliveries.rows.remove(&id).is_some();
        self.problems
            .rows
            .retain(|_, problem| problem.delivery_id.get() != id);
        removed
    }

    fn with_delivery(&self, problem: DeliveryProblem) -> Option<ProblemWithDelivery> {
        let delivery = self.deliveries.get(problem.delivery_id.get())?;
        Some(ProblemWithDelivery { problem, delivery })
    }

    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.users
            .rows
            .values()
            .any(|user| user.email == *email && Some(user.id) != except)
    }
}

/// Thread-safe in-memory implementation of every repository port.
///
/// # Examples
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use backend::domain::ports::RecipientRepository;
/// use backend::domain::NewRecipient;
/// use backend::outbound::memory::MemoryStore;
///
/// let store = MemoryStore::default();
/// let recipient = store
///     .insert(&NewRecipient {
///         name: "Carla".into(),
///         street: "Rua A".into(),
///         number: 12,
///         complement: None,
///         state: "SP".into(),
///         city: "Campinas".into(),
///         cep: "13000-000".into(),
///     })
///     .await
///     .expect("insert recipient");
/// assert_eq!(recipient.id.get(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, State>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::connection("memory store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, PersistenceError> {
        Ok(self.lock()?.users.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError> {
        Ok(self.lock()?.users.get(id.get()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, PersistenceError> {
        Ok(self
            .lock()?
            .users
            .rows
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, PersistenceError> {
        let mut state = self.lock()?;
        if state.email_taken(&user.email, None) {
            return Err(PersistenceError::duplicate("users_email_key"));
        }
        let id = state.users.next_id();
        let stored = User {
            id: UserId::new(id),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            admin: user.admin,
        };
        state.users.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, PersistenceError> {
        let mut state = self.lock()?;
        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(PersistenceError::duplicate("users_email_key"));
            }
        }
        let Some(user) = state.users.rows.get_mut(&id.get()) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, PersistenceError> {
        Ok(self.lock()?.users.rows.remove(&id.get()).is_some())
    }
}

#[async_trait]
impl DeliverymanRepository for MemoryStore {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Deliveryman>, PersistenceError> {
        Ok(self
            .lock()?
            .deliverymen
            .page(filter, |row| row.name.as_str()))
    }

    async fn find_by_id(
        &self,
        id: DeliverymanId,
    ) -> Result<Option<Deliveryman>, PersistenceError> {
        Ok(self.lock()?.deliverymen.get(id.get()))
    }

    async fn insert(&self, deliveryman: &NewDeliveryman) -> Result<Deliveryman, PersistenceError> {
        let mut state = self.lock()?;
        let id = state.deliverymen.next_id();
        let stored = Deliveryman {
            id: DeliverymanId::new(id),
            name: deliveryman.name.clone(),
            email: deliveryman.email.clone(),
            avatar_id: deliveryman.avatar_id,
        };
        state.deliverymen.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: DeliverymanId,
        changes: &DeliverymanChanges,
    ) -> Result<Option<Deliveryman>, PersistenceError> {
        let mut state = self.lock()?;
        let Some(row) = state.deliverymen.rows.get_mut(&id.get()) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            row.name = name.clone();
        }
        if let Some(email) = &changes.email {
            row.email = email.clone();
        }
        if changes.avatar_id.is_some() {
            row.avatar_id = changes.avatar_id;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: DeliverymanId) -> Result<bool, PersistenceError> {
        let mut state = self.lock()?;
        let removed = state.deliverymen.rows.remove(&id.get()).is_some();
        if removed {
            state.remove_deliveries_where(|delivery| delivery.deliveryman_id == id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl RecipientRepository for MemoryStore {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Recipient>, PersistenceError> {
        Ok(self
            .lock()?
            .recipients
            .page(filter, |row| row.name.as_str()))
    }

    async fn find_by_id(&self, id: RecipientId) -> Result<Option<Recipient>, PersistenceError> {
        Ok(self.lock()?.recipients.get(id.get()))
    }

    async fn insert(&self, recipient: &NewRecipient) -> Result<Recipient, PersistenceError> {
        let mut state = self.lock()?;
        let id = state.recipients.next_id();
        let stored = Recipient {
            id: RecipientId::new(id),
            name: recipient.name.clone(),
            street: recipient.street.clone(),
            number: recipient.number,
            complement: recipient.complement.clone(),
            state: recipient.state.clone(),
            city: recipient.city.clone(),
            cep: recipient.cep.clone(),
        };
        state.recipients.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: RecipientId,
        changes: &RecipientChanges,
    ) -> Result<Option<Recipient>, PersistenceError> {
        let mut state = self.lock()?;
        let Some(row) = state.recipients.rows.get_mut(&id.get()) else {
            return Ok(None);
        };
        let RecipientChanges {
            name,
            street,
            number,
            complement,
            state: region,
            city,
            cep,
        } = changes.clone();
        row.name = name.unwrap_or_else(|| row.name.clone());
        row.street = street.unwrap_or_else(|| row.street.clone());
        row.number = number.unwrap_or(row.number);
        row.complement = complement.or_else(|| row.complement.clone());
        row.state = region.unwrap_or_else(|| row.state.clone());
        row.city = city.unwrap_or_else(|| row.city.clone());
        row.cep = cep.unwrap_or_else(|| row.cep.clone());
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: RecipientId) -> Result<bool, PersistenceError> {
        let mut state = self.lock()?;
        let removed = state.recipients.rows.remove(&id.get()).is_some();
        if removed {
            state.remove_deliveries_where(|delivery| delivery.recipient_id == id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl DeliveryRepository for MemoryStore {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Delivery>, PersistenceError> {
        Ok(self
            .lock()?
            .deliveries
            .page(filter, |row| row.product.as_str()))
    }

    async fn find_by_id(&self, id: DeliveryId) -> Result<Option<Delivery>, PersistenceError> {
        Ok(self.lock()?.deliveries.get(id.get()))
    }

    async fn find_snapshot(
        &self,
        id: DeliveryId,
    ) -> Result<Option<DeliverySnapshot>, PersistenceError> {
        let state = self.lock()?;
        let Some(delivery) = state.deliveries.get(id.get()) else {
            return Ok(None);
        };
        let Some(deliveryman) = state.deliverymen.get(delivery.deliveryman_id.get()) else {
            return Ok(None);
        };
        Ok(Some(DeliverySnapshot {
            delivery,
            deliveryman: deliveryman.contact(),
        }))
    }

    async fn insert(&self, delivery: &NewDelivery) -> Result<Delivery, PersistenceError> {
        let mut state = self.lock()?;
        if !state.recipients.rows.contains_key(&delivery.recipient_id.get()) {
            return Err(PersistenceError::missing_reference(
                "deliveries_recipient_id_fkey",
            ));
        }
        if !state
            .deliverymen
            .rows
            .contains_key(&delivery.deliveryman_id.get())
        {
            return Err(PersistenceError::missing_reference(
                "deliveries_deliveryman_id_fkey",
            ));
        }
        let id = state.deliveries.next_id();
        let stored = Delivery {
            id: DeliveryId::new(id),
            product: delivery.product.clone(),
            recipient_id: delivery.recipient_id,
            deliveryman_id: delivery.deliveryman_id,
            signature_id: None,
            start_date: None,
            end_date: None,
            canceled_at: None,
        };
        state.deliveries.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: DeliveryId,
        changes: &DeliveryChanges,
    ) -> Result<Option<Delivery>, PersistenceError> {
        let mut state = self.lock()?;
        if let Some(recipient_id) = changes.recipient_id {
            if !state.recipients.rows.contains_key(&recipient_id.get()) {
                return Err(PersistenceError::missing_reference(
                    "deliveries_recipient_id_fkey",
                ));
            }
        }
        if let Some(deliveryman_id) = changes.deliveryman_id {
            if !state.deliverymen.rows.contains_key(&deliveryman_id.get()) {
                return Err(PersistenceError::missing_reference(
                    "deliveries_deliveryman_id_fkey",
                ));
            }
        }
        let Some(row) = state.deliveries.rows.get_mut(&id.get()) else {
            return Ok(None);
        };
        if let Some(product) = &changes.product {
            row.product = product.clone();
        }
        row.recipient_id = changes.recipient_id.unwrap_or(row.recipient_id);
        row.deliveryman_id = changes.deliveryman_id.unwrap_or(row.deliveryman_id);
        row.signature_id = changes.signature_id.or(row.signature_id);
        row.end_date = changes.end_date.or(row.end_date);
        Ok(Some(row.clone()))
    }

    async fn cancel(&self, id: DeliveryId, at: DateTime<Utc>) -> Result<bool, PersistenceError> {
        let mut state = self.lock()?;
        let Some(row) = state.deliveries.rows.get_mut(&id.get()) else {
            return Ok(false);
        };
        row.canceled_at = Some(row.cancellation_time(at));
        Ok(true)
    }

    async fn delete(&self, id: DeliveryId) -> Result<bool, PersistenceError> {
        Ok(self.lock()?.remove_delivery(id.get()))
    }
}

#[async_trait]
impl DeliveryProblemRepository for MemoryStore {
    async fn list(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<ProblemWithDelivery>, PersistenceError> {
        let state = self.lock()?;
        Ok(state
            .problems
            .page(filter, |row| row.description.as_str())
            .into_iter()
            .filter_map(|problem| state.with_delivery(problem))
            .collect())
    }

    async fn list_by_delivery(
        &self,
        delivery_id: DeliveryId,
    ) -> Result<Vec<ProblemWithDelivery>, PersistenceError> {
        let state = self.lock()?;
        Ok(state
            .problems
            .rows
            .values()
            .filter(|problem| problem.delivery_id == delivery_id)
            .cloned()
            .filter_map(|problem| state.with_delivery(problem))
            .collect())
    }

    async fn find_by_id(&self, id: ProblemId) -> Result<Option<DeliveryProblem>, PersistenceError> {
        Ok(self.lock()?.problems.get(id.get()))
    }

    async fn find_with_delivery(
        &self,
        id: ProblemId,
    ) -> Result<Option<ProblemWithDelivery>, PersistenceError> {
        let state = self.lock()?;
        Ok(state
            .problems
            .get(id.get())
            .and_then(|problem| state.with_delivery(problem)))
    }

    async fn insert(
        &self,
        problem: &NewDeliveryProblem,
    ) -> Result<DeliveryProblem, PersistenceError> {
        let mut state = self.lock()?;
        if !state
            .deliveries
            .rows
            .contains_key(&problem.delivery_id.get())
        {
            return Err(PersistenceError::missing_reference(
                "delivery_problems_delivery_id_fkey",
            ));
        }
        let id = state.problems.next_id();
        let stored = DeliveryProblem {
            id: ProblemId::new(id),
            delivery_id: problem.delivery_id,
            description: problem.description.clone(),
        };
        state.problems.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: ProblemId,
        changes: &DeliveryProblemChanges,
    ) -> Result<Option<DeliveryProblem>, PersistenceError> {
        let mut state = self.lock()?;
        if let Some(delivery_id) = changes.delivery_id {
            if !state.deliveries.rows.contains_key(&delivery_id.get()) {
                return Err(PersistenceError::missing_reference(
                    "delivery_problems_delivery_id_fkey",
                ));
            }
        }
        let Some(row) = state.problems.rows.get_mut(&id.get()) else {
            return Ok(None);
        };
        if let Some(description) = &changes.description {
            row.description = description.clone();
        }
        row.delivery_id = changes.delivery_id.unwrap_or(row.delivery_id);
        Ok(Some(row.clone()))
    }
}
