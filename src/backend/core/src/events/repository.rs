//! Event persistence behind a trait, with an in-memory implementation.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use super::model::{Event, EventUpdate, NewEvent, Page};
use crate::rbac::{StoreError, StoreResult};

/// Storage for events. Listing is ordered by event date, then id.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, new_event: NewEvent, created_by: Option<Uuid>) -> StoreResult<Event>;

    async fn get(&self, id: Uuid) -> StoreResult<Event>;

    /// One page of events plus the total count.
    async fn list(&self, page: Page) -> StoreResult<(Vec<Event>, i64)>;

    async fn update(&self, id: Uuid, update: EventUpdate) -> StoreResult<Event>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// In-memory repository
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
pub struct MemoryEventRepository {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("event store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn create(&self, new_event: NewEvent, created_by: Option<Uuid>) -> StoreResult<Event> {
        self.ensure_online()?;
        let event = Event::from_new(new_event, created_by);
        self.events.write().insert(event.id, event.clone());
        Ok(event)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Event> {
        self.ensure_online()?;
        self.events
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("event", id))
    }

    async fn list(&self, page: Page) -> StoreResult<(Vec<Event>, i64)> {
        self.ensure_online()?;
        let events = self.events.read();
        let mut all: Vec<&Event> = events.values().collect();
        all.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok((items, events.len() as i64))
    }

    async fn update(&self, id: Uuid, update: EventUpdate) -> StoreResult<Event> {
        self.ensure_online()?;
        let mut events = self.events.write();
        let event = events
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("event", id))?;
        update.apply(event);
        Ok(event.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.ensure_online()?;
        self.events
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("event", id))
    }
}
