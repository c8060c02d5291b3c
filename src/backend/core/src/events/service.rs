//! Event operations shared by the HTTP, GraphQL and gRPC surfaces.
//!
//! Callers authorize before calling in; this layer validates input and maps
//! store failures into [`AppError`].

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::model::{Event, EventPage, EventUpdate, NewEvent, Page};
use super::repository::EventRepository;
use crate::auth::AuthContext;
use crate::error::{AppError, Result};
use crate::rbac::StoreError;

#[derive(Clone)]
pub struct EventService {
    repo: Arc<dyn EventRepository>,
}

impl EventService {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, ctx: &AuthContext, new_event: NewEvent) -> Result<Event> {
        new_event.validate()?;
        let event = self.repo.create(new_event, Some(ctx.user_id)).await?;
        info!(event_id = %event.id, user_id = %ctx.user_id, "Event created");
        Ok(event)
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        self.repo.get(id).await.map_err(event_error)
    }

    pub async fn list(&self, page: Page) -> Result<EventPage> {
        let (events, total) = self.repo.list(page).await?;
        Ok(EventPage {
            events,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    pub async fn update(&self, ctx: &AuthContext, id: Uuid, update: EventUpdate) -> Result<Event> {
        update.validate()?;
        if update.is_empty() {
            return self.get(id).await;
        }
        let event = self.repo.update(id, update).await.map_err(event_error)?;
        info!(event_id = %id, user_id = %ctx.user_id, "Event updated");
        Ok(event)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> Result<()> {
        self.repo.delete(id).await.map_err(event_error)?;
        info!(event_id = %id, user_id = %ctx.user_id, "Event deleted");
        Ok(())
    }
}

fn event_error(error: StoreError) -> AppError {
    match error {
        StoreError::NotFound { id, .. } => AppError::not_found("Event", id),
        other => other.into(),
    }
}
