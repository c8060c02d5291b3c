//! `EventRepository` over Postgres.

use async_trait::async_trait;
use uuid::Uuid;

use super::Database;
use crate::events::{Event, EventRepository, EventUpdate, NewEvent, Page};
use crate::rbac::{StoreError, StoreResult};

const EVENT_COLUMNS: &str = "id, name, description, location, date, organizer, category, tags, \
                             capacity, created_by, created_at, updated_at";

#[async_trait]
impl EventRepository for Database {
    async fn create(&self, new_event: NewEvent, created_by: Option<Uuid>) -> StoreResult<Event> {
        let event = Event::from_new(new_event, created_by);
        sqlx::query(
            r#"
            INSERT INTO events (id, name, description, location, date, organizer, category,
                                tags, capacity, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.date)
        .bind(&event.organizer)
        .bind(&event.category)
        .bind(&event.tags)
        .bind(event.capacity)
        .bind(event.created_by)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(self.pool())
        .await?;

        Ok(event)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Event> {
        sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| StoreError::not_found("event", id))
    }

    async fn list(&self, page: Page) -> StoreResult<(Vec<Event>, i64)> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date, id LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(self.pool())
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(self.pool())
            .await?;

        Ok((events, total))
    }

    async fn update(&self, id: Uuid, update: EventUpdate) -> StoreResult<Event> {
        sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                date = COALESCE($5, date),
                organizer = COALESCE($6, organizer),
                category = COALESCE($7, category),
                tags = COALESCE($8, tags),
                capacity = COALESCE($9, capacity),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.description)
        .bind(update.location)
        .bind(update.date)
        .bind(update.organizer)
        .bind(update.category)
        .bind(update.tags)
        .bind(update.capacity)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| StoreError::not_found("event", id))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("event", id));
        }
        Ok(())
    }
}
