//! Event records and the inputs that create or change them.

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Upper bound on page size for every list surface.
pub const MAX_PAGE_LIMIT: u32 = 100;
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

// ═══════════════════════════════════════════════════════════════════════════════
// Event
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, SimpleObject)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub organizer: String,
    pub category: String,
    pub tags: Vec<String>,
    pub capacity: i32,
    /// Creator, cleared if that user is deleted.
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn from_new(new_event: NewEvent, created_by: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new_event.name,
            description: new_event.description,
            location: new_event.location,
            date: new_event.date,
            organizer: new_event.organizer,
            category: new_event.category,
            tags: new_event.tags,
            capacity: new_event.capacity,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Inputs
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub capacity: i32,
}

impl NewEvent {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_capacity(self.capacity)
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub organizer: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub capacity: Option<i32>,
}

impl EventUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(capacity) = self.capacity {
            validate_capacity(capacity)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.date.is_none()
            && self.organizer.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.capacity.is_none()
    }

    /// Apply to `event` in place and bump `updated_at`.
    pub fn apply(self, event: &mut Event) {
        if let Some(v) = self.name {
            event.name = v;
        }
        if let Some(v) = self.description {
            event.description = v;
        }
        if let Some(v) = self.location {
            event.location = v;
        }
        if let Some(v) = self.date {
            event.date = v;
        }
        if let Some(v) = self.organizer {
            event.organizer = v;
        }
        if let Some(v) = self.category {
            event.category = v;
        }
        if let Some(v) = self.tags {
            event.tags = v;
        }
        if let Some(v) = self.capacity {
            event.capacity = v;
        }
        event.updated_at = Utc::now();
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Event name is required"));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> Result<()> {
    if capacity < 0 {
        return Err(AppError::validation("Capacity cannot be negative"));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════════════════════════

/// A 1-based page request with the limit clamped to `1..=MAX_PAGE_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}
