//! Events over GraphQL at `POST /graphql`.
//!
//! The handler stores the raw `Authorization` header in request data and each
//! field resolver runs it through the shared [`AccessGate`] with the
//! permission that field needs.

use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, InputObject, Object, Schema,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{http::HeaderMap, routing::post, Extension, Router};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::AppState;
use crate::auth::{AccessGate, AuthContext};
use crate::error::AppError;
use crate::events::{Event, EventPage, EventService, EventUpdate, NewEvent, Page};
use crate::middleware::auth::authorization_header;
use crate::rbac::permissions::{EVENTS_CREATE, EVENTS_DELETE, EVENTS_READ, EVENTS_UPDATE};

pub type EventSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Raw `Authorization` header of the HTTP request carrying the operation.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationHeader(pub Option<String>);

pub fn build_schema(state: &AppState) -> EventSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state.gate.clone())
        .data(state.events.clone())
        .finish()
}

pub fn graphql_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/graphql", post(graphql_handler))
        .layer(Extension(build_schema(&state)))
}

async fn graphql_handler(
    Extension(schema): Extension<EventSchema>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let header = AuthorizationHeader(authorization_header(&headers).map(str::to_owned));
    schema.execute(request.into_inner().data(header)).await.into()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Guard
// ═══════════════════════════════════════════════════════════════════════════════

fn authorize(ctx: &Context<'_>, required: &[&str]) -> async_graphql::Result<AuthContext> {
    let gate = ctx.data::<AccessGate>()?;
    let header = ctx
        .data_opt::<AuthorizationHeader>()
        .and_then(|h| h.0.as_deref());
    gate.check(header, required)
        .map_err(|e| AppError::from(e).extend())
}

fn events<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a EventService> {
    ctx.data::<EventService>()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Inputs
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, InputObject)]
pub struct CreateEventInput {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: DateTime<Utc>,
    pub organizer: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub capacity: Option<i32>,
}

impl From<CreateEventInput> for NewEvent {
    fn from(input: CreateEventInput) -> Self {
        Self {
            name: input.name,
            description: input.description.unwrap_or_default(),
            location: input.location.unwrap_or_default(),
            date: input.date,
            organizer: input.organizer.unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            tags: input.tags.unwrap_or_default(),
            capacity: input.capacity.unwrap_or_default(),
        }
    }
}

/// Omitted fields keep their current value.
#[derive(Debug, Default, InputObject)]
pub struct UpdateEventInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub organizer: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub capacity: Option<i32>,
}

impl From<UpdateEventInput> for EventUpdate {
    fn from(input: UpdateEventInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
            location: input.location,
            date: input.date,
            organizer: input.organizer,
            category: input.category,
            tags: input.tags,
            capacity: input.capacity,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Roots
// ═══════════════════════════════════════════════════════════════════════════════

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn event(&self, ctx: &Context<'_>, id: Uuid) -> async_graphql::Result<Event> {
        authorize(ctx, &[EVENTS_READ])?;
        events(ctx)?.get(id).await.map_err(|e| e.extend())
    }

    async fn events(
        &self,
        ctx: &Context<'_>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> async_graphql::Result<EventPage> {
        authorize(ctx, &[EVENTS_READ])?;
        events(ctx)?
            .list(Page::new(page, limit))
            .await
            .map_err(|e| e.extend())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_event(
        &self,
        ctx: &Context<'_>,
        input: CreateEventInput,
    ) -> async_graphql::Result<Event> {
        let caller = authorize(ctx, &[EVENTS_CREATE])?;
        events(ctx)?
            .create(&caller, input.into())
            .await
            .map_err(|e| e.extend())
    }

    async fn update_event(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateEventInput,
    ) -> async_graphql::Result<Event> {
        let caller = authorize(ctx, &[EVENTS_UPDATE])?;
        events(ctx)?
            .update(&caller, id, input.into())
            .await
            .map_err(|e| e.extend())
    }

    async fn delete_event(&self, ctx: &Context<'_>, id: Uuid) -> async_graphql::Result<bool> {
        let caller = authorize(ctx, &[EVENTS_DELETE])?;
        events(ctx)?
            .delete(&caller, id)
            .await
            .map_err(|e| e.extend())?;
        Ok(true)
    }
}
