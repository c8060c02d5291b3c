//! Event CRUD under `/api/v1/events`.
//!
//! Each method carries its own permission layer; the handlers only see
//! requests the gate already let through.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiResponse, AppState};
use crate::auth::{AccessGate, AuthContext};
use crate::error::AppError;
use crate::events::{EventUpdate, NewEvent, Page};
use crate::rbac::permissions::{EVENTS_CREATE, EVENTS_DELETE, EVENTS_READ, EVENTS_UPDATE};
use crate::rbac::RequirePermissionLayer;

pub fn events_router(gate: AccessGate) -> Router<AppState> {
    let require = |permission: &str| RequirePermissionLayer::any_of(gate.clone(), &[permission]);

    Router::new()
        .route("/", get(list_events).layer(require(EVENTS_READ)))
        .route("/", post(create_event).layer(require(EVENTS_CREATE)))
        .route("/:id", get(get_event).layer(require(EVENTS_READ)))
        .route("/:id", put(update_event).layer(require(EVENTS_UPDATE)))
        .route("/:id", delete(delete_event).layer(require(EVENTS_DELETE)))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = state.events.list(Page::new(query.page, query.limit)).await?;
    Ok(Json(ApiResponse::success(page)))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.get(id).await?;
    Ok(Json(ApiResponse::success(event)))
}

async fn create_event(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(new_event) = payload?;
    let event = state.events.create(&ctx, new_event).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(event))))
}

async fn update_event(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    payload: Result<Json<EventUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(update) = payload?;
    let event = state.events.update(&ctx, id, update).await?;
    Ok(Json(ApiResponse::success(event)))
}

async fn delete_event(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.events.delete(&ctx, id).await?;
    Ok(Json(ApiResponse::message("Event deleted")))
}
