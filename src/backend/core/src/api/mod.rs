//! API layer for Eventify.
//!
//! REST (via Axum) and GraphQL share one router; gRPC (via Tonic) runs as a
//! separate server. All three authenticate through the same [`AccessGate`].
//!
//! # Routes
//!
//! - `GET /health`, `GET /metrics` (unauthenticated)
//! - `/api/v1/auth/*` and `/api/v1/password/*`: credential flows
//! - `/api/v1/events`: event CRUD, one permission per method
//! - `/api/v1/admin/*`: RBAC administration, `ADMIN_PERMISSIONS`
//! - `POST /graphql`: events over GraphQL

mod admin;
mod auth;
mod events;
pub mod graphql;
pub mod grpc;
mod handlers;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AccessGate, AuthError, AuthService, TokenService};
use crate::config::AuthConfig;
use crate::events::{EventRepository, EventService};
use crate::rbac::{PermissionResolver, RbacStore, UserStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub gate: AccessGate,
    pub tokens: Arc<TokenService>,
    pub resolver: PermissionResolver,
    pub auth: Arc<AuthService>,
    pub rbac: Arc<dyn RbacStore>,
    pub events: EventService,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire the auth core over the given stores.
    ///
    /// Fails fast on an unusable token configuration.
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserStore>,
        rbac: Arc<dyn RbacStore>,
        events: Arc<dyn EventRepository>,
    ) -> Result<Self, AuthError> {
        let tokens = Arc::new(TokenService::new(config.token_settings())?);
        let resolver = PermissionResolver::new(rbac.clone()).with_timeout(config.resolve_timeout());
        let auth = Arc::new(AuthService::new(
            users,
            resolver.clone(),
            tokens.clone(),
            config.reset_token_lifetime(),
        ));

        Ok(Self {
            gate: AccessGate::new(tokens.clone()),
            tokens,
            resolver,
            auth,
            rbac,
            events: EventService::new(events),
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

/// Build the HTTP router: REST, GraphQL, health and metrics.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let gate = state.gate.clone();

    let api_v1 = Router::new()
        .nest("/auth", auth::auth_router(gate.clone()))
        .nest("/password", auth::password_router(gate.clone()))
        .nest("/events", events::events_router(gate.clone()))
        .nest("/admin", admin::admin_router(gate));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::prometheus_metrics))
        .nest("/api/v1", api_v1)
        .merge(graphql::graphql_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}
