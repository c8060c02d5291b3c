//! Axum authorization middleware that enforces a required permission set.
//!
//! Reads the `AuthContext` injected by [`crate::middleware::auth::AuthLayer`]
//! when present; otherwise authenticates from the `Authorization` header
//! itself, so the layer also works on its own. Either way the decision comes
//! from the shared [`AccessGate`] with ANY-match semantics.

use axum::{
    body::Body,
    extract::Request,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::auth::{AccessGate, AuthContext};
use crate::middleware::auth::authorization_header;

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Layer
// ═══════════════════════════════════════════════════════════════════════════════

/// Layer that wraps services with permission enforcement.
///
/// # Example
///
/// ```rust,ignore
/// use eventify_core::rbac::{permissions::EVENTS_DELETE, RequirePermissionLayer};
///
/// let app = Router::new()
///     .route("/events/:id", delete(delete_event)
///         .layer(RequirePermissionLayer::any_of(gate.clone(), &[EVENTS_DELETE])));
/// ```
#[derive(Clone)]
pub struct RequirePermissionLayer {
    gate: AccessGate,
    required: Arc<[String]>,
}

impl RequirePermissionLayer {
    /// Require at least one of `permissions`.
    pub fn any_of<S: AsRef<str>>(gate: AccessGate, permissions: &[S]) -> Self {
        Self {
            gate,
            required: permissions.iter().map(|p| p.as_ref().to_string()).collect(),
        }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }
}

impl<S> Layer<S> for RequirePermissionLayer {
    type Service = RequirePermissionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermissionService {
            inner,
            gate: self.gate.clone(),
            required: self.required.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Service that enforces a required permission set per request.
#[derive(Clone)]
pub struct RequirePermissionService<S> {
    inner: S,
    gate: AccessGate,
    required: Arc<[String]>,
}

impl<S> Service<Request<Body>> for RequirePermissionService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        let required = self.required.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let existing = request.extensions().get::<AuthContext>().cloned();

            let auth_ctx = match existing {
                Some(ctx) => ctx,
                None => match gate.authenticate(authorization_header(request.headers())) {
                    Ok(ctx) => ctx,
                    Err(e) => return Ok(e.into_response()),
                },
            };

            if let Err(e) = gate.require_any(&auth_ctx, &required[..]) {
                return Ok(e.into_response());
            }

            request.extensions_mut().insert(auth_ctx);
            inner.call(request).await
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
