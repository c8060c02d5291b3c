//! # Eventify Core
//!
//! Authentication and authorization core for the Eventify event backend.
//!
//! ## Architecture
//!
//! - **Auth**: HS256 token issuance and validation, and the access gate that
//!   every transport calls with a raw `Authorization` header
//! - **RBAC**: users, roles and permissions; permission resolution at token
//!   issuance; the per-route permission layer
//! - **Events**: the CRUD resource exposed over HTTP, GraphQL and gRPC
//! - **DB**: Postgres implementations of every store
//! - **Observability**: structured logging and Prometheus metrics

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod middleware;
pub mod observability;
pub mod rbac;

pub use error::{AppError, ErrorCode, ErrorSeverity, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::auth::{
        AccessDecision, AccessGate, AuthContext, AuthError, AuthService, Claims, IssuedToken,
        TokenService, TokenSettings, TokenVerifier,
    };
    pub use crate::error::{AppError, ErrorCode, Result};
    pub use crate::events::{Event, EventRepository, EventService, EventUpdate, NewEvent, Page};
    pub use crate::middleware::AuthLayer;
    pub use crate::rbac::{
        MemoryStore, Permission, PermissionResolver, PredefinedRole, RbacStore,
        RequirePermissionLayer, Role, StoreError, User, UserStore,
    };
}
