//! Role-Based Access Control (RBAC).
//!
//! This module provides:
//! - **Models**: User, Role, Permission and the UserRole / RolePermission edges
//! - **Stores**: credential and RBAC graph traits with an in-memory implementation
//! - **Resolver**: flattens user -> role -> permission edges into a name set
//! - **Predefined Roles**: Admin, Editor, Viewer with default permission sets
//! - **Authorization Middleware**: Axum layer enforcing ANY-of a permission set
//!
//! # Usage
//!
//! ```rust,ignore
//! use eventify_core::rbac::{MemoryStore, PermissionResolver, roles::seed_defaults};
//!
//! let store = Arc::new(MemoryStore::new());
//! seed_defaults(store.as_ref()).await?;
//!
//! let resolver = PermissionResolver::new(store.clone());
//! let permissions = resolver.resolve_permissions(user_id).await?;
//! ```

pub mod models;
pub mod permissions;
pub mod store;
pub mod memory;
pub mod resolver;
pub mod middleware;
pub mod roles;

pub use models::{NewUser, Permission, Role, RolePermission, User, UserRole};
pub use store::{RbacStore, StoreError, StoreResult, UserStore};
pub use memory::MemoryStore;
pub use resolver::PermissionResolver;
pub use middleware::{RequirePermissionLayer, RequirePermissionService};
pub use roles::PredefinedRole;
