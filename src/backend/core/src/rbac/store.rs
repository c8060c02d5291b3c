//! Store abstractions for credentials and the RBAC graph.
//!
//! Each trait has a Postgres implementation ([`crate::db::Database`]) and an
//! in-memory one ([`super::MemoryStore`]) used by tests and local runs.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{NewUser, Permission, Role, User};
use crate::auth::password;
use crate::auth::AuthError;

/// Store-level failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {key}")]
    Duplicate { entity: &'static str, key: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    pub fn duplicate(entity: &'static str, key: impl ToString) -> Self {
        Self::Duplicate { entity, key: key.to_string() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StoreError> for AuthError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable(msg) => AuthError::StoreUnavailable(msg),
            other => AuthError::Internal(other.to_string()),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Credential Store
// ═══════════════════════════════════════════════════════════════════════════════

/// Persists users and their hashed passwords.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user, hashing `new_user.password`. Fails with `Duplicate` on a taken email.
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;

    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<User>;

    async fn get_user_by_email(&self, email: &str) -> StoreResult<User>;

    /// Replace a user's password with the hash of `new_plaintext`.
    async fn update_password(&self, id: Uuid, new_plaintext: &str) -> StoreResult<()>;

    /// Update name fields; `None` leaves a field unchanged.
    async fn update_profile(
        &self,
        id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> StoreResult<User>;

    async fn delete_user(&self, id: Uuid) -> StoreResult<()>;

    /// Compare a plaintext password with the user's stored hash.
    fn verify_password(&self, user: &User, plaintext: &str) -> bool {
        password::verify_password(&user.password_hash, plaintext)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RBAC Graph Store
// ═══════════════════════════════════════════════════════════════════════════════

/// Persists roles, permissions and the user-role / role-permission edges.
///
/// Edges are unique by their key pair: assigning an existing edge fails with
/// `Duplicate`, removing a missing one with `NotFound`.
#[async_trait]
pub trait RbacStore: Send + Sync {
    async fn create_role(&self, name: &str, description: &str) -> StoreResult<Role>;

    async fn get_role(&self, id: Uuid) -> StoreResult<Role>;

    async fn get_role_by_name(&self, name: &str) -> StoreResult<Role>;

    async fn get_all_roles(&self) -> StoreResult<Vec<Role>>;

    async fn create_permission(&self, name: &str, description: &str) -> StoreResult<Permission>;

    async fn get_permission_by_name(&self, name: &str) -> StoreResult<Permission>;

    async fn get_all_permissions(&self) -> StoreResult<Vec<Permission>>;

    async fn assign_role_to_user(&self, user_id: Uuid, role_id: Uuid) -> StoreResult<()>;

    async fn remove_role_from_user(&self, user_id: Uuid, role_id: Uuid) -> StoreResult<()>;

    async fn get_roles_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Role>>;

    async fn assign_permission_to_role(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()>;

    async fn remove_permission_from_role(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()>;

    async fn get_permissions_for_role(&self, role_id: Uuid) -> StoreResult<Vec<Permission>>;

    /// Permission names reachable from a user, possibly with repeats.
    ///
    /// The default walks user -> roles -> permissions one role at a time;
    /// stores that can join in one round-trip override it.
    async fn get_permission_names_for_user(&self, user_id: Uuid) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for role in self.get_roles_for_user(user_id).await? {
            names.extend(
                self.get_permissions_for_role(role.id)
                    .await?
                    .into_iter()
                    .map(|p| p.name),
            );
        }
        Ok(names)
    }
}
