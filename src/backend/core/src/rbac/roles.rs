//! Predefined roles with default permission sets.
//!
//! Eventify ships with three built-in roles:
//!
//! | Role    | Description                                        |
//! |---------|----------------------------------------------------|
//! | Admin   | Every permission, including the admin surface      |
//! | Editor  | Read, create and update events                     |
//! | Viewer  | Read-only access to events                         |

use tracing::{debug, info};

use super::models::{Permission, Role};
use super::permissions::*;
use super::store::{RbacStore, StoreError, StoreResult};

/// Predefined role templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredefinedRole {
    Admin,
    Editor,
    Viewer,
}

impl PredefinedRole {
    /// Get the stored role name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Editor => "Editor",
            Self::Viewer => "Viewer",
        }
    }

    /// Get the description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Admin => "Full access to events, users and roles",
            Self::Editor => "Create and update events",
            Self::Viewer => "Read-only access to events",
        }
    }

    /// Permission names granted by this role.
    pub fn permissions(&self) -> Vec<&'static str> {
        match self {
            Self::Admin => CATALOGUE.iter().map(|(name, _)| *name).collect(),
            Self::Editor => vec![EVENTS_READ, EVENTS_CREATE, EVENTS_UPDATE],
            Self::Viewer => vec![EVENTS_READ],
        }
    }

    /// Return all predefined roles.
    pub fn all() -> Vec<PredefinedRole> {
        vec![Self::Admin, Self::Editor, Self::Viewer]
    }
}

/// Create the permission catalogue and predefined roles if they are missing.
///
/// Safe to run on every start: existing rows and edges are left alone.
pub async fn seed_defaults(store: &dyn RbacStore) -> StoreResult<()> {
    let mut permissions: Vec<Permission> = Vec::with_capacity(CATALOGUE.len());
    for (name, description) in CATALOGUE {
        permissions.push(ensure_permission(store, name, description).await?);
    }

    for predefined in PredefinedRole::all() {
        let role = ensure_role(store, predefined.name(), predefined.description()).await?;
        for name in predefined.permissions() {
            let Some(permission) = permissions.iter().find(|p| p.name == name) else {
                continue;
            };
            match store.assign_permission_to_role(role.id, permission.id).await {
                Ok(()) | Err(StoreError::Duplicate { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        debug!(role = predefined.name(), "Seeded role");
    }

    info!(
        permissions = permissions.len(),
        roles = PredefinedRole::all().len(),
        "RBAC defaults seeded"
    );
    Ok(())
}

async fn ensure_permission(store: &dyn RbacStore, name: &str, description: &str) -> StoreResult<Permission> {
    match store.get_permission_by_name(name).await {
        Ok(existing) => Ok(existing),
        Err(StoreError::NotFound { .. }) => match store.create_permission(name, description).await {
            Ok(created) => Ok(created),
            // Lost a race with another instance seeding concurrently.
            Err(StoreError::Duplicate { .. }) => store.get_permission_by_name(name).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    }
}

async fn ensure_role(store: &dyn RbacStore, name: &str, description: &str) -> StoreResult<Role> {
    match store.get_role_by_name(name).await {
        Ok(existing) => Ok(existing),
        Err(StoreError::NotFound { .. }) => match store.create_role(name, description).await {
            Ok(created) => Ok(created),
            Err(StoreError::Duplicate { .. }) => store.get_role_by_name(name).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
