//! In-memory credential and RBAC store.
//!
//! Backs tests and database-less local runs. Uniqueness of emails, names and
//! edge pairs is enforced with `DashMap` entries so concurrent writers see the
//! same constraints the Postgres schema imposes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use super::models::{NewUser, Permission, Role, RolePermission, User, UserRole};
use super::store::{RbacStore, StoreError, StoreResult, UserStore};
use crate::auth::password;

/// Thread-safe in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: DashMap<Uuid, User>,
    emails: DashMap<String, Uuid>,
    roles: DashMap<Uuid, Role>,
    role_names: DashMap<String, Uuid>,
    permissions: DashMap<Uuid, Permission>,
    permission_names: DashMap<String, Uuid>,
    user_roles: DashMap<UserRole, DateTime<Utc>>,
    role_permissions: DashMap<RolePermission, DateTime<Utc>>,
    /// Simulated outage: every call fails with `Unavailable` while set.
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a simulated outage.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }

    fn ensure_user(&self, id: Uuid) -> StoreResult<()> {
        if self.inner.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::not_found("user", id))
        }
    }

    fn ensure_role(&self, id: Uuid) -> StoreResult<()> {
        if self.inner.roles.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::not_found("role", id))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Credential Store
// ═══════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        self.ensure_online()?;
        let hash = password::hash_password(&new_user.password)
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let user = User::new(new_user.email, hash, new_user.first_name, new_user.last_name);

        match self.inner.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::duplicate("user", &user.email)),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.inner.users.insert(user.id, user.clone());
                Ok(user)
            }
        }
    }

    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<User> {
        self.ensure_online()?;
        self.inner
            .users
            .get(&id)
            .map(|u| u.clone())
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        self.ensure_online()?;
        let id = self
            .inner
            .emails
            .get(email)
            .map(|id| *id)
            .ok_or_else(|| StoreError::not_found("user", email))?;
        self.get_user_by_id(id).await
    }

    async fn update_password(&self, id: Uuid, new_plaintext: &str) -> StoreResult<()> {
        self.ensure_online()?;
        let hash = password::hash_password(new_plaintext)
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let mut user = self
            .inner
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("user", id))?;
        user.password_hash = hash;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> StoreResult<User> {
        self.ensure_online()?;
        let mut user = self
            .inner
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("user", id))?;
        if let Some(first) = first_name {
            user.first_name = first;
        }
        if let Some(last) = last_name {
            user.last_name = last;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        self.ensure_online()?;
        let (_, user) = self
            .inner
            .users
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("user", id))?;
        self.inner.emails.remove(&user.email);
        self.inner.user_roles.retain(|edge, _| edge.user_id != id);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RBAC Graph Store
// ═══════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl RbacStore for MemoryStore {
    async fn create_role(&self, name: &str, description: &str) -> StoreResult<Role> {
        self.ensure_online()?;
        let role = Role::new(name, description);
        match self.inner.role_names.entry(role.name.clone()) {
            Entry::Occupied(_) => Err(StoreError::duplicate("role", name)),
            Entry::Vacant(slot) => {
                slot.insert(role.id);
                self.inner.roles.insert(role.id, role.clone());
                Ok(role)
            }
        }
    }

    async fn get_role(&self, id: Uuid) -> StoreResult<Role> {
        self.ensure_online()?;
        self.inner
            .roles
            .get(&id)
            .map(|r| r.clone())
            .ok_or_else(|| StoreError::not_found("role", id))
    }

    async fn get_role_by_name(&self, name: &str) -> StoreResult<Role> {
        self.ensure_online()?;
        let id = self
            .inner
            .role_names
            .get(name)
            .map(|id| *id)
            .ok_or_else(|| StoreError::not_found("role", name))?;
        self.get_role(id).await
    }

    async fn get_all_roles(&self) -> StoreResult<Vec<Role>> {
        self.ensure_online()?;
        let mut roles: Vec<Role> = self.inner.roles.iter().map(|r| r.clone()).collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn create_permission(&self, name: &str, description: &str) -> StoreResult<Permission> {
        self.ensure_online()?;
        let permission = Permission::new(name, description);
        match self.inner.permission_names.entry(permission.name.clone()) {
            Entry::Occupied(_) => Err(StoreError::duplicate("permission", name)),
            Entry::Vacant(slot) => {
                slot.insert(permission.id);
                self.inner.permissions.insert(permission.id, permission.clone());
                Ok(permission)
            }
        }
    }

    async fn get_permission_by_name(&self, name: &str) -> StoreResult<Permission> {
        self.ensure_online()?;
        let id = self
            .inner
            .permission_names
            .get(name)
            .map(|id| *id)
            .ok_or_else(|| StoreError::not_found("permission", name))?;
        self.inner
            .permissions
            .get(&id)
            .map(|p| p.clone())
            .ok_or_else(|| StoreError::not_found("permission", name))
    }

    async fn get_all_permissions(&self) -> StoreResult<Vec<Permission>> {
        self.ensure_online()?;
        let mut permissions: Vec<Permission> =
            self.inner.permissions.iter().map(|p| p.clone()).collect();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }

    async fn assign_role_to_user(&self, user_id: Uuid, role_id: Uuid) -> StoreResult<()> {
        self.ensure_online()?;
        self.ensure_user(user_id)?;
        self.ensure_role(role_id)?;
        let edge = UserRole { user_id, role_id };
        match self.inner.user_roles.entry(edge) {
            Entry::Occupied(_) => Err(StoreError::duplicate("user_role", format!("({user_id}, {role_id})"))),
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                Ok(())
            }
        }
    }

    async fn remove_role_from_user(&self, user_id: Uuid, role_id: Uuid) -> StoreResult<()> {
        self.ensure_online()?;
        self.inner
            .user_roles
            .remove(&UserRole { user_id, role_id })
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("user_role", format!("({user_id}, {role_id})")))
    }

    async fn get_roles_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Role>> {
        self.ensure_online()?;
        let mut roles: Vec<Role> = self
            .inner
            .user_roles
            .iter()
            .filter(|edge| edge.key().user_id == user_id)
            .filter_map(|edge| self.inner.roles.get(&edge.key().role_id).map(|r| r.clone()))
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn assign_permission_to_role(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()> {
        self.ensure_online()?;
        self.ensure_role(role_id)?;
        if !self.inner.permissions.contains_key(&permission_id) {
            return Err(StoreError::not_found("permission", permission_id));
        }
        let edge = RolePermission { role_id, permission_id };
        match self.inner.role_permissions.entry(edge) {
            Entry::Occupied(_) => Err(StoreError::duplicate(
                "role_permission",
                format!("({role_id}, {permission_id})"),
            )),
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                Ok(())
            }
        }
    }

    async fn remove_permission_from_role(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()> {
        self.ensure_online()?;
        self.inner
            .role_permissions
            .remove(&RolePermission { role_id, permission_id })
            .map(|_| ())
            .ok_or_else(|| {
                StoreError::not_found("role_permission", format!("({role_id}, {permission_id})"))
            })
    }

    async fn get_permissions_for_role(&self, role_id: Uuid) -> StoreResult<Vec<Permission>> {
        self.ensure_online()?;
        let mut permissions: Vec<Permission> = self
            .inner
            .role_permissions
            .iter()
            .filter(|edge| edge.key().role_id == role_id)
            .filter_map(|edge| {
                self.inner
                    .permissions
                    .get(&edge.key().permission_id)
                    .map(|p| p.clone())
            })
            .collect();
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
