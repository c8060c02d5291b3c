//! Permission resolution: user -> roles -> permissions, flattened.

use metrics::counter;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::store::RbacStore;
use crate::auth::AuthError;

/// Computes the effective permission set of a user.
///
/// Only called when a token is minted (login, signup, refresh). Request
/// handling never consults it, so the result is a snapshot.
#[derive(Clone)]
pub struct PermissionResolver {
    store: Arc<dyn RbacStore>,
    timeout: Option<Duration>,
}

impl PermissionResolver {
    pub fn new(store: Arc<dyn RbacStore>) -> Self {
        Self { store, timeout: None }
    }

    /// Bound every resolution; exceeding it fails with `StoreUnavailable`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// De-duplicated permission names reachable from `user_id`.
    ///
    /// A user without roles, or with roles that grant nothing, resolves to an
    /// empty set. That is not an error.
    pub async fn resolve_permissions(&self, user_id: Uuid) -> Result<BTreeSet<String>, AuthError> {
        let lookup = self.store.get_permission_names_for_user(user_id);

        let names = match self.timeout {
            // Dropping the lookup on timeout abandons the in-flight query.
            Some(limit) => match tokio::time::timeout(limit, lookup).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(user_id = %user_id, timeout_ms = limit.as_millis() as u64, "Permission resolution timed out");
                    counter!("rbac_resolutions_total", "outcome" => "timeout").increment(1);
                    return Err(AuthError::StoreUnavailable("permission resolution timed out".into()));
                }
            },
            None => lookup.await,
        };

        let names = names.map_err(|e| {
            counter!("rbac_resolutions_total", "outcome" => "error").increment(1);
            AuthError::from(e)
        })?;

        let permissions: BTreeSet<String> = names.into_iter().collect();
        debug!(user_id = %user_id, count = permissions.len(), "Resolved permissions");
        counter!("rbac_resolutions_total", "outcome" => "ok").increment(1);
        Ok(permissions)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
