//! The access gate: one authorization path shared by every transport.
//!
//! A request moves `Unauthenticated -> Authenticated -> Authorized` or is
//! rejected at the first failing step:
//!
//! 1. extract the bearer credential from the transport envelope
//! 2. validate it with the token verifier
//! 3. intersect the token's permissions with the required set (ANY-match)
//!
//! HTTP middleware, the gRPC service and the GraphQL resolvers all call
//! [`AccessGate::check`] with the raw `Authorization` value they received.

use chrono::{DateTime, Utc};
use metrics::counter;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{AuthError, Claims, TokenPurpose, TokenVerifier};

// ═══════════════════════════════════════════════════════════════════════════════
// Authentication Context
// ═══════════════════════════════════════════════════════════════════════════════

/// Verified caller identity attached to a request once the gate lets it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// User id (token subject)
    pub user_id: Uuid,

    /// User email
    pub email: String,

    /// Permission snapshot embedded in the token
    pub permissions: BTreeSet<String>,

    /// Token expiration
    pub expires_at: DateTime<Utc>,

    pub purpose: TokenPurpose,
}

impl AuthContext {
    /// Build a context from verified claims.
    pub fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        let user_id = claims.user_id()?;
        let expires_at = claims.expires_at();
        Ok(Self {
            user_id,
            email: claims.email,
            permissions: claims.permissions,
            expires_at,
            purpose: claims.purpose,
        })
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn is_access_token(&self) -> bool {
        self.purpose == TokenPurpose::Access
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().any(|p| self.has_permission(p.as_ref()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Decision
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The call may proceed.
    Allow,
    /// The call is rejected, with a reason.
    Deny(String),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny(_))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Access Gate
// ═══════════════════════════════════════════════════════════════════════════════

/// Transport-agnostic authentication and authorization predicate.
///
/// Cheap to clone; the verifier is shared.
#[derive(Clone)]
pub struct AccessGate {
    verifier: Arc<dyn TokenVerifier>,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}

impl AccessGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Step 1: pull the token out of an `Authorization` value.
    ///
    /// Only the exact form `Bearer <token>` is accepted. Anything else is
    /// rejected before the verifier is consulted.
    pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
        let header = match header {
            Some(h) if !h.is_empty() => h,
            _ => return Err(AuthError::MissingCredentials),
        };

        let mut parts = header.split(' ');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::MalformedCredentials),
        }
    }

    /// Steps 1 and 2. Only access tokens authenticate; reset tokens are
    /// rejected as invalid whatever permissions they carry.
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthContext, AuthError> {
        let result = Self::extract_bearer(header)
            .and_then(|token| self.verifier.validate_token(token))
            .and_then(AuthContext::from_claims)
            .and_then(|ctx| {
                if ctx.is_access_token() {
                    Ok(ctx)
                } else {
                    Err(AuthError::TokenInvalid)
                }
            });

        if let Err(ref e) = result {
            debug!(reason = e.code(), "Authentication rejected");
            counter!("auth_failures_total", "reason" => e.code()).increment(1);
        }

        result
    }

    /// Step 3. ANY-match: the caller needs at least one of `required`.
    /// An empty `required` set admits any authenticated caller.
    pub fn authorize<S: AsRef<str>>(&self, ctx: &AuthContext, required: &[S]) -> AccessDecision {
        if required.is_empty() || ctx.has_any_permission(required) {
            return AccessDecision::Allow;
        }

        let wanted: Vec<&str> = required.iter().map(|p| p.as_ref()).collect();
        AccessDecision::Deny(format!("requires any of [{}]", wanted.join(", ")))
    }

    /// [`authorize`](Self::authorize) as a `Result`.
    pub fn require_any<S: AsRef<str>>(&self, ctx: &AuthContext, required: &[S]) -> Result<(), AuthError> {
        match self.authorize(ctx, required) {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny(reason) => {
                warn!(user_id = %ctx.user_id, reason = %reason, "Permission denied");
                counter!("auth_denials_total").increment(1);
                Err(AuthError::forbidden(required))
            }
        }
    }

    /// Full pipeline: authenticate the header, then authorize against `required`.
    pub fn check<S: AsRef<str>>(&self, header: Option<&str>, required: &[S]) -> Result<AuthContext, AuthError> {
        let ctx = self.authenticate(header)?;
        self.require_any(&ctx, required)?;
        Ok(ctx)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
