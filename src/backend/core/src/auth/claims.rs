//! Token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::AuthError;

/// What a token may be used for. Set only by the issuer, never by role grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// Regular session token accepted by the access gate.
    Access,
    /// Single-use credential for the password reset flow only.
    PasswordReset,
}

impl TokenPurpose {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::PasswordReset => "password_reset",
        }
    }
}

/// Decoded token payload: identity, a permission snapshot and the validity window.
///
/// Every field is required on the wire; a token missing any of them is
/// rejected as invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// User email
    pub email: String,

    /// Permission names granted at issuance time
    pub permissions: BTreeSet<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    pub purpose: TokenPurpose,
}

impl Claims {
    /// Parse the subject as a user id.
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::TokenInvalid)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// True when at least one of `required` is present.
    pub fn has_any_permission<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().any(|p| self.has_permission(p.as_ref()))
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}
