//! Credential flows: signup, login, refresh and password management.
//!
//! Every flow that mints an access token resolves permissions first, so a
//! token always carries the RBAC snapshot current at issuance.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::password::{hash_password, MIN_PASSWORD_LENGTH};
use super::{AuthContext, AuthError, IssuedToken, TokenPurpose, TokenService};
use crate::error::{AppError, Result};
use crate::rbac::{NewUser, PermissionResolver, StoreError, User, UserStore};

// ═══════════════════════════════════════════════════════════════════════════════
// Request / Response Types
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by every flow that mints an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Profile of the caller plus the permissions their token carries.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    #[serde(flatten)]
    pub user: User,
    pub permissions: BTreeSet<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Auth Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Stand-in account checked when a login names an unknown email, so both
/// failure paths pay for one Argon2 verification.
static DECOY_USER: OnceLock<User> = OnceLock::new();

fn decoy_user() -> &'static User {
    DECOY_USER.get_or_init(|| {
        let hash = hash_password("eventify-decoy-password").unwrap_or_default();
        User::new("decoy@invalid", hash, "", "")
    })
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    resolver: PermissionResolver,
    tokens: Arc<TokenService>,
    reset_lifetime: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        resolver: PermissionResolver,
        tokens: Arc<TokenService>,
        reset_lifetime: Duration,
    ) -> Self {
        Self {
            users,
            resolver,
            tokens,
            reset_lifetime,
        }
    }

    /// Register a user and sign them in.
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse> {
        let email = normalize_email(&request.email);
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid email address is required"));
        }
        validate_new_password(&request.password)?;

        let user = self
            .users
            .create_user(NewUser {
                email,
                password: request.password,
                first_name: request.first_name,
                last_name: request.last_name,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate { .. } => AppError::conflict("Email already registered"),
                other => AppError::from(other),
            })?;

        info!(user_id = %user.id, "User registered");
        self.issue_for(&user).await
    }

    /// Exchange email and password for a token.
    ///
    /// An unknown email and a wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let email = normalize_email(&request.email);
        let user = match self.users.get_user_by_email(&email).await {
            Ok(user) => user,
            Err(StoreError::NotFound { .. }) => {
                debug!("Login for unknown email");
                self.users.verify_password(decoy_user(), &request.password);
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(AuthError::from(e).into()),
        };

        if !self.users.verify_password(&user, &request.password) {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "User logged in");
        self.issue_for(&user).await
    }

    /// Mint a fresh token for an authenticated caller with re-resolved permissions.
    pub async fn refresh(&self, ctx: &AuthContext) -> Result<AuthResponse> {
        ensure_access_token(ctx)?;
        let user = self.load_caller(ctx.user_id).await?;
        self.issue_for(&user).await
    }

    pub async fn current_user(&self, ctx: &AuthContext) -> Result<CurrentUser> {
        ensure_access_token(ctx)?;
        let user = self.load_caller(ctx.user_id).await?;
        Ok(CurrentUser {
            user,
            permissions: ctx.permissions.clone(),
        })
    }

    /// Issue a short-lived reset token for `email` if it belongs to a user.
    ///
    /// Returns `None` for unknown emails; callers must respond identically in
    /// both cases and deliver the token out of band.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<IssuedToken>> {
        let user = match self.users.get_user_by_email(&normalize_email(email)).await {
            Ok(user) => user,
            Err(StoreError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(AuthError::from(e).into()),
        };

        let issued = self.tokens.issue_reset_token(&user, self.reset_lifetime)?;
        info!(user_id = %user.id, expires_at = %issued.expires_at, "Password reset token issued");
        Ok(Some(issued))
    }

    /// Set a new password using a reset token. Access tokens are refused
    /// whatever permissions they carry.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        validate_new_password(new_password)?;

        let ctx = AuthContext::from_claims(self.tokens.validate_token(token)?)?;
        if ctx.purpose != TokenPurpose::PasswordReset {
            warn!(user_id = %ctx.user_id, "Password reset attempted with a non-reset token");
            return Err(AuthError::forbidden(&[TokenPurpose::PasswordReset.as_str()]).into());
        }

        self.users
            .update_password(ctx.user_id, new_password)
            .await
            .map_err(caller_lookup_error)?;
        info!(user_id = %ctx.user_id, "Password reset");
        Ok(())
    }

    /// Change the caller's password after re-checking the current one.
    pub async fn change_password(
        &self,
        ctx: &AuthContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        ensure_access_token(ctx)?;
        validate_new_password(new_password)?;

        let user = self.load_caller(ctx.user_id).await?;
        if !self.users.verify_password(&user, current_password) {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.users
            .update_password(user.id, new_password)
            .await
            .map_err(caller_lookup_error)?;
        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    async fn issue_for(&self, user: &User) -> Result<AuthResponse> {
        let permissions = self.resolver.resolve_permissions(user.id).await?;
        let issued = self.tokens.issue_token(user, permissions)?;
        Ok(AuthResponse {
            token: issued.token,
            user_id: user.id,
            expires_at: issued.expires_at,
        })
    }

    async fn load_caller(&self, user_id: Uuid) -> Result<User> {
        self.users
            .get_user_by_id(user_id)
            .await
            .map_err(caller_lookup_error)
    }
}

/// A token whose subject no longer exists is as good as an invalid token.
fn caller_lookup_error(error: StoreError) -> AppError {
    match error {
        StoreError::NotFound { .. } => AuthError::TokenInvalid.into(),
        other => AuthError::from(other).into(),
    }
}

/// Reset tokens are only good for resetting a password.
fn ensure_access_token(ctx: &AuthContext) -> std::result::Result<(), AuthError> {
    if !ctx.is_access_token() {
        return Err(AuthError::TokenInvalid);
    }
    Ok(())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
