//! Token issuance and validation.
//!
//! Tokens are HS256-signed JWTs. They are self-contained: validation needs
//! only the shared secret, never a store round-trip, so the embedded
//! permission set is whatever was resolved at issuance.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use metrics::counter;
use serde::Serialize;
use tracing::debug;

use super::{AuthError, Claims, TokenPurpose};
use crate::rbac::User;

/// Construction parameters for [`TokenService`].
#[derive(Clone)]
pub struct TokenSettings {
    /// Shared signing secret. Must not be empty.
    pub secret: String,
    /// Default token lifetime.
    pub expiry: Duration,
    pub issuer: String,
    pub audience: String,
    /// Clock skew tolerated on `exp` / `nbf`.
    pub leeway_secs: u64,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiry: Duration::minutes(60),
            issuer: "eventify".to_string(),
            audience: "eventify-api".to_string(),
            leeway_secs: 0,
        }
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("expiry", &self.expiry)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// A freshly signed token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Anything able to turn a bearer string into verified claims.
///
/// The access gate depends on this rather than on [`TokenService`] directly.
pub trait TokenVerifier: Send + Sync {
    fn validate_token(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Mints and verifies signed tokens.
pub struct TokenService {
    expiry: Duration,
    issuer: String,
    audience: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service. Fails with [`AuthError::Config`] on an empty
    /// secret or a non-positive lifetime; there is no fallback secret.
    pub fn new(settings: TokenSettings) -> Result<Self, AuthError> {
        if settings.secret.trim().is_empty() {
            return Err(AuthError::Config("JWT secret must not be empty".into()));
        }
        if settings.expiry <= Duration::zero() {
            return Err(AuthError::Config("token expiry must be positive".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = settings.leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[&settings.issuer]);
        validation.set_audience(&[&settings.audience]);
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss", "aud"]);

        Ok(Self {
            expiry: settings.expiry,
            issuer: settings.issuer,
            audience: settings.audience,
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
        })
    }

    pub fn default_expiry(&self) -> Duration {
        self.expiry
    }

    /// Issue a token with the configured lifetime.
    pub fn issue_token<I, S>(&self, user: &User, permissions: I) -> Result<IssuedToken, AuthError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issue_token_at(user, permissions, Utc::now(), self.expiry)
    }

    /// Issue a password reset token. It carries no permissions and the
    /// access gate refuses it.
    pub fn issue_reset_token(&self, user: &User, expiry: Duration) -> Result<IssuedToken, AuthError> {
        self.sign(user, std::iter::empty::<String>(), TokenPurpose::PasswordReset, Utc::now(), expiry)
    }

    /// Issue a token as if it had been signed at `issued_at`.
    pub fn issue_token_at<I, S>(
        &self,
        user: &User,
        permissions: I,
        issued_at: DateTime<Utc>,
        expiry: Duration,
    ) -> Result<IssuedToken, AuthError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sign(user, permissions, TokenPurpose::Access, issued_at, expiry)
    }

    fn sign<I, S>(
        &self,
        user: &User,
        permissions: I,
        purpose: TokenPurpose,
        issued_at: DateTime<Utc>,
        expiry: Duration,
    ) -> Result<IssuedToken, AuthError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expires_at = issued_at + expiry;
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            permissions: permissions.into_iter().map(Into::into).collect(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            nbf: issued_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            purpose,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {}", e)))?;

        counter!("auth_tokens_issued_total", "purpose" => purpose.as_str()).increment(1);

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature, structure and validity window, returning the
    /// embedded claims verbatim.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Token validation failed");
            match e.kind() {
                ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            }
        })?;

        Ok(data.claims)
    }
}

impl TokenVerifier for TokenService {
    fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        TokenService::validate_token(self, token)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
