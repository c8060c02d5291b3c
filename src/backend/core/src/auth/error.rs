//! Authentication and authorization failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::AppError;

/// Every failure the token service, resolver and access gate can produce.
///
/// Each variant maps to exactly one externally observable outcome, see
/// [`AuthError::outcome`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid authentication configuration: {0}")]
    Config(String),

    #[error("Missing authentication credentials")]
    MissingCredentials,

    #[error("Malformed authorization header")]
    MalformedCredentials,

    #[error("Invalid authentication token")]
    TokenInvalid,

    #[error("Token is outside its validity window")]
    TokenExpired,

    #[error("Insufficient permissions, requires any of {required:?}")]
    Forbidden { required: Vec<String> },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Backing store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal authentication error: {0}")]
    Internal(String),
}

/// Externally observable class of an [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Log in again (401 / `UNAUTHENTICATED`).
    Unauthenticated,
    /// Authenticated but lacking access (403 / `PERMISSION_DENIED`).
    Forbidden,
    /// Transient server-side failure (503 / `UNAVAILABLE`).
    Unavailable,
    /// Misconfiguration or bug (500 / `INTERNAL`).
    Internal,
}

impl AuthError {
    pub fn forbidden<S: AsRef<str>>(required: &[S]) -> Self {
        Self::Forbidden {
            required: required.iter().map(|p| p.as_ref().to_string()).collect(),
        }
    }

    pub fn outcome(&self) -> AuthOutcome {
        match self {
            Self::MissingCredentials
            | Self::MalformedCredentials
            | Self::TokenInvalid
            | Self::TokenExpired
            | Self::InvalidCredentials => AuthOutcome::Unauthenticated,
            Self::Forbidden { .. } => AuthOutcome::Forbidden,
            Self::StoreUnavailable(_) => AuthOutcome::Unavailable,
            Self::Config(_) | Self::Internal(_) => AuthOutcome::Internal,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.outcome() == AuthOutcome::Unauthenticated
    }

    pub fn is_forbidden(&self) -> bool {
        self.outcome() == AuthOutcome::Forbidden
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::MalformedCredentials => "MALFORMED_CREDENTIALS",
            Self::TokenInvalid => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-safe message. Never says which check failed beyond the outcome class.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "Authorization header is required",
            Self::MalformedCredentials => "Bearer token format required",
            Self::TokenInvalid | Self::TokenExpired => "Invalid or expired token",
            Self::InvalidCredentials => "Invalid credentials",
            Self::Forbidden { .. } => "Forbidden: insufficient permissions",
            Self::StoreUnavailable(_) => "Service temporarily unavailable",
            Self::Config(_) | Self::Internal(_) => "An authentication error occurred",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self.outcome() {
            AuthOutcome::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthOutcome::Forbidden => StatusCode::FORBIDDEN,
            AuthOutcome::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            AuthOutcome::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Rejections raised by middleware share the handler error envelope.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<AuthError> for tonic::Status {
    fn from(error: AuthError) -> Self {
        let message = error.public_message();
        match error.outcome() {
            AuthOutcome::Unauthenticated => tonic::Status::unauthenticated(message),
            AuthOutcome::Forbidden => tonic::Status::permission_denied(message),
            AuthOutcome::Unavailable => tonic::Status::unavailable(message),
            AuthOutcome::Internal => tonic::Status::internal(message),
        }
    }
}
