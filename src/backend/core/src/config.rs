//! Configuration management.
//!
//! Values come from the environment (prefix `EVENTIFY`, nesting separator
//! `__`), optionally layered over a config file. For example
//! `EVENTIFY__AUTH__JWT_SECRET` sets `auth.jwt_secret`.

use serde::Deserialize;
use std::time::Duration;

use crate::auth::{AuthError, TokenSettings};

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port (REST and GraphQL)
    #[serde(default = "default_port")]
    pub port: u16,

    /// gRPC server port
    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            grpc_port: default_grpc_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

/// Token signing and validation settings.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Symmetric signing secret. Required and must not be blank.
    #[serde(default)]
    pub jwt_secret: String,

    /// Lifetime of access tokens in minutes
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: u32,

    /// `iss` claim written and required on every token
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// `aud` claim written and required on every token
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Clock skew tolerated when checking `exp` and `nbf`
    #[serde(default)]
    pub leeway_secs: u64,

    /// Lifetime of password reset tokens in minutes
    #[serde(default = "default_reset_token_minutes")]
    pub reset_token_minutes: u32,

    /// Upper bound on a single permission resolution
    #[serde(default = "default_resolve_timeout_ms")]
    pub resolve_timeout_ms: u64,
}

// Keeps the secret out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("expiry_minutes", &self.expiry_minutes)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .field("reset_token_minutes", &self.reset_token_minutes)
            .field("resolve_timeout_ms", &self.resolve_timeout_ms)
            .finish()
    }
}

impl AuthConfig {
    /// Auth settings with the given secret and every other field defaulted.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            expiry_minutes: default_expiry_minutes(),
            issuer: default_issuer(),
            audience: default_audience(),
            leeway_secs: 0,
            reset_token_minutes: default_reset_token_minutes(),
            resolve_timeout_ms: default_resolve_timeout_ms(),
        }
    }

    /// Settings consumed by the token service.
    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            secret: self.jwt_secret.clone(),
            expiry: chrono::Duration::minutes(i64::from(self.expiry_minutes)),
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            leeway_secs: self.leeway_secs,
        }
    }

    pub fn reset_token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.reset_token_minutes))
    }

    pub fn resolve_timeout(&self) -> Option<Duration> {
        (self.resolve_timeout_ms > 0).then(|| Duration::from_millis(self.resolve_timeout_ms))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Install the Prometheus recorder and serve `/metrics`
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_grpc_port() -> u16 { 50051 }
fn default_max_connections() -> u32 { 20 }
fn default_min_connections() -> u32 { 5 }
fn default_acquire_timeout_secs() -> u64 { 5 }
fn default_expiry_minutes() -> u32 { 60 }
fn default_issuer() -> String { "eventify".to_string() }
fn default_audience() -> String { "eventify-api".to_string() }
fn default_reset_token_minutes() -> u32 { 15 }
fn default_resolve_timeout_ms() -> u64 { 2000 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_enabled() -> bool { true }

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("EVENTIFY").separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Load from a specific file path, with the environment layered on top.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("EVENTIFY").separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Reject configurations the server must not start with.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AuthError::Config("auth.jwt_secret must be set".into()));
        }
        if self.auth.expiry_minutes == 0 {
            return Err(AuthError::Config("auth.expiry_minutes must be positive".into()));
        }
        if self.auth.issuer.is_empty() || self.auth.audience.is_empty() {
            return Err(AuthError::Config("auth.issuer and auth.audience must be set".into()));
        }
        Ok(())
    }
}
