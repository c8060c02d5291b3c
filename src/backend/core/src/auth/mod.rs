//! Authentication core: token service, access gate and credential flows.
//!
//! - [`TokenService`] mints and verifies HS256 tokens carrying a permission snapshot
//! - [`AccessGate`] authenticates a bearer credential and authorizes it against
//!   a required permission set; every transport goes through it
//! - [`AuthService`] implements signup, login, refresh and password flows

pub mod claims;
pub mod error;
pub mod gate;
pub mod password;
pub mod service;
pub mod token;

pub use claims::{Claims, TokenPurpose};
pub use error::{AuthError, AuthOutcome};
pub use gate::{AccessDecision, AccessGate, AuthContext};
pub use service::{AuthResponse, AuthService, CurrentUser, LoginRequest, SignupRequest};
pub use token::{IssuedToken, TokenService, TokenSettings, TokenVerifier};
