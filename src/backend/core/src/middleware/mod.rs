//! HTTP middleware for Eventify Core.
pub mod auth;

pub use auth::{authorization_header, AuthLayer, AuthService};
