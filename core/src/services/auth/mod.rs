//! Credential issuance flow
//!
//! Orchestrates the token codec, session service, and principal lookups
//! into the sign-in, refresh, logout, and request-time validation
//! operations.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::{AuthService, SignInCredentials};
