//! Issued-credential value object for sign-in and refresh responses.

use serde::{Deserialize, Serialize};

/// Credentials issued by a sign-in or refresh operation
///
/// The refresh fields are absent when a refresh did not extend the session:
/// the client keeps using its current refresh token until the session's
/// fixed window runs out and a full re-authentication is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Sealed access token
    pub access_token: String,

    /// Absolute access token expiry, unix seconds
    pub access_expires_at: i64,

    /// Sealed refresh token, present when one was (re)issued
    pub refresh_token: Option<String>,

    /// Absolute refresh token expiry, unix seconds
    pub refresh_expires_at: Option<i64>,
}

impl AuthTokens {
    /// Response carrying only a fresh access token
    pub fn access_only(access_token: String, access_expires_at: i64) -> Self {
        Self {
            access_token,
            access_expires_at,
            refresh_token: None,
            refresh_expires_at: None,
        }
    }

    /// Attach a newly issued refresh token
    pub fn with_refresh(mut self, refresh_token: String, refresh_expires_at: i64) -> Self {
        self.refresh_token = Some(refresh_token);
        self.refresh_expires_at = Some(refresh_expires_at);
        self
    }
}
