//! Authentication configuration

use serde::{Deserialize, Serialize};

/// Token and session policy configuration
///
/// The two token keys are independent base64-encoded 32-byte secrets; the
/// codec refuses to start on any other length. Session lifetimes come in two
/// flavors selected by the caller's remember-me flag, and remembered sessions
/// carry a hard ceiling on cumulative renewal.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Base64-encoded symmetric key for access tokens (32 bytes decoded)
    pub access_token_key: String,

    /// Base64-encoded symmetric key for refresh tokens (32 bytes decoded)
    pub refresh_token_key: String,

    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,

    /// Session (and refresh token) lifetime in seconds without remember-me
    pub session_ttl_secs: i64,

    /// Renewal period granted per refresh of a remembered session, and the
    /// initial lifetime of a remembered session
    pub remember_session_ttl_secs: i64,

    /// Ceiling on cumulative extension of a remembered session, measured
    /// from its creation time
    pub max_renewal_secs: i64,

    /// Name of the HttpOnly cookie carrying the refresh token
    #[serde(default = "default_refresh_cookie")]
    pub refresh_cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // Fixed 32-byte keys; usable only for local development
            access_token_key: String::from("AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8="),
            refresh_token_key: String::from("ICEiIyQlJicoKSorLC0uLzAxMjM0NTY3ODk6Ozw9Pj8="),
            access_token_ttl_secs: 900,            // 15 minutes
            session_ttl_secs: 86_400,              // 1 day
            remember_session_ttl_secs: 604_800,    // 7 days
            max_renewal_secs: 2_592_000,           // 30 days
            refresh_cookie_name: default_refresh_cookie(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let access_token_key =
            std::env::var("AUTH_ACCESS_TOKEN_KEY").unwrap_or(defaults.access_token_key);
        let refresh_token_key =
            std::env::var("AUTH_REFRESH_TOKEN_KEY").unwrap_or(defaults.refresh_token_key);
        let access_token_ttl_secs = env_i64("AUTH_ACCESS_TOKEN_TTL_SECS", 900);
        let session_ttl_secs = env_i64("AUTH_SESSION_TTL_SECS", 86_400);
        let remember_session_ttl_secs = env_i64("AUTH_REMEMBER_SESSION_TTL_SECS", 604_800);
        let max_renewal_secs = env_i64("AUTH_MAX_RENEWAL_SECS", 2_592_000);
        let refresh_cookie_name =
            std::env::var("AUTH_REFRESH_COOKIE_NAME").unwrap_or_else(|_| default_refresh_cookie());

        Self {
            access_token_key,
            refresh_token_key,
            access_token_ttl_secs,
            session_ttl_secs,
            remember_session_ttl_secs,
            max_renewal_secs,
            refresh_cookie_name,
        }
    }

    /// Session lifetime for the given remember-me choice
    pub fn session_ttl_for(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.remember_session_ttl_secs
        } else {
            self.session_ttl_secs
        }
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_refresh_cookie() -> String {
    String::from("sid")
}
