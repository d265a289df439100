//! Auth service configuration.

/// Lifetimes driving the issuance flow
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,

    /// Session and refresh token lifetime without remember-me
    pub session_ttl_secs: i64,

    /// Renewal period granted per refresh of a remembered session, and the
    /// initial lifetime of a remembered session
    pub remember_session_ttl_secs: i64,

    /// Ceiling on cumulative extension of a remembered session
    pub max_renewal_secs: i64,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            access_token_ttl_secs: 900,         // 15 minutes
            session_ttl_secs: 86_400,           // 1 day
            remember_session_ttl_secs: 604_800, // 7 days
            max_renewal_secs: 2_592_000,        // 30 days
        }
    }
}

impl AuthServiceConfig {
    /// Session lifetime for the given remember-me choice
    pub fn session_ttl_for(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.remember_session_ttl_secs
        } else {
            self.session_ttl_secs
        }
    }
}
