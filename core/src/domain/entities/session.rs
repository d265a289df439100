//! Session entity anchoring a login on the server side.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable session record
///
/// A session is the anchor every refresh token points back to. Its `version`
/// starts at 1 and increases by exactly one per successful extension, which
/// is what makes a rotated-out refresh token detectable: the old token still
/// decrypts, but its version no longer matches.
///
/// Sessions are mutated only through the session repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque random identifier, unguessable
    pub id: Uuid,

    /// Principal this session belongs to
    pub user_id: Uuid,

    /// Client user agent at sign-in, advisory only
    pub user_agent: String,

    /// Client IP at sign-in, advisory only
    pub ip: String,

    /// Monotonic rotation counter, starts at 1
    pub version: i32,

    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,

    /// Timestamp past which the session is invalid
    pub expires_at: DateTime<Utc>,

    /// Last time a refresh succeeded against this session
    pub last_used_at: Option<DateTime<Utc>>,

    /// Whether the session may be extended past its initial window
    pub remember_me: bool,

    /// Ceiling on cumulative extension, in seconds from `created_at`.
    /// Only meaningful when `remember_me` is set; zero otherwise.
    pub max_renewal_secs: i64,
}

impl Session {
    /// Creates a new session with version 1
    pub fn new(
        user_id: Uuid,
        user_agent: impl Into<String>,
        ip: impl Into<String>,
        ttl_secs: i64,
        remember_me: bool,
        max_renewal_secs: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            user_agent: user_agent.into(),
            ip: ip.into(),
            version: 1,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
            last_used_at: None,
            remember_me,
            max_renewal_secs: if remember_me { max_renewal_secs } else { 0 },
        }
    }

    /// Whether the session is past its expiry at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Latest instant any extension may reach
    pub fn max_renewal_time(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(self.max_renewal_secs)
    }

    /// Whether the renewal ceiling has been reached
    ///
    /// Once `expires_at` has been pushed to the ceiling, a further refresh
    /// would gain nothing; the session is torn down instead, forcing a full
    /// re-authentication.
    pub fn renewal_exhausted(&self) -> bool {
        self.remember_me && self.expires_at >= self.max_renewal_time()
    }

    /// New expiry for an extension at `now`, clamped to the renewal ceiling
    pub fn capped_extension(&self, now: DateTime<Utc>, renewal_secs: i64) -> DateTime<Utc> {
        let proposed = now + Duration::seconds(renewal_secs);
        proposed.min(self.max_renewal_time())
    }
}
