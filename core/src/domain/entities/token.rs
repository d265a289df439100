//! Claim payloads carried inside encrypted tokens.
//!
//! Claims are ephemeral: they exist only inside a sealed token string and
//! are never persisted. Revocation is structural (session deletion or
//! version bump), so there is no token id and no blacklist.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AuthError, AuthResult};

/// Payload of an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Principal the token authenticates
    pub user_id: Uuid,

    /// Session the token was minted under
    pub session_id: Uuid,

    /// Issued-at, unix seconds
    pub iat: i64,

    /// Expiry, unix seconds
    pub exp: i64,
}

impl AccessClaims {
    /// Creates claims expiring `ttl_secs` after `now`
    pub fn new(user_id: Uuid, session_id: Uuid, ttl_secs: i64, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            session_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        }
    }

    /// Whether the claims are past expiry at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Expiry re-check for callers that received claims from the codec.
    /// The codec already rejects expired tokens; this guards against a
    /// codec that only checks at parse time.
    pub fn validate(&self, now: DateTime<Utc>) -> AuthResult<()> {
        if self.is_expired(now) {
            return Err(AuthError::ExpiredToken);
        }
        Ok(())
    }
}

/// Payload of a refresh token
///
/// Bound to a session version rather than directly to a principal: the
/// token is only as valid as the session row it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Session the token refreshes
    pub session_id: Uuid,

    /// Session version the token was minted for
    pub version: i32,

    /// Issued-at, unix seconds
    pub iat: i64,

    /// Expiry, unix seconds
    pub exp: i64,
}

impl RefreshClaims {
    /// Creates claims expiring `ttl_secs` after `now`
    pub fn new(session_id: Uuid, version: i32, ttl_secs: i64, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            version,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        }
    }

    /// Whether the claims are past expiry at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Expiry re-check, same contract as [`AccessClaims::validate`]
    pub fn validate(&self, now: DateTime<Utc>) -> AuthResult<()> {
        if self.is_expired(now) {
            return Err(AuthError::ExpiredToken);
        }
        Ok(())
    }
}
