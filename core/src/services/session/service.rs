//! Session service implementation.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use flock_shared::types::Pagination;

use crate::domain::entities::session::Session;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, AuthResult};
use crate::repositories::SessionRepository;
use crate::services::clock::Clock;
use crate::services::token::TokenCodec;

/// Service managing session creation, validation, and extension
///
/// Per-session linearizability of version increments comes from the
/// repository's conditional update; this service never holds a lock across
/// an await.
pub struct SessionService<R: SessionRepository> {
    repository: R,
    clock: Arc<dyn Clock>,
}

impl<R: SessionRepository> SessionService<R> {
    /// Creates a new session service
    pub fn new(repository: R, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Create and persist a session for a fresh sign-in
    ///
    /// The session starts at version 1 with `expires_at = now + ttl_secs`.
    /// When `remember_me` is set, `max_renewal_secs` records the ceiling on
    /// cumulative extension; otherwise it is ignored.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        user_agent: &str,
        ip: &str,
        ttl_secs: i64,
        remember_me: bool,
        max_renewal_secs: i64,
    ) -> AuthResult<Session> {
        let session = Session::new(
            user_id,
            user_agent,
            ip,
            ttl_secs,
            remember_me,
            max_renewal_secs,
            self.clock.now(),
        );
        self.repository.create(&session).await?;

        debug!(session_id = %session.id, user_id = %user_id, remember_me, "session created");
        Ok(session)
    }

    /// Validate a session against the version a refresh token was minted for
    ///
    /// All rejection causes are merged into `SessionInvalid` so the caller
    /// cannot tell which check failed; the distinction is logged here. The
    /// returned flag says whether the session is eligible for extension.
    ///
    /// Sessions found expired or past their renewal ceiling are deleted as
    /// a side effect, forcing a full re-authentication.
    pub async fn validate_session(
        &self,
        session_id: Uuid,
        expected_version: i32,
    ) -> AuthResult<(Session, User, bool)> {
        let Some((session, user)) = self.repository.find_with_user(session_id).await? else {
            debug!(session_id = %session_id, "session not found");
            return Err(AuthError::SessionInvalid);
        };

        if session.version != expected_version {
            // The token was rotated out by a later extension. Worth a louder
            // log line: replay of a captured refresh token looks exactly
            // like this.
            warn!(
                session_id = %session_id,
                token_version = expected_version,
                session_version = session.version,
                "refresh token version mismatch"
            );
            return Err(AuthError::SessionInvalid);
        }

        let now = self.clock.now();
        if session.is_expired(now) {
            debug!(session_id = %session_id, "session expired, deleting");
            self.repository.delete(session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        let can_extend = if session.remember_me {
            if session.renewal_exhausted() {
                debug!(session_id = %session_id, "renewal ceiling reached, deleting");
                self.repository.delete(session_id).await?;
                return Err(AuthError::SessionInvalid);
            }
            true
        } else {
            false
        };

        Ok((session, user, can_extend))
    }

    /// Extend a remembered session and mint the replacement refresh token
    ///
    /// The new expiry is `now + renewal_secs`, clamped to the session's
    /// renewal ceiling. The update is conditioned on the version this
    /// caller read; losing that race yields `ExtensionConflict`, which is
    /// the only retriable failure in the core.
    pub async fn extend_session(
        &self,
        session: &Session,
        codec: &TokenCodec,
        renewal_secs: i64,
    ) -> AuthResult<String> {
        if !session.remember_me {
            return Err(AuthError::SessionNotExtendable);
        }

        let now = self.clock.now();
        let new_expires_at = session.capped_extension(now, renewal_secs);

        let Some(new_version) = self
            .repository
            .extend(session.id, session.version, new_expires_at)
            .await?
        else {
            warn!(
                session_id = %session.id,
                version = session.version,
                "lost extension race, session version moved"
            );
            return Err(AuthError::ExtensionConflict);
        };

        debug!(
            session_id = %session.id,
            version = new_version,
            expires_at = %new_expires_at,
            "session extended"
        );

        codec.mint_refresh(session.id, new_version, renewal_secs)
    }

    /// Delete a session outright (logout or forced re-authentication)
    pub async fn invalidate(&self, session_id: Uuid) -> AuthResult<()> {
        self.repository.delete(session_id).await
    }

    /// Best-effort freshness bookkeeping; never fails the caller
    pub async fn touch_last_used(&self, session_id: Uuid) {
        if let Err(e) = self
            .repository
            .touch_last_used(session_id, self.clock.now())
            .await
        {
            warn!(session_id = %session_id, error = %e, "failed to record session last_used");
        }
    }

    /// List a user's sessions, newest first
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> AuthResult<(Vec<Session>, u64)> {
        self.repository.list_for_user(user_id, pagination).await
    }
}
