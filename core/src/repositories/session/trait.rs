//! Session repository trait defining the persistence contract for sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use flock_shared::types::Pagination;

use crate::domain::entities::session::Session;
use crate::domain::entities::user::User;
use crate::errors::AuthResult;

/// Repository trait for session persistence
///
/// The session row is the only mutable shared resource in the auth core and
/// it is mutated exclusively through this trait. Mutual exclusion between
/// concurrent extensions is delegated to the backing store's conditional
/// update in [`extend`](SessionRepository::extend); no in-process lock is
/// involved.
///
/// Implementations must honor the deadline configured for the store; a
/// timed-out operation fails with a `Lookup` error and must never leave a
/// session mutation half-applied.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a freshly created session
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Load a session joined with its owning user
    ///
    /// # Returns
    /// * `Ok(Some((session, user)))` - Session found
    /// * `Ok(None)` - No session with this id
    /// * `Err(AuthError::Lookup)` - Store I/O failure
    async fn find_with_user(&self, session_id: Uuid) -> AuthResult<Option<(Session, User)>>;

    /// Atomically extend a session, conditioned on its version
    ///
    /// Applies `expires_at = new_expires_at, version = version + 1` only
    /// when the stored version still equals `expected_version`.
    ///
    /// # Returns
    /// * `Ok(Some(new_version))` - This caller won the update
    /// * `Ok(None)` - Version moved underneath us (or the row is gone);
    ///   the caller lost the optimistic-concurrency race
    /// * `Err(AuthError::Lookup)` - Store I/O failure
    async fn extend(
        &self,
        session_id: Uuid,
        expected_version: i32,
        new_expires_at: DateTime<Utc>,
    ) -> AuthResult<Option<i32>>;

    /// Delete a session outright. Deleting an absent session is not an
    /// error; the end state is identical.
    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Record when the session was last used. Callers treat failures as
    /// non-fatal bookkeeping noise.
    async fn touch_last_used(&self, session_id: Uuid, at: DateTime<Utc>) -> AuthResult<()>;

    /// List a user's sessions, newest first
    ///
    /// # Returns
    /// The requested page and the total number of sessions for the user.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> AuthResult<(Vec<Session>, u64)>;
}
