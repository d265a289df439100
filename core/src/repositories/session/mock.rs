//! In-memory implementation of SessionRepository for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use flock_shared::types::Pagination;

use crate::domain::entities::session::Session;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, AuthResult};

use super::r#trait::SessionRepository;

/// Mock session repository backed by a HashMap
///
/// Shares a user map with [`MockUserRepository`](crate::repositories::user::MockUserRepository)
/// so `find_with_user` behaves like the SQL join. The `extend` update runs
/// under a single write lock, which gives it the same winner-takes-all
/// semantics as the store's conditional update.
///
/// Clones share state, so tests can keep a handle after handing one to a
/// service.
#[derive(Clone)]
pub struct MockSessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    fail_ops: Arc<AtomicBool>,
}

impl MockSessionRepository {
    /// Create a mock sharing `users` with the user repository mock
    pub fn new(users: Arc<RwLock<HashMap<Uuid, User>>>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            users,
            fail_ops: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent operation fail with a lookup error
    pub fn set_fail(&self, fail: bool) {
        self.fail_ops.store(fail, Ordering::SeqCst);
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are stored
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Fetch a session directly, bypassing the trait
    pub async fn get(&self, session_id: Uuid) -> Option<Session> {
        self.sessions.read().await.get(&session_id).cloned()
    }

    fn check_failure(&self) -> AuthResult<()> {
        if self.fail_ops.load(Ordering::SeqCst) {
            return Err(AuthError::Lookup {
                message: "simulated session store failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        self.check_failure()?;
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn find_with_user(&self, session_id: Uuid) -> AuthResult<Option<(Session, User)>> {
        self.check_failure()?;
        let sessions = self.sessions.read().await;

        let Some(session) = sessions.get(&session_id).cloned() else {
            return Ok(None);
        };

        let users = self.users.read().await;
        match users.get(&session.user_id).cloned() {
            Some(user) => Ok(Some((session, user))),
            // Join semantics: a session without its user does not exist
            None => Ok(None),
        }
    }

    async fn extend(
        &self,
        session_id: Uuid,
        expected_version: i32,
        new_expires_at: DateTime<Utc>,
    ) -> AuthResult<Option<i32>> {
        self.check_failure()?;
        let mut sessions = self.sessions.write().await;

        let Some(session) = sessions.get_mut(&session_id) else {
            return Ok(None);
        };

        if session.version != expected_version {
            return Ok(None);
        }

        session.version += 1;
        session.expires_at = new_expires_at;
        Ok(Some(session.version))
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        self.check_failure()?;
        let mut sessions = self.sessions.write().await;
        sessions.remove(&session_id);
        Ok(())
    }

    async fn touch_last_used(&self, session_id: Uuid, at: DateTime<Utc>) -> AuthResult<()> {
        self.check_failure()?;
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&session_id) {
            session.last_used_at = Some(at);
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> AuthResult<(Vec<Session>, u64)> {
        self.check_failure()?;
        let sessions = self.sessions.read().await;

        let mut owned: Vec<Session> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = owned.len() as u64;
        let page = owned
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.per_page as usize)
            .collect();

        Ok((page, total))
    }
}
