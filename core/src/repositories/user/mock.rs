//! In-memory implementations of UserRepository and UserCache for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, AuthResult};

use super::cache::UserCache;
use super::r#trait::UserRepository;

/// Mock user repository backed by a HashMap
///
/// Clones share state.
#[derive(Clone)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    fail_ops: Arc<AtomicBool>,
    lookups: Arc<AtomicUsize>,
}

impl MockUserRepository {
    /// Create an empty mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            fail_ops: Arc::new(AtomicBool::new(false)),
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Seed a user
    pub async fn insert(&self, user: User) {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
    }

    /// Handle to the underlying user map, shared with the session mock so
    /// its join sees the same users
    pub fn users_handle(&self) -> Arc<RwLock<HashMap<Uuid, User>>> {
        Arc::clone(&self.users)
    }

    /// Make every subsequent operation fail with a lookup error
    pub fn set_fail(&self, fail: bool) {
        self.fail_ops.store(fail, Ordering::SeqCst);
    }

    /// How many store lookups have been served
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> AuthResult<()> {
        if self.fail_ops.load(Ordering::SeqCst) {
            return Err(AuthError::Lookup {
                message: "simulated user store failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        self.check_failure()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        self.check_failure()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

/// Mock principal cache backed by a HashMap
///
/// Entries do not expire; tests drive staleness by hand via
/// [`remove`](MockUserCache::remove). Clones share state.
#[derive(Clone)]
pub struct MockUserCache {
    entries: Arc<RwLock<HashMap<Uuid, User>>>,
    fail_ops: Arc<AtomicBool>,
    hits: Arc<AtomicUsize>,
}

impl MockUserCache {
    /// Create an empty mock cache
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            fail_ops: Arc::new(AtomicBool::new(false)),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every subsequent operation fail with a lookup error
    pub fn set_fail(&self, fail: bool) {
        self.fail_ops.store(fail, Ordering::SeqCst);
    }

    /// Drop a cached entry, simulating TTL expiry
    pub async fn remove(&self, id: Uuid) {
        let mut entries = self.entries.write().await;
        entries.remove(&id);
    }

    /// How many get calls found an entry
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> AuthResult<()> {
        if self.fail_ops.load(Ordering::SeqCst) {
            return Err(AuthError::Lookup {
                message: "simulated cache failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockUserCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserCache for MockUserCache {
    async fn get(&self, id: Uuid) -> AuthResult<Option<User>> {
        self.check_failure()?;
        let entries = self.entries.read().await;
        let found = entries.get(&id).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        Ok(found)
    }

    async fn set(&self, user: &User) -> AuthResult<()> {
        self.check_failure()?;
        let mut entries = self.entries.write().await;
        entries.insert(user.id, user.clone());
        Ok(())
    }
}
