//! Read-through principal cache trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::AuthResult;

/// Short-TTL cache in front of [`UserRepository`](super::UserRepository)
///
/// Errors from the cache are real errors. The gateway fails closed on them
/// rather than falling through to a potentially stale read path: serving a
/// deactivated principal is worse than failing the request.
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Fetch a cached user
    ///
    /// # Returns
    /// * `Ok(Some(User))` - Cache hit
    /// * `Ok(None)` - Cache miss
    /// * `Err(AuthError::Lookup)` - Cache I/O failure (hard failure)
    async fn get(&self, id: Uuid) -> AuthResult<Option<User>>;

    /// Store a user with the cache's configured short TTL
    async fn set(&self, user: &User) -> AuthResult<()>;
}
